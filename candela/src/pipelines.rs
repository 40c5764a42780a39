mod compute;
mod frame_composition;

pub use self::compute::*;
pub use self::frame_composition::*;
