//! Host-side dispatch shims for the Candela kernels: buffer plumbing,
//! pipeline construction, and the per-frame encoding of the three compute
//! passes plus the resolve draw.
//!
//! Scene authoring, hierarchy construction, and asset loading live upstream;
//! this crate consumes prebuilt arrays.

mod buffers;
mod camera;
mod pipelines;
mod renderer;
mod shaders;

pub use candela_gpu as gpu;

pub use self::buffers::*;
pub use self::camera::*;
pub use self::pipelines::*;
pub use self::renderer::*;
pub use self::shaders::*;
