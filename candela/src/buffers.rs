mod atlas_texture;
mod bind_group;
mod bindable;
mod storage_buffer;
mod uniform_buffer;

pub use self::atlas_texture::*;
pub use self::bind_group::*;
pub use self::bindable::*;
pub use self::storage_buffer::*;
pub use self::uniform_buffer::*;
