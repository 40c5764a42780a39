mod f32_ext;
mod vec3_ext;

pub use self::f32_ext::*;
pub use self::vec3_ext::*;
use spirv_std::Image;

pub type AtlasImage = Image!(2D, type=f32, sampled);
pub type Tex<'a> = &'a AtlasImage;
