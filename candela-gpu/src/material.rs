use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4, Vec4Swizzles};

/// Shading model selector; scattering matches on this tag.
#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub enum MaterialClass {
    Lambertian,
    Mirror,
    Glass,
    Isotropic,
}

impl MaterialClass {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Lambertian => 0,
            Self::Mirror => 1,
            Self::Glass => 2,
            Self::Isotropic => 3,
        }
    }

    fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Mirror,
            2 => Self::Glass,
            3 => Self::Isotropic,
            _ => Self::Lambertian,
        }
    }
}

/// Render-time immutable surface description.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct Material {
    /// x, y, z - albedo
    pub albedo: Vec4,

    /// x, y, z - specular color
    pub specular: Vec4,

    /// x, y, z - emission, w - specular strength
    pub emission: Vec4,

    /// x - roughness, y - refractive index η,
    /// z - albedo texture uid (i32 bits; negative selects a procedural
    /// texture, positive a 1-based atlas region, zero none),
    /// w - class (i32 bits)
    pub params: Vec4,
}

impl Material {
    pub fn new(class: MaterialClass) -> Self {
        Self {
            params: Vec4::new(
                0.0,
                0.0,
                f32::from_bits(0),
                f32::from_bits(class.as_i32() as u32),
            ),
            ..Default::default()
        }
    }

    pub fn with_albedo(mut self, r: f32, g: f32, b: f32) -> Self {
        self.albedo = Vec4::new(r, g, b, 0.0);
        self
    }

    pub fn with_specular(mut self, r: f32, g: f32, b: f32) -> Self {
        self.specular = Vec4::new(r, g, b, 0.0);
        self
    }

    pub fn with_emission(mut self, r: f32, g: f32, b: f32) -> Self {
        self.emission = Vec4::new(r, g, b, self.emission.w);
        self
    }

    pub fn with_specular_strength(mut self, strength: f32) -> Self {
        self.emission.w = strength;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.params.x = roughness;
        self
    }

    pub fn with_refractive_index(mut self, eta: f32) -> Self {
        self.params.y = eta;
        self
    }

    pub fn with_albedo_texture(mut self, uid: i32) -> Self {
        self.params.z = f32::from_bits(uid as u32);
        self
    }

    pub fn albedo_color(&self) -> Vec3 {
        self.albedo.xyz()
    }

    pub fn specular_color(&self) -> Vec3 {
        self.specular.xyz()
    }

    pub fn emission_color(&self) -> Vec3 {
        self.emission.xyz()
    }

    pub fn is_emissive(&self) -> bool {
        self.emission.xyz() != Vec3::ZERO
    }

    pub fn specular_strength(&self) -> f32 {
        self.emission.w
    }

    pub fn roughness(&self) -> f32 {
        self.params.x
    }

    pub fn refractive_index(&self) -> f32 {
        self.params.y
    }

    pub fn albedo_texture_uid(&self) -> i32 {
        self.params.z.to_bits() as i32
    }

    pub fn class(&self) -> MaterialClass {
        MaterialClass::from_i32(self.params.w.to_bits() as i32)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}
