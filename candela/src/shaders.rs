use std::io;
use std::path::Path;

/// The single SPIR-V module `candela-shader-builder` produces; every pass
/// entry point lives inside it.
#[derive(Debug)]
pub struct Shaders {
    pub module: wgpu::ShaderModule,
}

impl Shaders {
    pub const SURFACE_ATTRIBUTES: &'static str = "surface_attributes::main";
    pub const COLOR_MONTE_CARLO: &'static str = "color_monte_carlo::main";
    pub const COLOR_DETERMINISTIC: &'static str = "color_deterministic::main";
    pub const COMPOSITION_VS: &'static str = "frame_composition::vs";
    pub const COMPOSITION_FS: &'static str = "frame_composition::fs";

    pub fn load(
        device: &wgpu::Device,
        path: impl AsRef<Path>,
    ) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;

        let module =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("candela_shaders"),
                source: wgpu::util::make_spirv(&bytes),
            });

        Ok(Self { module })
    }
}
