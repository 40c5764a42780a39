use std::mem;

use glam::Vec4;

use crate::gpu::{
    AtlasMapping, BvhNode, Material, Parallelogram, SdfInstance, Triangle,
    Uniforms,
};
use crate::{
    gpu, AtlasTexture, BindGroup, ComputePass, FrameCompositionPass,
    MappedUniformBuffer, Shaders, StorageBuffer,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderStrategy {
    /// Stochastic path tracing, progressively accumulated over frames.
    MonteCarlo,
    /// Analytic direct lighting, re-rendered from scratch every frame.
    Deterministic,
}

/// Prebuilt scene arrays, ready for upload; building them is the scene
/// pipeline's job, not this crate's.
pub struct SceneDescriptor<'a> {
    pub parallelograms: &'a [Parallelogram],
    pub triangles: &'a [Triangle],
    pub sdfs: &'a [SdfInstance],
    pub sdf_times: &'a [f32],
    pub materials: &'a [Material],
    pub atlas_mappings: &'a [AtlasMapping],
    pub bvh: &'a [BvhNode],
    pub bvh_inflated: &'a [BvhNode],
    pub atlas_size: (u32, u32),
    pub atlas_pixels: &'a [u8],
}

pub struct Renderer {
    size: (u32, u32),
    strategy: RenderStrategy,
    accumulated_frames: u32,
    reset_requested: bool,

    uniforms: MappedUniformBuffer<Uniforms>,
    colors: StorageBuffer<Vec4>,
    sdf_times: StorageBuffer<f32>,

    uniforms_group: BindGroup,
    outputs_group: BindGroup,
    geometry_group: BindGroup,
    atlas_group: BindGroup,

    surface_attributes: ComputePass,
    color_monte_carlo: ComputePass,
    color_deterministic: ComputePass,
    frame_composition: FrameCompositionPass,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        shaders: &Shaders,
        size: (u32, u32),
        format: wgpu::TextureFormat,
        camera: gpu::Camera,
        scene: &SceneDescriptor,
    ) -> Self {
        let (width, height) = size;
        let pixels = (width * height) as usize;

        log::info!("Creating renderer; viewport={width}x{height}");

        let mut uniforms_data = Uniforms::new(camera, width, height);

        uniforms_data.set_counts(
            scene.parallelograms.len() as u32,
            scene.sdfs.len() as u32,
            scene.bvh.len() as u32,
        );

        let uniforms = MappedUniformBuffer::new(
            device,
            "candela_uniforms",
            uniforms_data,
        );

        let colors =
            StorageBuffer::<Vec4>::new(device, "candela_colors", pixels);
        let object_ids =
            StorageBuffer::<u32>::new(device, "candela_object_ids", pixels);
        let albedos =
            StorageBuffer::<Vec4>::new(device, "candela_albedos", pixels);
        let normals =
            StorageBuffer::<Vec4>::new(device, "candela_normals", pixels);

        let parallelograms = StorageBuffer::new_with(
            device,
            queue,
            "candela_parallelograms",
            scene.parallelograms,
        );

        let triangles = StorageBuffer::new_with(
            device,
            queue,
            "candela_triangles",
            scene.triangles,
        );

        let sdfs =
            StorageBuffer::new_with(device, queue, "candela_sdfs", scene.sdfs);

        let sdf_times = StorageBuffer::new_with(
            device,
            queue,
            "candela_sdf_times",
            scene.sdf_times,
        );

        let materials = StorageBuffer::new_with(
            device,
            queue,
            "candela_materials",
            scene.materials,
        );

        let bvh =
            StorageBuffer::new_with(device, queue, "candela_bvh", scene.bvh);

        let bvh_inflated = StorageBuffer::new_with(
            device,
            queue,
            "candela_bvh_inflated",
            scene.bvh_inflated,
        );

        let atlas_mappings = StorageBuffer::new_with(
            device,
            queue,
            "candela_atlas_mappings",
            scene.atlas_mappings,
        );

        let atlas = AtlasTexture::new(
            device,
            queue,
            "candela_atlas",
            scene.atlas_size,
            scene.atlas_pixels,
        );

        let uniforms_group =
            BindGroup::builder("uniforms").add(&uniforms).build(device);

        let outputs_group = BindGroup::builder("outputs")
            .add(&colors)
            .add(&object_ids)
            .add(&albedos)
            .add(&normals)
            .build(device);

        let geometry_group = BindGroup::builder("geometry")
            .add(&parallelograms)
            .add(&triangles)
            .add(&sdfs)
            .add(&sdf_times)
            .add(&materials)
            .add(&bvh)
            .add(&bvh_inflated)
            .add(&atlas_mappings)
            .build(device);

        let atlas_group =
            BindGroup::builder("atlas").add(&atlas).build(device);

        let layouts = [
            uniforms_group.layout(),
            outputs_group.layout(),
            geometry_group.layout(),
            atlas_group.layout(),
        ];

        let surface_attributes = ComputePass::new(
            device,
            shaders,
            Shaders::SURFACE_ATTRIBUTES,
            &layouts,
        );

        let color_monte_carlo = ComputePass::new(
            device,
            shaders,
            Shaders::COLOR_MONTE_CARLO,
            &layouts,
        );

        let color_deterministic = ComputePass::new(
            device,
            shaders,
            Shaders::COLOR_DETERMINISTIC,
            &layouts,
        );

        let frame_composition = FrameCompositionPass::new(
            device,
            shaders,
            &[uniforms_group.layout(), outputs_group.layout()],
            format,
        );

        Self {
            size,
            strategy: RenderStrategy::MonteCarlo,
            accumulated_frames: 0,
            reset_requested: true,
            uniforms,
            colors,
            sdf_times,
            uniforms_group,
            outputs_group,
            geometry_group,
            atlas_group,
            surface_attributes,
            color_monte_carlo,
            color_deterministic,
            frame_composition,
        }
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: RenderStrategy) {
        if self.strategy != strategy {
            self.strategy = strategy;
            self.reset_requested = true;
        }
    }

    pub fn set_camera(&mut self, camera: gpu::Camera) {
        self.uniforms.camera = camera;
        self.reset_requested = true;
    }

    pub fn set_antialiasing_level(&mut self, level: u32) {
        self.uniforms.set_pixel_side_subdivision(level);
        self.reset_requested = true;
    }

    /// Per-instance animation clocks; safe to call between frames only.
    pub fn update_sdf_times(&self, queue: &wgpu::Queue, times: &[f32]) {
        self.sdf_times.write(queue, times);
    }

    /// Encodes and submits one frame: surface attributes, the selected color
    /// pass, and the resolve into `target`.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        time_seconds: f32,
    ) {
        let mut encoder = device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("candela_frame"),
            },
        );

        if mem::take(&mut self.reset_requested) {
            self.colors.clear(&mut encoder);
            self.accumulated_frames = 0;
        }

        match self.strategy {
            RenderStrategy::MonteCarlo => self.accumulated_frames += 1,
            RenderStrategy::Deterministic => self.accumulated_frames = 1,
        }

        self.uniforms.set_time(time_seconds);

        let frames = self.accumulated_frames;
        self.uniforms.set_frame_number(frames);
        self.uniforms.flush(queue);

        let groups = [
            self.uniforms_group.get(),
            self.outputs_group.get(),
            self.geometry_group.get(),
            self.atlas_group.get(),
        ];

        self.surface_attributes.encode(&mut encoder, &groups, self.size);

        match self.strategy {
            RenderStrategy::MonteCarlo => {
                self.color_monte_carlo.encode(&mut encoder, &groups, self.size);
            }
            RenderStrategy::Deterministic => {
                self.color_deterministic.encode(
                    &mut encoder,
                    &groups,
                    self.size,
                );
            }
        }

        self.frame_composition.encode(
            &mut encoder,
            target,
            &[self.uniforms_group.get(), self.outputs_group.get()],
        );

        queue.submit(Some(encoder.finish()));
    }
}
