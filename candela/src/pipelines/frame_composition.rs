use crate::Shaders;

/// The resolve draw: a full-screen triangle whose fragment stage divides the
/// accumulator, tonemaps, and dithers into the swapchain target.
pub struct FrameCompositionPass {
    pipeline: wgpu::RenderPipeline,
}

impl FrameCompositionPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        layouts: &[&wgpu::BindGroupLayout],
        format: wgpu::TextureFormat,
    ) -> Self {
        log::debug!("Creating render pipeline `candela_frame_composition`");

        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("candela_frame_composition_layout"),
                bind_group_layouts: layouts,
                push_constant_ranges: &[],
            });

        let pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("candela_frame_composition"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shaders.module,
                    entry_point: Shaders::COMPOSITION_VS,
                    buffers: &[],
                },
                primitive: Default::default(),
                depth_stencil: None,
                multisample: Default::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shaders.module,
                    entry_point: Shaders::COMPOSITION_FS,
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: None,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                multiview: None,
            });

        Self { pipeline }
    }

    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        bind_groups: &[&wgpu::BindGroup],
    ) {
        let mut pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("candela_frame_composition"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });

        pass.set_pipeline(&self.pipeline);

        for (index, bind_group) in bind_groups.iter().enumerate() {
            pass.set_bind_group(index as u32, bind_group, &[]);
        }

        pass.draw(0..3, 0..1);
    }
}
