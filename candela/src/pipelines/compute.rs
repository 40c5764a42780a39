use crate::Shaders;

/// One full-frame compute dispatch: 8×8 workgroups covering every pixel.
pub struct ComputePass {
    label: String,
    pipeline: wgpu::ComputePipeline,
}

impl ComputePass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        entry_point: &str,
        layouts: &[&wgpu::BindGroupLayout],
    ) -> Self {
        let label = format!("candela_{}", entry_point.replace("::main", ""));

        log::debug!("Creating compute pipeline `{label}`");

        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{label}_layout")),
                bind_group_layouts: layouts,
                push_constant_ranges: &[],
            });

        let pipeline = device.create_compute_pipeline(
            &wgpu::ComputePipelineDescriptor {
                label: Some(&label),
                layout: Some(&layout),
                module: &shaders.module,
                entry_point,
            },
        );

        Self { label, pipeline }
    }

    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        bind_groups: &[&wgpu::BindGroup],
        (width, height): (u32, u32),
    ) {
        let mut pass =
            encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(&self.label),
            });

        pass.set_pipeline(&self.pipeline);

        for (index, bind_group) in bind_groups.iter().enumerate() {
            pass.set_bind_group(index as u32, bind_group, &[]);
        }

        pass.dispatch_workgroups((width + 7) / 8, (height + 7) / 8, 1);
    }
}
