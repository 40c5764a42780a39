use crate::Bindable;

/// The mipped texture-atlas page plus its bilinear sampler.
///
/// Mips are box-filtered on the CPU at upload time so the gradient sampling
/// in the kernels has a full chain to pick from.
pub struct AtlasTexture {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl AtlasTexture {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: impl AsRef<str>,
        size: (u32, u32),
        pixels: &[u8],
    ) -> Self {
        let label = label.as_ref();
        let (width, height) = size;

        assert_eq!(pixels.len(), (4 * width * height) as usize);

        let mip_level_count = 32 - width.min(height).leading_zeros();

        log::debug!(
            "Allocating atlas texture `{label}`; size={width}x{height}, mips={mip_level_count}",
        );

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let mut level_pixels = pixels.to_vec();
        let mut level_size = (width, height);

        for level in 0..mip_level_count {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: level,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level_pixels,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_size.0),
                    rows_per_image: Some(level_size.1),
                },
                wgpu::Extent3d {
                    width: level_size.0,
                    height: level_size.1,
                    depth_or_array_layers: 1,
                },
            );

            if level + 1 < mip_level_count {
                (level_pixels, level_size) =
                    downsample(&level_pixels, level_size);
            }
        }

        let view = texture.create_view(&Default::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{label}_sampler")),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self { view, sampler }
    }
}

/// Box-filters one rgba8 level into the next smaller one.
fn downsample(pixels: &[u8], size: (u32, u32)) -> (Vec<u8>, (u32, u32)) {
    let (width, height) = size;
    let next = (width / 2).max(1);
    let next_height = (height / 2).max(1);

    let mut out = Vec::with_capacity((4 * next * next_height) as usize);

    for y in 0..next_height {
        for x in 0..next {
            for channel in 0..4 {
                let mut sum = 0u32;

                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let sx = (2 * x + dx).min(width - 1);
                    let sy = (2 * y + dy).min(height - 1);

                    sum += pixels[(4 * (sy * width + sx) + channel) as usize]
                        as u32;
                }

                out.push((sum / 4) as u8);
            }
        }
    }

    (out, (next, next_height))
}

impl Bindable for AtlasTexture {
    fn bind(
        &self,
        binding: u32,
    ) -> Vec<(wgpu::BindGroupLayoutEntry, wgpu::BindingResource)> {
        let texture_layout = wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: true,
                },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let sampler_layout = wgpu::BindGroupLayoutEntry {
            binding: binding + 1,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT
                | wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Sampler(
                wgpu::SamplerBindingType::Filtering,
            ),
            count: None,
        };

        vec![
            (texture_layout, wgpu::BindingResource::TextureView(&self.view)),
            (sampler_layout, wgpu::BindingResource::Sampler(&self.sampler)),
        ]
    }
}
