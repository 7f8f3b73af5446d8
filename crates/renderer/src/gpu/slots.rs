use std::borrow::Cow;

use image::RgbaImage;
use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::textures::DecodedImage;
use crate::types::TEXTURE_SLOT_CAPACITY;

struct SlotTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Texture slots bound on group 1.
///
/// Slots without an artwork are bound to a shared placeholder so the bind
/// group always matches the layout; the shader ignores them through the
/// slot count uniform.
pub(crate) struct ArtworkSlots {
    slots: Vec<SlotTexture>,
    unused: SlotTexture,
    sampler: wgpu::Sampler,
    bind_group: wgpu::BindGroup,
    max_dimension: u32,
}

impl ArtworkSlots {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        max_dimension: u32,
    ) -> Self {
        let unused = create_slot_texture(
            device,
            queue,
            "unused artwork slot",
            &DecodedImage::placeholder(),
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("artwork sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let bind_group = build_bind_group(device, layout, &[], &unused, &sampler);
        Self {
            slots: Vec::new(),
            unused,
            sampler,
            bind_group,
            max_dimension,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Replaces every slot with a fresh placeholder.
    pub fn allocate(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        count: usize,
    ) {
        let placeholder = DecodedImage::placeholder();
        self.slots = (0..count.min(TEXTURE_SLOT_CAPACITY))
            .map(|slot| {
                create_slot_texture(
                    device,
                    queue,
                    &format!("artwork slot #{slot}"),
                    &placeholder,
                )
            })
            .collect();
        self.rebuild(device, layout);
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        slot: usize,
        image: &DecodedImage,
    ) {
        if slot >= self.slots.len() {
            tracing::warn!(slot, slots = self.slots.len(), "ignoring upload to unallocated slot");
            return;
        }
        let image = fit_within(image, self.max_dimension);
        self.slots[slot] =
            create_slot_texture(device, queue, &format!("artwork slot #{slot}"), &image);
        self.rebuild(device, layout);
        tracing::debug!(slot, width = image.width, height = image.height, "artwork texture uploaded");
    }

    fn rebuild(&mut self, device: &wgpu::Device, layout: &wgpu::BindGroupLayout) {
        self.bind_group = build_bind_group(device, layout, &self.slots, &self.unused, &self.sampler);
    }
}

fn create_slot_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &DecodedImage,
) -> SlotTexture {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    SlotTexture {
        _texture: texture,
        view,
    }
}

fn build_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    slots: &[SlotTexture],
    unused: &SlotTexture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let mut entries = Vec::with_capacity(TEXTURE_SLOT_CAPACITY * 2);
    for index in 0..TEXTURE_SLOT_CAPACITY {
        let view = slots.get(index).map_or(&unused.view, |slot| &slot.view);
        entries.push(wgpu::BindGroupEntry {
            binding: (index as u32) * 2,
            resource: wgpu::BindingResource::TextureView(view),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: (index as u32) * 2 + 1,
            resource: wgpu::BindingResource::Sampler(sampler),
        });
    }
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("artwork slot bind group"),
        layout,
        entries: &entries,
    })
}

/// Downscales images the device cannot hold, keeping the aspect ratio.
fn fit_within(image: &DecodedImage, max_dimension: u32) -> Cow<'_, DecodedImage> {
    if image.width <= max_dimension && image.height <= max_dimension {
        return Cow::Borrowed(image);
    }
    let Some(buffer) = RgbaImage::from_raw(image.width, image.height, image.rgba.clone()) else {
        return Cow::Owned(DecodedImage::placeholder());
    };
    let scale = f64::from(max_dimension) / f64::from(image.width.max(image.height));
    let width = ((f64::from(image.width) * scale).floor() as u32).max(1);
    let height = ((f64::from(image.height) * scale).floor() as u32).max(1);
    tracing::debug!(
        from_width = image.width,
        from_height = image.height,
        width,
        height,
        "downscaling artwork to fit GPU limits"
    );
    let resized = image::imageops::thumbnail(&buffer, width, height);
    Cow::Owned(DecodedImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_images_pass_through() {
        let image = DecodedImage::new(4, 2, vec![7; 32]).unwrap();
        assert!(matches!(fit_within(&image, 16), Cow::Borrowed(_)));
    }

    #[test]
    fn large_images_keep_aspect() {
        let image = DecodedImage::new(40, 10, vec![9; 40 * 10 * 4]).unwrap();
        let fitted = fit_within(&image, 20);
        assert_eq!((fitted.width, fitted.height), (20, 5));
        assert_eq!(fitted.rgba.len(), 20 * 5 * 4);
    }
}
