use spirv_std::arch::IndexUnchecked;

use crate::SdfInstance;

/// Instances plus their parallel per-instance animation times.
#[derive(Clone, Copy)]
pub struct SdfsView<'a> {
    items: &'a [SdfInstance],
    times: &'a [f32],
}

impl<'a> SdfsView<'a> {
    pub fn new(items: &'a [SdfInstance], times: &'a [f32]) -> Self {
        Self { items, times }
    }

    pub fn get(self, index: u32) -> SdfInstance {
        unsafe { *self.items.index_unchecked(index as usize) }
    }

    pub fn time(self, index: u32) -> f32 {
        unsafe { *self.times.index_unchecked(index as usize) }
    }
}
