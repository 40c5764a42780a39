use spirv_std::arch::IndexUnchecked;

use crate::AtlasMapping;

#[derive(Clone, Copy)]
pub struct AtlasMappingsView<'a> {
    items: &'a [AtlasMapping],
}

impl<'a> AtlasMappingsView<'a> {
    pub fn new(items: &'a [AtlasMapping]) -> Self {
        Self { items }
    }

    pub fn get(self, index: u32) -> AtlasMapping {
        unsafe { *self.items.index_unchecked(index as usize) }
    }
}
