use spirv_std::arch::IndexUnchecked;

use crate::Triangle;

#[derive(Clone, Copy)]
pub struct TrianglesView<'a> {
    items: &'a [Triangle],
}

impl<'a> TrianglesView<'a> {
    pub fn new(items: &'a [Triangle]) -> Self {
        Self { items }
    }

    pub fn get(self, index: u32) -> Triangle {
        unsafe { *self.items.index_unchecked(index as usize) }
    }
}
