use spirv_std::arch::IndexUnchecked;

use crate::Parallelogram;

#[derive(Clone, Copy)]
pub struct ParallelogramsView<'a> {
    items: &'a [Parallelogram],
}

impl<'a> ParallelogramsView<'a> {
    pub fn new(items: &'a [Parallelogram]) -> Self {
        Self { items }
    }

    pub fn get(self, index: u32) -> Parallelogram {
        unsafe { *self.items.index_unchecked(index as usize) }
    }
}
