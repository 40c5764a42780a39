use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use spirv_std::arch::IndexUnchecked;

use crate::Ray;

/// One node of the flattened hierarchy.
///
/// The array is the preorder serialization of the tree, so the node to visit
/// after an AABB hit is implicitly `index + 1`; only the jump target for a
/// miss is stored. `-1` (or running past the array) terminates the walk.
#[repr(C)]
#[derive(Copy, Clone, Default, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug, PartialEq))]
pub struct BvhNode {
    /// x, y, z - aabb min, w - miss skip link (i32 bits)
    pub d0: Vec4,

    /// x, y, z - aabb max, w - `(primitive_index << 2) | primitive_kind`
    /// (bits)
    pub d1: Vec4,
}

impl BvhNode {
    pub const PRIMITIVE_NONE: u32 = 0;
    pub const PRIMITIVE_SDF: u32 = 1;
    pub const PRIMITIVE_TRIANGLE: u32 = 2;

    pub fn internal(aabb_min: Vec3, aabb_max: Vec3, miss_link: i32) -> Self {
        Self {
            d0: aabb_min.extend(f32::from_bits(miss_link as u32)),
            d1: aabb_max.extend(f32::from_bits(Self::PRIMITIVE_NONE)),
        }
    }

    pub fn leaf(
        aabb_min: Vec3,
        aabb_max: Vec3,
        miss_link: i32,
        primitive_kind: u32,
        primitive_index: u32,
    ) -> Self {
        Self {
            d0: aabb_min.extend(f32::from_bits(miss_link as u32)),
            d1: aabb_max
                .extend(f32::from_bits((primitive_index << 2) | primitive_kind)),
        }
    }

    pub fn aabb_min(&self) -> Vec3 {
        self.d0.truncate()
    }

    pub fn aabb_max(&self) -> Vec3 {
        self.d1.truncate()
    }

    pub fn miss_link(&self) -> i32 {
        self.d0.w.to_bits() as i32
    }

    pub fn primitive_kind(&self) -> u32 {
        self.d1.w.to_bits() & 0b11
    }

    pub fn primitive_index(&self) -> u32 {
        self.d1.w.to_bits() >> 2
    }

    /// Slab test; returns the hit flag and the entry distance, which the SDF
    /// leaves reuse as their march lower bound.
    #[must_use]
    pub fn hit(&self, ray: &Ray, tmin: f32, tmax: f32) -> (bool, f32) {
        let slab_min = (self.aabb_min() - ray.origin()) * ray.inv_direction();
        let slab_max = (self.aabb_max() - ray.origin()) * ray.inv_direction();

        let enter = slab_min.min(slab_max).max_element().max(tmin);
        let exit = slab_min.max(slab_max).min_element().min(tmax);

        (exit > enter, enter)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let min = self.aabb_min();
        let max = self.aabb_max();

        point.x >= min.x
            && point.x <= max.x
            && point.y >= min.y
            && point.y <= max.y
            && point.z >= min.z
            && point.z <= max.z
    }
}

#[derive(Clone, Copy)]
pub struct BvhView<'a> {
    buffer: &'a [BvhNode],
}

impl<'a> BvhView<'a> {
    pub fn new(buffer: &'a [BvhNode]) -> Self {
        Self { buffer }
    }

    pub fn get(&self, ptr: u32) -> BvhNode {
        unsafe { *self.buffer.index_unchecked(ptr as usize) }
    }
}

/// Test-only skip-link builder: median split along the longest axis, preorder
/// serialization, miss links pointing at the next-right subtree.
#[cfg(test)]
pub(crate) mod test_builder {
    use std::boxed::Box;
    use std::vec::Vec;

    use super::*;

    pub(crate) struct Item {
        pub aabb_min: Vec3,
        pub aabb_max: Vec3,
        pub primitive_kind: u32,
        pub primitive_index: u32,
    }

    enum Tree {
        Leaf(usize),
        Node(Box<Tree>, Box<Tree>, Vec3, Vec3),
    }

    impl Tree {
        fn size(&self) -> usize {
            match self {
                Self::Leaf(_) => 1,
                Self::Node(left, right, _, _) => {
                    1 + left.size() + right.size()
                }
            }
        }
    }

    pub(crate) fn build(items: &[Item]) -> Vec<BvhNode> {
        let mut order: Vec<usize> = (0..items.len()).collect();
        let tree = split(items, &mut order);
        let mut nodes = Vec::new();

        flatten(&tree, items, &mut nodes, -1);
        nodes
    }

    fn split(items: &[Item], order: &mut [usize]) -> Tree {
        if order.len() == 1 {
            return Tree::Leaf(order[0]);
        }

        let mut aabb_min = Vec3::MAX;
        let mut aabb_max = Vec3::MIN;

        for &i in order.iter() {
            aabb_min = aabb_min.min(items[i].aabb_min);
            aabb_max = aabb_max.max(items[i].aabb_max);
        }

        let extent = aabb_max - aabb_min;

        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };

        order.sort_by(|&a, &b| {
            let ca = items[a].aabb_min[axis] + items[a].aabb_max[axis];
            let cb = items[b].aabb_min[axis] + items[b].aabb_max[axis];

            ca.partial_cmp(&cb).unwrap()
        });

        let middle = order.len() / 2;
        let (left, right) = order.split_at_mut(middle);

        Tree::Node(
            Box::new(split(items, left)),
            Box::new(split(items, right)),
            aabb_min,
            aabb_max,
        )
    }

    fn flatten(
        tree: &Tree,
        items: &[Item],
        nodes: &mut Vec<BvhNode>,
        miss_link: i32,
    ) {
        match tree {
            Tree::Leaf(i) => {
                let item = &items[*i];

                nodes.push(BvhNode::leaf(
                    item.aabb_min,
                    item.aabb_max,
                    miss_link,
                    item.primitive_kind,
                    item.primitive_index,
                ));
            }

            Tree::Node(left, right, aabb_min, aabb_max) => {
                let right_start = nodes.len() + 1 + left.size();

                nodes.push(BvhNode::internal(
                    *aabb_min,
                    *aabb_max,
                    miss_link,
                ));

                flatten(left, items, nodes, right_start as i32);
                flatten(right, items, nodes, miss_link);
            }
        }
    }
}
