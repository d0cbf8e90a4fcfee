use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Axis;

/// A width and height. There is no depth dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Extent {
    /// The empty extent.
    pub const ZERO: Self = Self { w: 0.0, h: 0.0 };

    /// Construct an extent.
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Size on `axis`, or `None` for `Axis::Z`.
    pub fn try_get(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::X => Some(self.w),
            Axis::Y => Some(self.h),
            Axis::Z => None,
        }
    }

    /// Size on `axis`.
    ///
    /// # Panics
    ///
    /// Panics on `Axis::Z`.
    pub fn get(&self, axis: Axis) -> f32 {
        self[axis]
    }

    /// Set the size on `axis`.
    ///
    /// # Panics
    ///
    /// Panics on `Axis::Z`.
    pub fn set(&mut self, axis: Axis, v: f32) {
        self[axis] = v;
    }
}

impl Index<Axis> for Extent {
    type Output = f32;

    fn index(&self, axis: Axis) -> &f32 {
        match axis {
            Axis::X => &self.w,
            Axis::Y => &self.h,
            Axis::Z => panic!("extent has no depth dimension"),
        }
    }
}

impl IndexMut<Axis> for Extent {
    fn index_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::X => &mut self.w,
            Axis::Y => &mut self.h,
            Axis::Z => panic!("extent has no depth dimension"),
        }
    }
}

impl From<(f32, f32)> for Extent {
    fn from(v: (f32, f32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
