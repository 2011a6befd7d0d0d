// THEORY:
// The `PositionPlanner` decides *where* in a frame the picker looks. The policy is fixed:
// divide each axis into sixths and take five peripheral anchors at fixed multiples of
// those steps, plus the frame center. Anchors are the top-left corners of the square
// sample regions, not their centers.
//
//      0   1   2   3   4   5   6   (x / stepX)
//    1 .   P1  .   .   .   P4  .
//    2 .   .   .   P5  .   .   .
//    4 .   .   P2  .   P3  .   .
//
// The planner is also where the bounds contract is enforced. The farthest anchor sits at
// 5/6 of an axis, so a region of `sample_size` pixels only fits if each axis is at least
// `6 * sample_size` long. Frames smaller than that are rejected up front rather than
// letting the sampler read past the edge.

use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};

/// Number of peripheral sampling positions.
pub const PERIPHERAL_COUNT: usize = 5;

/// Each axis is split into this many steps.
const AXIS_DIVISIONS: u32 = 6;

/// An integer offset into a frame's pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// The six anchors for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPlan {
    /// `(floor(width / 2), floor(height / 2))`.
    pub center: Position,
    /// Peripheral anchors in their fixed traversal order.
    pub peripheral: [Position; PERIPHERAL_COUNT],
}

impl SamplingPlan {
    /// Plans positions after checking that every `sample_size` region will stay inside
    /// a `width` x `height` frame.
    pub fn checked(width: u32, height: u32, sample_size: u32) -> Result<Self> {
        if sample_size == 0 {
            return Err(InputError::EmptySampleSize.into());
        }
        let min = minimum_dimension(sample_size);
        if width < min || height < min {
            return Err(InputError::FrameTooSmall { width, height, min }.into());
        }
        Ok(plan_positions(width, height))
    }

    /// Center first, then the peripheral anchors in order.
    pub fn ordered(&self) -> [Position; PERIPHERAL_COUNT + 1] {
        let [p1, p2, p3, p4, p5] = self.peripheral;
        [self.center, p1, p2, p3, p4, p5]
    }
}

/// Smallest width/height that fits every region of `sample_size`.
pub const fn minimum_dimension(sample_size: u32) -> u32 {
    AXIS_DIVISIONS.saturating_mul(sample_size)
}

/// Computes the sampling anchors for a `width` x `height` frame. Does not check
/// bounds; see [`SamplingPlan::checked`].
pub fn plan_positions(width: u32, height: u32) -> SamplingPlan {
    let step_x = width / AXIS_DIVISIONS;
    let step_y = height / AXIS_DIVISIONS;

    SamplingPlan {
        center: Position::new(width / 2, height / 2),
        peripheral: [
            Position::new(step_x, step_y),
            Position::new(2 * step_x, 4 * step_y),
            Position::new(4 * step_x, 4 * step_y),
            Position::new(5 * step_x, step_y),
            Position::new(3 * step_x, 2 * step_y),
        ],
    }
}
