//! One-dimensional occupancy profile for packing boxes along an axis.
//!
//! Think of the vertical extent of a staff turned on its side: the skyline
//! records, for intervals of that axis, how far out (the "level") space is
//! already used. Dropping a new box over an interval lands it on the highest
//! level recorded anywhere over that interval.

/// Occupied interval `[minimum, maximum]` up to `level`
#[derive(Debug, Clone, Copy, PartialEq)]
struct SkylineBox {
    minimum: f32,
    maximum: f32,
    level: f32,
}

#[derive(Debug, Clone)]
pub struct Skyline {
    ground_level: f32,
    boxes: Vec<SkylineBox>,
}

impl Skyline {
    pub fn new(ground_level: f32) -> Self {
        Self {
            ground_level,
            boxes: Vec::new(),
        }
    }

    /// The highest level over the open interval `(minimum, maximum)`.
    /// Boxes that only touch the interval at an end point don't count.
    pub fn level_over(&self, minimum: f32, maximum: f32) -> f32 {
        self.boxes
            .iter()
            .filter(|b| b.minimum < maximum && b.maximum > minimum)
            .fold(self.ground_level, |level, b| level.max(b.level))
    }

    /// Marks the interval as used up to `level`
    pub fn overlay_box(&mut self, minimum: f32, maximum: f32, level: f32) {
        self.boxes.push(SkylineBox {
            minimum,
            maximum,
            level,
        });
    }

    /// Lands a box of the given thickness over the interval and records it.
    /// Returns the level of the box's far side.
    pub fn drop_box(&mut self, minimum: f32, maximum: f32, thickness: f32) -> f32 {
        let top = self.level_over(minimum, maximum) + thickness;
        self.overlay_box(minimum, maximum, top);
        top
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_skyline_is_ground() {
        let skyline = Skyline::new(1.5);
        assert_eq!(skyline.level_over(-10.0, 10.0), 1.5);
    }

    #[test]
    fn test_dropped_boxes_stack() {
        let mut skyline = Skyline::new(0.0);
        let first = skyline.drop_box(0.0, 10.0, 5.0);
        assert_eq!(first, 5.0);

        // overlapping interval lands on top of the first box
        let second = skyline.drop_box(5.0, 15.0, 2.0);
        assert!(second - 2.0 >= first);
        assert_eq!(second, 7.0);

        // disjoint interval lands on the ground
        assert_eq!(skyline.drop_box(20.0, 30.0, 1.0), 1.0);
    }

    #[test]
    fn test_touching_intervals_do_not_stack() {
        let mut skyline = Skyline::new(0.0);
        skyline.drop_box(0.0, 10.0, 5.0);
        assert_eq!(skyline.drop_box(10.0, 12.0, 1.0), 1.0);
    }

    #[test]
    fn test_overlay_seeds_levels() {
        let mut skyline = Skyline::new(0.0);
        skyline.overlay_box(-1.0, 1.0, 0.6);
        skyline.overlay_box(0.5, 2.0, 0.9);

        assert_eq!(skyline.level_over(-0.5, 0.0), 0.6);
        assert_eq!(skyline.level_over(0.0, 0.8), 0.9);
        assert_eq!(skyline.drop_box(-0.5, 0.0, 1.0), 1.6);
    }

    #[test]
    fn test_later_drops_never_land_below_recorded_levels() {
        let mut skyline = Skyline::new(0.0);
        let intervals = [(0.0, 4.0), (2.0, 6.0), (1.0, 3.0), (5.0, 9.0), (0.5, 8.5)];
        for (i, (min, max)) in intervals.into_iter().enumerate() {
            let recorded = skyline.level_over(min, max);
            let thickness = 1.0 + i as f32 * 0.25;
            let top = skyline.drop_box(min, max, thickness);
            assert!(top - thickness >= recorded);
        }
    }
}
