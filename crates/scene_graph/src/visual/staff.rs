use std::fmt::Debug;

use synth_core::Transform;

use crate::error::SceneError;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::space::AffineSpace;
use crate::sprite::Sprite;

/// Maps (pitch position, time position) on a staff to a placement in the
/// staff's space.
pub trait StaffCoordinateSystem: Debug {
    fn get_transform(&self, pitch_position: i32, time_position: f32) -> Transform;

    /// Distance between two adjacent staff lines
    fn staff_space(&self) -> f32;
}

/// Straight horizontal staff: time maps to x, pitch positions go up in
/// half staff spaces from the middle line at y = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearStaffCoordinateSystem {
    pub staff_space: f32,
}

impl LinearStaffCoordinateSystem {
    pub fn new(staff_space: f32) -> Self {
        Self { staff_space }
    }
}

impl StaffCoordinateSystem for LinearStaffCoordinateSystem {
    fn get_transform(&self, pitch_position: i32, time_position: f32) -> Transform {
        Transform::translation(time_position, -(pitch_position as f32) * self.staff_space / 2.0)
    }

    fn staff_space(&self) -> f32 {
        self.staff_space
    }
}

/// The visual stafflines of one staff. Everything placed on the staff lives
/// in its space.
#[derive(Debug)]
pub struct StaffVisual {
    /// Width of the stafflines, in page units
    pub width: f32,
    pub coordinate_system: Box<dyn StaffCoordinateSystem>,
}

impl SceneObject for StaffVisual {
    const TYPE_NAME: &'static str = "StaffVisual";
}

impl StaffVisual {
    pub const SPACE: Field<StaffVisual, AffineSpace> = Field::new("space");
    pub const SPRITES: Field<StaffVisual, Sprite> = Field::new("sprites");

    pub fn space(scene: &Scene, staff: Handle<StaffVisual>) -> Result<Handle<AffineSpace>, SceneError> {
        scene.required_link(staff, Self::SPACE)
    }

    /// Where the column at `time_position` starts, in staff-space x
    pub fn origin_x(&self, time_position: f32) -> f32 {
        self.coordinate_system.get_transform(0, time_position).offset().x
    }
}

impl Scene {
    /// Creates a staff with its own space under `parent`
    pub fn create_staff_visual(
        &mut self,
        parent: Option<Handle<AffineSpace>>,
        width: f32,
        coordinate_system: Box<dyn StaffCoordinateSystem>,
    ) -> Result<Handle<StaffVisual>, SceneError> {
        let space = self.create_space(parent)?;
        let staff = self.insert(StaffVisual {
            width,
            coordinate_system,
        });
        self.set_link(staff, StaffVisual::SPACE, Some(space))?;
        Ok(staff)
    }
}
