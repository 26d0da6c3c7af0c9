//! Bitmaps placed into an affine space.

use glam::Vec2;
use synth_core::{Bounds, Transform};

use crate::error::SceneError;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::space::AffineSpace;

/// Grayscale ink coverage, one byte per pixel, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// A bitmap filled with full ink coverage
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![u8::MAX; width as usize * height as usize],
        }
    }

    /// Returns `None` when the pixel buffer doesn't match the dimensions
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// A bitmap together with the transform that maps its pixel coordinates into
/// the space it is linked to.
#[derive(Debug, Clone)]
pub struct Sprite {
    pub bitmap: Bitmap,
    pub transform: Transform,
}

impl SceneObject for Sprite {
    const TYPE_NAME: &'static str = "Sprite";
}

impl Sprite {
    /// The space the sprite is drawn in
    pub const SPACE: Field<Sprite, AffineSpace> = Field::new("space");

    /// Pixel rectangle of the bitmap
    pub fn pixel_bounds(&self) -> Bounds {
        Bounds::new(
            Vec2::ZERO,
            Vec2::new(self.bitmap.width() as f32, self.bitmap.height() as f32),
        )
    }

    /// Bounds of the transformed pixel rectangle, in the sprite's space
    pub fn local_bounds(&self) -> Bounds {
        self.bounds_under(&self.transform)
    }

    fn bounds_under(&self, transform: &Transform) -> Bounds {
        let pixels = self.pixel_bounds();
        let corners = [
            pixels.min,
            Vec2::new(pixels.max.x, pixels.min.y),
            pixels.max,
            Vec2::new(pixels.min.x, pixels.max.y),
        ];
        let corners = corners.map(|corner| transform.apply(corner));
        Bounds::from_points(corners).unwrap_or(pixels)
    }
}

impl Scene {
    /// Creates a sprite drawn in `space`
    pub fn create_sprite(
        &mut self,
        space: Handle<AffineSpace>,
        bitmap: Bitmap,
        transform: Transform,
    ) -> Result<Handle<Sprite>, SceneError> {
        self.ensure_present(space)?;
        let sprite = self.insert(Sprite { bitmap, transform });
        self.set_link(sprite, Sprite::SPACE, Some(space))?;
        Ok(sprite)
    }

    /// Bounds of a sprite expressed in `ancestor` coordinates
    pub fn sprite_bounds_in(
        &self,
        ancestor: Handle<AffineSpace>,
        sprite: Handle<Sprite>,
    ) -> Result<Bounds, SceneError> {
        let space = self.required_link(sprite, Sprite::SPACE)?;
        let to_ancestor = self.transform_from(ancestor, space)?;
        let sprite = self.try_get(sprite)?;
        Ok(sprite.bounds_under(&sprite.transform.then(&to_ancestor)))
    }
}
