//! Coordinate mapping between screen space and image space.
//!
//! A pointer position travels through four frames on its way to the image:
//!
//! 1. client (CSS) pixels, relative to the page
//! 2. device pixels, relative to the viewport's top-left corner
//! 3. camera frame, after undoing pan and scale
//! 4. image pixels, after undoing the image's placement in the camera frame
//!
//! [`screen_to_image`] walks that chain forward and [`image_to_screen`] walks
//! it back. Both are pure functions of their inputs; each step is an exact
//! affine inverse of its counterpart so round trips only accumulate float
//! rounding error.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in screen, camera, or image space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation from `self` toward `other` by `t`.
    #[must_use]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point { x: self.x + (other.x - self.x) * t, y: self.y + (other.y - self.y) * t }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Camera state for pan/zoom over the photo.
///
/// `pan_x` / `pan_y` are in device pixels.
/// `scale` is a zoom factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { scale: 1.0, pan_x: 0.0, pan_y: 0.0 }
    }
}

impl Camera {
    /// Convert a device-pixel point to camera-frame coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.scale,
            y: (screen.y - self.pan_y) / self.scale,
        }
    }

    /// Convert a camera-frame point to device pixels.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.pan_x,
            y: world.y * self.scale + self.pan_y,
        }
    }

    /// Convert a device-pixel distance to a camera-frame distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }
}

/// Placement of the source image inside the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFit {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale: f64,
}

impl Default for ImageFit {
    fn default() -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, scale: 1.0 }
    }
}

/// Bounding rectangle of the viewport element in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The five per-call inputs of the mapping, bundled for callers that hold
/// them together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewContext {
    pub viewport: Viewport,
    pub camera: Camera,
    pub dpr: f64,
    pub fit: ImageFit,
}

impl Default for ViewContext {
    fn default() -> Self {
        Self { viewport: Viewport::default(), camera: Camera::default(), dpr: 1.0, fit: ImageFit::default() }
    }
}

impl ViewContext {
    /// Map a client-pixel point to image space.
    #[must_use]
    pub fn to_image(&self, client: Point) -> Point {
        screen_to_image(client, &self.viewport, &self.camera, self.dpr, &self.fit)
    }

    /// Map an image-space point to client pixels.
    #[must_use]
    pub fn to_screen(&self, image: Point) -> Point {
        image_to_screen(image, &self.viewport, &self.camera, self.dpr, &self.fit)
    }

    /// Convert a client-pixel distance to an image-space distance.
    #[must_use]
    pub fn screen_dist_to_image(&self, client_dist: f64) -> f64 {
        self.camera.screen_dist_to_world(client_dist * self.dpr) / self.fit.scale
    }
}

/// Convert a client-pixel point to image-space pixels.
#[must_use]
pub fn screen_to_image(client: Point, viewport: &Viewport, camera: &Camera, dpr: f64, fit: &ImageFit) -> Point {
    let device = Point { x: (client.x - viewport.left) * dpr, y: (client.y - viewport.top) * dpr };
    let world = camera.screen_to_world(device);
    Point { x: (world.x - fit.origin_x) / fit.scale, y: (world.y - fit.origin_y) / fit.scale }
}

/// Convert an image-space point to client pixels. Exact inverse of [`screen_to_image`].
#[must_use]
pub fn image_to_screen(image: Point, viewport: &Viewport, camera: &Camera, dpr: f64, fit: &ImageFit) -> Point {
    let world = Point { x: image.x * fit.scale + fit.origin_x, y: image.y * fit.scale + fit.origin_y };
    let device = camera.world_to_screen(world);
    Point { x: device.x / dpr + viewport.left, y: device.y / dpr + viewport.top }
}
