// Camera for 2D rendering, in display pixels

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 8.0;

/// 2D orthographic camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position (centre of the view)
    pub position: Vec2,
    /// Camera zoom level (1.0 = one display pixel per screen pixel)
    pub zoom: f32,
    /// Viewport width
    viewport_width: f32,
    /// Viewport height
    viewport_height: f32,
    /// View-projection matrix
    view_proj: Mat4,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec2, viewport_width: f32, viewport_height: f32) -> Self {
        let mut camera = Self {
            position,
            zoom: 1.0,
            viewport_width,
            viewport_height,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    /// Update the view-projection matrix
    fn update_view_proj(&mut self) {
        let half = self.half_extent();

        self.view_proj = Mat4::orthographic_rh(
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y - half.y,
            self.position.y + half.y,
            -100.0, // Near plane
            100.0,  // Far plane
        );
    }

    fn half_extent(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height) / (2.0 * self.zoom)
    }

    /// Centre the view on a point
    pub fn look_at(&mut self, position: Vec2) {
        self.position = position;
        self.update_view_proj();
    }

    /// Set camera zoom
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.update_view_proj();
    }

    /// Multiply the zoom level, e.g. by `1.2^scroll` for a mouse wheel
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }

    /// Resize the viewport
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.update_view_proj();
    }

    /// Get the view-projection matrix
    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }
}

/// Camera uniform for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Create a new camera uniform from a camera
    pub fn new(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_proj_matrix().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Clip-space position of a display-pixel point
    fn clip(camera: &Camera, point: Vec2) -> Vec2 {
        camera.view_proj_matrix().project_point3(point.extend(0.0)).truncate()
    }

    #[test]
    fn test_look_at_centres_the_view() {
        let mut camera = Camera::new(Vec2::ZERO, 1024.0, 768.0);
        camera.look_at(Vec2::new(5120.0, 440.0));

        let centre = clip(&camera, Vec2::new(5120.0, 440.0));
        assert_relative_eq!(centre.x, 0.0);
        assert_relative_eq!(centre.y, 0.0);
    }

    #[test]
    fn test_zoom_shrinks_visible_area() {
        let mut camera = Camera::new(Vec2::ZERO, 800.0, 600.0);
        camera.set_zoom(2.0);

        // With 2x zoom the screen edges are 200 and 150 units from the centre
        let corner = clip(&camera, Vec2::new(200.0, 150.0));
        assert_relative_eq!(corner.x, 1.0);
        assert_relative_eq!(corner.y, 1.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new(Vec2::ZERO, 800.0, 600.0);
        camera.zoom_by(0.0001);
        assert_eq!(camera.zoom, MIN_ZOOM);

        camera.set_zoom(1000.0);
        assert_eq!(camera.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_resize_widens_the_view() {
        let mut camera = Camera::new(Vec2::ZERO, 200.0, 100.0);
        camera.resize(400.0, 100.0);

        assert_relative_eq!(clip(&camera, Vec2::new(200.0, 0.0)).x, 1.0);
    }
}
