// Game configuration
//
// Sizes and offsets are in source-art pixels ("world units"). The display
// scale turns world units into screen pixels.

use glam::{Affine2, UVec2, Vec2};

/// Size of an individual character sprite
pub const SPRITE_SIZE: UVec2 = UVec2::new(16, 16);

/// Size of one overworld map (the play area below the stats window)
pub const MAP_CELL_SIZE: UVec2 = UVec2::new(256, 176);

/// Window and display settings
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Window title; the FPS counter is appended to it
    pub title: &'static str,
    /// Initial window size in logical pixels
    pub window_size: (u32, u32),
    /// World-to-display scale factor
    pub scale: f32,
    /// Zoom multiplier per mouse-wheel line
    pub zoom_step: f32,
    /// Background colour (NES deep water), linear RGBA
    pub clear_color: [f64; 4],
}

pub const DEFAULT_DISPLAY: DisplayConfig = DisplayConfig {
    title: "Overworld",
    window_size: (1024, 768),
    scale: 2.5,
    zoom_step: 1.2,
    clear_color: [0.009, 0.052, 0.417, 1.0],
};

impl Default for DisplayConfig {
    fn default() -> Self {
        DEFAULT_DISPLAY
    }
}

impl DisplayConfig {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Transform from world units to display pixels
    pub fn world_to_display(&self) -> Affine2 {
        Affine2::from_scale(Vec2::splat(self.scale))
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}

/// How the overworld sheet is laid out and where its maps are placed
#[derive(Debug, Clone)]
pub struct OverworldConfig {
    /// Atlas file name, relative to the asset directory
    pub atlas: &'static str,
    /// Size of one map on the sheet
    pub cell_size: UVec2,
    /// Border line between maps on the sheet
    pub border: u32,
    /// Height of the legend below the maps on the sheet
    pub footer: u32,
    /// Empty cells of sea placed around the original maps
    pub margin: u32,
}

pub const DEFAULT_OVERWORLD: OverworldConfig = OverworldConfig {
    atlas: "NES-TheLegendOfZelda-Overworld.png",
    cell_size: MAP_CELL_SIZE,
    border: 1,
    footer: 181,
    margin: 1,
};

impl Default for OverworldConfig {
    fn default() -> Self {
        DEFAULT_OVERWORLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_display() {
        let display = DisplayConfig::default();
        assert_eq!(display.scale, 2.5);
        assert_eq!(display.window_size, (1024, 768));
    }

    #[test]
    fn test_world_to_display_scales() {
        let display = DisplayConfig::default().with_scale(3.0);
        let point = display.world_to_display().transform_point2(Vec2::new(10.0, 4.0));
        assert_eq!(point, Vec2::new(30.0, 12.0));
    }

    #[test]
    fn test_default_overworld_geometry() {
        let overworld = OverworldConfig::default();
        assert_eq!(overworld.cell_size, UVec2::new(256, 176));
        assert_eq!(overworld.border, 1);
        assert_eq!(overworld.footer, 181);
        assert_eq!(overworld.margin, 1);
    }
}
