//! Geometry in English Metric Units.

pub const EMU_PER_INCH: i64 = 914_400;
pub const EMU_PER_POINT: i64 = 12_700;

/// 16:9 slide, 10in x 5.625in.
pub const SLIDE_WIDTH_16X9: i64 = 9_144_000;
pub const SLIDE_HEIGHT_16X9: i64 = 5_143_500;

pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

pub fn points(value: f64) -> i64 {
    (value * EMU_PER_POINT as f64).round() as i64
}

/// Position and size of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    pub fn inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(inches(x), inches(y), inches(width), inches(height))
    }

    /// Largest frame with the given aspect ratio that fits inside `self`,
    /// centred on both axes.
    pub fn fit_contain(&self, pixel_width: u32, pixel_height: u32) -> Frame {
        if pixel_width == 0 || pixel_height == 0 || self.width <= 0 || self.height <= 0 {
            return *self;
        }
        let scale_w = self.width as f64 / pixel_width as f64;
        let scale_h = self.height as f64 / pixel_height as f64;
        let scale = scale_w.min(scale_h);
        let width = (pixel_width as f64 * scale).round() as i64;
        let height = (pixel_height as f64 * scale).round() as i64;
        Frame {
            x: self.x + (self.width - width) / 2,
            y: self.y + (self.height - height) / 2,
            width,
            height,
        }
    }
}
