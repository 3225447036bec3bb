//! Responsive scaling of the base clock design
//!
//! The dial is designed at 360x360. Every radius, stroke and font size is
//! multiplied by `size / 360` once a real container size is known.

/// Base design dimensions
pub mod base {
    pub const SIZE: f32 = 360.0;
    pub const OUTER_RING_RADIUS: f32 = 120.0;
    pub const INNER_RING_RADIUS: f32 = 95.0;
    pub const RING_STROKE: f32 = 20.0;
    pub const HOLE_RADIUS: f32 = 80.0;
    pub const HOUR_FONT: f32 = 11.0;
    pub const HOUR_HAND_WIDTH: f32 = 5.0;
    pub const MINUTE_HAND_WIDTH: f32 = 3.0;
    pub const CENTER_CAP: f32 = 7.0;
    /// Padding between the outer ring and the glass dial edge
    pub const DIAL_PADDING: f32 = 20.0;
}

/// Scaled dimensions for one render pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialLayout {
    pub size: f32,
    pub scale: f32,
    pub outer_ring_radius: f32,
    pub inner_ring_radius: f32,
    pub ring_stroke: f32,
    pub hole_radius: f32,
    pub dial_radius: f32,
    pub hour_font: u32,
    pub hour_hand_width: f32,
    pub minute_hand_width: f32,
    pub center_cap: f32,
}

/// Tracks the last valid container measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleAdapter {
    size: f32,
}

impl Default for ScaleAdapter {
    fn default() -> Self {
        Self { size: base::SIZE }
    }
}

impl ScaleAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a container measurement
    ///
    /// The dial is square, so the smaller side wins. Zero, negative or
    /// non-finite sizes are ignored and the previous size is kept. Returns
    /// whether the size changed.
    pub fn measure(&mut self, width: f32, height: f32) -> bool {
        if !width.is_finite() || !height.is_finite() {
            return false;
        }
        let size = width.min(height);
        if size <= 0.0 {
            return false;
        }
        let changed = (size - self.size).abs() > f32::EPSILON;
        self.size = size;
        changed
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.size / base::SIZE
    }

    pub fn layout(&self) -> DialLayout {
        let s = self.scale();
        DialLayout {
            size: self.size,
            scale: s,
            outer_ring_radius: base::OUTER_RING_RADIUS * s,
            inner_ring_radius: base::INNER_RING_RADIUS * s,
            ring_stroke: base::RING_STROKE * s,
            hole_radius: base::HOLE_RADIUS * s,
            dial_radius: (base::OUTER_RING_RADIUS + base::DIAL_PADDING) * s,
            hour_font: (base::HOUR_FONT * s).round().max(1.0) as u32,
            hour_hand_width: base::HOUR_HAND_WIDTH * s,
            minute_hand_width: base::MINUTE_HAND_WIDTH * s,
            center_cap: base::CENTER_CAP * s,
        }
    }
}
