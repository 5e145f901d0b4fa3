//! Pointer state
//!
//! Tracks the cursor in window pixels and converts it to Normalized Device
//! Coordinates (NDC) for ray casting.

use crate::foundation::math::Vec2;

/// Pointer buttons the showroom reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left button: spawn trigger
    Primary,
    /// Right button: orbit drag
    Secondary,
    /// Middle button
    Middle,
}

/// Pointer state for picking operations
#[derive(Debug, Clone)]
pub struct PointerState {
    /// Current screen-space X position (pixels from left)
    pub screen_x: f64,
    /// Current screen-space Y position (pixels from top)
    pub screen_y: f64,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Primary button held
    pub primary_down: bool,
    /// Secondary button held
    pub secondary_down: bool,
    has_moved: bool,
}

impl PointerState {
    /// Create a pointer state for a viewport
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            viewport_width,
            viewport_height,
            primary_down: false,
            secondary_down: false,
            has_moved: false,
        }
    }

    /// Convert the pointer position to NDC.
    ///
    /// X grows to the right and Y grows upward, both in `[-1, 1]`. Before the
    /// first move the pointer sits at the viewport centre, `(0, 0)`.
    pub fn ndc(&self) -> Vec2 {
        if !self.has_moved {
            return Vec2::zeros();
        }
        screen_to_ndc(self.screen_x, self.screen_y, self.viewport_width, self.viewport_height)
    }

    /// Record a move, returning the pixel delta since the previous position
    pub fn move_to(&mut self, x: f64, y: f64) -> (f64, f64) {
        let delta = if self.has_moved {
            (x - self.screen_x, y - self.screen_y)
        } else {
            (0.0, 0.0)
        };
        self.screen_x = x;
        self.screen_y = y;
        self.has_moved = true;
        delta
    }

    /// Record a button transition
    pub fn set_button(&mut self, button: PointerButton, down: bool) {
        match button {
            PointerButton::Primary => self.primary_down = down,
            PointerButton::Secondary => self.secondary_down = down,
            PointerButton::Middle => {}
        }
    }

    /// Update the viewport size used for NDC conversion
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Whether any move has been seen
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }
}

/// Convert window pixels to NDC; a zero-sized viewport maps to the centre
#[allow(clippy::cast_possible_truncation)]
pub fn screen_to_ndc(x: f64, y: f64, width: u32, height: u32) -> Vec2 {
    if width == 0 || height == 0 {
        return Vec2::zeros();
    }
    let ndc_x = (x / f64::from(width)) * 2.0 - 1.0;
    let ndc_y = -(y / f64::from(height)) * 2.0 + 1.0;
    Vec2::new(ndc_x as f32, ndc_y as f32)
}
