//! Pointer drag steering.
//!
//! A press anchors the pointer and the squad; once the pointer has moved
//! past the drag threshold, the squad follows the pointer's total
//! displacement, scaled from screen pixels to world units and clamped to
//! the lane bounds.

use crate::config::DragConfig;
use crate::roster::MoveDirection;

/// Maps pointer x coordinates to the squad's origin x.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragController {
    config: DragConfig,
    pressed: bool,
    dragging: bool,
    start_pointer_x: f32,
    start_origin_x: f32,
    direction: MoveDirection,
}

impl DragController {
    /// Create an idle controller. The configuration is sanitized, so the
    /// lane bounds are always finite and ordered.
    #[must_use]
    pub fn new(config: DragConfig) -> Self {
        Self {
            config: config.sanitized(),
            pressed: false,
            dragging: false,
            start_pointer_x: 0.0,
            start_origin_x: 0.0,
            direction: MoveDirection::Idle,
        }
    }

    /// Steering configuration.
    #[must_use]
    pub const fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Whether the pointer is down.
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Whether the press has turned into a drag.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Current lateral direction for unit animation.
    #[must_use]
    pub const fn direction(&self) -> MoveDirection {
        self.direction
    }

    /// Clamp an origin x into the lane bounds.
    #[must_use]
    pub fn clamp_origin(&self, x: f32) -> f32 {
        x.clamp(self.config.min_x, self.config.max_x)
    }

    /// Pointer went down at `pointer_x` while the squad sits at `origin_x`.
    pub fn press(&mut self, pointer_x: f32, origin_x: f32) {
        self.pressed = true;
        self.dragging = false;
        self.start_pointer_x = pointer_x;
        self.start_origin_x = origin_x;
        self.direction = MoveDirection::Idle;
    }

    /// Pointer is held at `pointer_x`.
    ///
    /// Returns the new origin x once dragging, `None` before the threshold
    /// is crossed or when no press is active.
    pub fn drag(&mut self, pointer_x: f32) -> Option<f32> {
        if !self.pressed {
            return None;
        }

        let delta = pointer_x - self.start_pointer_x;
        if !self.dragging && delta.abs() > self.config.drag_threshold {
            self.dragging = true;
        }
        if !self.dragging {
            self.direction = MoveDirection::Idle;
            return None;
        }

        let normalized = delta / self.config.screen_width;
        let target = self.start_origin_x + normalized * self.config.horizontal_speed;
        self.direction = MoveDirection::from_delta(delta);
        Some(self.clamp_origin(target))
    }

    /// Pointer went up.
    pub fn release(&mut self) {
        self.pressed = false;
        self.dragging = false;
        self.direction = MoveDirection::Idle;
    }
}
