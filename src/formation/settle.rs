//! Settle-window bookkeeping.
//!
//! After a roster change the formation spends a few frames placing every
//! slot exactly on its target instead of interpolating. This keeps newly
//! inserted slots from lerping out of a stale position and hides the
//! one-frame gap left behind by removals.

/// Default settle window length, in frames.
pub const DEFAULT_SETTLE_FRAMES: u32 = 3;

/// Transient controller state owned by the formation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleState {
    /// Frames left in the current settle window. Zero means normal
    /// interpolated mode.
    frames_remaining: u32,
    /// A force pass is still owed after the next frame's main phase.
    force_pending: bool,
    /// Re-entrancy guard, set while a mutation or frame update runs.
    update_in_progress: bool,
}

impl SettleState {
    /// Create a state with no open settle window.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_remaining: 0,
            force_pending: false,
            update_in_progress: false,
        }
    }

    /// Frames left in the current window.
    #[must_use]
    pub const fn frames_remaining(&self) -> u32 {
        self.frames_remaining
    }

    /// Whether a settle window is open.
    #[must_use]
    pub const fn is_settling(&self) -> bool {
        self.frames_remaining > 0
    }

    /// Whether a deferred force pass is owed.
    #[must_use]
    pub const fn force_pending(&self) -> bool {
        self.force_pending
    }

    /// Whether a mutation or update currently holds the guard.
    #[must_use]
    pub const fn update_in_progress(&self) -> bool {
        self.update_in_progress
    }

    /// Open (or restart) a window of `frames` frames and owe one force pass.
    pub fn open(&mut self, frames: u32) {
        self.frames_remaining = frames;
        self.force_pending = true;
    }

    /// Consume one settle frame. Returns `false` if no window was open.
    pub(crate) fn consume_frame(&mut self) -> bool {
        if self.frames_remaining == 0 {
            return false;
        }
        self.frames_remaining -= 1;
        true
    }

    /// Clear the deferred force flag, returning its previous value.
    pub(crate) fn take_force_pending(&mut self) -> bool {
        std::mem::take(&mut self.force_pending)
    }

    /// Try to take the re-entrancy guard. Returns `false` if it is held.
    pub(crate) fn try_enter(&mut self) -> bool {
        if self.update_in_progress {
            return false;
        }
        self.update_in_progress = true;
        true
    }

    /// Take the re-entrancy guard whether or not it is already held.
    pub(crate) fn hold(&mut self) {
        self.update_in_progress = true;
    }

    /// Release the re-entrancy guard.
    pub(crate) fn exit(&mut self) {
        self.update_in_progress = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = SettleState::new();
        assert_eq!(state, SettleState::default());
        assert!(!state.is_settling());
        assert!(!state.force_pending());
        assert!(!state.update_in_progress());
    }

    #[test]
    fn test_open_and_consume() {
        let mut state = SettleState::new();
        state.open(DEFAULT_SETTLE_FRAMES);
        assert!(state.is_settling());
        assert!(state.force_pending());

        assert!(state.consume_frame());
        assert!(state.consume_frame());
        assert!(state.consume_frame());
        assert!(!state.consume_frame());
        assert_eq!(state.frames_remaining(), 0);

        // Force flag is independent of the frame counter
        assert!(state.take_force_pending());
        assert!(!state.take_force_pending());
    }

    #[test]
    fn test_reopen_restarts_window() {
        let mut state = SettleState::new();
        state.open(3);
        state.consume_frame();
        state.consume_frame();
        state.open(3);
        assert_eq!(state.frames_remaining(), 3);
    }

    #[test]
    fn test_guard_is_exclusive() {
        let mut state = SettleState::new();
        assert!(state.try_enter());
        assert!(!state.try_enter());
        state.exit();
        assert!(state.try_enter());
    }
}
