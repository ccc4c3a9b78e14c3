//! The formation engine: roster ownership, per-frame update and force
//! repositioning.

use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::config::FormationConfig;
use crate::formation::{
    radius_for_count, target_position, FormationParams, Offset, RosterSlot, SettleState,
    UnitHandle, DEFAULT_SETTLE_FRAMES,
};

/// Default interpolation fraction per reference frame.
pub const DEFAULT_SMOOTHING: f32 = 0.2;

/// Default reference frame rate the smoothing factor is expressed at.
pub const DEFAULT_REFERENCE_RATE: f32 = 60.0;

/// Smallest accepted smoothing factor.
pub const MIN_SMOOTHING: f32 = 0.01;

/// Frame-rate independent exponential smoothing.
///
/// `factor` is the fraction of the remaining distance covered in one
/// frame at `reference_rate`. Other frame lengths are scaled so that the
/// convergence speed in wall time does not depend on the frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    factor: f32,
    reference_rate: f32,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            factor: DEFAULT_SMOOTHING,
            reference_rate: DEFAULT_REFERENCE_RATE,
        }
    }
}

impl Smoothing {
    /// Create a smoothing curve. `factor` is clamped into
    /// `[MIN_SMOOTHING, 1]`; an invalid reference rate falls back to the
    /// default.
    #[must_use]
    pub fn new(factor: f32, reference_rate: f32) -> Self {
        let factor = if factor.is_nan() {
            DEFAULT_SMOOTHING
        } else {
            factor.clamp(MIN_SMOOTHING, 1.0)
        };
        let reference_rate = if reference_rate.is_finite() && reference_rate > 0.0 {
            reference_rate
        } else {
            DEFAULT_REFERENCE_RATE
        };
        Self {
            factor,
            reference_rate,
        }
    }

    /// Per-frame fraction at the reference rate.
    #[must_use]
    pub const fn factor(&self) -> f32 {
        self.factor
    }

    /// Frame rate the factor is expressed at.
    #[must_use]
    pub const fn reference_rate(&self) -> f32 {
        self.reference_rate
    }

    /// Interpolation fraction for a frame lasting `dt` seconds.
    ///
    /// Returns 0 for non-positive or non-finite `dt`.
    #[must_use]
    pub fn alpha(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        let steps = dt * self.reference_rate;
        (1.0 - (1.0 - self.factor).powf(steps)).clamp(0.0, 1.0)
    }
}

/// Which branch a frame update took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The re-entrancy guard was held; nothing happened.
    Suppressed,
    /// A settle frame was consumed and every slot force-placed.
    Settled {
        /// Settle frames left after this one.
        remaining: u32,
    },
    /// Slots were interpolated towards their targets.
    Interpolated,
}

impl std::fmt::Display for FrameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Suppressed => write!(f, "suppressed"),
            Self::Settled { remaining } => write!(f, "settled ({remaining} left)"),
            Self::Interpolated => write!(f, "interpolated"),
        }
    }
}

/// Owns the roster and lays it out on the spiral every frame.
#[derive(Debug, Clone)]
pub struct FormationEngine {
    params: FormationParams,
    smoothing: Smoothing,
    settle_frames: u32,
    max_soldiers: usize,
    roster: Vec<RosterSlot>,
    settle: SettleState,
    suspensions: u32,
}

impl Default for FormationEngine {
    fn default() -> Self {
        Self::new(&FormationConfig::default())
    }
}

impl FormationEngine {
    /// Create an empty engine from configuration.
    #[must_use]
    pub fn new(config: &FormationConfig) -> Self {
        Self {
            params: FormationParams::new(config.radius_factor, config.angle_factor),
            smoothing: Smoothing::new(config.smoothing, config.reference_frame_rate),
            settle_frames: config.settle_frames,
            max_soldiers: config.max_soldiers,
            roster: Vec::new(),
            settle: SettleState::new(),
            suspensions: 0,
        }
    }

    /// Create an empty engine with the given shape and default timing.
    #[must_use]
    pub fn with_params(params: FormationParams) -> Self {
        Self {
            params,
            smoothing: Smoothing::default(),
            settle_frames: DEFAULT_SETTLE_FRAMES,
            max_soldiers: FormationConfig::default().max_soldiers,
            roster: Vec::new(),
            settle: SettleState::new(),
            suspensions: 0,
        }
    }

    /// Spiral parameters.
    #[must_use]
    pub const fn params(&self) -> &FormationParams {
        &self.params
    }

    /// Interpolation settings.
    #[must_use]
    pub const fn smoothing(&self) -> &Smoothing {
        &self.smoothing
    }

    /// Current settle state.
    #[must_use]
    pub const fn settle(&self) -> &SettleState {
        &self.settle
    }

    /// Length of the settle window opened by each mutation.
    #[must_use]
    pub const fn settle_frames(&self) -> u32 {
        self.settle_frames
    }

    /// Upper bound on the roster size.
    #[must_use]
    pub const fn max_soldiers(&self) -> usize {
        self.max_soldiers
    }

    /// Number of soldiers in the roster.
    #[must_use]
    pub fn soldier_count(&self) -> usize {
        self.roster.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// All slots, in formation order.
    #[must_use]
    pub fn slots(&self) -> &[RosterSlot] {
        &self.roster
    }

    /// Current offset of the slot at `index`.
    #[must_use]
    pub fn slot_position(&self, index: usize) -> Option<Offset> {
        self.roster.get(index).map(|slot| slot.position)
    }

    /// Unit occupying the slot at `index`.
    #[must_use]
    pub fn unit_handle(&self, index: usize) -> Option<UnitHandle> {
        self.roster.get(index).map(|slot| slot.unit)
    }

    /// Target offset for `index` under this engine's parameters.
    #[must_use]
    pub fn target_of(&self, index: usize) -> Offset {
        target_position(index, &self.params)
    }

    /// Radius of the formation, for sizing overlap queries.
    #[must_use]
    pub fn radius(&self) -> f32 {
        radius_for_count(self.roster.len(), &self.params)
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Inside a settle window every slot is placed exactly on its target
    /// and the window shrinks by one. Otherwise slots move a
    /// frame-rate scaled fraction of the way to their targets. A force
    /// pass owed by a mutation runs after either branch.
    pub fn update(&mut self, dt: f32) -> FrameOutcome {
        if !self.settle.try_enter() {
            return FrameOutcome::Suppressed;
        }

        let outcome = if self.settle.consume_frame() {
            self.force_reposition_all();
            FrameOutcome::Settled {
                remaining: self.settle.frames_remaining(),
            }
        } else {
            self.interpolate(self.smoothing.alpha(dt));
            FrameOutcome::Interpolated
        };

        // Late phase
        if self.settle.take_force_pending() {
            self.force_reposition_all();
        }

        self.settle.exit();
        outcome
    }

    /// Place every slot exactly on its target.
    pub fn force_reposition_all(&mut self) {
        let params = self.params;
        for slot in &mut self.roster {
            slot.position = target_position(slot.index, &params);
        }
    }

    /// Hold the re-entrancy guard until a matching [`resume_updates`].
    ///
    /// While held, [`update`] returns [`FrameOutcome::Suppressed`] without
    /// touching any slot or consuming settle frames. Hosts use this to
    /// freeze the formation while they apply a batch of effects spread
    /// over several calls. Suspensions nest: the guard is released only
    /// when every suspend has been matched by a resume.
    ///
    /// [`resume_updates`]: Self::resume_updates
    /// [`update`]: Self::update
    pub fn suspend_updates(&mut self) {
        self.settle.hold();
        self.suspensions = self.suspensions.saturating_add(1);
    }

    /// Undo one [`suspend_updates`](Self::suspend_updates).
    ///
    /// A resume without a matching suspend is ignored.
    pub fn resume_updates(&mut self) {
        let Some(depth) = self.suspensions.checked_sub(1) else {
            warn!("resume_updates called without a matching suspend; ignored");
            return;
        };
        self.suspensions = depth;
        if depth == 0 {
            self.settle.exit();
        }
    }

    /// Number of outstanding [`suspend_updates`](Self::suspend_updates) calls.
    #[must_use]
    pub const fn suspensions(&self) -> u32 {
        self.suspensions
    }

    fn interpolate(&mut self, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let params = self.params;
        for slot in &mut self.roster {
            let target = target_position(slot.index, &params);
            slot.position = slot.position.lerp(target, alpha);
        }
    }

    /// Index and target of the next slot to be appended.
    pub(crate) fn next_slot_target(&self) -> (usize, Offset) {
        let index = self.roster.len();
        (index, target_position(index, &self.params))
    }

    /// Append a slot for `unit`, placed exactly on its target.
    pub(crate) fn push_slot(&mut self, unit: UnitHandle) -> usize {
        let (index, target) = self.next_slot_target();
        self.roster.push(RosterSlot::new(index, target, unit));
        index
    }

    /// Remove the highest-index slot.
    pub(crate) fn pop_slot(&mut self) -> Option<RosterSlot> {
        self.roster.pop()
    }

    /// Open a fresh settle window.
    pub(crate) fn open_settle_window(&mut self) {
        self.settle.open(self.settle_frames);
    }

    /// Hold the re-entrancy guard for the lifetime of the returned value.
    ///
    /// The previous guard state is restored on drop, including during
    /// unwinding.
    pub(crate) fn hold_updates(&mut self) -> UpdateHold<'_> {
        let was_held = !self.settle.try_enter();
        UpdateHold {
            engine: self,
            was_held,
        }
    }

    #[cfg(test)]
    pub(crate) fn slots_mut(&mut self) -> &mut [RosterSlot] {
        &mut self.roster
    }
}

/// Scoped hold on the engine's re-entrancy guard.
///
/// Dereferences to the engine so the holder can keep mutating it.
#[derive(Debug)]
pub(crate) struct UpdateHold<'a> {
    engine: &'a mut FormationEngine,
    was_held: bool,
}

impl Deref for UpdateHold<'_> {
    type Target = FormationEngine;

    fn deref(&self) -> &Self::Target {
        self.engine
    }
}

impl DerefMut for UpdateHold<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine
    }
}

impl Drop for UpdateHold<'_> {
    fn drop(&mut self) {
        if !self.was_held && self.engine.suspensions == 0 {
            self.engine.settle.exit();
        }
    }
}
