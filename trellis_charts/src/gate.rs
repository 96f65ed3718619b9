// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-paint gating.
//!
//! Each mounted chart owns exactly one [`RenderGate`]. It starts in
//! [`RenderGateState::NotRendered`] and moves to [`RenderGateState::Rendered`] once, after the
//! first successful draw. Prop and data updates never reset it; only a new mount (which makes a
//! new gate) does.

/// The two states of a [`RenderGate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderGateState {
    /// No draw has completed yet.
    #[default]
    NotRendered,
    /// The first draw has completed.
    Rendered,
}

/// How a render pass should present its marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPhase {
    /// First paint: marks animate into view.
    Entrance,
    /// Any later pass: geometry is applied immediately.
    Update,
}

impl RenderPhase {
    /// Returns `true` for [`RenderPhase::Entrance`].
    pub fn is_entrance(self) -> bool {
        matches!(self, Self::Entrance)
    }
}

/// Per-mount latch distinguishing the entrance pass from updates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderGate {
    state: RenderGateState,
}

impl RenderGate {
    /// A fresh gate, not yet rendered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> RenderGateState {
        self.state
    }

    /// Returns `true` until [`RenderGate::mark_rendered`] has been called.
    pub fn is_first_render(&self) -> bool {
        self.state == RenderGateState::NotRendered
    }

    /// Phase for the pass about to run.
    ///
    /// Read this once per pass and share it between all axes drawn in that pass.
    pub fn phase(&self) -> RenderPhase {
        match self.state {
            RenderGateState::NotRendered => RenderPhase::Entrance,
            RenderGateState::Rendered => RenderPhase::Update,
        }
    }

    /// Records that the first draw completed. Further calls have no effect.
    pub fn mark_rendered(&mut self) {
        if self.state == RenderGateState::NotRendered {
            tracing::debug!("render gate: first paint complete");
            self.state = RenderGateState::Rendered;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_render_is_observed_once() {
        let mut gate = RenderGate::new();
        assert!(gate.is_first_render());
        assert_eq!(gate.phase(), RenderPhase::Entrance);
        gate.mark_rendered();
        for _ in 0..3 {
            assert!(!gate.is_first_render());
            assert_eq!(gate.phase(), RenderPhase::Update);
        }
    }

    #[test]
    fn mark_rendered_is_idempotent() {
        let mut gate = RenderGate::new();
        gate.mark_rendered();
        let snapshot = gate.clone();
        gate.mark_rendered();
        assert_eq!(gate, snapshot);
        assert_eq!(gate.state(), RenderGateState::Rendered);
    }
}
