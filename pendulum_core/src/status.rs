//! Control phases and session outcomes.

/// Phase of a control session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPhase {
    /// Fixed-duration settle period; the rig is assumed stationary.
    Calibrating,
    /// Open-loop energy injection.
    Bootstrap,
    /// Closed-loop balancing; the intended steady state.
    Stabilizing,
    /// Zero velocity commanded, session being released.
    ShuttingDown,
}

/// Why a session ended without a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The external stop signal was observed at a suspension point.
    Stopped,
    /// The configured runtime cap elapsed.
    RuntimeCapped,
}
