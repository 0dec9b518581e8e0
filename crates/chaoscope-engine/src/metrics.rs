//! Per-call performance and safety metrics for [`Simulation::step`].
//!
//! [`Simulation::step`]: crate::Simulation::step

/// Timing and safety counters collected during one `step(n)` call.
///
/// Durations are in microseconds. Counters cover every tick of the call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the whole call.
    pub total_us: u64,
    /// Time spent in the integrator and safety net.
    pub integration_us: u64,
    /// Time spent on checkpoints, trails and history.
    pub bookkeeping_us: u64,
    /// Derivative evaluations performed.
    pub derivative_evaluations: u64,
    /// Steps rejected as non-finite and reverted.
    pub recoveries: u32,
    /// Steps accepted after clamping.
    pub clamps: u32,
    /// Checkpoints saved.
    pub checkpoints_saved: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.integration_us, 0);
        assert_eq!(m.bookkeeping_us, 0);
        assert_eq!(m.derivative_evaluations, 0);
        assert_eq!(m.recoveries, 0);
        assert_eq!(m.clamps, 0);
        assert_eq!(m.checkpoints_saved, 0);
    }
}
