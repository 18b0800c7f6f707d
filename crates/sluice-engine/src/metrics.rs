//! Per-tick outcomes and whole-run counters.
//!
//! [`TickOutcome`] describes what a single `step()` did; [`RunMetrics`]
//! accumulates those outcomes over a run, plus the anomaly pass and wall
//! time.

use std::time::Duration;

use sluice_core::{Minute, NodeId};

/// What happened during one simulated minute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutcome {
    /// The minute simulated.
    pub at: Minute,
    /// Ticket id issued this tick, if a courier was dispatched.
    pub ticket: Option<String>,
    /// Node selected but left waiting for a courier.
    pub pending: Option<NodeId>,
    /// Drains applied this tick.
    pub drains_applied: u32,
    /// Applications cut short at zero level.
    pub clamped: u32,
    /// Drains retired this tick.
    pub retired: u32,
    /// Node-minutes spent at capacity after filling.
    pub at_capacity: u32,
}

/// Counters accumulated over a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunMetrics {
    /// Minutes simulated.
    pub ticks: u64,
    /// Tickets issued.
    pub dispatches: u64,
    /// Of those, under-reported.
    pub suspicious: u64,
    /// Ticks on which a node was selected but no courier could go.
    pub pending_no_courier: u64,
    /// Ticks on which no ranked node could be sized for a courier.
    pub pending_not_dispatchable: u64,
    /// Drain applications.
    pub drain_applications: u64,
    /// Drain applications cut short at zero level.
    pub clamped_applications: u64,
    /// Drains retired.
    pub retired_drains: u64,
    /// Node-minutes at capacity.
    pub at_capacity_minutes: u64,
    /// Unreported drains injected.
    pub anomalies: u64,
    /// Candidates the injector drew.
    pub anomaly_attempts: u64,
    /// Whether the injector fell short of its target.
    pub anomaly_budget_exhausted: bool,
    /// Wall-clock time of the tick loop and injection, in microseconds.
    pub wall_us: u64,
}

impl RunMetrics {
    /// Fold one tick into the totals.
    pub fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        self.drain_applications += u64::from(outcome.drains_applied);
        self.clamped_applications += u64::from(outcome.clamped);
        self.retired_drains += u64::from(outcome.retired);
        self.at_capacity_minutes += u64::from(outcome.at_capacity);
        if outcome.ticket.is_some() {
            self.dispatches += 1;
        }
    }

    /// Add wall-clock time, saturating instead of wrapping.
    pub fn add_wall(&mut self, elapsed: Duration) {
        let us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.wall_us = self.wall_us.saturating_add(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.ticks, 0);
        assert_eq!(m.dispatches, 0);
        assert_eq!(m.wall_us, 0);
        assert!(!m.anomaly_budget_exhausted);
    }

    #[test]
    fn wall_time_saturates() {
        let mut m = RunMetrics::default();
        m.add_wall(Duration::from_micros(1500));
        assert_eq!(m.wall_us, 1500);
        m.add_wall(Duration::MAX);
        assert_eq!(m.wall_us, u64::MAX);
        m.add_wall(Duration::from_secs(1));
        assert_eq!(m.wall_us, u64::MAX);
    }

    #[test]
    fn record_accumulates() {
        let mut m = RunMetrics::default();
        m.record(&TickOutcome {
            at: Minute(0),
            ticket: Some("TT_19700101_001".to_string()),
            drains_applied: 2,
            clamped: 1,
            retired: 1,
            at_capacity: 3,
            ..TickOutcome::default()
        });
        m.record(&TickOutcome {
            at: Minute(1),
            pending: Some(NodeId::from("n1")),
            ..TickOutcome::default()
        });
        assert_eq!(m.ticks, 2);
        assert_eq!(m.dispatches, 1);
        assert_eq!(m.drain_applications, 2);
        assert_eq!(m.clamped_applications, 1);
        assert_eq!(m.retired_drains, 1);
        assert_eq!(m.at_capacity_minutes, 3);
    }
}
