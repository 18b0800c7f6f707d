//! Active drains and the net/gross arithmetic of an extraction.
//!
//! A drain removes `net / duration` liters per minute from one node on
//! every tick `t` with `start <= t < end`. While it is active the node
//! does not fill, so the courier leaves with the net amount plus whatever
//! the node would have produced in the meantime: the *gross* amount,
//! `net + fill_rate × duration`.

use sluice_core::{Minute, NodeId, StepError, TimeWindow};

use crate::node::NodeTable;

/// Shortfall below which a per-minute application counts as complete.
const CLAMP_EPSILON: f64 = 1e-9;

// ── DrainPlan ──────────────────────────────────────────────────────

/// Amounts and duration of one planned extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrainPlan {
    /// Liters removed from the node's level.
    pub net: f64,
    /// Liters the courier carries away.
    pub gross: f64,
    /// Extraction length in minutes.
    pub duration: i64,
}

impl DrainPlan {
    /// Fit a net target to a courier of `capacity` liters.
    ///
    /// Net is capped so that the gross fits the courier, the duration is
    /// derived from the node's drain rate and clamped to `bounds`, and if
    /// the clamped duration would still overflow the courier the net is
    /// reduced until `gross == capacity`.
    ///
    /// A node that refills the whole courier within the minimum duration
    /// gets a shorter extraction instead, `capacity / (fill + drain)`
    /// minutes but at least one. Returns `None` when nothing positive is
    /// left to extract even then.
    pub fn fit(
        net_target: f64,
        fill_rate: f64,
        drain_rate: f64,
        capacity: f64,
        bounds: (i64, i64),
    ) -> Option<DrainPlan> {
        if !net_target.is_finite() || net_target <= 0.0 || drain_rate <= 0.0 {
            return None;
        }
        let max_net = capacity / (1.0 + fill_rate / drain_rate);
        let mut net = net_target.min(max_net);
        let mut duration = ((net / drain_rate).floor() as i64).clamp(bounds.0, bounds.1);
        if fill_rate * duration as f64 >= capacity {
            duration = ((capacity / (fill_rate + drain_rate)).floor() as i64).max(1);
        }
        let refill = fill_rate * duration as f64;
        if net + refill > capacity {
            net = capacity - refill;
        }
        if net <= 0.0 {
            return None;
        }
        Some(DrainPlan {
            net,
            gross: net + refill,
            duration,
        })
    }

    /// Net liters removed per minute.
    pub fn rate(&self) -> f64 {
        self.net / self.duration as f64
    }
}

// ── ActiveDrain ────────────────────────────────────────────────────

/// A registered drain on one node.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveDrain {
    /// Position of the node in the node table.
    pub node: usize,
    /// Node identifier.
    pub node_id: NodeId,
    /// Minutes during which the drain is applied.
    pub window: TimeWindow,
    /// Declared net amount.
    pub net: f64,
    applied: f64,
    clamped: u32,
}

impl ActiveDrain {
    /// Net liters removed per minute.
    pub fn rate(&self) -> f64 {
        if self.window.duration() == 0 {
            0.0
        } else {
            self.net / self.window.duration() as f64
        }
    }

    /// Liters actually removed so far.
    pub fn applied(&self) -> f64 {
        self.applied
    }

    /// Applications that removed less than the full rate.
    pub fn clamped(&self) -> u32 {
        self.clamped
    }
}

/// Outcome of one tick of drain application.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ApplyReport {
    /// Drains applied this tick.
    pub applied: u32,
    /// Of those, how many were cut short at zero level.
    pub clamped: u32,
    /// Liters removed in total.
    pub liters: f64,
}

// ── DrainLedger ────────────────────────────────────────────────────

/// Registry of scheduled and active drains, at most one per node.
#[derive(Clone, Debug, Default)]
pub struct DrainLedger {
    drains: Vec<ActiveDrain>,
}

impl DrainLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a drain of `net` liters over `window` on node `node`.
    ///
    /// Fails if the amount is negative or non-finite, or if the node
    /// already has a drain registered.
    pub fn register(
        &mut self,
        node: usize,
        node_id: NodeId,
        window: TimeWindow,
        net: f64,
    ) -> Result<(), StepError> {
        self.register_partial(node, node_id, window, net, 0.0)
    }

    /// Register a drain of which `already_applied` liters were removed
    /// before this ledger existed. Used when resuming mid-extraction.
    pub fn register_partial(
        &mut self,
        node: usize,
        node_id: NodeId,
        window: TimeWindow,
        net: f64,
        already_applied: f64,
    ) -> Result<(), StepError> {
        if !net.is_finite() || net < 0.0 {
            return Err(StepError::InvalidQuantity {
                what: "net_amount",
                value: net,
            });
        }
        if self.has_drain(node) {
            return Err(StepError::NodeAlreadyDraining { node: node_id });
        }
        self.drains.push(ActiveDrain {
            node,
            node_id,
            window,
            net,
            applied: already_applied,
            clamped: 0,
        });
        Ok(())
    }

    /// Whether node `node` has a drain registered, active or pending.
    pub fn has_drain(&self, node: usize) -> bool {
        self.drains.iter().any(|d| d.node == node)
    }

    /// Whether node `node` is being drained at minute `t`.
    pub fn is_draining(&self, node: usize, t: Minute) -> bool {
        self.drains
            .iter()
            .any(|d| d.node == node && d.window.contains(t))
    }

    /// Apply every drain active at `t` to the node table.
    pub fn apply(&mut self, t: Minute, nodes: &mut NodeTable) -> ApplyReport {
        let mut report = ApplyReport::default();
        for drain in self.drains.iter_mut().filter(|d| d.window.contains(t)) {
            let rate = drain.rate();
            let removed = nodes.drain(drain.node, rate);
            drain.applied += removed;
            report.applied += 1;
            report.liters += removed;
            if removed + CLAMP_EPSILON < rate {
                drain.clamped += 1;
                report.clamped += 1;
            }
        }
        report
    }

    /// Retire every drain whose window ended strictly before `t`.
    ///
    /// Candidates are collected first and removed afterwards; calling this
    /// twice with the same `t` retires nothing the second time.
    pub fn retire(&mut self, t: Minute) -> Vec<ActiveDrain> {
        let expired: Vec<usize> = self
            .drains
            .iter()
            .enumerate()
            .filter(|(_, d)| t > d.window.end())
            .map(|(i, _)| i)
            .collect();
        let mut retired = Vec::with_capacity(expired.len());
        for &i in expired.iter().rev() {
            retired.push(self.drains.remove(i));
        }
        retired.reverse();
        retired
    }

    /// Registered drains in registration order.
    pub fn drains(&self) -> &[ActiveDrain] {
        &self.drains
    }

    /// Number of registered drains.
    pub fn len(&self) -> usize {
        self.drains.len()
    }

    /// Whether no drains are registered.
    pub fn is_empty(&self) -> bool {
        self.drains.is_empty()
    }
}
