//! Post-run injection of unreported drains.
//!
//! After the tick loop the injector draws candidate (minute, node, amount)
//! triples and keeps those that stay clear of every ticketed collection
//! and every other unreported drain on the same node. Each candidate is
//! evaluated on a copy of the node's level column; the history is only
//! written once a candidate is accepted. An accepted drain lowers the
//! level by `rate` each minute of its window and the full amount stays
//! missing from every later minute.

use rand::Rng;
use smallvec::SmallVec;
use sluice_core::{NodeId, TimeWindow};
use tracing::{debug, warn};

use crate::config::{AnomalyConfig, EngineConfig, NodeSpec};
use crate::history::History;
use crate::ledger::DrainPlan;
use crate::node::sample;
use crate::ticket::Ticket;

/// A drain that left no paperwork.
#[derive(Clone, Debug, PartialEq)]
pub struct UnreportedDrain {
    /// Node drained.
    pub node: NodeId,
    /// Minutes during which the level was lowered.
    pub window: TimeWindow,
    /// Net liters removed.
    pub amount: f64,
}

/// Result of one injection pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InjectionReport {
    /// Accepted drains in acceptance order.
    pub accepted: Vec<UnreportedDrain>,
    /// How many were wanted.
    pub target: u32,
    /// Candidates drawn.
    pub attempts: u32,
}

impl InjectionReport {
    /// Whether the retry budget ran out before the target was met.
    pub fn exhausted(&self) -> bool {
        (self.accepted.len() as u32) < self.target
    }
}

/// The anomaly injector.
#[derive(Clone, Debug)]
pub struct AnomalyInjector {
    config: AnomalyConfig,
    capacity: f64,
    duration_bounds: (i64, i64),
}

impl AnomalyInjector {
    /// Build from a validated configuration.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.anomalies.clone(),
            capacity: config.dispatch.courier_capacity,
            duration_bounds: config.dispatch.duration_bounds,
        }
    }

    /// Inject unreported drains into `history`.
    ///
    /// `nodes` must be in the history's column order. `tickets` and
    /// `prior` may include records outside the history; they only
    /// constrain spacing.
    pub fn inject<R: Rng + ?Sized>(
        &self,
        history: &mut History,
        nodes: &[NodeSpec],
        tickets: &[Ticket],
        prior: &[UnreportedDrain],
        rng: &mut R,
    ) -> InjectionReport {
        let cfg = &self.config;
        let mut report = InjectionReport::default();
        if !cfg.enabled {
            return report;
        }
        report.target = rng.random_range(cfg.target_count.0..=cfg.target_count.1);
        if report.target == 0 {
            return report;
        }
        if nodes.len() != history.node_ids().len() {
            warn!(
                nodes = nodes.len(),
                columns = history.node_ids().len(),
                "node list does not match history columns, skipping anomaly injection"
            );
            return report;
        }

        let total = history.len() as i64;
        let first = cfg.edge_margin_minutes;
        let last = total - cfg.edge_margin_minutes - 1;
        if last < first {
            warn!(
                minutes = total,
                margin = cfg.edge_margin_minutes,
                "history too short for anomaly injection"
            );
            return report;
        }

        // Windows already occupied on each node.
        let mut busy: Vec<Vec<TimeWindow>> = vec![Vec::new(); nodes.len()];
        let column_of = |id: &NodeId| history.node_ids().iter().position(|n| n == id);
        for t in tickets {
            if let Some(i) = column_of(&t.node) {
                busy[i].push(t.collection);
            }
        }
        for d in prior {
            if let Some(i) = column_of(&d.node) {
                busy[i].push(d.window);
            }
        }

        while (report.accepted.len() as u32) < report.target && report.attempts < cfg.max_attempts
        {
            report.attempts += 1;
            let idx = rng.random_range(first..=last) as usize;
            let at = history.snapshots()[idx].at;
            let levels = &history.snapshots()[idx].levels;
            let eligible: SmallVec<[usize; 16]> = (0..nodes.len())
                .filter(|&i| levels[i] > cfg.min_level)
                .collect();
            if eligible.is_empty() {
                continue;
            }
            let node = eligible[rng.random_range(0..eligible.len())];
            let spec = &nodes[node];
            let level = levels[node];

            let max_net = spec.max_net_for_capacity(self.capacity);
            let min_drop = sample(rng, cfg.net_drop);
            let max_drop = (level * cfg.max_level_fraction)
                .min(level - cfg.level_reserve)
                .min(max_net);
            let amount = if min_drop < max_drop {
                rng.random_range(min_drop..max_drop)
            } else {
                min_drop.min(max_net)
            };
            let Some(plan) = DrainPlan::fit(
                amount,
                spec.fill_rate,
                spec.drain_rate,
                self.capacity,
                self.duration_bounds,
            ) else {
                continue;
            };
            if plan.net < cfg.min_total_drop {
                continue;
            }
            let Ok(window) = TimeWindow::with_duration(at, plan.duration) else {
                continue;
            };
            let Some(last_idx) = history.index_of(window.end() - 1) else {
                continue;
            };
            if busy[node]
                .iter()
                .any(|w| w.conflicts_with(&window, cfg.min_gap_minutes))
            {
                continue;
            }

            let before = history.snapshots()[idx.saturating_sub(1)].levels[node];
            let rate = plan.rate();
            let in_window = last_idx + 1 - idx;
            // The removed liters stay removed for the rest of the series.
            let mut column = history.column(node, idx..history.len());
            for (k, v) in column.iter_mut().enumerate() {
                let depth = if k < in_window {
                    rate * (k + 1) as f64
                } else {
                    plan.net
                };
                *v = (*v - depth).max(0.0);
            }
            let after = column[in_window - 1];
            if before - after < cfg.min_visible_drop {
                continue;
            }

            history.write_column(node, idx, &column);
            busy[node].push(window);
            debug!(
                node = %spec.id,
                start = %window.start(),
                minutes = plan.duration,
                amount = plan.net,
                "unreported drain injected"
            );
            report.accepted.push(UnreportedDrain {
                node: spec.id.clone(),
                window,
                amount: plan.net,
            });
        }

        if report.exhausted() {
            warn!(
                target = report.target,
                accepted = report.accepted.len(),
                attempts = report.attempts,
                "anomaly retry budget exhausted"
            );
        }
        report
    }
}
