//! Per-node mutable state and the noisy fill step.

use indexmap::IndexMap;
use rand::Rng;
use sluice_core::{Minute, NodeId};

use crate::config::{FillNoise, NodeSpec};

/// Mutable state of one node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeState {
    /// Current level in liters, always within `[0, max_volume]`.
    pub level: f64,
    /// Ticketed extractions so far.
    pub extractions: u32,
    /// End of the most recent ticketed collection.
    pub last_collection_end: Option<Minute>,
}

/// All nodes of a run, in configuration order.
///
/// Nodes are addressed by their position; the id index exists for the
/// dataset boundary and resume.
#[derive(Clone, Debug)]
pub struct NodeTable {
    specs: Vec<NodeSpec>,
    states: Vec<NodeState>,
    index: IndexMap<NodeId, usize>,
}

impl NodeTable {
    /// One state per spec, each starting at its `initial_level`.
    pub fn new(specs: &[NodeSpec]) -> Self {
        let states = specs
            .iter()
            .map(|s| NodeState {
                level: s.initial_level.clamp(0.0, s.max_volume),
                extractions: 0,
                last_collection_end: None,
            })
            .collect();
        let index = specs
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Self {
            specs: specs.to_vec(),
            states,
            index,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Position of a node by id.
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Static description of node `idx`.
    pub fn spec(&self, idx: usize) -> &NodeSpec {
        &self.specs[idx]
    }

    /// Mutable state of node `idx`.
    pub fn state(&self, idx: usize) -> &NodeState {
        &self.states[idx]
    }

    /// Current level of node `idx`.
    pub fn level(&self, idx: usize) -> f64 {
        self.states[idx].level
    }

    /// Overwrite a level, clamped to the node's bounds.
    pub fn set_level(&mut self, idx: usize, level: f64) {
        let max = self.specs[idx].max_volume;
        self.states[idx].level = level.clamp(0.0, max);
    }

    /// Record a completed dispatch against node `idx`.
    pub fn record_extraction(&mut self, idx: usize, collection_end: Minute) {
        let state = &mut self.states[idx];
        state.extractions += 1;
        state.last_collection_end = Some(match state.last_collection_end {
            Some(prev) => prev.max(collection_end),
            None => collection_end,
        });
    }

    /// Apply one minute of noisy filling to node `idx`.
    ///
    /// Returns the level change actually applied after clamping.
    pub fn fill<R: Rng + ?Sized>(&mut self, idx: usize, noise: &FillNoise, rng: &mut R) -> f64 {
        let spec = &self.specs[idx];
        let state = &mut self.states[idx];
        let factor = noise_factor(noise, rng);
        let jitter = sample(rng, (-noise.jitter_factor, noise.jitter_factor)) * state.level;
        let before = state.level;
        state.level = (before + spec.fill_rate * factor + jitter).clamp(0.0, spec.max_volume);
        state.level - before
    }

    /// Remove up to `amount` liters from node `idx`, stopping at zero.
    ///
    /// Returns the amount actually removed.
    pub fn drain(&mut self, idx: usize, amount: f64) -> f64 {
        let state = &mut self.states[idx];
        let removed = amount.min(state.level).max(0.0);
        state.level -= removed;
        removed
    }

    /// Current levels in configuration order.
    pub fn levels(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.level).collect()
    }

    /// Node ids in configuration order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.specs.iter().map(|s| &s.id)
    }

    /// Static descriptions in configuration order.
    pub fn specs(&self) -> &[NodeSpec] {
        &self.specs
    }
}

/// Draw the multiplicative noise for one node-minute.
fn noise_factor<R: Rng + ?Sized>(noise: &FillNoise, rng: &mut R) -> f64 {
    let base = sample(rng, noise.base_range);
    let spike = if noise.spike_chance > 0.0 && rng.random_bool(noise.spike_chance) {
        sample(rng, noise.spike_range)
    } else {
        1.0
    };
    base * spike
}

/// Uniform draw from `[lo, hi)`, returning `lo` for an empty range.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn table() -> NodeTable {
        NodeTable::new(&[
            NodeSpec::new("a", 100.0, 2.0).with_initial_level(50.0),
            NodeSpec::new("b", 10.0, 5.0).with_initial_level(9.0),
        ])
    }

    #[test]
    fn noiseless_fill_is_exact() {
        let mut t = table();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let delta = t.fill(0, &FillNoise::none(), &mut rng);
        assert_eq!(delta, 2.0);
        assert_eq!(t.level(0), 52.0);
    }

    #[test]
    fn fill_clamps_at_capacity() {
        let mut t = table();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let delta = t.fill(1, &FillNoise::none(), &mut rng);
        assert_eq!(delta, 1.0);
        assert_eq!(t.level(1), 10.0);
    }

    #[test]
    fn noisy_fill_stays_near_rate() {
        let mut t = table();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            let delta = t.fill(0, &FillNoise::default(), &mut rng);
            // worst case: 1.02 * 1.03 * 2.0 plus 0.05% of 100 L
            assert!(delta > 1.8 && delta < 2.2, "delta {delta}");
        }
    }

    #[test]
    fn drain_stops_at_zero() {
        let mut t = table();
        assert_eq!(t.drain(1, 4.0), 4.0);
        assert_eq!(t.drain(1, 10.0), 5.0);
        assert_eq!(t.level(1), 0.0);
    }

    #[test]
    fn record_extraction_keeps_latest_end() {
        let mut t = table();
        t.record_extraction(0, Minute(500));
        t.record_extraction(0, Minute(300));
        assert_eq!(t.state(0).extractions, 2);
        assert_eq!(t.state(0).last_collection_end, Some(Minute(500)));
    }

    #[test]
    fn index_follows_configuration_order() {
        let t = table();
        assert_eq!(t.index_of(&NodeId::from("b")), Some(1));
        assert_eq!(t.index_of(&NodeId::from("zz")), None);
        let ids: Vec<_> = t.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
