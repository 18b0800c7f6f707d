//! Minute-by-minute level snapshots.

use sluice_core::{Minute, NodeId};

/// Levels of every node at one minute, in node configuration order.
#[derive(Clone, Debug, PartialEq)]
pub struct MinuteSnapshot {
    /// The minute recorded.
    pub at: Minute,
    /// One level per node.
    pub levels: Vec<f64>,
}

/// A gap-free, strictly increasing sequence of snapshots.
///
/// Snapshots can only be appended for the next minute, so contiguity
/// holds by construction.
#[derive(Clone, Debug, PartialEq)]
pub struct History {
    node_ids: Vec<NodeId>,
    start: Minute,
    snapshots: Vec<MinuteSnapshot>,
}

impl History {
    /// An empty history whose first snapshot will be at `start`.
    pub fn new(node_ids: Vec<NodeId>, start: Minute) -> Self {
        Self {
            node_ids,
            start,
            snapshots: Vec::new(),
        }
    }

    /// Append the levels of the next minute and return its timestamp.
    pub fn push(&mut self, levels: Vec<f64>) -> Minute {
        let at = self.start + self.snapshots.len() as i64;
        self.snapshots.push(MinuteSnapshot { at, levels });
        at
    }

    /// Node ids, one per level column.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Minute of the first snapshot.
    pub fn start(&self) -> Minute {
        self.start
    }

    /// Minute of the last snapshot, if any.
    pub fn last_minute(&self) -> Option<Minute> {
        self.snapshots.last().map(|s| s.at)
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether no snapshot was recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// All snapshots in order.
    pub fn snapshots(&self) -> &[MinuteSnapshot] {
        &self.snapshots
    }

    /// Position of minute `t`, if recorded.
    pub fn index_of(&self, t: Minute) -> Option<usize> {
        let offset = t.minutes_since(self.start);
        (offset >= 0 && (offset as usize) < self.snapshots.len()).then_some(offset as usize)
    }

    /// Level of column `node` at minute `t`.
    pub fn level(&self, t: Minute, node: usize) -> Option<f64> {
        let i = self.index_of(t)?;
        self.snapshots[i].levels.get(node).copied()
    }

    /// Column `node` for the snapshots in `range`.
    pub fn column(&self, node: usize, range: std::ops::Range<usize>) -> Vec<f64> {
        self.snapshots[range]
            .iter()
            .map(|s| s.levels[node])
            .collect()
    }

    /// Overwrite column `node` starting at snapshot `from`.
    pub(crate) fn write_column(&mut self, node: usize, from: usize, values: &[f64]) {
        for (snapshot, &v) in self.snapshots[from..].iter_mut().zip(values) {
            snapshot.levels[node] = v;
        }
    }
}
