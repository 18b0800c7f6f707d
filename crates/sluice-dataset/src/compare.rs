//! History comparison for regeneration checks.
//!
//! Hash-first: equal digests mean equal series. On a mismatch the two
//! series are walked minute by minute to say where they part.

use sluice_core::NodeId;

use crate::hash::history_digest;
use crate::records::HistoryFile;

/// Most divergences collected before the walk stops.
pub const MAX_DIVERGENCES: usize = 64;

/// How two series differ at one point.
#[derive(Clone, Debug, PartialEq)]
pub enum DivergenceKind {
    /// Same minute, same node, different level.
    Level {
        /// Node whose level differs.
        node: NodeId,
        /// Level in the recorded series.
        recorded: f64,
        /// Level in the regenerated series.
        replayed: f64,
    },
    /// A node is present on one side only.
    MissingNode {
        /// The node.
        node: NodeId,
        /// Whether the recorded side has it.
        in_recorded: bool,
    },
    /// The entries at the same index carry different timestamps.
    Timestamp {
        /// Timestamp in the recorded series.
        recorded: String,
        /// Timestamp in the regenerated series.
        replayed: String,
    },
}

/// One divergence, located by entry index.
#[derive(Clone, Debug, PartialEq)]
pub struct Divergence {
    /// Index into `data`.
    pub index: usize,
    /// What differs.
    pub kind: DivergenceKind,
}

/// Everything found when two series disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct DivergenceReport {
    /// Digest of the recorded series.
    pub recorded_digest: u64,
    /// Digest of the regenerated series.
    pub replayed_digest: u64,
    /// Entries in the recorded series.
    pub recorded_len: usize,
    /// Entries in the regenerated series.
    pub replayed_len: usize,
    /// Up to [`MAX_DIVERGENCES`] differences, in series order.
    pub divergences: Vec<Divergence>,
}

impl DivergenceReport {
    /// Index of the first differing entry.
    pub fn first_index(&self) -> Option<usize> {
        self.divergences.first().map(|d| d.index).or_else(|| {
            (self.recorded_len != self.replayed_len)
                .then(|| self.recorded_len.min(self.replayed_len))
        })
    }
}

/// Compare two level series.
///
/// Returns `None` when the digests agree.
pub fn compare_histories(
    recorded: &HistoryFile,
    replayed: &HistoryFile,
) -> Option<DivergenceReport> {
    let recorded_digest = history_digest(recorded);
    let replayed_digest = history_digest(replayed);
    if recorded_digest == replayed_digest {
        return None;
    }

    let mut divergences = Vec::new();
    'walk: for (index, (rec, rep)) in recorded.data.iter().zip(&replayed.data).enumerate() {
        let mut push = |kind| {
            divergences.push(Divergence { index, kind });
            divergences.len() >= MAX_DIVERGENCES
        };
        if rec.timestamp != rep.timestamp
            && push(DivergenceKind::Timestamp {
                recorded: rec.timestamp.clone(),
                replayed: rep.timestamp.clone(),
            })
        {
            break 'walk;
        }
        for (node, &r) in &rec.levels {
            let full = match rep.levels.get(node) {
                Some(&p) if p.to_bits() == r.to_bits() => false,
                Some(&p) => push(DivergenceKind::Level {
                    node: node.clone(),
                    recorded: r,
                    replayed: p,
                }),
                None => push(DivergenceKind::MissingNode {
                    node: node.clone(),
                    in_recorded: true,
                }),
            };
            if full {
                break 'walk;
            }
        }
        for node in rep.levels.keys() {
            if !rec.levels.contains_key(node)
                && push(DivergenceKind::MissingNode {
                    node: node.clone(),
                    in_recorded: false,
                })
            {
                break 'walk;
            }
        }
    }

    Some(DivergenceReport {
        recorded_digest,
        replayed_digest,
        recorded_len: recorded.data.len(),
        replayed_len: replayed.data.len(),
        divergences,
    })
}
