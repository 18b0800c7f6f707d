//! Digests for dataset comparison.
//!
//! Uses FNV-1a over the values as written, so a digest computed from a
//! freshly generated dataset matches one computed from the same dataset
//! read back from disk. Not cryptographically secure.

use crate::records::{HistoryFile, SnapshotRecord, TicketFile};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Strings are length-prefixed so `("ab", "c")` and `("a", "bc")` differ.
#[inline]
fn fnv1a_str(hash: u64, s: &str) -> u64 {
    let hash = fnv1a_bytes(hash, &(s.len() as u64).to_le_bytes());
    fnv1a_bytes(hash, s.as_bytes())
}

#[inline]
fn fnv1a_f64(hash: u64, v: f64) -> u64 {
    fnv1a_bytes(hash, &v.to_bits().to_le_bytes())
}

/// Digest of one snapshot: timestamp, then every node id and level in
/// map order.
pub fn snapshot_digest(hash: u64, s: &SnapshotRecord) -> u64 {
    let mut hash = fnv1a_str(hash, &s.timestamp);
    for (node, &level) in &s.levels {
        hash = fnv1a_str(hash, node.as_str());
        hash = fnv1a_f64(hash, level);
    }
    hash
}

/// Digest of the whole level series. Metadata is ignored.
///
/// Returns `FNV_OFFSET` for an empty series.
pub fn history_digest(history: &HistoryFile) -> u64 {
    history.data.iter().fold(FNV_OFFSET, snapshot_digest)
}

/// Digest of every ticket field that an audit reads.
pub fn ticket_digest(tickets: &TicketFile) -> u64 {
    tickets
        .transport_tickets
        .iter()
        .fold(FNV_OFFSET, |mut hash, t| {
            hash = fnv1a_str(hash, &t.ticket_id);
            hash = fnv1a_str(hash, t.node_id.as_str());
            hash = fnv1a_str(hash, t.courier_id.as_str());
            hash = fnv1a_str(hash, &t.collection_start_timestamp);
            hash = fnv1a_str(hash, &t.collection_timestamp);
            hash = fnv1a_f64(hash, t.amount_collected);
            fnv1a_f64(hash, t.actual_amount_collected.unwrap_or(t.amount_collected))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use sluice_core::NodeId;
    use sluice_engine::FillNoise;

    use crate::records::HistoryMetadata;

    fn history(rows: Vec<(&str, Vec<(&str, f64)>)>) -> HistoryFile {
        HistoryFile {
            metadata: HistoryMetadata::for_nodes(&[], &FillNoise::none()),
            data: rows
                .into_iter()
                .map(|(ts, levels)| SnapshotRecord {
                    timestamp: ts.to_string(),
                    levels: levels
                        .into_iter()
                        .map(|(n, l)| (NodeId::from(n), l))
                        .collect::<IndexMap<_, _>>(),
                })
                .collect(),
        }
    }

    #[test]
    fn same_data_same_digest() {
        let a = history(vec![("2024-10-30T00:00:00Z", vec![("a", 1.0), ("b", 2.0)])]);
        let mut b = a.clone();
        b.metadata.unit = "gallons".into();
        assert_eq!(history_digest(&a), history_digest(&b));
    }

    #[test]
    fn level_change_changes_digest() {
        let a = history(vec![("2024-10-30T00:00:00Z", vec![("a", 1.0)])]);
        let b = history(vec![("2024-10-30T00:00:00Z", vec![("a", 1.01)])]);
        assert_ne!(history_digest(&a), history_digest(&b));
    }

    #[test]
    fn node_order_matters() {
        let a = history(vec![("2024-10-30T00:00:00Z", vec![("a", 1.0), ("b", 2.0)])]);
        let b = history(vec![("2024-10-30T00:00:00Z", vec![("b", 2.0), ("a", 1.0)])]);
        assert_ne!(history_digest(&a), history_digest(&b));
    }

    #[test]
    fn empty_history_is_offset_basis() {
        assert_eq!(history_digest(&history(Vec::new())), FNV_OFFSET);
    }
}
