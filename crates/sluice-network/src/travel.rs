//! Symmetric travel-time lookup.

use indexmap::IndexMap;
use sluice_core::LocationId;

use crate::edge::{canonical, Edge};
use crate::error::NetworkError;

/// Travel time assumed for any pair of distinct locations with no edge.
pub const DEFAULT_FALLBACK_MINUTES: u32 = 30;

/// Point-to-point travel times in minutes.
///
/// Lookups are symmetric, a location is zero minutes from itself, and any
/// unlisted pair falls back to a fixed value. Edges are kept in insertion
/// order so iteration (and anything serialized from it) is reproducible.
#[derive(Clone, Debug, PartialEq)]
pub struct TravelModel {
    edges: IndexMap<(LocationId, LocationId), u32>,
    fallback: u32,
}

impl TravelModel {
    /// An empty model: every distinct pair costs the default fallback.
    pub fn new() -> Self {
        Self::with_fallback(DEFAULT_FALLBACK_MINUTES)
    }

    /// An empty model with a custom fallback.
    pub fn with_fallback(fallback: u32) -> Self {
        Self {
            edges: IndexMap::new(),
            fallback,
        }
    }

    /// Build a model from an edge list using the default fallback.
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Result<Self, NetworkError> {
        let mut model = Self::new();
        for edge in edges {
            model.insert(edge)?;
        }
        Ok(model)
    }

    /// Add one edge.
    ///
    /// Re-inserting an identical edge (in either direction) is a no-op;
    /// re-inserting the pair with a different time is an error.
    pub fn insert(&mut self, edge: Edge) -> Result<(), NetworkError> {
        if edge.from == edge.to {
            return Err(NetworkError::SelfLoop {
                location: edge.from,
            });
        }
        let key = edge.key();
        if let Some(&existing) = self.edges.get(&key) {
            if existing != edge.minutes {
                return Err(NetworkError::ConflictingEdge {
                    from: edge.from,
                    to: edge.to,
                    existing,
                    conflicting: edge.minutes,
                });
            }
            return Ok(());
        }
        self.edges.insert(key, edge.minutes);
        Ok(())
    }

    /// Minutes to travel between `a` and `b`.
    pub fn minutes(&self, a: &LocationId, b: &LocationId) -> u32 {
        if a == b {
            return 0;
        }
        self.edges
            .get(&canonical(a, b))
            .copied()
            .unwrap_or(self.fallback)
    }

    /// Whether the pair has an explicit edge.
    pub fn has_edge(&self, a: &LocationId, b: &LocationId) -> bool {
        self.edges.contains_key(&canonical(a, b))
    }

    /// Outbound and return legs of a depot → node → depot trip.
    pub fn round_trip(&self, depot: &LocationId, node: &LocationId) -> (u32, u32) {
        (self.minutes(depot, node), self.minutes(node, depot))
    }

    /// Fallback time for unlisted pairs.
    pub fn fallback(&self) -> u32 {
        self.fallback
    }

    /// Number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges in insertion order, endpoints canonicalized.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().map(|((a, b), &minutes)| Edge {
            from: a.clone(),
            to: b.clone(),
            minutes,
        })
    }
}

impl Default for TravelModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn loc(s: &str) -> LocationId {
        LocationId::from(s)
    }

    #[test]
    fn lookup_is_symmetric() {
        let m = TravelModel::from_edges([Edge::new("market_001", "n1", 17)]).unwrap();
        assert_eq!(m.minutes(&loc("market_001"), &loc("n1")), 17);
        assert_eq!(m.minutes(&loc("n1"), &loc("market_001")), 17);
    }

    #[test]
    fn missing_pair_uses_fallback() {
        let m = TravelModel::from_edges([Edge::new("a", "b", 5)]).unwrap();
        assert_eq!(m.minutes(&loc("a"), &loc("c")), DEFAULT_FALLBACK_MINUTES);
        assert_eq!(
            TravelModel::with_fallback(45).minutes(&loc("x"), &loc("y")),
            45
        );
    }

    #[test]
    fn same_location_is_zero() {
        let m = TravelModel::new();
        assert_eq!(m.minutes(&loc("depot"), &loc("depot")), 0);
    }

    #[test]
    fn self_loop_rejected() {
        let err = TravelModel::from_edges([Edge::new("a", "a", 3)]).unwrap_err();
        assert_eq!(err, NetworkError::SelfLoop { location: loc("a") });
    }

    #[test]
    fn duplicate_edge_same_time_is_idempotent() {
        let m = TravelModel::from_edges([Edge::new("a", "b", 3), Edge::new("b", "a", 3)]).unwrap();
        assert_eq!(m.edge_count(), 1);
    }

    #[test]
    fn duplicate_edge_different_time_rejected() {
        let err =
            TravelModel::from_edges([Edge::new("a", "b", 3), Edge::new("b", "a", 4)]).unwrap_err();
        assert!(matches!(err, NetworkError::ConflictingEdge { existing: 3, conflicting: 4, .. }));
    }

    #[test]
    fn round_trip_returns_both_legs() {
        let m = TravelModel::from_edges([Edge::new("depot", "n1", 20)]).unwrap();
        assert_eq!(m.round_trip(&loc("depot"), &loc("n1")), (20, 20));
        assert_eq!(m.round_trip(&loc("depot"), &loc("n2")), (30, 30));
    }

    proptest! {
        #[test]
        fn lookup_symmetric_for_any_edge_list(
            edges in proptest::collection::vec((0u8..8, 0u8..8, 1u32..120), 0..20),
            a in 0u8..8,
            b in 0u8..8,
        ) {
            let mut m = TravelModel::new();
            for (x, y, t) in edges {
                // Conflicts and self-loops are rejected; the lookup must stay
                // symmetric regardless of which inserts succeeded.
                let _ = m.insert(Edge::new(format!("l{x}"), format!("l{y}"), t));
            }
            let (la, lb) = (loc(&format!("l{a}")), loc(&format!("l{b}")));
            prop_assert_eq!(m.minutes(&la, &lb), m.minutes(&lb, &la));
            if a == b {
                prop_assert_eq!(m.minutes(&la, &lb), 0);
            }
        }
    }
}
