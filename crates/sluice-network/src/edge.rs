//! Undirected network edges.

use sluice_core::LocationId;

/// An undirected connection between two locations.
///
/// Direction is irrelevant: `Edge::new(a, b, 12)` and `Edge::new(b, a, 12)`
/// describe the same connection.
///
/// # Examples
///
/// ```
/// use sluice_network::{Edge, TravelModel};
///
/// let model = TravelModel::from_edges([Edge::new("market_001", "n1", 12)]).unwrap();
/// assert_eq!(model.minutes(&"n1".into(), &"market_001".into()), 12);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    /// One endpoint.
    pub from: LocationId,
    /// The other endpoint.
    pub to: LocationId,
    /// Travel time in whole minutes.
    pub minutes: u32,
}

impl Edge {
    /// Build an edge from anything convertible to a [`LocationId`].
    pub fn new(from: impl Into<LocationId>, to: impl Into<LocationId>, minutes: u32) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            minutes,
        }
    }

    /// Endpoint pair in canonical (sorted) order.
    pub(crate) fn key(&self) -> (LocationId, LocationId) {
        canonical(&self.from, &self.to)
    }
}

/// Order a location pair so `(a, b)` and `(b, a)` map to the same key.
pub(crate) fn canonical(a: &LocationId, b: &LocationId) -> (LocationId, LocationId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}
