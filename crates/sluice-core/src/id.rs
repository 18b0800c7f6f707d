//! Strongly-typed identifiers for nodes, couriers, and network locations.
//!
//! All three wrap the string identifiers used in the dataset files. They
//! are kept distinct so a courier id can never be passed where a node id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a production node (a bounded reservoir with a fill rate).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The network location this node occupies.
    pub fn location(&self) -> LocationId {
        LocationId(self.0.clone())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for NodeId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// Identifies a courier in the roster.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourierId(pub String);

impl CourierId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourierId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for CourierId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// Any point on the travel graph: a node or the depot.
///
/// Node locations share the node's identifier, so `NodeId("n1")` and
/// `LocationId("n1")` name the same place.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(pub String);

impl LocationId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for LocationId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl From<&NodeId> for LocationId {
    fn from(v: &NodeId) -> Self {
        v.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_location_shares_identifier() {
        let node = NodeId::from("cauldron_001");
        assert_eq!(node.location(), LocationId::from("cauldron_001"));
    }

    #[test]
    fn display_is_raw_identifier() {
        assert_eq!(CourierId::from("courier_01").to_string(), "courier_01");
        assert_eq!(LocationId::from("market_001").as_str(), "market_001");
    }

    #[test]
    fn ids_order_lexicographically() {
        let mut ids = vec![NodeId::from("n10"), NodeId::from("n02"), NodeId::from("n01")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "n01");
        assert_eq!(ids[2].as_str(), "n10");
    }
}
