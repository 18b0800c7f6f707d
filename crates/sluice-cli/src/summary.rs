//! Human-readable dataset totals.

use std::fmt;

use indexmap::IndexMap;
use sluice_core::NodeId;
use sluice_dataset::Dataset;

/// Per-node tallies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeTally {
    pub collections: usize,
    pub reported: f64,
    pub unreported_drains: usize,
}

/// Totals an auditor looks at first.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub start: String,
    pub end: String,
    pub minutes: usize,
    pub tickets: usize,
    pub suspicious: usize,
    /// Liters carried but missing from the paperwork.
    pub shortfall: f64,
    pub unreported_drains: usize,
    pub unreported_liters: f64,
    pub nodes: IndexMap<NodeId, NodeTally>,
}

impl Summary {
    pub fn of(ds: &Dataset) -> Self {
        let mut nodes: IndexMap<NodeId, NodeTally> = ds
            .history
            .metadata
            .fill_rates_l_per_min
            .keys()
            .map(|id| (id.clone(), NodeTally::default()))
            .collect();
        let mut shortfall = 0.0;
        for t in &ds.tickets.transport_tickets {
            let tally = nodes.entry(t.node_id.clone()).or_default();
            tally.collections += 1;
            tally.reported += t.amount_collected;
            if let Some(actual) = t.actual_amount_collected {
                shortfall += actual - t.amount_collected;
            }
        }
        let mut unreported_liters = 0.0;
        for d in &ds.drains.unreported_drains {
            nodes.entry(d.node_id.clone()).or_default().unreported_drains += 1;
            unreported_liters += d.estimated_amount_drained_liters;
        }
        Self {
            start: ds.history.metadata.start_date.clone(),
            end: ds.history.metadata.end_date.clone(),
            minutes: ds.history.data.len(),
            tickets: ds.tickets.metadata.total_tickets,
            suspicious: ds.tickets.metadata.suspicious_tickets,
            shortfall,
            unreported_drains: ds.drains.metadata.total_unreported_drains,
            unreported_liters,
            nodes,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Period:            {} .. {}", self.start, self.end)?;
        writeln!(f, "Minutes:           {}", self.minutes)?;
        writeln!(
            f,
            "Transport tickets: {} ({} under-reported, {:.2} L missing)",
            self.tickets, self.suspicious, self.shortfall
        )?;
        writeln!(
            f,
            "Unreported drains: {} ({:.2} L)",
            self.unreported_drains, self.unreported_liters
        )?;
        writeln!(f)?;
        writeln!(f, "{:<16} {:>11} {:>12} {:>10}", "node", "collections", "reported L", "unreported")?;
        for (id, t) in &self.nodes {
            writeln!(
                f,
                "{:<16} {:>11} {:>12.2} {:>10}",
                id.as_str(),
                t.collections,
                t.reported,
                t.unreported_drains
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_dataset::{DrainFile, DrainRecord, HistoryFile, HistoryMetadata, TicketFile, TicketRecord};
    use sluice_engine::{FillNoise, NodeSpec};
    use sluice_test_utils::{ticket, EPOCH};

    #[test]
    fn tallies_follow_the_records() {
        let honest = ticket("TT_20241030_001", "cauldron_001", "courier_001", EPOCH, 30, 60.0);
        let mut shady = ticket("TT_20241030_002", "cauldron_001", "courier_001", EPOCH + 90, 30, 50.0);
        shady.suspicious = true;
        shady.true_amount = 65.5;
        let drain = DrainRecord {
            node_id: "cauldron_002".into(),
            drain_start_timestamp: "2024-10-30T05:00:00Z".into(),
            drain_end_timestamp: "2024-10-30T05:40:00Z".into(),
            estimated_amount_drained_liters: 22.25,
            duration_minutes: 40,
            note: String::new(),
        };
        let nodes = [
            NodeSpec::new("cauldron_001", 1000.0, 0.1),
            NodeSpec::new("cauldron_002", 1000.0, 0.1),
        ];
        let ds = Dataset {
            history: HistoryFile {
                metadata: HistoryMetadata::for_nodes(&nodes, &FillNoise::none()),
                data: Vec::new(),
            },
            tickets: TicketFile::new(vec![
                TicketRecord::from_ticket(&honest),
                TicketRecord::from_ticket(&shady),
            ]),
            drains: DrainFile::new(vec![drain]),
        };

        let s = Summary::of(&ds);
        assert_eq!(s.tickets, 2);
        assert_eq!(s.suspicious, 1);
        assert!((s.shortfall - 15.5).abs() < 1e-9);
        assert_eq!(s.unreported_drains, 1);
        assert_eq!(s.nodes[&NodeId::from("cauldron_001")].collections, 2);
        assert!((s.nodes[&NodeId::from("cauldron_001")].reported - 110.0).abs() < 1e-9);
        assert_eq!(s.nodes[&NodeId::from("cauldron_002")].unreported_drains, 1);

        let text = s.to_string();
        assert!(text.contains("2 (1 under-reported, 15.50 L missing)"), "{text}");
        assert!(text.contains("cauldron_002"));
    }
}
