//! Transport tickets: the paperwork each extraction leaves behind.

use rand::Rng;
use sluice_core::{CourierId, NodeId, TimeWindow};

use crate::config::TicketConfig;
use crate::node::sample;

/// One ticketed extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    /// `<prefix>_<YYYYMMDD>_<counter>`.
    pub id: String,
    /// Node drained.
    pub node: NodeId,
    /// Courier who carried the liquid away.
    pub courier: CourierId,
    /// When the courier was at the node.
    pub collection: TimeWindow,
    /// Amount written on the ticket.
    pub reported_amount: f64,
    /// Gross amount actually carried. Equal to `reported_amount` unless
    /// the ticket is suspicious.
    pub true_amount: f64,
    /// Whether the ticket under-reports.
    pub suspicious: bool,
}

impl Ticket {
    /// Liters missing from the paperwork.
    pub fn shortfall(&self) -> f64 {
        self.true_amount - self.reported_amount
    }
}

/// Issues tickets with sequential ids and occasional under-reporting.
#[derive(Clone, Debug)]
pub struct TicketEmitter {
    config: TicketConfig,
    issued: u64,
}

impl TicketEmitter {
    /// Start numbering at 1.
    pub fn new(config: &TicketConfig) -> Self {
        Self::continuing(config, 0)
    }

    /// Continue numbering after `already_issued` prior tickets.
    pub fn continuing(config: &TicketConfig, already_issued: u64) -> Self {
        Self {
            config: config.clone(),
            issued: already_issued,
        }
    }

    /// Issue a ticket for a gross extraction of `gross` liters.
    pub fn emit<R: Rng + ?Sized>(
        &mut self,
        node: NodeId,
        courier: CourierId,
        collection: TimeWindow,
        gross: f64,
        rng: &mut R,
    ) -> Ticket {
        self.issued += 1;
        let id = format!(
            "{}_{}_{:03}",
            self.config.id_prefix,
            collection.start().date_stamp(),
            self.issued
        );
        let suspicious = rng.random_bool(self.config.suspicious_probability);
        let reported_amount = if suspicious {
            gross * sample(rng, self.config.underreport_range)
        } else {
            gross
        };
        Ticket {
            id,
            node,
            courier,
            collection,
            reported_amount,
            true_amount: gross,
            suspicious,
        }
    }

    /// Tickets issued so far, including any carried over from a prior run.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}
