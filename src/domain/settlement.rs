//! Settlement decision port.
//!
//! The ledger never decides on its own whether money moved. It asks a
//! [`SettlementSwitch`] and records whatever comes back. Until a real payment
//! switch is wired in, [`AutoApproveSwitch`] approves everything.

use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// What the switch is asked to settle.
#[derive(Debug, Clone, PartialEq)]
pub struct SettlementInstruction {
    pub txn_id: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementDecision {
    Approved,
    Declined { reason: String },
    Failed { reason: String },
}

#[async_trait]
pub trait SettlementSwitch: Send + Sync {
    async fn settle(&self, instruction: &SettlementInstruction) -> Result<SettlementDecision>;
}

pub type SettlementSwitchBox = Box<dyn SettlementSwitch>;

/// Approves every instruction.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApproveSwitch;

#[async_trait]
impl SettlementSwitch for AutoApproveSwitch {
    async fn settle(&self, _instruction: &SettlementInstruction) -> Result<SettlementDecision> {
        Ok(SettlementDecision::Approved)
    }
}
