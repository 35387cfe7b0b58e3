//! UPI payment-address layer: VPA registry, pay ledger, collect requests and
//! mandates behind pluggable storage and settlement ports.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
