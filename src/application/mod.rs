//! Application layer containing the UPI workflow orchestration.
//!
//! `UpiService` is the single entry point. Its operations are grouped by
//! workflow: the VPA registry, the pay ledger, collect requests and mandates.
//! Each operation talks to storage only through the ports in `domain::ports`.

pub mod collect;
pub mod ledger;
pub mod mandate;
pub mod registry;
pub mod service;

pub use mandate::MandateTerms;
pub use service::UpiService;
