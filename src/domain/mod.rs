//! Domain layer: entities, value objects and the ports the workflows depend on.

pub mod account;
pub mod collect;
pub mod mandate;
pub mod ports;
pub mod reference;
pub mod settlement;
pub mod transaction;
pub mod vpa;
