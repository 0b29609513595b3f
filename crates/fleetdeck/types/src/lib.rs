//! Core types shared across the Fleetdeck workspace.
//!
//! Defines the registry data model (instance records and their typed
//! identifiers) and the power-state vocabulary used by the provider client
//! and the reconciliation engine.

pub mod ids;
pub mod power;
pub mod record;

pub use ids::{InstanceId, RemoteInstanceId};
pub use power::{ObservedState, PowerTarget};
pub use record::InstanceRecord;
