//! ncobase server
//!
//! Wires configuration, storage, caching, services and the REST API into one
//! process, and runs the periodic billing sweep alongside it.

pub mod startup;
pub mod sweep;

pub use startup::{backend_options, Server};
pub use sweep::spawn_overdue_sweep;
