//! Idempotent bootstrap of roles, permissions, the default tenant, accounts,
//! menus, access policies and the organization tree

pub mod context;
pub mod defaults;
pub mod error;
pub mod initializer;
pub mod steps;

pub use context::SeedContext;
pub use error::{StepError, SystemError, SystemResult};
pub use initializer::{Initializer, INITIALIZED_KEY};
pub use steps::{default_steps, SeedStep};
