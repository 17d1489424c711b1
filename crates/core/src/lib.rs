//! Domain types shared by the phase orchestrator and the CLI.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{CoreError, Result};
