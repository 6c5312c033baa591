#![no_std]

mod config;
mod errors;
pub mod events;
mod executor;
mod multisig;
mod registry;
mod store;
mod types;

pub use config::MAX_ACTIONS;
pub use errors::MultisigError;
pub use executor::{ActionExecutor, HostExecutor};
pub use multisig::*;
pub use types::*;
