//! Scripts for deploying the demo contracts and reporting where they were deployed.

#![deny(missing_docs)]

pub mod artifacts;
pub mod cli;
mod commands;
pub mod constants;
pub mod context;
pub mod deployer;
pub mod errors;
pub mod factory;
pub mod reporter;
pub mod sequencer;
pub mod types;
pub mod waiter;
