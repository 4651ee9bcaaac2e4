mod cli;
mod command;
pub mod config;
mod context;
mod coordinates;
mod error;
mod exec;
mod forge;
mod manifest;
mod orchestrator;
mod pipeline;
mod registry;
mod renderer;
mod repo;
mod requirement;
mod result;
mod rules;

pub use cli::{Args, Command, PromoteArgs};
pub use command::promote;
pub use error::PromoteError;
pub use result::Result;

#[cfg(test)]
pub mod test_helpers;
