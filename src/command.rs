//! Command execution and orchestration for promotions.
//!
//! Each subcommand gets one module that wires CLI arguments, tool
//! configuration and collaborators into the promotion engine, executes the
//! workflow and reports the outcome.

/// Promote an application version into an environment repository.
///
/// Implements the `promote` command: resolves chart coordinates, discovers
/// the environment's promotion rule, mutates the cloned configuration
/// through that rule and resolves the promotion pull request.
pub mod promote;
