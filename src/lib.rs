//! move-gtasks - move incomplete, due-dated Google Tasks from one day to another
//!
//! This library provides:
//! - Delegated authorization with a cached credential and a local callback listener
//! - Resolution of `--to` / `--from` date expressions
//! - The migration engine that rewrites due dates in the "My Tasks" list
//! - The command-line surface
//!
//! # Example
//!
//! ```no_run
//! use move_gtasks::cli::run;
//!
//! fn main() {
//!     if let Err(e) = run() {
//!         eprintln!("Error: {}", e);
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod tasks;
pub mod utils;

pub use error::MoverError;

#[cfg(test)]
pub(crate) mod test_support;
