//! Command Line Interface (CLI) layer for OCMAP.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that merges a JSON config with
//! command-line overrides and calls into `ocmap::api`.
//!
//! If you are embedding OCMAP into another application, prefer using
//! the high-level `ocmap::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
