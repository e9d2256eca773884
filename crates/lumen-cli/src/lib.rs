//! Lumen CLI - terminal front end for the air-gapped hash signer
//!
//! Provides the pieces the `lumen` binary wires together: the configuration
//! file, a line-based terminal [`Frontend`](lumen_flow::Frontend) and QR
//! frame output for signatures.

pub mod config;
pub mod qr;
pub mod terminal;

pub use config::{CliConfig, ConfigError};
pub use terminal::TerminalFrontend;
