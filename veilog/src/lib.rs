// veilog/src/lib.rs
//! # Veilog CLI
//!
//! This crate provides the command-line front end for the veilog redaction
//! engine: a line-buffered stdin-to-stdout redaction pipe, a recovery
//! command for key holders, and a settings validator.

pub mod cli;
pub mod commands;
pub mod logger;
