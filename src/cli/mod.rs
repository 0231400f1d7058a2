//! CLI module for the Tomato Clock.
//!
//! This module provides the command-line interface:
//! - `commands`: argument definitions using clap derive
//! - `display`: terminal and JSON presentation front-ends

pub mod commands;
pub mod display;

pub use commands::Cli;
pub use display::{attach_json, format_time, progress_bar, TerminalUi};
