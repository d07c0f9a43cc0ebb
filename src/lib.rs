//! TouchMCU - TouchOSC Layout Builder for Mackie Control
//!
//! Builds a TouchOSC document that drives a DAW over the Mackie Control
//! Universal protocol.
//!
//! # Architecture
//!
//! - `layout`: the document tree, frames, properties, pager and pages
//! - `factories`: builders for each control cluster
//! - `compose`: places clusters on pages according to a fixed plan
//! - `overlay` / `scripts`: per-project labels and colours, root scripts
//! - `format` / `storage`: lexml encoding and atomic writes

pub mod cli;
pub mod compose;
pub mod error;
pub mod factories;
pub mod format;
pub mod layout;
pub mod mcu;
pub mod overlay;
pub mod scripts;
pub mod storage;

pub use error::{Result, TouchMcuError};
