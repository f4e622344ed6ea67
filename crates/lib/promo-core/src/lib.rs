//! Core domain logic for the Promo Studio MCP server.
//!
//! This crate owns the selective-enablement gate, workspace path
//! resolution, subprocess and ffmpeg helpers, and the local filesystem
//! operations behind the scaffold, artifact, and asset tools.

pub mod artifacts;
pub mod assets;
pub mod command;
pub mod companion;
pub mod error;
pub mod gate;
pub mod media;
pub mod scaffold;
pub mod workspace;
