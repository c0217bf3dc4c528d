//! Bear Maps CLI library.
//!
//! Rendering helpers shared by the `bearmaps-cli` subcommands.

pub mod output;
