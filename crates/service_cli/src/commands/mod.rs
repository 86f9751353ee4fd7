//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod iv;
pub mod price;
pub mod run;
pub mod simulate;
