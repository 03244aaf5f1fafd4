//! CLI subcommands

pub mod explain;
pub mod validate;
