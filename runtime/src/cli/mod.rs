//! CLI subcommand implementations for the toploader binary.

pub mod output;
pub mod settings_cmd;
pub mod simulate;
