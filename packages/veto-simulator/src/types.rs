//! Shared types for the simulator.

use clap::ValueEnum;
use veto_backend::domain::RoundFormat;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Bo1,
    Bo3,
    Bo5,
}

impl From<FormatArg> for RoundFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bo1 => RoundFormat::Bo1,
            FormatArg::Bo3 => RoundFormat::Bo3,
            FormatArg::Bo5 => RoundFormat::Bo5,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per veto
    Jsonl,
    /// A single JSON array written on finish
    Json,
}
