use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal project-management dashboard.
/// Task state lives in memory for the session; an optional JSON file seeds
/// the collection at startup.
#[derive(Parser)]
#[command(name = "oasis", version, about = "Project-management dashboard for the terminal")]
pub struct Cli {
    /// Path to a JSON task collection to load at startup.
    #[arg(long, global = true)]
    pub tasks: Option<PathBuf>,

    /// Override the persisted theme preference for this session.
    #[arg(long, global = true, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Display name used as the "My Tasks" identity.
    #[arg(long, global = true)]
    pub me: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Theme choice on the command line.
#[derive(Clone, Copy, clap::ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}
