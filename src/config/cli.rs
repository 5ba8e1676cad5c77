use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "campaign-intake")]
#[command(about = "Appointment intake for veterinary campaigns: identity checks and slot booking")]
pub struct CliConfig {
    #[arg(long, global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override storage.database_path")]
    pub database: Option<String>,

    #[arg(long, global = true, help = "Override booking.slot_interval_minutes")]
    pub slot_interval: Option<i64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check a 13-digit identity number
    ValidateId {
        /// Number to check; spaces and dashes are ignored
        number: String,
    },
    /// List the slot grid and which slots are still free
    Slots {
        #[arg(long, help = "Campaign JSON file")]
        campaign: PathBuf,
    },
    /// Book a slot for an applicant
    Reserve {
        #[arg(long, help = "Campaign JSON file")]
        campaign: PathBuf,

        #[arg(long, help = "Reservation request JSON file")]
        request: PathBuf,
    },
}
