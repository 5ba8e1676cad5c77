use anyhow::Context;
use campaign_intake::config::{CliConfig, Command};
use campaign_intake::utils::error::ErrorSeverity;
use campaign_intake::utils::{logger, validation::Validate};
use campaign_intake::{
    validate_identity_number, Campaign, IntakeConfig, IntakeError, SlotReservationCoordinator,
    SlotReservationOutcome, SlotReservationRequest, SqliteReservationStore,
};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => IntakeConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => IntakeConfig::default(),
    };
    if let Some(database) = &cli.database {
        config.storage.database_path = database.clone();
    }
    if let Some(minutes) = cli.slot_interval {
        config.booking.slot_interval_minutes = minutes;
    }

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Effective config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    match cli.command {
        Command::ValidateId { number } => {
            let result = validate_identity_number(&number);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.valid {
                std::process::exit(1);
            }
        }
        Command::Slots { campaign } => {
            let campaign: Campaign = read_json(&campaign)?;
            let coordinator = open_coordinator(&config)?;
            match coordinator.available_slots(&campaign).await {
                Ok(available) => {
                    let availability = coordinator.summarize(&campaign, &available);
                    let report = serde_json::json!({
                        "campaign_id": campaign.id,
                        "grid": coordinator.slot_grid(&campaign).slots(),
                        "available": available,
                        "availability": availability,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Err(e) => fail(e),
            }
        }
        Command::Reserve { campaign, request } => {
            let campaign: Campaign = read_json(&campaign)?;
            let request: SlotReservationRequest = read_json(&request)?;
            let coordinator = open_coordinator(&config)?;

            let outcome = coordinator.reserve_slot(&campaign, request).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let SlotReservationOutcome::Rejected(reason) = outcome {
                eprintln!("❌ {}", reason);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn open_coordinator(
    config: &IntakeConfig,
) -> anyhow::Result<SlotReservationCoordinator<SqliteReservationStore>> {
    let store = SqliteReservationStore::open(config.database_path())
        .with_context(|| format!("opening {}", config.database_path()))?;
    Ok(SlotReservationCoordinator::new(store, config.slot_interval()))
}

fn fail(e: IntakeError) -> ! {
    tracing::error!(
        "Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e))
}

// 根據錯誤嚴重程度決定退出碼
fn exit_code(e: &IntakeError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
