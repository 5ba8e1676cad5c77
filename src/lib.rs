pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::IntakeConfig;

pub use crate::adapters::{MemoryReservationStore, SqliteReservationStore};
pub use crate::core::coordinator::SlotReservationCoordinator;
pub use crate::core::identity::{validate_identity_number, IdentityNumber, IdentityValidation};
pub use crate::core::slot_grid::SlotGrid;
pub use crate::domain::model::{
    ApplicantPayload, Campaign, CampaignAvailability, PetSize, RejectionReason, Reservation,
    SlotReservationOutcome, SlotReservationRequest,
};
pub use crate::domain::ports::ReservationStore;
pub use crate::utils::error::{IntakeError, Result};
