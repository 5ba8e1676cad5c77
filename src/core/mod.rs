pub mod coordinator;
pub mod identity;
pub mod slot_grid;

pub use crate::domain::model::{
    ApplicantPayload, Campaign, CampaignAvailability, InsertOutcome, NewReservation, PetSize,
    RejectionReason, Reservation, SlotReservationOutcome, SlotReservationRequest,
};
pub use crate::domain::ports::ReservationStore;
pub use crate::utils::error::Result;
