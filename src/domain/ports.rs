use crate::domain::model::{InsertOutcome, NewReservation};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveTime;
use uuid::Uuid;

/// Persistence collaborator for appointments.
///
/// `insert_reservation_if_absent` must be a single atomic operation keyed by
/// `(campaign_id, time_slot)`: concurrent calls for the same key yield exactly
/// one `Committed` and `Duplicate` for every other caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn insert_reservation_if_absent(&self, reservation: &NewReservation)
        -> Result<InsertOutcome>;

    /// Advisory snapshot of booked slots, for display only.
    async fn taken_slots(&self, campaign_id: Uuid) -> Result<Vec<NaiveTime>>;
}
