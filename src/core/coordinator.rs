use crate::core::identity::IdentityNumber;
use crate::core::slot_grid::SlotGrid;
use crate::core::{
    Campaign, CampaignAvailability, InsertOutcome, NewReservation, RejectionReason,
    ReservationStore, Result, SlotReservationOutcome, SlotReservationRequest,
};
use crate::utils::validation::Validate;
use chrono::{NaiveTime, TimeDelta};
use std::collections::HashSet;

/// Decides whether a booking request may claim `(campaign_id, time_slot)`.
///
/// Holds no mutable state. Every request is validated locally, then settled by
/// a single `insert_reservation_if_absent` call whose duplicate signal is the
/// authoritative answer to a race. Nothing is retried here.
pub struct SlotReservationCoordinator<S: ReservationStore> {
    store: S,
    slot_interval: TimeDelta,
}

impl<S: ReservationStore> SlotReservationCoordinator<S> {
    pub fn new(store: S, slot_interval: TimeDelta) -> Self {
        Self {
            store,
            slot_interval,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn slot_grid(&self, campaign: &Campaign) -> SlotGrid {
        SlotGrid::for_campaign(campaign, self.slot_interval)
    }

    pub async fn reserve_slot(
        &self,
        campaign: &Campaign,
        request: SlotReservationRequest,
    ) -> SlotReservationOutcome {
        if let Err(reason) = self.check_request(campaign, &request) {
            return SlotReservationOutcome::Rejected(RejectionReason::ValidationFailed(reason));
        }

        let reservation = NewReservation::from(request);
        match self.store.insert_reservation_if_absent(&reservation).await {
            Ok(InsertOutcome::Committed(reservation)) => {
                tracing::info!(
                    campaign_id = %reservation.campaign_id,
                    time_slot = %reservation.time_slot,
                    reservation_id = %reservation.id,
                    "Appointment booked"
                );
                SlotReservationOutcome::Accepted(reservation)
            }
            Ok(InsertOutcome::Duplicate) => {
                tracing::info!(
                    campaign_id = %reservation.campaign_id,
                    time_slot = %reservation.time_slot,
                    "Slot already taken"
                );
                SlotReservationOutcome::Rejected(RejectionReason::SlotAlreadyTaken)
            }
            Err(e) => {
                tracing::error!(
                    campaign_id = %reservation.campaign_id,
                    time_slot = %reservation.time_slot,
                    category = ?e.category(),
                    "Reservation store failed: {}",
                    e
                );
                SlotReservationOutcome::Rejected(RejectionReason::TransientError)
            }
        }
    }

    /// Everything that can be decided without touching the store.
    fn check_request(
        &self,
        campaign: &Campaign,
        request: &SlotReservationRequest,
    ) -> std::result::Result<(), String> {
        if request.campaign_id != campaign.id {
            tracing::warn!(
                requested = %request.campaign_id,
                campaign_id = %campaign.id,
                "Reservation request does not belong to the campaign"
            );
            return Err("request does not belong to this campaign".to_string());
        }

        if !self.slot_grid(campaign).contains(request.time_slot) {
            tracing::warn!(
                campaign_id = %campaign.id,
                time_slot = %request.time_slot,
                "Requested time is not on the campaign slot grid"
            );
            return Err(format!(
                "{} is not a bookable time for this campaign",
                request.time_slot.format("%H:%M")
            ));
        }

        if let Err(e) = request.applicant.validate() {
            tracing::debug!(campaign_id = %campaign.id, "Applicant rejected: {}", e);
            return Err(e.user_friendly_message());
        }

        if let Err(rejection) = IdentityNumber::parse(&request.applicant.owner_identity_number) {
            tracing::debug!(campaign_id = %campaign.id, "Identity number rejected: {}", rejection);
            return Err(format!("invalid identity number: {}", rejection));
        }

        Ok(())
    }

    /// Grid slots not booked yet. Advisory: a listed slot can still be lost
    /// to a concurrent booking.
    pub async fn available_slots(&self, campaign: &Campaign) -> Result<Vec<NaiveTime>> {
        let taken: HashSet<NaiveTime> = self
            .store
            .taken_slots(campaign.id)
            .await?
            .into_iter()
            .collect();

        Ok(self
            .slot_grid(campaign)
            .slots()
            .iter()
            .copied()
            .filter(|slot| !taken.contains(slot))
            .collect())
    }

    pub async fn availability(&self, campaign: &Campaign) -> Result<CampaignAvailability> {
        let available = self.available_slots(campaign).await?;
        Ok(self.summarize(campaign, &available))
    }

    /// Counts from an `available_slots` snapshot, so both stay consistent.
    pub fn summarize(&self, campaign: &Campaign, available: &[NaiveTime]) -> CampaignAvailability {
        let total_slots = self.slot_grid(campaign).len();
        let remaining = available.len().min(total_slots);

        CampaignAvailability {
            total_slots,
            taken_slots: total_slots - remaining,
            remaining,
            fully_booked: remaining == 0,
        }
    }
}
