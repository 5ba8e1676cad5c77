use crate::domain::model::{InsertOutcome, NewReservation, Reservation};
use crate::domain::ports::ReservationStore;
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use chrono::NaiveTime;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Process-local store. The check and the insert happen under one lock, so
/// it offers the same guarantee as a unique index.
#[derive(Debug, Default)]
pub struct MemoryReservationStore {
    reservations: Mutex<HashMap<(Uuid, NaiveTime), Reservation>>,
}

impl MemoryReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed reservations. Reads through a poisoned lock: every insert
    /// completes inside its critical section, so the map is never half-written.
    pub fn len(&self) -> usize {
        self.reservations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> IntakeError {
    IntakeError::StoreUnavailable {
        message: "in-memory reservation lock poisoned".to_string(),
    }
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn insert_reservation_if_absent(
        &self,
        reservation: &NewReservation,
    ) -> Result<InsertOutcome> {
        let mut reservations = self.reservations.lock().map_err(|_| poisoned())?;
        match reservations.entry((reservation.campaign_id, reservation.time_slot)) {
            Entry::Occupied(_) => Ok(InsertOutcome::Duplicate),
            Entry::Vacant(slot) => {
                let committed = Reservation::committed(reservation);
                slot.insert(committed.clone());
                Ok(InsertOutcome::Committed(committed))
            }
        }
    }

    async fn taken_slots(&self, campaign_id: Uuid) -> Result<Vec<NaiveTime>> {
        let reservations = self.reservations.lock().map_err(|_| poisoned())?;
        let mut slots: Vec<NaiveTime> = reservations
            .keys()
            .filter(|(campaign, _)| *campaign == campaign_id)
            .map(|(_, slot)| *slot)
            .collect();
        slots.sort();
        Ok(slots)
    }
}
