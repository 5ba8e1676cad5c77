use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vaccination/sterilisation day. Owned by the campaign admin side; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_appointments: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

impl PetSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PetSize::Small => "small",
            PetSize::Medium => "medium",
            PetSize::Large => "large",
        }
    }
}

/// Pet and owner data captured by the booking form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantPayload {
    pub pet_name: String,
    pub pet_size: PetSize,
    /// Pounds.
    #[serde(default)]
    pub pet_weight: Option<f64>,
    #[serde(default)]
    pub pet_breed: Option<String>,
    #[serde(default)]
    pub pet_age_years: Option<u32>,
    #[serde(default)]
    pub pet_age_months: Option<u32>,
    #[serde(default)]
    pub pet_allergies: Option<String>,
    #[serde(default)]
    pub medical_complications: Option<String>,
    #[serde(default)]
    pub vaccinations: Option<String>,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_age: u32,
    pub owner_identity_number: String,
}

impl ApplicantPayload {
    pub fn pet_age_in_months(&self) -> Option<u32> {
        match (self.pet_age_years, self.pet_age_months) {
            (None, None) => None,
            (years, months) => Some(
                years
                    .unwrap_or(0)
                    .saturating_mul(12)
                    .saturating_add(months.unwrap_or(0)),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotReservationRequest {
    pub campaign_id: Uuid,
    pub time_slot: NaiveTime,
    pub applicant: ApplicantPayload,
}

/// A request that passed validation and is about to be handed to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub campaign_id: Uuid,
    pub time_slot: NaiveTime,
    pub applicant: ApplicantPayload,
}

impl From<SlotReservationRequest> for NewReservation {
    fn from(request: SlotReservationRequest) -> Self {
        Self {
            campaign_id: request.campaign_id,
            time_slot: request.time_slot,
            applicant: request.applicant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub time_slot: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn committed(new: &NewReservation) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id: new.campaign_id,
            time_slot: new.time_slot,
            created_at: Utc::now(),
        }
    }
}

/// Reply of an atomic insert-if-absent.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Committed(Reservation),
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    SlotAlreadyTaken,
    ValidationFailed(String),
    TransientError,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::SlotAlreadyTaken => {
                write!(f, "this time slot was already booked, please pick another one")
            }
            RejectionReason::ValidationFailed(reason) => write!(f, "{}", reason),
            RejectionReason::TransientError => {
                write!(f, "the appointment could not be booked, please try again")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SlotReservationOutcome {
    Accepted(Reservation),
    Rejected(RejectionReason),
}

impl SlotReservationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SlotReservationOutcome::Accepted(_))
    }

    pub fn rejection(&self) -> Option<&RejectionReason> {
        match self {
            SlotReservationOutcome::Accepted(_) => None,
            SlotReservationOutcome::Rejected(reason) => Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignAvailability {
    pub total_slots: usize,
    pub taken_slots: usize,
    pub remaining: usize,
    pub fully_booked: bool,
}
