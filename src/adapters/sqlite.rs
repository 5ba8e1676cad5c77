use crate::domain::model::{InsertOutcome, NewReservation, Reservation};
use crate::domain::ports::ReservationStore;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveTime;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, types::Type};
use std::path::Path;
use uuid::Uuid;

pub type ConnectionPool = Pool<SqliteConnectionManager>;

const TIME_SLOT_FORMAT: &str = "%H:%M:%S";

// The UNIQUE pair is what settles concurrent bookings for one slot.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY,
    campaign_id TEXT NOT NULL,
    time_slot TEXT NOT NULL,
    pet_name TEXT NOT NULL,
    pet_size TEXT NOT NULL,
    pet_weight REAL,
    pet_breed TEXT,
    pet_age INTEGER,
    pet_allergies TEXT,
    medical_complications TEXT,
    vaccinations TEXT,
    owner_first_name TEXT NOT NULL,
    owner_last_name TEXT NOT NULL,
    owner_age INTEGER NOT NULL,
    owner_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (campaign_id, time_slot)
);
CREATE INDEX IF NOT EXISTS idx_appointments_campaign ON appointments(campaign_id);
";

/// SQLite-backed appointments table.
///
/// Pool configuration:
/// - WAL journal so readers do not block the single writer
/// - busy timeout so concurrent writers queue instead of failing fast
#[derive(Clone)]
pub struct SqliteReservationStore {
    pool: ConnectionPool,
}

impl SqliteReservationStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path.as_ref()).with_init(|conn| {
            conn.execute_batch(
                "PRAGMA busy_timeout = 5000;
                 PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;",
            )
        });
        let pool = Pool::builder().max_size(8).build(manager)?;
        Self::with_pool(pool)
    }

    /// One shared connection, since every `:memory:` connection is its own database.
    pub fn in_memory() -> Result<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;
        Self::with_pool(pool)
    }

    fn with_pool(pool: ConnectionPool) -> Result<Self> {
        pool.get()?.execute_batch(SCHEMA)?;
        tracing::debug!("Appointments schema ready");
        Ok(Self { pool })
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&ConnectionPool) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || f(&pool)).await?
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn insert(pool: &ConnectionPool, new: &NewReservation) -> Result<InsertOutcome> {
    let conn = pool.get()?;
    let reservation = Reservation::committed(new);
    let applicant = &new.applicant;

    let inserted = conn.execute(
        "INSERT INTO appointments (
            id, campaign_id, time_slot, pet_name, pet_size, pet_weight, pet_breed,
            pet_age, pet_allergies, medical_complications, vaccinations,
            owner_first_name, owner_last_name, owner_age, owner_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            reservation.id.to_string(),
            reservation.campaign_id.to_string(),
            reservation.time_slot.format(TIME_SLOT_FORMAT).to_string(),
            applicant.pet_name,
            applicant.pet_size.as_str(),
            applicant.pet_weight,
            applicant.pet_breed,
            applicant.pet_age_in_months(),
            applicant.pet_allergies,
            applicant.medical_complications,
            applicant.vaccinations,
            applicant.owner_first_name,
            applicant.owner_last_name,
            applicant.owner_age,
            applicant.owner_identity_number,
            reservation.created_at.to_rfc3339(),
        ],
    );

    match inserted {
        Ok(_) => Ok(InsertOutcome::Committed(reservation)),
        Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
        Err(e) => Err(e.into()),
    }
}

fn taken(pool: &ConnectionPool, campaign_id: Uuid) -> Result<Vec<NaiveTime>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(
        "SELECT time_slot FROM appointments WHERE campaign_id = ?1 ORDER BY time_slot",
    )?;
    let rows = stmt.query_map(params![campaign_id.to_string()], |row| {
        let raw: String = row.get(0)?;
        NaiveTime::parse_from_str(&raw, TIME_SLOT_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
    })?;

    let slots = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(slots)
}

#[async_trait]
impl ReservationStore for SqliteReservationStore {
    async fn insert_reservation_if_absent(
        &self,
        reservation: &NewReservation,
    ) -> Result<InsertOutcome> {
        let reservation = reservation.clone();
        self.blocking(move |pool| insert(pool, &reservation)).await
    }

    async fn taken_slots(&self, campaign_id: Uuid) -> Result<Vec<NaiveTime>> {
        self.blocking(move |pool| taken(pool, campaign_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ApplicantPayload, PetSize};

    fn new_reservation(campaign_id: Uuid, h: u32, m: u32) -> NewReservation {
        NewReservation {
            campaign_id,
            time_slot: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
            applicant: ApplicantPayload {
                pet_name: "Toby".to_string(),
                pet_size: PetSize::Large,
                pet_weight: Some(40.0),
                pet_breed: Some("Labrador Retriever".to_string()),
                pet_age_years: Some(4),
                pet_age_months: Some(6),
                pet_allergies: None,
                medical_complications: None,
                vaccinations: None,
                owner_first_name: "Sofía".to_string(),
                owner_last_name: "Castillo".to_string(),
                owner_age: 52,
                owner_identity_number: "1234567890101".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_second_insert_for_same_slot_is_duplicate() {
        let store = SqliteReservationStore::in_memory().unwrap();
        let campaign_id = Uuid::new_v4();

        let first = store
            .insert_reservation_if_absent(&new_reservation(campaign_id, 8, 0))
            .await
            .unwrap();
        assert!(matches!(first, InsertOutcome::Committed(_)));

        let second = store
            .insert_reservation_if_absent(&new_reservation(campaign_id, 8, 0))
            .await
            .unwrap();
        assert_eq!(second, InsertOutcome::Duplicate);
    }

    #[tokio::test]
    async fn test_same_time_in_other_campaign_is_independent() {
        let store = SqliteReservationStore::in_memory().unwrap();

        for _ in 0..2 {
            let outcome = store
                .insert_reservation_if_absent(&new_reservation(Uuid::new_v4(), 9, 30))
                .await
                .unwrap();
            assert!(matches!(outcome, InsertOutcome::Committed(_)));
        }
    }

    #[tokio::test]
    async fn test_taken_slots_are_sorted_per_campaign() {
        let store = SqliteReservationStore::in_memory().unwrap();
        let campaign_id = Uuid::new_v4();
        for (h, m) in [(10, 0), (8, 30), (9, 0)] {
            store
                .insert_reservation_if_absent(&new_reservation(campaign_id, h, m))
                .await
                .unwrap();
        }
        store
            .insert_reservation_if_absent(&new_reservation(Uuid::new_v4(), 11, 0))
            .await
            .unwrap();

        let slots = store.taken_slots(campaign_id).await.unwrap();
        assert_eq!(
            slots,
            vec![
                NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            ]
        );
    }
}
