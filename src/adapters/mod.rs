// Adapters layer: concrete reservation stores behind `ReservationStore`.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryReservationStore;
pub use sqlite::SqliteReservationStore;
