pub mod billing;
pub mod clock;
pub mod models;
pub mod repository;
pub mod timestamp;
pub mod validation;

pub use billing::BillingCalculator;
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use models::{
    ExitReceipt, OccupancySummary, ParkReceipt, Payment, Session, SessionStatus, Slot,
};
pub use repository::{PaymentJournal, SlotRegistry, VehicleLedger};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ParkingError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Vehicle {0} is already parked")]
    Conflict(String),
    #[error("No available slots")]
    Full,
    #[error("No active parked vehicle with number {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(#[source] BoxError),
}

impl ParkingError {
    pub fn storage(err: impl Into<BoxError>) -> Self {
        Self::Storage(err.into())
    }
}

pub type ParkingResult<T> = Result<T, ParkingError>;
