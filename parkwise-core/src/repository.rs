use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::models::{ExitReceipt, ParkReceipt, Payment, Session, Slot};
use crate::ParkingResult;

/// Parking spaces and their occupancy flag.
#[async_trait]
pub trait SlotRegistry: Send + Sync {
    /// Ensures `Slot-1..=Slot-total` exist and returns the resulting slot count.
    async fn provision_slots(&self, total: i64) -> ParkingResult<i64>;

    /// First unoccupied slot by id, if any.
    async fn find_free_slot(&self) -> ParkingResult<Option<Slot>>;

    async fn mark_occupied(&self, slot_id: i64) -> ParkingResult<()>;

    async fn mark_free(&self, slot_id: i64) -> ParkingResult<()>;

    /// All slots, ordered by the number in their label.
    async fn list_slots(&self) -> ParkingResult<Vec<Slot>>;

    /// `(total, available)` slot counts.
    async fn counts(&self) -> ParkingResult<(i64, i64)>;
}

/// Parking sessions from entry to exit.
#[async_trait]
pub trait VehicleLedger: Send + Sync {
    async fn park_vehicle(
        &self,
        owner_name: Option<&str>,
        vehicle_number: &str,
    ) -> ParkingResult<ParkReceipt>;

    async fn exit_vehicle(&self, vehicle_number: &str) -> ParkingResult<ExitReceipt>;

    /// Sessions without an exit time, newest entry first.
    async fn list_active(&self) -> ParkingResult<Vec<Session>>;

    /// Latest sessions of any status, newest first.
    async fn list_recent(&self, limit: u32) -> ParkingResult<Vec<Session>>;

    async fn count_active(&self) -> ParkingResult<i64>;
}

/// Append-only record of completed payments.
#[async_trait]
pub trait PaymentJournal: Send + Sync {
    async fn record(
        &self,
        session_id: i64,
        amount: f64,
        paid_at: NaiveDateTime,
    ) -> ParkingResult<i64>;

    async fn total_revenue(&self) -> ParkingResult<f64>;

    /// Payments joined with their vehicle number, latest first.
    async fn list_all(&self) -> ParkingResult<Vec<Payment>>;
}
