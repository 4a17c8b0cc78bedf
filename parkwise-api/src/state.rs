use std::sync::Arc;
use parkwise_core::repository::{PaymentJournal, SlotRegistry, VehicleLedger};
use parkwise_core::{BillingCalculator, Clock, ParkingResult};
use parkwise_store::{DbClient, SqlitePaymentJournal, SqliteSlotRegistry, SqliteVehicleLedger};

#[derive(Clone)]
pub struct AppState {
    pub slots: Arc<dyn SlotRegistry>,
    pub ledger: Arc<dyn VehicleLedger>,
    pub journal: Arc<dyn PaymentJournal>,
    pub recent_limit: u32,
}

impl AppState {
    /// Wires the SQLite-backed services over one shared pool.
    pub fn from_db(
        db: &DbClient,
        rate_per_minute: f64,
        recent_limit: u32,
        clock: Arc<dyn Clock>,
    ) -> ParkingResult<Self> {
        let billing = BillingCalculator::new(rate_per_minute)?;

        Ok(Self {
            slots: Arc::new(SqliteSlotRegistry::new(db.pool.clone())),
            ledger: Arc::new(SqliteVehicleLedger::new(db.pool.clone(), billing, clock)),
            journal: Arc::new(SqlitePaymentJournal::new(db.pool.clone())),
            recent_limit,
        })
    }
}
