pub mod app_config;
pub mod database;
pub mod payment_journal;
pub mod slot_registry;
pub mod vehicle_ledger;

pub use database::DbClient;
pub use payment_journal::SqlitePaymentJournal;
pub use slot_registry::SqliteSlotRegistry;
pub use vehicle_ledger::SqliteVehicleLedger;
