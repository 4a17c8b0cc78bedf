use async_trait::async_trait;
use parkwise_core::models::{ExitReceipt, ParkReceipt, Session};
use parkwise_core::repository::VehicleLedger;
use parkwise_core::{timestamp, validation, BillingCalculator, Clock, ParkingError, ParkingResult};
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;
use tracing::{info, warn};

use crate::payment_journal::SqlitePaymentJournal;
use crate::slot_registry::SqliteSlotRegistry;

const SESSION_COLUMNS: &str = r#"
    SELECT v.vehicle_id, v.owner_name, v.vehicle_number, v.slot_id, s.slot_number,
           v.entry_time, v.exit_time
    FROM vehicles v
    JOIN slots s ON s.slot_id = v.slot_id
"#;

pub struct SqliteVehicleLedger {
    pool: SqlitePool,
    billing: BillingCalculator,
    clock: Arc<dyn Clock>,
}

impl SqliteVehicleLedger {
    pub fn new(pool: SqlitePool, billing: BillingCalculator, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            billing,
            clock,
        }
    }

    async fn find_active_in(
        conn: &mut SqliteConnection,
        vehicle_number: &str,
    ) -> ParkingResult<Option<Session>> {
        let sql = format!("{SESSION_COLUMNS} WHERE v.vehicle_number = ? AND v.exit_time IS NULL");
        let row = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(vehicle_number)
            .fetch_optional(&mut *conn)
            .await
            .map_err(ParkingError::storage)?;

        row.map(Session::try_from).transpose()
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct SessionRow {
    vehicle_id: i64,
    owner_name: Option<String>,
    vehicle_number: String,
    slot_id: i64,
    slot_number: String,
    entry_time: String,
    exit_time: Option<String>,
}

impl TryFrom<SessionRow> for Session {
    type Error = ParkingError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let entry_time = timestamp::parse(&row.entry_time).map_err(ParkingError::storage)?;
        let exit_time = row
            .exit_time
            .as_deref()
            .map(timestamp::parse)
            .transpose()
            .map_err(ParkingError::storage)?;

        Ok(Session {
            id: row.vehicle_id,
            owner_name: row.owner_name,
            vehicle_number: row.vehicle_number,
            slot_id: row.slot_id,
            slot_label: row.slot_number,
            entry_time,
            exit_time,
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// A unique violation on insert means the vehicle already has an active session.
fn session_insert_error(err: sqlx::Error, vehicle_number: &str) -> ParkingError {
    if is_unique_violation(&err) {
        ParkingError::Conflict(vehicle_number.to_string())
    } else {
        ParkingError::storage(err)
    }
}

#[async_trait]
impl VehicleLedger for SqliteVehicleLedger {
    async fn park_vehicle(
        &self,
        owner_name: Option<&str>,
        vehicle_number: &str,
    ) -> ParkingResult<ParkReceipt> {
        let vehicle_number = validation::vehicle_number(vehicle_number)?;
        let owner_name = validation::owner_name(owner_name);

        let mut tx = self.pool.begin().await.map_err(ParkingError::storage)?;

        if Self::find_active_in(&mut tx, &vehicle_number).await?.is_some() {
            warn!(vehicle = %vehicle_number, "Rejected park: vehicle already parked");
            return Err(ParkingError::Conflict(vehicle_number));
        }

        let slot = SqliteSlotRegistry::find_free_slot_in(&mut tx)
            .await?
            .ok_or(ParkingError::Full)?;

        let entry_time = self.clock.now();

        let session_id = sqlx::query(
            "INSERT INTO vehicles (owner_name, vehicle_number, slot_id, entry_time) VALUES (?, ?, ?, ?)",
        )
        .bind(owner_name.as_deref())
        .bind(vehicle_number.as_str())
        .bind(slot.id)
        .bind(timestamp::format(&entry_time))
        .execute(&mut *tx)
        .await
        .map_err(|e| session_insert_error(e, &vehicle_number))?
        .last_insert_rowid();

        SqliteSlotRegistry::set_occupied_in(&mut tx, slot.id, true).await?;

        tx.commit().await.map_err(ParkingError::storage)?;

        info!(vehicle = %vehicle_number, slot = %slot.label, session_id, "Vehicle parked");

        Ok(ParkReceipt {
            session_id,
            slot_label: slot.label,
            entry_time,
        })
    }

    async fn exit_vehicle(&self, vehicle_number: &str) -> ParkingResult<ExitReceipt> {
        let vehicle_number = validation::vehicle_number(vehicle_number)?;

        let mut tx = self.pool.begin().await.map_err(ParkingError::storage)?;

        let session = Self::find_active_in(&mut tx, &vehicle_number)
            .await?
            .ok_or_else(|| ParkingError::NotFound(vehicle_number.clone()))?;

        let exit_time = self.clock.now();
        let minutes = self.billing.billable_minutes(session.entry_time, exit_time);
        let amount = self.billing.compute_fee(minutes)?;

        sqlx::query("UPDATE vehicles SET exit_time = ? WHERE vehicle_id = ? AND exit_time IS NULL")
            .bind(timestamp::format(&exit_time))
            .bind(session.id)
            .execute(&mut *tx)
            .await
            .map_err(ParkingError::storage)?;

        SqliteSlotRegistry::set_occupied_in(&mut tx, session.slot_id, false).await?;
        SqlitePaymentJournal::record_in(&mut tx, session.id, amount, exit_time).await?;

        tx.commit().await.map_err(ParkingError::storage)?;

        info!(
            vehicle = %vehicle_number,
            slot = %session.slot_label,
            minutes,
            amount,
            "Vehicle exited"
        );

        Ok(ExitReceipt {
            session_id: session.id,
            vehicle_number,
            slot_label: session.slot_label,
            minutes,
            amount,
            exit_time,
        })
    }

    async fn list_active(&self) -> ParkingResult<Vec<Session>> {
        let sql = format!(
            "{SESSION_COLUMNS} WHERE v.exit_time IS NULL ORDER BY v.entry_time DESC, v.vehicle_id DESC"
        );
        let rows = sqlx::query_as::<_, SessionRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(ParkingError::storage)?;

        rows.into_iter().map(Session::try_from).collect()
    }

    async fn list_recent(&self, limit: u32) -> ParkingResult<Vec<Session>> {
        let sql = format!("{SESSION_COLUMNS} ORDER BY v.vehicle_id DESC LIMIT ?");
        let rows = sqlx::query_as::<_, SessionRow>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(ParkingError::storage)?;

        rows.into_iter().map(Session::try_from).collect()
    }

    async fn count_active(&self) -> ParkingResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE exit_time IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(ParkingError::storage)
    }
}
