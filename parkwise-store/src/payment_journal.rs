use async_trait::async_trait;
use chrono::NaiveDateTime;
use parkwise_core::billing::round_currency;
use parkwise_core::models::Payment;
use parkwise_core::repository::PaymentJournal;
use parkwise_core::{timestamp, ParkingError, ParkingResult};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

pub struct SqlitePaymentJournal {
    pool: SqlitePool,
}

impl SqlitePaymentJournal {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) async fn record_in(
        conn: &mut SqliteConnection,
        session_id: i64,
        amount: f64,
        paid_at: NaiveDateTime,
    ) -> ParkingResult<i64> {
        let payment_id = sqlx::query(
            "INSERT INTO payments (vehicle_id, amount, payment_time) VALUES (?, ?, ?)",
        )
        .bind(session_id)
        .bind(amount)
        .bind(timestamp::format(&paid_at))
        .execute(&mut *conn)
        .await
        .map_err(ParkingError::storage)?
        .last_insert_rowid();

        debug!(payment_id, session_id, amount, "Payment recorded");
        Ok(payment_id)
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    payment_id: i64,
    vehicle_id: i64,
    vehicle_number: String,
    amount: f64,
    payment_time: String,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = ParkingError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.payment_id,
            session_id: row.vehicle_id,
            vehicle_number: row.vehicle_number,
            amount: row.amount,
            paid_at: timestamp::parse(&row.payment_time).map_err(ParkingError::storage)?,
        })
    }
}

#[async_trait]
impl PaymentJournal for SqlitePaymentJournal {
    async fn record(
        &self,
        session_id: i64,
        amount: f64,
        paid_at: NaiveDateTime,
    ) -> ParkingResult<i64> {
        let mut conn = self.pool.acquire().await.map_err(ParkingError::storage)?;
        Self::record_in(&mut conn, session_id, amount, paid_at).await
    }

    async fn total_revenue(&self) -> ParkingResult<f64> {
        let total: f64 = sqlx::query_scalar("SELECT CAST(COALESCE(SUM(amount), 0) AS REAL) FROM payments")
            .fetch_one(&self.pool)
            .await
            .map_err(ParkingError::storage)?;

        Ok(round_currency(total))
    }

    async fn list_all(&self) -> ParkingResult<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(
            r#"
            SELECT p.payment_id, p.vehicle_id, v.vehicle_number, p.amount, p.payment_time
            FROM payments p
            JOIN vehicles v ON v.vehicle_id = p.vehicle_id
            ORDER BY p.payment_time DESC, p.payment_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ParkingError::storage)?;

        rows.into_iter().map(Payment::try_from).collect()
    }
}
