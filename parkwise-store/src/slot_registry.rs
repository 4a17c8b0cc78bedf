use async_trait::async_trait;
use parkwise_core::models::Slot;
use parkwise_core::repository::SlotRegistry;
use parkwise_core::{validation, ParkingError, ParkingResult};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

pub struct SqliteSlotRegistry {
    pool: SqlitePool,
}

impl SqliteSlotRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_free_slot_in(conn: &mut SqliteConnection) -> ParkingResult<Option<Slot>> {
        let row = sqlx::query_as::<_, SlotRow>(
            "SELECT slot_id, slot_number, is_occupied FROM slots WHERE is_occupied = 0 ORDER BY slot_id LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await
        .map_err(ParkingError::storage)?;

        Ok(row.map(Slot::from))
    }

    pub(crate) async fn set_occupied_in(
        conn: &mut SqliteConnection,
        slot_id: i64,
        occupied: bool,
    ) -> ParkingResult<()> {
        sqlx::query("UPDATE slots SET is_occupied = ? WHERE slot_id = ?")
            .bind(i64::from(occupied))
            .bind(slot_id)
            .execute(&mut *conn)
            .await
            .map_err(ParkingError::storage)?;

        debug!(slot_id, occupied, "Slot occupancy changed");
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SlotRow {
    slot_id: i64,
    slot_number: String,
    is_occupied: i64,
}

impl From<SlotRow> for Slot {
    fn from(row: SlotRow) -> Self {
        Slot {
            id: row.slot_id,
            label: row.slot_number,
            occupied: row.is_occupied != 0,
        }
    }
}

#[async_trait]
impl SlotRegistry for SqliteSlotRegistry {
    async fn provision_slots(&self, total: i64) -> ParkingResult<i64> {
        let total = validation::slot_total(total)?;

        let mut tx = self.pool.begin().await.map_err(ParkingError::storage)?;

        let mut created = 0;
        for number in 1..=total {
            created += sqlx::query("INSERT OR IGNORE INTO slots (slot_number, is_occupied) VALUES (?, 0)")
                .bind(Slot::label_for(number))
                .execute(&mut *tx)
                .await
                .map_err(ParkingError::storage)?
                .rows_affected();
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM slots")
            .fetch_one(&mut *tx)
            .await
            .map_err(ParkingError::storage)?;

        tx.commit().await.map_err(ParkingError::storage)?;

        info!(requested = total, created, count, "Slots provisioned");
        Ok(count)
    }

    async fn find_free_slot(&self) -> ParkingResult<Option<Slot>> {
        let mut conn = self.pool.acquire().await.map_err(ParkingError::storage)?;
        Self::find_free_slot_in(&mut conn).await
    }

    async fn mark_occupied(&self, slot_id: i64) -> ParkingResult<()> {
        let mut conn = self.pool.acquire().await.map_err(ParkingError::storage)?;
        Self::set_occupied_in(&mut conn, slot_id, true).await
    }

    async fn mark_free(&self, slot_id: i64) -> ParkingResult<()> {
        let mut conn = self.pool.acquire().await.map_err(ParkingError::storage)?;
        Self::set_occupied_in(&mut conn, slot_id, false).await
    }

    async fn list_slots(&self) -> ParkingResult<Vec<Slot>> {
        let rows = sqlx::query_as::<_, SlotRow>(
            r#"
            SELECT slot_id, slot_number, is_occupied
            FROM slots
            ORDER BY CAST(SUBSTR(slot_number, INSTR(slot_number, '-') + 1) AS INTEGER), slot_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ParkingError::storage)?;

        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn counts(&self) -> ParkingResult<(i64, i64)> {
        let (total, available): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN is_occupied = 0 THEN 1 ELSE 0 END), 0) FROM slots",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(ParkingError::storage)?;

        Ok((total, available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbClient;

    async fn registry() -> SqliteSlotRegistry {
        let db = DbClient::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        SqliteSlotRegistry::new(db.pool)
    }

    #[tokio::test]
    async fn test_provision_is_idempotent_on_label() {
        let registry = registry().await;

        assert_eq!(registry.provision_slots(3).await.unwrap(), 3);
        assert_eq!(registry.provision_slots(3).await.unwrap(), 3);
        assert_eq!(registry.counts().await.unwrap(), (3, 3));
    }

    #[tokio::test]
    async fn test_provision_grows_and_keeps_occupancy() {
        let registry = registry().await;
        registry.provision_slots(2).await.unwrap();

        let slot = registry.find_free_slot().await.unwrap().unwrap();
        registry.mark_occupied(slot.id).await.unwrap();

        assert_eq!(registry.provision_slots(4).await.unwrap(), 4);
        // Shrinking never removes slots
        assert_eq!(registry.provision_slots(1).await.unwrap(), 4);
        assert_eq!(registry.counts().await.unwrap(), (4, 3));
    }

    #[tokio::test]
    async fn test_provision_rejects_non_positive_total() {
        let registry = registry().await;

        for total in [0, -5] {
            assert!(matches!(
                registry.provision_slots(total).await,
                Err(ParkingError::ValidationError(_))
            ));
        }
        assert_eq!(registry.counts().await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_find_free_slot_picks_lowest_id() {
        let registry = registry().await;
        assert!(registry.find_free_slot().await.unwrap().is_none());

        registry.provision_slots(2).await.unwrap();
        let first = registry.find_free_slot().await.unwrap().unwrap();
        assert_eq!(first.label, "Slot-1");
        assert!(!first.occupied);

        registry.mark_occupied(first.id).await.unwrap();
        let second = registry.find_free_slot().await.unwrap().unwrap();
        assert_eq!(second.label, "Slot-2");

        registry.mark_occupied(second.id).await.unwrap();
        assert!(registry.find_free_slot().await.unwrap().is_none());

        registry.mark_free(first.id).await.unwrap();
        assert_eq!(registry.find_free_slot().await.unwrap().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_list_slots_orders_numerically() {
        let registry = registry().await;
        registry.provision_slots(11).await.unwrap();

        let labels: Vec<String> = registry
            .list_slots()
            .await
            .unwrap()
            .into_iter()
            .map(|slot| slot.label)
            .collect();

        assert_eq!(labels.len(), 11);
        assert_eq!(labels[1], "Slot-2");
        assert_eq!(labels[10], "Slot-11");
    }
}
