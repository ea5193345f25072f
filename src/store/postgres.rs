use super::{CommitOutcome, SeatStore, StoreError};
use crate::database::Database;
use crate::layout::CoachLayout;
use crate::models::{OwnerId, Seat, SeatSnapshot};
use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Долговечное хранилище поверх Postgres. Точка сериализации - условный
/// UPDATE внутри транзакции: он заново проверяет, что каждое место свободно,
/// и при недоборе строк вся партия откатывается.
#[derive(Clone)]
pub struct PgSeatStore {
    db: Database,
}

impl PgSeatStore {
    pub fn new(db: Database) -> Self {
        PgSeatStore { db }
    }
}

#[async_trait]
impl SeatStore for PgSeatStore {
    async fn snapshot(&self) -> Result<SeatSnapshot, StoreError> {
        // Один SELECT = один MVCC-снимок: версия и места согласованы между собой
        let rows: Vec<(i32, bool, Option<Uuid>, i64)> = sqlx::query_as(
            r#"
            SELECT s.seat_number, s.booked, s.booked_by, v.version
            FROM seats s
            CROSS JOIN seat_map_version v
            ORDER BY s.seat_number
            "#,
        )
        .fetch_all(&self.db.pool)
        .await?;

        let version = rows.first().map(|r| r.3 as u64).unwrap_or(0);
        let seats = rows
            .into_iter()
            .map(|(seat_number, booked, booked_by, _)| Seat { seat_number, booked, booked_by })
            .collect();

        Ok(SeatSnapshot { version, seats })
    }

    async fn try_commit(
        &self,
        owner: OwnerId,
        seats: &[i32],
        expected_version: u64,
    ) -> Result<CommitOutcome, StoreError> {
        let mut tx = self.db.pool.begin().await?;

        let updated: Vec<i32> = sqlx::query_scalar(
            r#"
            UPDATE seats
            SET booked = TRUE, booked_by = $1, updated_at = NOW()
            WHERE seat_number = ANY($2) AND booked = FALSE
            RETURNING seat_number
            "#,
        )
        .bind(owner)
        .bind(seats)
        .fetch_all(&mut *tx)
        .await?;

        if updated.len() != seats.len() {
            // Кто-то успел раньше: откатываем всю партию и сообщаем, что устарело
            tx.rollback().await?;
            let mut stale: Vec<i32> = seats
                .iter()
                .copied()
                .filter(|n| !updated.contains(n))
                .collect();
            stale.sort_unstable();
            debug!(
                %owner,
                expected_version,
                ?stale,
                "commit rejected, seats changed since snapshot"
            );
            return Ok(CommitOutcome::Conflict { stale });
        }

        sqlx::query("UPDATE seat_map_version SET version = version + 1")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(CommitOutcome::Committed)
    }

    async fn release(&self, owner: OwnerId) -> Result<u64, StoreError> {
        let mut tx = self.db.pool.begin().await?;

        let released = sqlx::query(
            r#"
            UPDATE seats
            SET booked = FALSE, booked_by = NULL, updated_at = NOW()
            WHERE booked_by = $1
            "#,
        )
        .bind(owner)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if released > 0 {
            sqlx::query("UPDATE seat_map_version SET version = version + 1")
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(released)
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        let mut tx = self.db.pool.begin().await?;

        let cleared = sqlx::query(
            r#"
            UPDATE seats
            SET booked = FALSE, booked_by = NULL, updated_at = NOW()
            WHERE booked
            "#,
        )
        .execute(&mut *tx)
        .await?
        .rows_affected();

        sqlx::query("UPDATE seat_map_version SET version = version + 1")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        warn!(cleared, "all bookings reset");
        Ok(())
    }

    async fn initialize_if_empty(&self, layout: &CoachLayout) -> Result<(), StoreError> {
        // Как и при первом старте оригинальной системы: посев только в пустую таблицу.
        // ON CONFLICT страхует от гонки двух одновременно стартующих инстансов.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seats")
            .fetch_one(&self.db.pool)
            .await?;

        if count == 0 {
            sqlx::query(
                r#"
                INSERT INTO seats (seat_number, booked)
                SELECT gs, FALSE FROM generate_series(1, $1) AS gs
                ON CONFLICT (seat_number) DO NOTHING
                "#,
            )
            .bind(layout.total_seats())
            .execute(&self.db.pool)
            .await?;
            info!(total_seats = layout.total_seats(), "seats initialized");
        }
        Ok(())
    }
}
