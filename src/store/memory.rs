use super::{CommitOutcome, SeatStore, StoreError};
use crate::layout::CoachLayout;
use crate::models::{OwnerId, Seat, SeatSnapshot};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// Хранилище мест в памяти. Write-lock служит единственной точкой
/// сериализации: коммит повторно проверяет свободность мест уже под локом,
/// поэтому гонка "прочитал снимок - закоммитил" здесь закрыта.
#[derive(Debug, Default)]
pub struct InMemorySeatStore {
    inner: RwLock<SeatMap>,
}

#[derive(Debug, Default)]
struct SeatMap {
    version: u64,
    // индекс = номер места - 1
    seats: Vec<Seat>,
}

impl InMemorySeatStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Хранилище с уже созданными местами
    pub fn seeded(layout: &CoachLayout) -> Self {
        let seats = (1..=layout.total_seats()).map(Seat::free).collect();
        InMemorySeatStore {
            inner: RwLock::new(SeatMap { version: 0, seats }),
        }
    }
}

#[async_trait]
impl SeatStore for InMemorySeatStore {
    async fn snapshot(&self) -> Result<SeatSnapshot, StoreError> {
        let map = self.inner.read().await;
        Ok(SeatSnapshot {
            version: map.version,
            seats: map.seats.clone(),
        })
    }

    async fn try_commit(
        &self,
        owner: OwnerId,
        seats: &[i32],
        expected_version: u64,
    ) -> Result<CommitOutcome, StoreError> {
        let mut map = self.inner.write().await;

        let stale: Vec<i32> = seats
            .iter()
            .copied()
            .filter(|&n| {
                n < 1
                    || map.seats
                        .get((n - 1) as usize)
                        .map_or(true, |s| s.booked)
            })
            .collect();
        if !stale.is_empty() {
            debug!(
                %owner,
                expected_version,
                current_version = map.version,
                ?stale,
                "commit rejected, seats changed since snapshot"
            );
            return Ok(CommitOutcome::Conflict { stale });
        }

        for &n in seats {
            let seat = &mut map.seats[(n - 1) as usize];
            seat.booked = true;
            seat.booked_by = Some(owner);
        }
        map.version += 1;
        Ok(CommitOutcome::Committed)
    }

    async fn release(&self, owner: OwnerId) -> Result<u64, StoreError> {
        let mut map = self.inner.write().await;
        let mut released = 0u64;
        for seat in &mut map.seats {
            if seat.booked_by == Some(owner) {
                seat.booked = false;
                seat.booked_by = None;
                released += 1;
            }
        }
        if released > 0 {
            map.version += 1;
        }
        Ok(released)
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        for seat in &mut map.seats {
            seat.booked = false;
            seat.booked_by = None;
        }
        map.version += 1;
        Ok(())
    }

    async fn initialize_if_empty(&self, layout: &CoachLayout) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        if map.seats.is_empty() {
            map.seats = (1..=layout.total_seats()).map(Seat::free).collect();
        }
        Ok(())
    }
}
