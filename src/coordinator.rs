use crate::config::BookingConfig;
use crate::layout::CoachLayout;
use crate::models::{BookingError, OwnerId, SeatSnapshot};
use crate::store::{CommitOutcome, SeatStore, StoreError};
use crate::suggest;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

/// Координатор бронирования. Единственное место, где пересекается граница
/// "прочитали свободные места" / "закоммитили бронь": снимок -> подбор ->
/// атомарный коммит, при конфликте - свежий снимок и новая попытка в рамках
/// бюджета. Ничего не резервируется заранее: состояние меняется только в
/// момент коммита, поэтому отказ на любом шаге не оставляет следов.
#[derive(Clone)]
pub struct BookingCoordinator {
    store: Arc<dyn SeatStore>,
    layout: CoachLayout,
    policy: BookingConfig,
}

impl BookingCoordinator {
    pub fn new(store: Arc<dyn SeatStore>, layout: CoachLayout, policy: BookingConfig) -> Self {
        BookingCoordinator { store, layout, policy }
    }

    pub fn layout(&self) -> CoachLayout {
        self.layout
    }

    // Каждый вызов хранилища ограничен своим дедлайном,
    // чтобы зависший стор не подвесил запрос целиком
    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let limit = Duration::from_millis(self.policy.store_timeout_ms);
        match timeout(limit, fut).await {
            Ok(res) => res,
            Err(_) => Err(StoreError::Timeout(limit)),
        }
    }

    /// Подобрать и атомарно забронировать `count` мест за `owner`.
    pub async fn book(&self, owner: OwnerId, count: usize) -> Result<Vec<i32>, BookingError> {
        if count < 1 || count > self.policy.max_party_size {
            return Err(BookingError::InvalidPartySize {
                count,
                max: self.policy.max_party_size,
            });
        }

        // Ретраи ограничены и по числу попыток, и по настенным часам:
        // лучше честный отказ, чем запрос, крутящийся вечно под контентом
        let deadline = Instant::now() + Duration::from_millis(self.policy.booking_budget_ms);
        let mut attempts = 0;

        while attempts < self.policy.max_commit_attempts {
            attempts += 1;

            let snapshot = self.with_timeout(self.store.snapshot()).await?;
            let candidate = suggest::find_best_seats(&self.layout, &snapshot, count)?;

            match self
                .with_timeout(self.store.try_commit(owner, &candidate, snapshot.version))
                .await?
            {
                CommitOutcome::Committed => {
                    info!(%owner, seats = ?candidate, attempt = attempts, "booking committed");
                    return Ok(candidate);
                }
                CommitOutcome::Conflict { stale } => {
                    debug!(
                        %owner,
                        ?stale,
                        attempt = attempts,
                        "commit lost the race, refreshing snapshot"
                    );
                }
            }

            if Instant::now() >= deadline {
                warn!(%owner, attempts, "booking budget exhausted under contention");
                break;
            }
        }

        Err(BookingError::Contention { attempts })
    }

    /// Забронировать явно выбранные места (ручной выбор по схеме вагона).
    /// Один атомарный заход без подбора; занятые места - ошибка, не ретрай.
    pub async fn book_chosen(
        &self,
        owner: OwnerId,
        seats: &[i32],
    ) -> Result<Vec<i32>, BookingError> {
        let mut requested: Vec<i32> = seats.to_vec();
        requested.sort_unstable();
        requested.dedup();

        let count = requested.len();
        if count < 1 || count > self.policy.max_party_size {
            return Err(BookingError::InvalidPartySize {
                count,
                max: self.policy.max_party_size,
            });
        }
        if let Some(&seat) = requested.iter().find(|&&s| !self.layout.contains(s)) {
            return Err(BookingError::UnknownSeat { seat });
        }

        let snapshot = self.with_timeout(self.store.snapshot()).await?;
        match self
            .with_timeout(self.store.try_commit(owner, &requested, snapshot.version))
            .await?
        {
            CommitOutcome::Committed => {
                info!(%owner, seats = ?requested, "chosen seats committed");
                Ok(requested)
            }
            CommitOutcome::Conflict { stale } => {
                Err(BookingError::SeatsUnavailable { seats: stale })
            }
        }
    }

    /// Снять все брони владельца. Идемпотентно: повторный вызов вернёт 0.
    pub async fn cancel(&self, owner: OwnerId) -> Result<u64, BookingError> {
        let released = self.with_timeout(self.store.release(owner)).await?;
        if released > 0 {
            info!(%owner, released, "bookings cancelled");
        } else {
            debug!(%owner, "nothing to cancel");
        }
        Ok(released)
    }

    /// Административный сброс всех броней. Подбор мест здесь не участвует.
    pub async fn reset_all(&self) -> Result<(), BookingError> {
        warn!("resetting all bookings");
        self.with_timeout(self.store.reset_all()).await?;
        Ok(())
    }

    /// Согласованный снимок карты мест (для отображения схемы).
    pub async fn seat_map(&self) -> Result<SeatSnapshot, BookingError> {
        Ok(self.with_timeout(self.store.snapshot()).await?)
    }
}
