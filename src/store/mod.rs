use crate::layout::CoachLayout;
use crate::models::{OwnerId, SeatSnapshot};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemorySeatStore;
pub use postgres::PgSeatStore;

// Результат атомарной попытки коммита
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    // Часть мест уже занята к моменту коммита; ничего не записано
    Conflict { stale: Vec<i32> },
}

// Отказ хранилища - это не "мест нет", различаем всегда
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("seat store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("seat store call exceeded {0:?}")]
    Timeout(Duration),
}

/// Контракт хранилища мест, независимый от технологии хранения.
#[async_trait]
pub trait SeatStore: Send + Sync {
    /// Полностью согласованный снимок всех мест; никогда не частичный.
    async fn snapshot(&self) -> Result<SeatSnapshot, StoreError>;

    /// Атомарно бронирует `seats` за `owner`, но только если каждое из них
    /// всё ещё свободно в текущем состоянии (проверка в момент коммита, а не
    /// по устаревшему снимку вызывающего). Всё или ничего.
    /// `expected_version` - версия снимка, по которому выбирали места; нужна
    /// для диагностики гонок, исход решает только актуальное состояние мест.
    async fn try_commit(
        &self,
        owner: OwnerId,
        seats: &[i32],
        expected_version: u64,
    ) -> Result<CommitOutcome, StoreError>;

    /// Снимает все брони владельца. Идемпотентно: без броней вернёт 0.
    async fn release(&self, owner: OwnerId) -> Result<u64, StoreError>;

    /// Административный сброс: все места свободны, владельцы очищены.
    async fn reset_all(&self) -> Result<(), StoreError>;

    /// Создаёт места ровно один раз; no-op, если они уже есть.
    async fn initialize_if_empty(&self, layout: &CoachLayout) -> Result<(), StoreError>;
}
