pub mod config;
pub mod coordinator;
pub mod database;
pub mod layout;
pub mod models;
pub mod store;
pub mod suggest;

use std::sync::Arc;

use config::{BookingConfig, CoachConfig, Config};
use coordinator::BookingCoordinator;
use layout::CoachLayout;
use models::{BookingError, OwnerId, SeatSnapshot};
use store::{InMemorySeatStore, PgSeatStore, SeatStore};

// Shared state для всего движка бронирования. HTTP-слой, аутентификация и
// рендеринг живут у вызывающего сервиса - сюда приходят только owner и count.
#[derive(Clone)]
pub struct BookingSystem {
    pub coordinator: BookingCoordinator,
}

impl BookingSystem {
    /// Продакшен-вариант: Postgres-хранилище, миграции и посев мест при старте.
    pub async fn new(config: Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let db = database::Database::connect(&config.database).await?;
        db.run_migrations().await?;

        let layout = CoachLayout::from_config(&config.coach);
        let store: Arc<dyn SeatStore> = Arc::new(PgSeatStore::new(db));
        store.initialize_if_empty(&layout).await?;

        let coordinator = BookingCoordinator::new(store, layout, config.booking);
        Ok(Arc::new(Self { coordinator }))
    }

    /// Встраиваемый вариант на хранилище в памяти (тесты, демо, один процесс).
    pub fn in_memory(coach: &CoachConfig, booking: BookingConfig) -> Arc<Self> {
        let layout = CoachLayout::from_config(coach);
        let store: Arc<dyn SeatStore> = Arc::new(InMemorySeatStore::seeded(&layout));
        let coordinator = BookingCoordinator::new(store, layout, booking);
        Arc::new(Self { coordinator })
    }

    /* ---------- операции, которые видит слой обработки запросов ---------- */

    // Подобрать лучшие места для группы и атомарно их забронировать
    pub async fn suggest_and_book(
        &self,
        owner: OwnerId,
        count: usize,
    ) -> Result<Vec<i32>, BookingError> {
        self.coordinator.book(owner, count).await
    }

    // Забронировать места, выбранные пользователем вручную
    pub async fn book_chosen(
        &self,
        owner: OwnerId,
        seats: &[i32],
    ) -> Result<Vec<i32>, BookingError> {
        self.coordinator.book_chosen(owner, seats).await
    }

    // Снять все брони владельца; возвращает, сколько мест освободилось
    pub async fn cancel_bookings(&self, owner: OwnerId) -> Result<u64, BookingError> {
        self.coordinator.cancel(owner).await
    }

    // Административный сброс всех броней
    pub async fn reset_all_bookings(&self) -> Result<(), BookingError> {
        self.coordinator.reset_all().await
    }

    // Текущая карта мест для отрисовки схемы вагона
    pub async fn seat_map(&self) -> Result<SeatSnapshot, BookingError> {
        self.coordinator.seat_map().await
    }
}

// Инициализация трейсинга; встраивающий сервис вызывает один раз при старте
pub fn init_tracing(config: &config::AppConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
