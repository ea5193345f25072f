use crate::store::StoreError;
use thiserror::Error;
use uuid::Uuid;

// Владелец брони. Для движка это непрозрачный идентификатор.
pub type OwnerId = Uuid;

/// Все способы, которыми бронирование может не состояться.
/// Частично выполненных броней не бывает: либо все места, либо ничего.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("party of {count} is out of range, bookings are limited to 1..={max} seats")]
    InvalidPartySize { count: usize, max: usize },

    #[error("not enough seats available: requested {requested}, only {available} free")]
    InsufficientCapacity { requested: usize, available: usize },

    // Транзиентная ошибка: повторить позже безопасно
    #[error("could not commit a booking after {attempts} attempts, seats kept changing")]
    Contention { attempts: u32 },

    #[error("seat {seat} does not exist in this coach")]
    UnknownSeat { seat: i32 },

    #[error("seats {seats:?} are already booked")]
    SeatsUnavailable { seats: Vec<i32> },

    #[error(transparent)]
    Store(#[from] StoreError),
}
