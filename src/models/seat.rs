use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Seat {
    pub seat_number: i32,
    pub booked: bool,
    pub booked_by: Option<Uuid>,
}

impl Seat {
    pub fn free(seat_number: i32) -> Self {
        Seat { seat_number, booked: false, booked_by: None }
    }

    pub fn is_free(&self) -> bool {
        !self.booked
    }
}

// Снимок всех мест на один момент времени. seats отсортированы по номеру
// и покрывают диапазон 1..=N без дыр; снимок никогда не мутируется.
#[derive(Debug, Clone, Serialize)]
pub struct SeatSnapshot {
    pub version: u64,
    pub seats: Vec<Seat>,
}

impl SeatSnapshot {
    pub fn free_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_free()).count()
    }

    pub fn free_seats(&self) -> impl Iterator<Item = i32> + '_ {
        self.seats.iter().filter(|s| s.is_free()).map(|s| s.seat_number)
    }

    pub fn is_free(&self, seat_number: i32) -> bool {
        self.seats
            .get((seat_number - 1).max(0) as usize)
            .map(|s| s.seat_number == seat_number && s.is_free())
            .unwrap_or(false)
    }
}
