pub mod booking;
pub mod seat;

pub use booking::{BookingError, OwnerId};
pub use seat::{Seat, SeatSnapshot};
