use anyhow::Result;
use coach_booking::config::{BookingConfig, CoachConfig};
use coach_booking::models::BookingError;
use coach_booking::BookingSystem;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

fn system() -> Arc<BookingSystem> {
    BookingSystem::in_memory(&CoachConfig::default(), BookingConfig::default())
}

#[tokio::test]
async fn fresh_coach_seats_a_party_together() -> Result<()> {
    let system = system();
    let owner = Uuid::new_v4();

    let seats = system.suggest_and_book(owner, 3).await?;
    assert_eq!(seats, vec![1, 2, 3]);

    let map = system.seat_map().await?;
    for n in seats {
        assert!(!map.is_free(n));
    }
    assert_eq!(map.free_count(), 77);
    Ok(())
}

#[tokio::test]
async fn follow_up_party_joins_the_partial_row() -> Result<()> {
    let system = system();
    system.book_chosen(Uuid::new_v4(), &[1, 2, 3, 6, 7]).await?;

    // Пара должна сесть в частично занятый ряд, а не разбивать пустой
    let seats = system.suggest_and_book(Uuid::new_v4(), 2).await?;
    assert_eq!(seats, vec![4, 5]);
    Ok(())
}

#[tokio::test]
async fn party_size_is_checked_before_any_store_work() {
    let system = system();
    let owner = Uuid::new_v4();

    for count in [0usize, 8, 100] {
        let err = system.suggest_and_book(owner, count).await.unwrap_err();
        assert!(
            matches!(err, BookingError::InvalidPartySize { .. }),
            "count {count} must be rejected, got: {err}"
        );
    }
}

#[tokio::test]
async fn cancel_is_idempotent() -> Result<()> {
    let system = system();
    let owner = Uuid::new_v4();

    system.suggest_and_book(owner, 4).await?;
    assert_eq!(system.cancel_bookings(owner).await?, 4);
    assert_eq!(system.cancel_bookings(owner).await?, 0);

    // Владелец без броней тоже получает 0, а не ошибку
    assert_eq!(system.cancel_bookings(Uuid::new_v4()).await?, 0);
    Ok(())
}

#[tokio::test]
async fn reset_frees_the_whole_coach() -> Result<()> {
    let system = system();
    system.suggest_and_book(Uuid::new_v4(), 7).await?;
    system.suggest_and_book(Uuid::new_v4(), 5).await?;
    system.book_chosen(Uuid::new_v4(), &[40, 41]).await?;

    system.reset_all_bookings().await?;

    let map = system.seat_map().await?;
    assert_eq!(map.free_count(), 80);
    assert!(map.seats.iter().all(|s| s.booked_by.is_none()));
    Ok(())
}

#[tokio::test]
async fn booking_exactly_the_remaining_capacity_succeeds() -> Result<()> {
    let system = system();
    for _ in 0..11 {
        system.suggest_and_book(Uuid::new_v4(), 7).await?;
    }
    assert_eq!(system.seat_map().await?.free_count(), 3);

    // Ровно столько, сколько осталось - хвостовой ряд уходит целиком
    let seats = system.suggest_and_book(Uuid::new_v4(), 3).await?;
    assert_eq!(seats, vec![78, 79, 80]);
    assert_eq!(system.seat_map().await?.free_count(), 0);

    let err = system.suggest_and_book(Uuid::new_v4(), 1).await.unwrap_err();
    assert!(matches!(
        err,
        BookingError::InsufficientCapacity { requested: 1, available: 0 }
    ));
    Ok(())
}

#[tokio::test]
async fn chosen_seats_conflict_reports_only_the_stale_ones() -> Result<()> {
    let system = system();
    system.book_chosen(Uuid::new_v4(), &[10, 11]).await?;

    let err = system.book_chosen(Uuid::new_v4(), &[11, 12]).await.unwrap_err();
    match err {
        BookingError::SeatsUnavailable { seats } => assert_eq!(seats, vec![11]),
        other => panic!("unexpected error: {other}"),
    }

    // Проигравшая партия не должна была ничего забронировать
    let map = system.seat_map().await?;
    assert!(map.is_free(12));
    Ok(())
}

#[tokio::test]
async fn chosen_seats_outside_the_coach_are_rejected() {
    let system = system();
    let err = system.book_chosen(Uuid::new_v4(), &[79, 81]).await.unwrap_err();
    assert!(matches!(err, BookingError::UnknownSeat { seat: 81 }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_never_share_a_seat() -> Result<()> {
    let system = system();

    let tasks: Vec<_> = (0..30)
        .map(|_| {
            let system = system.clone();
            tokio::spawn(async move {
                let owner = Uuid::new_v4();
                (owner, system.suggest_and_book(owner, 2).await)
            })
        })
        .collect();

    let mut taken = HashSet::new();
    let mut booked_total = 0usize;
    for joined in join_all(tasks).await {
        let (owner, outcome) = joined?;
        match outcome {
            Ok(seats) => {
                assert_eq!(seats.len(), 2);
                for s in seats {
                    assert!(taken.insert(s), "seat {s} double-booked (owner {owner})");
                }
                booked_total += 2;
            }
            // Под контентом допустимы только эти транзиентные отказы
            Err(BookingError::Contention { .. })
            | Err(BookingError::InsufficientCapacity { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    let map = system.seat_map().await?;
    assert_eq!(80 - map.free_count(), booked_total);
    Ok(())
}

#[tokio::test]
async fn seat_map_serializes_for_the_api_layer() -> Result<()> {
    let system = system();
    let owner = Uuid::new_v4();
    system.book_chosen(owner, &[1]).await?;

    let map = system.seat_map().await?;
    let json = serde_json::to_value(&map)?;

    assert_eq!(json["seats"][0]["seat_number"], 1);
    assert_eq!(json["seats"][0]["booked"], true);
    assert_eq!(json["seats"][0]["booked_by"], serde_json::json!(owner));
    assert_eq!(json["seats"][1]["booked"], false);
    Ok(())
}
