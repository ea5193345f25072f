use coach_booking::layout::CoachLayout;
use coach_booking::models::{Seat, SeatSnapshot};
use coach_booking::suggest::find_best_seats;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uuid::Uuid;

fn empty_snapshot(layout: &CoachLayout) -> SeatSnapshot {
    SeatSnapshot {
        version: 0,
        seats: (1..=layout.total_seats()).map(Seat::free).collect(),
    }
}

// Каждое второе место занято: кластеров нет, отрабатывают худшие ветки
fn checkered_snapshot(layout: &CoachLayout) -> SeatSnapshot {
    let owner = Uuid::new_v4();
    let seats = (1..=layout.total_seats())
        .map(|n| {
            if n % 2 == 0 {
                Seat { seat_number: n, booked: true, booked_by: Some(owner) }
            } else {
                Seat::free(n)
            }
        })
        .collect();
    SeatSnapshot { version: 1, seats }
}

fn bench_find_best_seats(c: &mut Criterion) {
    let layout = CoachLayout::new(80, 7);
    let empty = empty_snapshot(&layout);
    let checkered = checkered_snapshot(&layout);

    c.bench_function("suggest_pair_in_empty_coach", |b| {
        b.iter(|| find_best_seats(black_box(&layout), black_box(&empty), black_box(2)))
    });

    c.bench_function("suggest_party_of_five_in_checkered_coach", |b| {
        b.iter(|| find_best_seats(black_box(&layout), black_box(&checkered), black_box(5)))
    });
}

criterion_group!(benches, bench_find_best_seats);
criterion_main!(benches);
