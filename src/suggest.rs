use crate::layout::CoachLayout;
use crate::models::{BookingError, SeatSnapshot};
use std::cmp::{Ordering, Reverse};

// Состояние одного ряда, собранное из снимка
struct RowState {
    seats_total: i32,
    booked: i32,
    // свободные места по возрастанию номера
    free: Vec<i32>,
}

impl RowState {
    fn is_partial(&self) -> bool {
        self.booked > 0 && self.booked < self.seats_total
    }

    fn is_empty(&self) -> bool {
        self.booked == 0
    }
}

/// Подбирает `count` свободных мест, стараясь удержать группу вместе.
/// Чистая функция: детерминированна на одном и том же снимке, ничего не
/// резервирует и снимок не мутирует - только предлагает.
///
/// Порядок стратегий:
/// 1. частично занятые ряды, самые заполненные сначала (консолидация);
/// 2. внутри ряда - кластер свободных мест, ближайший по длине к `count`,
///    с выравниванием по середине;
/// 3. если цельного кластера нет - ближайшие соседи вокруг лучшего якоря;
/// 4. пустые ряды по порядку;
/// 5. разброс по рядам, начиная с самых свободных.
pub fn find_best_seats(
    layout: &CoachLayout,
    snapshot: &SeatSnapshot,
    count: usize,
) -> Result<Vec<i32>, BookingError> {
    let available = snapshot.free_count();
    if available < count {
        return Err(BookingError::InsufficientCapacity { requested: count, available });
    }

    let rows = row_states(layout, snapshot);

    // Сначала подсаживаем группу в ряд, который ближе всего к заполнению:
    // так пустые ряды остаются цельными для будущих групп.
    let mut partial: Vec<&RowState> = rows.iter().filter(|r| r.is_partial()).collect();
    partial.sort_by(|a, b| occupancy_cmp(b, a)); // stable: при равенстве раньше меньший ряд

    for row in &partial {
        if let Some(seats) = pick_within_row(row, count) {
            return Ok(seats);
        }
    }

    // Пустые ряды в порядке следования; начало ряда уже максимально сцеплено
    for row in rows.iter().filter(|r| r.is_empty()) {
        if row.free.len() >= count {
            return Ok(row.free[..count].to_vec());
        }
    }

    // Ни один ряд целиком не вмещает группу: собираем по рядам,
    // начиная с самых свободных. available >= count гарантирует добор.
    let mut spill: Vec<&RowState> = rows.iter().filter(|r| !r.free.is_empty()).collect();
    spill.sort_by_key(|r| Reverse(r.free.len()));

    let mut seats = Vec::with_capacity(count);
    'rows: for row in spill {
        for &n in &row.free {
            seats.push(n);
            if seats.len() == count {
                break 'rows;
            }
        }
    }
    seats.sort_unstable();
    Ok(seats)
}

fn row_states(layout: &CoachLayout, snapshot: &SeatSnapshot) -> Vec<RowState> {
    layout
        .rows()
        .map(|row| {
            let mut free = Vec::new();
            let mut booked = 0;
            for n in layout.seat_range(row) {
                if snapshot.is_free(n) {
                    free.push(n);
                } else {
                    booked += 1;
                }
            }
            RowState { seats_total: layout.seats_in_row(row), booked, free }
        })
        .collect()
}

// booked_a/total_a vs booked_b/total_b без плавающей точки,
// чтобы порядок был тотальным и детерминированным
fn occupancy_cmp(a: &RowState, b: &RowState) -> Ordering {
    (a.booked as i64 * b.seats_total as i64).cmp(&(b.booked as i64 * a.seats_total as i64))
}

// Полный набор из одного ряда, либо ничего (частичные наборы ряд не отдаёт)
fn pick_within_row(row: &RowState, count: usize) -> Option<Vec<i32>> {
    if row.free.len() < count {
        return None;
    }
    if let Some(cluster) = best_fit_cluster(&row.free, count) {
        // Середина кластера: неиспользованный остаток делится поровну на фланги
        let offset = (cluster.len() - count) / 2;
        return Some(cluster[offset..offset + count].to_vec());
    }
    Some(nearest_neighbors(&row.free, count))
}

// Максимальные серии последовательных свободных мест
fn clusters(free: &[i32]) -> Vec<&[i32]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..=free.len() {
        if i == free.len() || free[i] != free[i - 1] + 1 {
            runs.push(&free[start..i]);
            start = i;
        }
    }
    runs
}

// Кластер длиной >= count, ближайший по длине к count;
// при равенстве побеждает более ранний (min_by_key берёт первый минимум)
fn best_fit_cluster<'a>(free: &'a [i32], count: usize) -> Option<&'a [i32]> {
    clusters(free)
        .into_iter()
        .filter(|c| c.len() >= count)
        .min_by_key(|c| c.len() - count)
}

// Цельного кластера нет: якорь - свободное место с наибольшим числом
// свободных соседей на дистанции count-1, дальше жадно добираем ближайших,
// при равной дистанции правый сосед раньше левого.
// Вызывается только при free.len() >= count, так что набор всегда полный.
fn nearest_neighbors(free: &[i32], count: usize) -> Vec<i32> {
    let radius = (count as i32) - 1;
    let anchor = *free
        .iter()
        .min_by_key(|&&seat| {
            let neighbors = free
                .iter()
                .filter(|&&other| other != seat && (other - seat).abs() <= radius)
                .count();
            Reverse(neighbors) // первый максимум = якорь с меньшим номером
        })
        .expect("caller guarantees at least one free seat");

    let mut rest: Vec<i32> = free.iter().copied().filter(|&s| s != anchor).collect();
    rest.sort_by_key(|&s| ((s - anchor).abs(), s < anchor));

    let mut seats: Vec<i32> = std::iter::once(anchor)
        .chain(rest.into_iter().take(count - 1))
        .collect();
    seats.sort_unstable();
    seats
}
