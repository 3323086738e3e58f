// Benchmark for day layout and slot search
// Measures the per-render cost of laying out a busy day

use barber_schedule::models::appointment::Appointment;
use barber_schedule::models::grid::GridConfig;
use barber_schedule::services::booking::available_slots;
use barber_schedule::services::schedule::geometry::minutes_to_naive_time;
use barber_schedule::services::schedule::layout::layout_day;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn busy_day(count: usize) -> Vec<Appointment> {
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    (0..count)
        .filter_map(|i| {
            let start = 8 * 60 + (i as i32 % 144) * 5;
            let time = minutes_to_naive_time(start)?;
            let appointment = Appointment::builder()
                .client_name(format!("Client {}", i))
                .client_phone("0500000000")
                .service_name("Haircut")
                .date(date)
                .time(time)
                .duration_minutes(5)
                .build()
                .ok()?;
            Some(appointment.with_id(i as i64))
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let grid = GridConfig::from_hours(8, 20, 150.0).unwrap();
    let mut group = c.benchmark_group("layout_day");

    for count in [10, 50, 144] {
        let day = busy_day(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &day, |b, day| {
            b.iter(|| layout_day(black_box(day), black_box(&grid)));
        });
    }

    group.finish();
}

fn bench_available_slots(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let day: Vec<Appointment> = busy_day(144).into_iter().step_by(3).collect();

    c.bench_function("available_slots_30min", |b| {
        b.iter(|| available_slots(black_box(&day), date, Some((480, 1200)), 30, 10, None));
    });
}

criterion_group!(benches, bench_layout, bench_available_slots);
criterion_main!(benches);
