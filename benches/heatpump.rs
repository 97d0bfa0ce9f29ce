use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use heatpump_counter::{derive, summarize, DailyTemperatureSeries, LatLon, UnitSystem};

fn four_years() -> DailyTemperatureSeries {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
    DailyTemperatureSeries::from_values(
        LatLon(40.1106, -88.2073),
        UnitSystem::Imperial,
        start,
        (0..1462).map(|i| ((i * 37) % 71) as f64 - 20.0),
    )
}

fn bench_series(c: &mut Criterion) {
    let series = four_years();
    c.bench_function("derive", |b| b.iter(|| derive(black_box(&series))));
    c.bench_function("summarize", |b| {
        b.iter(|| summarize(black_box(&series), black_box(-25), black_box(60)))
    });
}

criterion_group!(benches, bench_series);
criterion_main!(benches);
