use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use irradiance_grid::calendar::PhaseEncoder;
use irradiance_grid::{
    DatasetArrays, GridDimensions, Payload, RecordMapper, TimeSeries, YearSlot, SENTINEL,
};

fn hourly_payload(year: i32) -> Payload {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let series: TimeSeries = start
        .iter_days()
        .take(365)
        .flat_map(|d| (0..24).map(move |h| (format!("{}{:02}", d.format("%Y%m%d"), h), 420.0)))
        .collect();
    Payload::point(series)
}

fn region_payload(year: i32, cells: usize) -> Payload {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    let series: TimeSeries = start
        .iter_days()
        .take(365)
        .map(|d| (d.format("%Y%m%d").to_string(), 5.5))
        .collect();
    Payload::region(vec![series; cells])
}

fn bench_mapping(c: &mut Criterion) {
    let mapper = RecordMapper::new(PhaseEncoder::default(), SENTINEL);
    let mut arrays = DatasetArrays::zeros(GridDimensions::new(365, 1, 16));
    let hourly = hourly_payload(2021);
    let region = region_payload(2021, 16);

    c.bench_function("map_point_hourly", |b| {
        b.iter(|| {
            mapper
                .map_point_hourly(
                    &mut arrays.y_hourly,
                    YearSlot::hourly(2021, 0, 365),
                    0,
                    black_box(&hourly),
                )
                .unwrap()
        })
    });
    c.bench_function("map_region_daily", |b| {
        b.iter(|| {
            mapper
                .map_region_daily(&mut arrays.x, YearSlot::daily(2021, 0, 365), 0, black_box(&region))
                .unwrap()
        })
    });
    c.bench_function("fill_missing_hourly", |b| {
        b.iter(|| {
            mapper
                .fill_missing_hourly(&mut arrays.y_hourly, YearSlot::hourly(1999, 0, 365), 0)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_mapping);
criterion_main!(benches);
