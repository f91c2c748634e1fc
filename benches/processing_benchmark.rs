use airsense::processors::RecordImporter;
use airsense::readers::{parse_row, MeasurementReader};
use airsense::store::MeasurementStore;
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// Create a CSV log with one reading per minute
fn create_test_csv(rows: usize) -> String {
    let mut csv = String::from(
        "DATE,TEMPERATURE,TEMPUNIT,PM2.5(ug/m3),PM10(ug/m3),CO2(ppm),HCHO(mg/m3),HUMIDITY(%)\n",
    );
    let start = NaiveDate::from_ymd_opt(2023, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    for i in 0..rows {
        let timestamp = start + Duration::minutes(i as i64);
        let unit = if i % 2 == 0 { "C" } else { "F" };
        csv.push_str(&format!(
            "{},{}.5,{},{}.25,{},{},0.0{},{}.1\n",
            timestamp.format("%Y-%m-%d %H:%M:%S"),
            20 + i % 10,
            unit,
            10 + i % 7,
            15 + i % 9,
            400 + i % 50,
            i % 9,
            40 + i % 20,
        ));
    }

    csv
}

fn benchmark_row_parsing(c: &mut Criterion) {
    let csv = create_test_csv(1000);

    c.bench_function("parse_rows_1000", |b| {
        b.iter(|| {
            let rows = MeasurementReader::new()
                .from_reader(black_box(csv.as_bytes()))
                .unwrap();
            for row in rows {
                black_box(parse_row(&row.unwrap()).unwrap());
            }
        })
    });
}

fn benchmark_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_in_memory");

    for size in [100, 1000].iter() {
        let csv = create_test_csv(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut store = MeasurementStore::open_in_memory().unwrap();
                let rows = MeasurementReader::new()
                    .from_reader(csv.as_bytes())
                    .unwrap();
                let summary = RecordImporter::new()
                    .import(rows, &mut store, &mut std::io::sink())
                    .unwrap();
                black_box(summary)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_row_parsing, benchmark_import);
criterion_main!(benches);
