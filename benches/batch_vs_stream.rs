use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_typed::{DateFormats, ParseOptions, Parser};

fn generate_orders(rows: usize) -> String {
    let mut text = String::from("id,ordered_at,ship_time,status,amount\n");
    for i in 0..rows {
        let status = match i % 3 {
            0 => "shipped",
            1 => "pending",
            _ => "processing",
        };
        let day = (i % 28) + 1;
        let hour = (i % 23) + 1;
        text.push_str(&format!(
            "{i},2024-01-{day:02},{hour:02}:00:00,{status},{}.{:02}\n",
            i % 500,
            i % 100
        ));
    }
    text
}

fn bench_batch_vs_stream(c: &mut Criterion) {
    let text = generate_orders(50_000);
    let parser = Parser::new(ParseOptions {
        date_formats: Some(DateFormats::default()),
        ..ParseOptions::default()
    })
    .expect("options compile");

    let fragments: Vec<String> = text
        .as_bytes()
        .chunks(64 * 1024)
        .map(|chunk| String::from_utf8(chunk.to_vec()).expect("ascii input"))
        .collect();

    let mut group = c.benchmark_group("parse_50k_rows");

    group.bench_function("batch", |b| {
        b.iter_batched(
            || (),
            |_| parser.parse_str(&text),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("stream_64k_fragments", |b| {
        b.iter_batched(
            || (),
            |_| {
                let mut session = parser.begin_stream();
                for fragment in &fragments {
                    let _ = session.push(fragment);
                }
                session.into_result()
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_batch_vs_stream);
criterion_main!(benches);
