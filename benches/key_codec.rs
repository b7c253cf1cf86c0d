//! Benchmarks for the composite key codec

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lexigraph::element::{Edge, Element, Entity};
use lexigraph::key::ElementKeyCodec;
use lexigraph::serialisation::SerialiserRegistry;

fn sample_elements(n: usize) -> Vec<Element> {
    (0..n)
        .map(|i| {
            if i % 2 == 0 {
                Entity::new("person", format!("v{i}"))
                    .with_property("count", i as i64)
                    .with_property("seen", lexigraph::Value::Time(i as i64 * 1_000))
                    .into()
            } else {
                Edge::new("knows", format!("v{}", i - 1), format!("v{i}"))
                    .with_property("weight", i as f64 / 100.0)
                    .into()
            }
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let codec = ElementKeyCodec::new(SerialiserRegistry::with_defaults());
    let elements = sample_elements(1_000);

    c.bench_function("encode_1000_elements", |b| {
        b.iter(|| {
            for element in &elements {
                black_box(codec.encode(black_box(element)).unwrap());
            }
        })
    });

    c.bench_function("encode_batch_1000_elements", |b| {
        b.iter(|| {
            black_box(
                codec
                    .encode_batch(black_box(elements.clone()), true)
                    .unwrap(),
            )
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let codec = ElementKeyCodec::new(SerialiserRegistry::with_defaults());
    let encoded: Vec<_> = sample_elements(1_000)
        .iter()
        .map(|e| codec.encode(e).unwrap())
        .collect();

    c.bench_function("decode_1000_elements", |b| {
        b.iter(|| {
            for element in &encoded {
                black_box(codec.decode(&element.keys[0], &element.value).unwrap());
            }
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
