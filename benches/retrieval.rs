use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jobscout::text::{query_keywords, trigram_similarity};
use jobscout::{aggregate, DocumentMeta, ScoredFragment};

fn synthetic_pool(fragments: usize, docs: u64) -> Vec<ScoredFragment> {
    (0..fragments)
        .map(|i| {
            let doc_id = (i as u64) % docs;
            ScoredFragment {
                doc_id,
                meta: DocumentMeta::new(format!("posting {}", doc_id)),
                fragment_no: (i / docs as usize) as u32,
                text: format!("fragment {} about python and kafka pipelines", i),
                distance: (i % 97) as f32 / 97.0,
                lexical: (i % 13) as f32 / 13.0,
                combined: (i % 97) as f32 / 97.0 - 0.25 * ((i % 13) as f32 / 13.0),
            }
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let pool = synthetic_pool(250, 60);
    c.bench_function("aggregate_250_candidates", |b| {
        b.iter(|| aggregate(black_box(pool.clone()), black_box(2), black_box(8)))
    });
}

fn bench_trigram(c: &mut Criterion) {
    let query = "senior python developer remote";
    let fragment = "We are looking for a senior Python developer to build \
                    data pipelines with Airflow and Kafka, remote friendly";
    c.bench_function("trigram_similarity", |b| {
        b.iter(|| trigram_similarity(black_box(query), black_box(fragment)))
    });
}

fn bench_keywords(c: &mut Criterion) {
    let query = "опытный python разработчик для data pipelines с kafka и airflow";
    c.bench_function("query_keywords", |b| {
        b.iter(|| query_keywords(black_box(query), black_box(12)))
    });
}

criterion_group!(benches, bench_aggregate, bench_trigram, bench_keywords);
criterion_main!(benches);
