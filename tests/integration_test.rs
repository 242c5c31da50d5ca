// Integration tests for jobscout
use std::sync::Arc;

use jobscout::prelude::*;

const DIM: usize = 64;

async fn seed_store(store: &PostingStore, embedder: &HashEmbedder) {
    let postings: &[(u64, &str, &[&str])] = &[
        (
            1,
            "Senior Python Developer",
            &[
                "Senior Python developer for data pipelines, Airflow and Kafka",
                "Remote friendly, strong SQL required",
            ],
        ),
        (
            2,
            "Java Backend Engineer",
            &["Java with Spring Boot microservices", "Kubernetes deployments"],
        ),
        (
            3,
            "Data Engineer",
            &["ETL on ClickHouse and Kafka", "Python scripting for ingestion"],
        ),
    ];

    for (id, name, fragments) in postings {
        let mut inputs = Vec::new();
        for text in *fragments {
            let embedding = embedder.embed(text).await.unwrap();
            inputs.push(FragmentInput::new(*text, embedding));
        }
        store
            .upsert_posting(*id, DocumentMeta::new(*name), inputs)
            .unwrap();
    }
}

fn retriever(store: Arc<PostingStore>) -> Retriever {
    Retriever::new(Arc::new(HashEmbedder::new(DIM)), store)
}

#[tokio::test]
async fn test_end_to_end_retrieval() {
    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM)));
    seed_store(&store, &HashEmbedder::new(DIM)).await;

    let retrieval = retriever(store)
        .retrieve("python developer", &RetrieveOptions::default())
        .await
        .unwrap();

    assert!(retrieval.hybrid_used);
    assert!(!retrieval.results.is_empty());
    assert_eq!(retrieval.results[0].meta.name, "Senior Python Developer");

    // One entry per posting, ordered by best combined score.
    let mut ids: Vec<u64> = retrieval.results.iter().map(|r| r.doc_id).collect();
    let unique = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), unique);
    for pair in retrieval.results.windows(2) {
        assert!(pair[0].best_score <= pair[1].best_score);
    }
}

#[tokio::test]
async fn test_evidence_caps_and_ranks() {
    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM)));
    seed_store(&store, &HashEmbedder::new(DIM)).await;

    let opts = RetrieveOptions {
        per_doc: 1,
        ..Default::default()
    };
    let retrieval = retriever(store).retrieve("python", &opts).await.unwrap();

    for result in &retrieval.results {
        assert_eq!(result.evidence.len(), 1);
        assert_eq!(result.evidence[0].rank, 1);
        assert!((result.best_score - result.evidence[0].combined).abs() < 1e-6);
    }
}

#[tokio::test]
async fn test_disabled_trigram_degrades_gracefully() {
    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM).without_trigram()));
    seed_store(&store, &HashEmbedder::new(DIM)).await;

    let opts = RetrieveOptions {
        weight: 0.5,
        ..Default::default()
    };
    let retrieval = retriever(store).retrieve("python", &opts).await.unwrap();

    assert!(!retrieval.hybrid_used);
    assert_eq!(retrieval.weight_used, 0.0);
    for result in &retrieval.results {
        for evidence in &result.evidence {
            assert_eq!(evidence.lexical, 0.0);
            assert_eq!(evidence.combined, evidence.distance);
        }
    }
}

#[tokio::test]
async fn test_empty_store_returns_empty() {
    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM)));
    let retrieval = retriever(store)
        .retrieve("anything at all", &RetrieveOptions::default())
        .await
        .unwrap();
    assert!(retrieval.results.is_empty());
}

#[tokio::test]
async fn test_retrieval_is_deterministic() {
    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM)));
    seed_store(&store, &HashEmbedder::new(DIM)).await;
    let r = retriever(store);

    let opts = RetrieveOptions::default();
    let a = r.retrieve("kafka pipelines", &opts).await.unwrap();
    let b = r.retrieve("kafka pipelines", &opts).await.unwrap();

    let ids_a: Vec<u64> = a.results.iter().map(|r| r.doc_id).collect();
    let ids_b: Vec<u64> = b.results.iter().map(|r| r.doc_id).collect();
    assert_eq!(ids_a, ids_b);
    for (ra, rb) in a.results.iter().zip(&b.results) {
        assert_eq!(ra.best_score, rb.best_score);
    }
}

#[tokio::test]
async fn test_explanations_name_matched_terms() {
    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM)));
    seed_store(&store, &HashEmbedder::new(DIM)).await;

    let opts = RetrieveOptions {
        explain: true,
        ..Default::default()
    };
    let retrieval = retriever(store)
        .retrieve("python kafka", &opts)
        .await
        .unwrap();

    let top = &retrieval.results[0];
    let why = top.why.as_ref().unwrap();
    assert!(why.query_matches.contains(&"python".to_string()));
    assert!(why.tech_terms.contains(&"kafka".to_string()));
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM)));
    seed_store(&store, &HashEmbedder::new(DIM)).await;
    store.snapshot().save(&path).unwrap();

    let restored = Arc::new(PostingStore::from_snapshot(
        StoreSnapshot::load(&path).unwrap(),
    ));
    assert_eq!(restored.counts().postings, 3);

    let retrieval = retriever(restored)
        .retrieve("python developer", &RetrieveOptions::default())
        .await
        .unwrap();
    assert_eq!(retrieval.results[0].meta.name, "Senior Python Developer");
}

#[tokio::test]
async fn test_highlighting_marks_query_words() {
    let store = Arc::new(PostingStore::new(StoreConfig::new(DIM)));
    seed_store(&store, &HashEmbedder::new(DIM)).await;

    let retrieval = retriever(store)
        .retrieve("python", &RetrieveOptions::default())
        .await
        .unwrap();

    let python_result = retrieval
        .results
        .iter()
        .find(|r| r.doc_id == 1)
        .unwrap();
    let evidence = &python_result.evidence[0];
    assert!(evidence.text.contains("[Python]"));

    // Stripping the markers recovers the normalized fragment text.
    let stripped = evidence.text.replace(['[', ']'], "");
    assert!(stripped.contains("Senior Python developer"));
}
