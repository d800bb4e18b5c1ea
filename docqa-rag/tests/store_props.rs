//! Property tests for document store search behavior.

use docqa_rag::backend::VectorBackend;
use docqa_rag::document::{ChunkMetadata, DocFormat, StoredRecord};
use docqa_rag::inmemory::InMemoryBackend;
use proptest::prelude::*;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate a stored record with a normalized embedding.
fn arb_record(dim: usize) -> impl Strategy<Value = StoredRecord> {
    ("[a-z]{3,8}", "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(id, content, embedding)| StoredRecord {
            id,
            content,
            metadata: ChunkMetadata {
                source: "doc.txt".to_string(),
                doc_type: DocFormat::Text,
                chunk_index: 0,
                ocr_language: None,
            },
            embedding,
        },
    )
}

/// **Property: search ordering and bound.** For any set of stored
/// records, searching returns at most `top_k` results ordered by
/// non-increasing similarity, and the same query against the same
/// state returns the same order.
mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_bounded_and_deterministic(
            records in proptest::collection::vec(arb_record(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, rerun, unique_count) = rt.block_on(async {
                let backend = InMemoryBackend::new();
                backend.create_collection("test").await.unwrap();

                // Deduplicate by id so upsert replacement doesn't shrink the set
                let mut deduped = std::collections::HashMap::new();
                for record in &records {
                    deduped.entry(record.id.clone()).or_insert_with(|| record.clone());
                }
                let unique: Vec<StoredRecord> = deduped.into_values().collect();
                let count = unique.len();

                backend.upsert("test", &unique).await.unwrap();
                let results = backend.search("test", &query, top_k).await.unwrap();
                let rerun = backend.search("test", &query, top_k).await.unwrap();
                (results, rerun, count)
            });

            prop_assert!(results.len() <= top_k);
            prop_assert!(results.len() <= unique_count);

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }

            // Deterministic for identical state and query
            let ids: Vec<&str> = results.iter().map(|r| r.record.id.as_str()).collect();
            let rerun_ids: Vec<&str> = rerun.iter().map(|r| r.record.id.as_str()).collect();
            prop_assert_eq!(ids, rerun_ids);
        }
    }
}
