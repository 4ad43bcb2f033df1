use studyflow_core::{rank, EmbeddingRecord, MetadataFilter, RankError, RankOutcome, StoredEmbedding};

fn record(id: &str, file_name: &str, vector: Vec<f32>) -> EmbeddingRecord {
    EmbeddingRecord::new(id, vector).with_metadata("file_name", file_name)
}

fn ids(outcome: &RankOutcome) -> Vec<&str> {
    outcome.matches.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn exact_copy_ranks_first_and_k_truncates() {
    let query = vec![0.2, 0.9, -0.4];
    let candidates = vec![
        record("a", "x.pdf", vec![1.0, 0.0, 0.0]),
        record("b", "x.pdf", vec![0.1, 1.0, -0.3]),
        record("copy", "x.pdf", query.clone()),
        record("c", "x.pdf", vec![-0.2, -0.9, 0.4]),
        record("d", "x.pdf", vec![0.0, 0.5, 0.0]),
    ];

    let outcome = rank(&query, &candidates, 2, None);
    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.matches[0].id, "copy");
    assert!((outcome.matches[0].similarity - 1.0).abs() < 1e-6);
    assert!(outcome.matches[0].similarity >= outcome.matches[1].similarity);
    assert!(outcome.rejected.is_empty());

    let all = rank(&query, &candidates, 10, None);
    assert_eq!(all.matches.len(), 5);
    assert_eq!(all.matches.last().map(|m| m.id.as_str()), Some("c"));
    assert!((all.matches[4].similarity + 1.0).abs() < 1e-6);
}

#[test]
fn metadata_filter_excludes_better_scoring_candidates() {
    let query = vec![1.0, 0.0];
    let candidates = vec![
        record("perfect", "Chemistry.pdf", vec![1.0, 0.0]),
        record("weak", "BIOLOGY-notes.pdf", vec![0.2, 1.0]),
        record("unlabelled", "", vec![1.0, 0.0]),
        EmbeddingRecord::new("no-metadata", vec![1.0, 0.0]),
    ];
    let filter = MetadataFilter::file_name("biology");

    let outcome = rank(&query, &candidates, 5, Some(&filter));
    assert_eq!(ids(&outcome), vec!["weak"]);
}

#[test]
fn malformed_candidates_are_isolated() {
    let query = vec![1.0, 1.0];
    let candidates = vec![
        record("short", "a", vec![1.0]),
        record("good", "a", vec![1.0, 0.9]),
        record("zero", "a", vec![0.0, 0.0]),
        EmbeddingRecord::new("garbled", StoredEmbedding::Encoded("[1.0, oops]".to_string())),
        EmbeddingRecord::new("encoded", StoredEmbedding::Encoded("[2.0, 2.0]".to_string())),
    ];

    let outcome = rank(&query, &candidates, 5, None);
    assert_eq!(ids(&outcome), vec!["encoded", "good"]);
    assert_eq!(outcome.matches[0].embedding, vec![2.0, 2.0]);

    let rejected = outcome
        .rejected
        .iter()
        .map(|r| (r.id.as_str(), &r.error))
        .collect::<Vec<_>>();
    assert_eq!(rejected.len(), 3);
    assert_eq!(
        rejected[0],
        (
            "short",
            &RankError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        )
    );
    assert_eq!(rejected[1], ("zero", &RankError::ZeroMagnitudeVector));
    assert_eq!(rejected[2].0, "garbled");
    assert!(matches!(rejected[2].1, RankError::EmbeddingDecodeFailure { .. }));
}

#[test]
fn ties_keep_input_order() {
    let query = vec![0.0, 1.0];
    let candidates = vec![
        record("first", "a", vec![0.0, 3.0]),
        record("second", "a", vec![0.0, 1.0]),
        record("third", "a", vec![0.0, 7.5]),
    ];
    let outcome = rank(&query, &candidates, 3, None);
    assert_eq!(ids(&outcome), vec!["first", "second", "third"]);
}

#[test]
fn zero_k_and_zero_query_yield_no_matches() {
    let candidates = vec![record("a", "a", vec![1.0, 0.0])];
    assert_eq!(rank(&[1.0, 0.0], &candidates, 0, None), RankOutcome::default());

    let outcome = rank(&[0.0, 0.0], &candidates, 3, None);
    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.rejected[0].error, RankError::ZeroMagnitudeVector);
}

#[test]
fn outcome_serializes_for_clients() {
    let candidates = vec![
        record("a", "notes.pdf", vec![1.0, 0.0]).with_content("mitochondria"),
        record("b", "notes.pdf", vec![1.0]),
    ];
    let outcome = rank(&[1.0, 0.0], &candidates, 1, None);
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["matches"][0]["id"], "a");
    assert_eq!(json["matches"][0]["content"], "mitochondria");
    assert_eq!(json["matches"][0]["metadata"]["file_name"], "notes.pdf");
    assert_eq!(json["rejected"][0]["id"], "b");
    assert_eq!(json["rejected"][0]["error"]["kind"], "dimension_mismatch");
}
