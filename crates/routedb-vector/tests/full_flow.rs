use routedb_core::error::Error;
use routedb_core::traits::{ExcludeFn, SimilaritySearch};
use routedb_core::types::{RouteRecord, VectorizerConfig};
use std::collections::BTreeMap;

use routedb_vector::snapshot::{read_attachment, read_manifest, write_json_checked, INDEX_FILE, MANIFEST_FILE};
use routedb_vector::SimilarityIndex;

fn route(id: usize, carrier: &str, s: &str, d: &str) -> RouteRecord {
    RouteRecord {
        id,
        carrier_code: carrier.to_string(),
        airline_id: None,
        source_code: s.to_string(),
        source_id: id as i64,
        dest_code: d.to_string(),
        dest_id: id as i64 + 100,
        codeshare: None,
        stops: 0,
        equipment: None,
        route_text: format!("{s}-{d}"),
    }
}

fn scenario() -> SimilarityIndex {
    SimilarityIndex::build(
        vec![route(1, "AA", "JFK", "LAX"), route(2, "UA", "JFK", "SFO"), route(3, "DL", "BOS", "LAX")],
        VectorizerConfig::default(),
    )
    .expect("build")
}

#[test]
fn every_route_is_its_own_best_match() {
    let corpus = vec![
        route(1, "AA", "JFK", "LAX"), route(2, "UA", "JFK", "SFO"), route(3, "DL", "BOS", "LAX"),
        route(4, "BA", "LHR", "JFK"), route(5, "AF", "CDG", "JFK"), route(6, "AA", "LAX", "JFK"),
    ];
    let idx = SimilarityIndex::build(corpus.clone(), VectorizerConfig::default()).unwrap();
    for (i, r) in corpus.iter().enumerate() {
        let hits = idx.nearest_to_text(&r.route_text, corpus.len()).unwrap();
        let own = hits.iter().find(|h| h.index == i).expect("self present");
        assert!((own.score - 1.0).abs() < 1e-6, "{} self score {}", r.route_text, own.score);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }
}

#[test]
fn scenario_ranks_exact_route_first() {
    let idx = scenario();
    let hits = idx.nearest_to_text("JFK-LAX", 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].index, 0);
    assert!((hits[0].score - 1.0).abs() < 1e-6);
    assert!(hits[1].index == 1 || hits[1].index == 2);
    assert!(hits[1].score > 0.0 && hits[1].score < hits[0].score);
}

#[test]
fn results_are_sorted_bounded_and_in_unit_range() {
    let idx = scenario();
    for (q, k) in [("JFK-LAX", 1), ("BOS-SFO", 2), ("ORD-MIA", 3), ("JFK-LAX", 10)] {
        let hits = idx.nearest_to_text(q, k).unwrap();
        assert!(hits.len() <= k && hits.len() <= idx.len());
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(hits.iter().all(|h| (0.0..=1.0).contains(&h.score)));
    }
    // k larger than the corpus returns everything
    assert_eq!(idx.nearest_to_text("JFK-LAX", 10).unwrap().len(), 3);
}

#[test]
fn unrelated_query_scores_zero_not_negative() {
    let idx = scenario();
    let hits = idx.nearest_to_text("QQQ ZZZ", 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert!(hits.iter().all(|h| h.score == 0.0));
    // all tied at zero: insertion order
    assert_eq!(hits.iter().map(|h| h.index).collect::<Vec<_>>(), vec![0, 1, 2]);
}

#[test]
fn zero_top_k_is_invalid() {
    let idx = scenario();
    assert!(matches!(idx.nearest_to_text("JFK-LAX", 0), Err(Error::InvalidQuery(_))));
}

#[test]
fn exclude_predicate_drops_candidates() {
    let idx = scenario();
    let q = idx.vectorizer().transform("JFK-LAX");
    let skip_self: ExcludeFn<'_> = &|r: &RouteRecord| r.route_text == "JFK-LAX";
    let hits = SimilaritySearch::nearest_to(&idx, &q, Some(skip_self), 3).unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.index != 0));
}

#[test]
fn repeated_queries_are_identical() {
    let idx = scenario();
    let a = idx.nearest_to_text("JFK-LAX", 3).unwrap();
    let b = idx.nearest_to_text("JFK-LAX", 3).unwrap();
    assert_eq!(a, b);
    let rebuilt = scenario();
    assert_eq!(a, rebuilt.nearest_to_text("JFK-LAX", 3).unwrap());
}

#[test]
fn snapshot_round_trip_preserves_rankings() {
    let tmp = tempfile::tempdir().unwrap();
    let idx = scenario();
    let manifest = idx.save(tmp.path()).expect("save");
    assert_eq!(manifest.records, 3);
    assert_eq!(read_manifest(tmp.path()).unwrap(), Some(manifest.clone()));

    let loaded = SimilarityIndex::load(tmp.path()).expect("load");
    assert_eq!(loaded.model_id(), idx.model_id());
    assert_eq!(loaded.records(), idx.records());
    for q in ["JFK-LAX", "BOS-SFO", "LHR-CDG"] {
        assert_eq!(loaded.nearest_to_text(q, 3).unwrap(), idx.nearest_to_text(q, 3).unwrap());
    }
}

#[test]
fn load_without_snapshot_is_unknown_model() {
    let tmp = tempfile::tempdir().unwrap();
    let err = SimilarityIndex::load(tmp.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::UnknownModel(_))), "{err}");
}

#[test]
fn tampered_snapshot_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    scenario().save(tmp.path()).unwrap();
    let path = tmp.path().join(INDEX_FILE);
    let mut text = std::fs::read_to_string(&path).unwrap();
    text = text.replacen("JFK-LAX", "JFK-LAS", 1);
    std::fs::write(&path, text).unwrap();
    let err = SimilarityIndex::load(tmp.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Operation(_))), "{err}");
}

#[test]
fn manifest_checksum_must_match_index_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut manifest = scenario().save(tmp.path()).unwrap();
    manifest.checksum = "0".repeat(64);
    std::fs::write(tmp.path().join(MANIFEST_FILE), serde_json::to_vec(&manifest).unwrap()).unwrap();
    let err = SimilarityIndex::load(tmp.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Operation(_))), "{err}");
}

#[test]
fn attachments_are_bound_to_their_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let checksum = write_json_checked(&tmp.path().join("extra.json"), &vec![1, 2, 3]).unwrap();
    let manifest = scenario()
        .save_with(tmp.path(), BTreeMap::from([("extra.json".to_string(), checksum)]))
        .unwrap();
    let extra: Vec<i32> = read_attachment(tmp.path(), &manifest, "extra.json").unwrap();
    assert_eq!(extra, vec![1, 2, 3]);

    // rewritten after the manifest: no longer part of the snapshot
    write_json_checked(&tmp.path().join("extra.json"), &vec![4]).unwrap();
    let err = read_attachment::<Vec<i32>>(tmp.path(), &manifest, "extra.json").unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Operation(_))), "{err}");

    let err = read_attachment::<Vec<i32>>(tmp.path(), &manifest, "missing.json").unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Operation(_))), "{err}");
}
