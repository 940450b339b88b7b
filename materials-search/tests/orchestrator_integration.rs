//! Integration tests for the aggregation pipeline.
//!
//! These tests exercise the full fan-out → contain → merge → dedup → rank →
//! paginate pipeline against a real dataset file and a mock remote service
//! (wiremock), so no external network calls are made.

use materials_search::{
    Aggregator, DatasetScope, LocalConfig, RangeFilter, RemoteConfig, SearchConfig, SearchParams,
    SearchQuery, Source,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

const LOCAL_DATASET: &str = r#"[
    {"id": "ml_001", "formula": "Al2O3", "name": "Alumina (candidate)", "spacegroup": "R-3c",
     "band_gap": 8.5, "density": 3.95, "fracture_toughness": 3.5,
     "tags": ["oxide", "ceramic", "aerospace"]},
    {"id": "ml_002", "formula": "Ni3Al", "name": "gamma-prime intermetallic", "spacegroup": "Pm-3m",
     "band_gap": 0.0, "density": 7.6, "fracture_toughness": 20.0,
     "tags": ["intermetallic", "superalloy"]},
    {"id": "ml_003", "formula": "Ga2O3", "band_gap": 4.8, "density": 5.88,
     "tags": ["al2o3-like", "oxide"]},
    {"id": "ml_004", "formula": "SiC", "name": "Silicon Carbide", "spacegroup": "F-43m",
     "band_gap": 2.3, "density": 3.21, "mp_id": "mp-8062", "tags": ["carbide", "ceramic"]}
]"#;

fn remote_docs() -> Value {
    json!({
        "data": [
            {
                "material_id": "mp-8062",
                "formula_pretty": "SiC",
                "band_gap": 2.37,
                "density": 3.22,
                "symmetry": {"symbol": "F-43m"}
            },
            {
                "material_id": "mp-2133",
                "formula_pretty": "ZnO",
                "band_gap": 0.73,
                "density": 5.5,
                "symmetry": {"symbol": "P6_3mc"},
                "elasticity": {"K_VRH": 130.0, "G_VRH": 45.0}
            },
            {
                "material_id": "mp-1143",
                "formula_pretty": "Al2O3",
                "band_gap": 5.85,
                "density": 3.99,
                "symmetry": {"symbol": "R-3c"}
            }
        ]
    })
}

/// Write `dataset` to a temp file and build an aggregator pointed at it
/// and at `server`.
fn build(dataset: &str, server: &MockServer, api_key: Option<&str>) -> (TempDir, Aggregator) {
    let dir = tempfile::tempdir().expect("tempdir");
    let dataset_path = dir.path().join("local_materials.json");
    std::fs::write(&dataset_path, dataset).expect("write dataset");

    let config = SearchConfig {
        local: LocalConfig { dataset_path },
        remote: RemoteConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_owned),
            ..Default::default()
        },
    };
    let aggregator = Aggregator::from_config(&config).expect("valid config");
    (dir, aggregator)
}

async fn mount_docs(server: &MockServer, docs: Value) {
    Mock::given(method("POST"))
        .and(path("/materials/summary"))
        .and(header("X-API-KEY", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(docs))
        .mount(server)
        .await;
}

fn formulas(items: &[materials_search::Record]) -> Vec<&str> {
    items.iter().map(|r| r.formula.as_str()).collect()
}

#[tokio::test]
async fn cross_source_duplicate_appears_once_from_local() {
    let server = MockServer::start().await;
    mount_docs(&server, remote_docs()).await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let result = aggregator.search(&SearchQuery::default()).await;

    let sic: Vec<_> = result.items.iter().filter(|r| r.formula == "SiC").collect();
    assert_eq!(sic.len(), 1);
    assert_eq!(sic[0].source, Source::Local);
    assert_eq!(sic[0].id, "ml_004");
    // 4 local + 3 remote, minus the shared mp-8062.
    assert_eq!(result.total, 6);
}

#[tokio::test]
async fn same_formula_without_shared_id_is_kept_from_both_sources() {
    let server = MockServer::start().await;
    mount_docs(&server, remote_docs()).await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let query = SearchQuery {
        text: Some("al2o3".into()),
        ..Default::default()
    };
    let result = aggregator.search(&query).await;

    let sources: Vec<Source> = result
        .items
        .iter()
        .filter(|r| r.formula == "Al2O3")
        .map(|r| r.source)
        .collect();
    assert_eq!(sources, [Source::Remote, Source::Local]);
}

#[tokio::test]
async fn exact_formula_outranks_partial_match() {
    let server = MockServer::start().await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, None);

    let query = SearchQuery {
        text: Some("Al2O3".into()),
        dataset: DatasetScope::Local,
        ..Default::default()
    };
    let result = aggregator.search(&query).await;

    assert_eq!(formulas(&result.items), ["Al2O3", "Ga2O3"]);
    assert_eq!(result.items[0].id, "ml_001");
}

#[tokio::test]
async fn repeated_query_is_idempotent() {
    let server = MockServer::start().await;
    mount_docs(&server, remote_docs()).await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let query = SearchQuery {
        text: Some("o".into()),
        page_size: 3,
        ..Default::default()
    };
    let first = aggregator.search(&query).await;
    let second = aggregator.search(&query).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn band_gap_filter_scenario() {
    let server = MockServer::start().await;
    let dataset = r#"[
        {"formula": "SiC", "band_gap": 2.3},
        {"formula": "ZrO2"}
    ]"#;
    let (_dir, aggregator) = build(dataset, &server, None);

    let params = SearchParams {
        band_gap_min: Some("1".into()),
        dataset: Some("local".into()),
        ..Default::default()
    };
    let result = aggregator.search_params(&params).await.expect("valid params");
    assert_eq!(result.total, 1);
    assert_eq!(formulas(&result.items), ["SiC"]);
}

#[tokio::test]
async fn range_bounds_are_inclusive_and_absence_excludes() {
    let server = MockServer::start().await;
    let dataset = r#"[
        {"id": "lo", "formula": "A", "density": 2.0},
        {"id": "hi", "formula": "B", "density": 4.0},
        {"id": "out", "formula": "C", "density": 4.5},
        {"id": "none", "formula": "D"}
    ]"#;
    let (_dir, aggregator) = build(dataset, &server, None);

    let query = SearchQuery {
        density: RangeFilter::new(Some(2.0), Some(4.0)),
        ..Default::default()
    };
    let result = aggregator.search(&query).await;
    let ids: Vec<&str> = result.items.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["lo", "hi"]);

    let unfiltered = aggregator.search(&SearchQuery::default()).await;
    assert_eq!(unfiltered.total, 4);
}

#[tokio::test]
async fn pagination_boundaries() {
    let server = MockServer::start().await;
    let entries: Vec<Value> = (0..150)
        .map(|i| json!({"id": format!("m{i}"), "formula": format!("X{i}")}))
        .collect();
    let dataset = serde_json::to_string(&entries).expect("serialize");
    let (_dir, aggregator) = build(&dataset, &server, None);

    let clamped = aggregator
        .search(&SearchQuery {
            page_size: 500,
            ..Default::default()
        })
        .await;
    assert_eq!(clamped.total, 150);
    assert_eq!(clamped.items.len(), 100);

    let page_zero = aggregator
        .search(&SearchQuery {
            page: 0,
            ..Default::default()
        })
        .await;
    let page_negative = aggregator
        .search(&SearchQuery {
            page: -2,
            ..Default::default()
        })
        .await;
    let page_one = aggregator.search(&SearchQuery::default()).await;
    assert_eq!(page_zero, page_one);
    assert_eq!(page_negative, page_one);
    assert_eq!(page_one.items[0].id, "m0");

    let beyond = aggregator
        .search(&SearchQuery {
            page: 99,
            ..Default::default()
        })
        .await;
    assert_eq!(beyond.total, 150);
    assert!(beyond.items.is_empty());
}

#[tokio::test]
async fn remote_failure_yields_local_only_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/materials/summary"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let query = SearchQuery {
        text: Some("ceramic".into()),
        ..Default::default()
    };
    let all = aggregator.search(&query).await;
    let local_only = aggregator
        .search(&SearchQuery {
            dataset: DatasetScope::Local,
            ..query.clone()
        })
        .await;

    assert_eq!(all.total, 2);
    assert_eq!(all, local_only);
}

#[tokio::test]
async fn malformed_remote_body_is_contained() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/materials/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let result = aggregator.search(&SearchQuery::default()).await;
    assert_eq!(result.total, 4);
}

#[tokio::test]
async fn missing_dataset_yields_remote_only_result() {
    let server = MockServer::start().await;
    mount_docs(&server, remote_docs()).await;
    let (dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));
    drop(dir);

    let result = aggregator.search(&SearchQuery::default()).await;
    assert_eq!(result.total, 3);
    assert!(result.items.iter().all(|r| r.source == Source::Remote));
}

#[tokio::test]
async fn no_credential_means_no_remote_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_docs()))
        .expect(0)
        .mount(&server)
        .await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, None);

    let result = aggregator
        .search(&SearchQuery {
            dataset: DatasetScope::Remote,
            ..Default::default()
        })
        .await;
    assert_eq!(result.total, 0);
}

#[tokio::test]
async fn remote_request_carries_criteria() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/materials/summary"))
        .and(header("X-API-KEY", API_KEY))
        .and(body_partial_json(json!({
            "criteria": {"formula": "ZnO", "band_gap_min": 0.5, "density_max": 6.0}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(remote_docs()))
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let params = SearchParams {
        q: Some("ZnO".into()),
        dataset: Some("remote".into()),
        band_gap_min: Some("0.5".into()),
        dens_max: Some("6".into()),
        ..Default::default()
    };
    let result = aggregator.search_params(&params).await.expect("valid params");

    // The mock ignores criteria, so every doc comes back; the range filters
    // are re-applied locally and the exact formula match ranks first.
    assert_eq!(result.items[0].formula, "ZnO");
    assert_eq!(result.items[0].props["K_VRH"], materials_search::PropValue::Number(130.0));
    assert_eq!(result.total, 3);
}

#[tokio::test]
async fn remote_results_refiltered_locally() {
    let server = MockServer::start().await;
    mount_docs(&server, remote_docs()).await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let query = SearchQuery {
        dataset: DatasetScope::Remote,
        band_gap: RangeFilter::new(Some(1.0), Some(3.0)),
        ..Default::default()
    };
    let result = aggregator.search(&query).await;
    assert_eq!(formulas(&result.items), ["SiC"]);

    let toughness = SearchQuery {
        dataset: DatasetScope::Remote,
        fracture_toughness: RangeFilter::new(Some(0.0), None),
        ..Default::default()
    };
    assert_eq!(aggregator.search(&toughness).await.total, 0);
}

#[tokio::test]
async fn slow_remote_does_not_lose_local_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/materials/summary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(remote_docs())
                .set_delay(std::time::Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, Some(API_KEY));

    let result = aggregator.search(&SearchQuery::default()).await;
    assert_eq!(result.total, 6);
    // Remote records get the source bonus with no text term, so they lead.
    assert_eq!(result.items[0].source, Source::Remote);
}

#[tokio::test]
async fn invalid_input_is_surfaced() {
    let server = MockServer::start().await;
    let (_dir, aggregator) = build(LOCAL_DATASET, &server, None);

    for params in [
        SearchParams {
            dataset: Some("mp".into()),
            ..Default::default()
        },
        SearchParams {
            tough_max: Some("very".into()),
            ..Default::default()
        },
        SearchParams {
            page_size: Some("ten".into()),
            ..Default::default()
        },
    ] {
        let err = aggregator.search_params(&params).await.unwrap_err();
        assert!(err.is_input_fault(), "expected input fault, got {err}");
    }
}
