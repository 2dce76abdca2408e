use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use routedb_core::config::{resolve_with_base, Config};
use routedb_core::error::Error;
use routedb_core::types::VectorizerConfig;
use routedb_core::data_processor::{route_text, DataProcessor};

fn fixture_dir() -> PathBuf {
    // crates/routedb-core -> crates -> repo root
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2).unwrap().join("test_data/openflights")
}

#[test]
fn load_dataset_from_fixture() {
    let ds = DataProcessor::new().load_dataset(&fixture_dir()).expect("load");
    assert_eq!(ds.airports.len(), 7);
    assert_eq!(ds.airlines.len(), 6);
    // the row with a null source_id is dropped
    assert_eq!(ds.routes.len(), 7);

    let first = &ds.routes[0];
    assert_eq!(first.id, 1);
    assert_eq!(first.carrier_code, "AA");
    assert_eq!(first.route_text, "JFK-LAX");
    assert_eq!(first.equipment.as_deref(), Some("32B 762"));

    let no_airline = ds.routes.iter().find(|r| r.carrier_code == "XX").expect("XX route");
    assert_eq!(no_airline.airline_id, None);
    assert_eq!(no_airline.id, 7);

    let unnamed = ds.airports.iter().find(|a| a.id == 5555).expect("airport 5555");
    assert_eq!(unnamed.iata, None);
    assert_eq!(unnamed.latitude, None);

    let af = ds.airlines.iter().find(|a| a.id == 137).expect("air france");
    assert!(!af.active);
}

#[test]
fn locate_reports_missing_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("airports.dat"), "").unwrap();
    fs::write(tmp.path().join("airlines.dat"), "").unwrap();
    let err = DataProcessor::new().locate(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("routes.dat"), "{err}");
}

#[test]
fn locate_finds_nested_files() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("openflights");
    fs::create_dir_all(&nested).unwrap();
    for f in ["airports.dat", "airlines.dat", "routes.dat"] { fs::write(nested.join(f), "").unwrap(); }
    let files = DataProcessor::new().locate(tmp.path()).expect("locate");
    assert!(files.routes.starts_with(&nested));
}

#[test]
fn read_routes_uppercases_route_text() {
    let csv = "aa,24,jfk,3797,lax,3484,,0,\n";
    let routes = DataProcessor::new().read_routes(csv.as_bytes()).unwrap();
    assert_eq!(routes[0].route_text, "JFK-LAX");
    // codes themselves are kept verbatim
    assert_eq!(routes[0].source_code, "jfk");
    assert_eq!(route_text(" bos", "sfo "), "BOS-SFO");
}

#[test]
fn config_reads_toml_and_resolves_paths() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[data]\nraw_dir = \"raw\"\n[vectorizer]\nmin_n = 3\nmax_n = 4\nmax_features = 64\n",
    )
    .unwrap();
    let config = Config::load_from(tmp.path()).expect("config");
    assert_eq!(config.path_or("data.raw_dir", "unused"), tmp.path().join("raw"));
    assert_eq!(config.path_or("data.index_dir", "idx"), tmp.path().join("idx"));
    let v = config.vectorizer().unwrap();
    assert_eq!((v.min_n, v.max_n, v.max_features), (3, 4, Some(64)));
    assert_eq!(config.cors_origins(), vec!["*".to_string()]);
}

#[test]
fn config_rejects_inverted_ngram_range() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[vectorizer]\nmin_n = 5\nmax_n = 2\n").unwrap();
    assert!(Config::load_from(tmp.path()).is_err());
}

#[test]
fn config_rejects_malformed_vectorizer_values() {
    for body in [
        "[vectorizer]\nmin_n = \"two\"\n",
        "[vectorizer]\nmax_n = -3\n",
        "[vectorizer]\nmax_features = 1.5\n",
    ] {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), body).unwrap();
        let err = Config::load_from(tmp.path()).err().unwrap_or_else(|| panic!("accepted {body:?}"));
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfig(_))), "{body:?}: {err}");
    }
}

#[test]
fn missing_vectorizer_keys_fall_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[vectorizer]\nmax_n = 4\n").unwrap();
    let cfg = Config::load_from(tmp.path()).unwrap().vectorizer().unwrap();
    assert_eq!(cfg, VectorizerConfig { min_n: 2, max_n: 4, max_features: None });
}

#[test]
fn resolve_keeps_absolute_paths() {
    let abs = if cfg!(windows) { "C:\\data" } else { "/data" };
    assert_eq!(resolve_with_base(std::path::Path::new("/base"), abs), PathBuf::from(abs));
    assert_eq!(resolve_with_base(std::path::Path::new("/base"), "rel"), PathBuf::from("/base/rel"));
}
