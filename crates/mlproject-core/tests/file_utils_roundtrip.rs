//! Integration tests for the file utilities through the public API.
//!
//! Each test gets its own scratch directory and a standalone `LogSink`, so
//! the tests can run in parallel without sharing a log file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mlproject_core::{ConfigBox, FileUtils, LogConfig, LogSink, UtilsError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

struct Workspace {
    root: PathBuf,
    files: FileUtils,
}

impl Workspace {
    fn new() -> Self {
        let root = std::env::temp_dir().join(format!("mlproject_it_{}", Uuid::new_v4()));
        let config = LogConfig {
            stdout: false,
            ..LogConfig::in_dir(root.join("logs"))
        };
        let files = FileUtils::new(LogSink::open(&config).expect("open sink"));
        Self { root, files }
    }

    fn join(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    fn log(&self) -> String {
        self.files.sink().flush().unwrap();
        std::fs::read_to_string(self.files.sink().path()).unwrap()
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

fn write(path: &Path, text: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

// ── YAML ──────────────────────────────────────────────────────────────────────

#[test]
fn test_read_yaml_exposes_pairs_by_key_and_by_path() {
    // Arrange
    let ws = Workspace::new();
    let path = ws.join("config/config.yaml");
    write(
        &path,
        "\
artifacts_root: artifacts
data_validation:
  root_dir: artifacts/data_validation
  STATUS_FILE: artifacts/data_validation/status.txt
ElasticNet:
  alpha: 0.2
  l1_ratio: 0.1
",
    );

    // Act
    let cfg = ws.files.read_yaml(&path).unwrap();

    // Assert
    assert_eq!(cfg["artifacts_root"], "artifacts");
    assert_eq!(cfg.path("artifacts_root").unwrap(), "artifacts");
    assert_eq!(
        cfg["data_validation"]["STATUS_FILE"],
        "artifacts/data_validation/status.txt"
    );
    assert_eq!(
        cfg.get_str("data_validation.root_dir").unwrap(),
        "artifacts/data_validation"
    );
    let net = cfg.get_box("ElasticNet").unwrap();
    assert_eq!(net.get_f64("alpha").unwrap(), 0.2);
    assert_eq!(net.get_f64("l1_ratio").unwrap(), 0.1);
}

#[test]
fn test_read_yaml_missing_file_error_is_recorded_at_error_severity() {
    let ws = Workspace::new();
    let path = ws.join("config/absent.yaml");

    let err = ws.files.read_yaml(&path).unwrap_err();

    let log = ws.log();
    let error_line = log
        .lines()
        .find(|l| l.contains(": ERROR: "))
        .expect("an ERROR record");
    assert!(error_line.contains(&err.to_string()), "line: {error_line}");
}

#[test]
fn test_read_yaml_top_level_scalar_is_value_conversion() {
    let ws = Workspace::new();
    let path = ws.join("scalar.yaml");
    write(&path, "42\n");

    let err = ws.files.read_yaml(&path).unwrap_err();

    assert!(matches!(err, UtilsError::ValueConversion(_)), "got {err:?}");
}

#[test]
fn test_read_yaml_infinite_value_is_rejected_not_nulled() {
    let ws = Workspace::new();
    let path = ws.join("params.yaml");
    write(&path, "search:\n  upper: .inf\n");

    let err = ws.files.read_yaml(&path).unwrap_err();

    assert!(matches!(err, UtilsError::ValueConversion(_)), "got {err:?}");
    assert!(!ws.log().contains("loaded successfully"));
}

// ── Directories ───────────────────────────────────────────────────────────────

#[test]
fn test_create_directories_twice_leaves_exactly_the_requested_dirs() {
    // Arrange
    let ws = Workspace::new();
    let base = ws.join("artifacts");
    let dirs = [base.join("p1"), base.join("p2")];

    // Act
    ws.files.create_directories(&dirs, true).unwrap();
    ws.files.create_directories(&dirs, true).unwrap();

    // Assert
    let mut names: Vec<String> = std::fs::read_dir(&base)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["p1", "p2"]);
}

// ── JSON ──────────────────────────────────────────────────────────────────────

#[test]
fn test_load_json_returns_what_save_json_wrote() {
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.root).unwrap();
    let path = ws.join("metrics.json");
    let data = serde_json::json!({
        "rmse": 0.7302,
        "mae": 0.5711,
        "r2": 0.1098,
        "params": { "alpha": 0.2, "l1_ratio": 0.1 },
        "features": ["alcohol", "sulphates"],
        "converged": true,
        "notes": null
    });

    ws.files.save_json(&path, &data).unwrap();
    let loaded = ws.files.load_json(&path).unwrap();

    assert_eq!(loaded.into_value(), data);
}

#[test]
fn test_save_json_accepts_serializable_structs() {
    #[derive(Serialize)]
    struct Metrics {
        rmse: f64,
        mae: f64,
    }

    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.root).unwrap();
    let path = ws.join("scores.json");

    ws.files
        .save_json(&path, &Metrics { rmse: 0.5, mae: 0.25 })
        .unwrap();

    let loaded = ws.files.load_json(&path).unwrap();
    assert_eq!(loaded.get_f64("rmse").unwrap(), 0.5);
    assert_eq!(loaded.keys().collect::<Vec<_>>(), ["rmse", "mae"]);
}

// ── Binary artifacts ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Scaler {
    Standard { mean: Vec<f64>, std: Vec<f64> },
    Identity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Pipeline {
    name: String,
    scaler: Scaler,
    weights: BTreeMap<String, Vec<f32>>,
    classes: Option<Vec<u8>>,
}

#[test]
fn test_load_bin_reconstructs_nested_custom_value() {
    // Arrange
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.root).unwrap();
    let path = ws.join("model.joblib");
    let mut weights = BTreeMap::new();
    weights.insert("layer0".to_string(), vec![0.5, -0.25, 1.0]);
    weights.insert("layer1".to_string(), vec![]);
    let original = Pipeline {
        name: "wine-quality".to_string(),
        scaler: Scaler::Standard {
            mean: vec![10.4, 3.3],
            std: vec![1.06, 0.15],
        },
        weights,
        classes: Some(vec![3, 4, 5, 6, 7, 8]),
    };

    // Act
    ws.files.save_bin(&original, &path).unwrap();
    let restored: Pipeline = ws.files.load_bin(&path).unwrap();

    // Assert
    assert_eq!(restored, original);
}

#[test]
fn test_load_bin_reconstructs_plain_containers() {
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.root).unwrap();
    let path = ws.join("split.bin");
    let original: (Vec<u32>, Vec<u32>, Option<String>) =
        (vec![0, 2, 4], vec![1, 3], Some("seed=42".to_string()));

    ws.files.save_bin(&original, &path).unwrap();
    let restored: (Vec<u32>, Vec<u32>, Option<String>) = ws.files.load_bin(&path).unwrap();

    assert_eq!(restored, original);
}

#[test]
fn test_load_bin_reconstructs_config_box_and_json_value() {
    // Arrange
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.root).unwrap();
    let cfg = ConfigBox::from_yaml_str("model:\n  alpha: 0.2\n  stages: [split, train]\n").unwrap();
    let doc = serde_json::json!({ "k": [1, 2], "nested": { "ok": true, "none": null } });

    // Act
    ws.files.save_bin(&cfg, ws.join("cfg.bin")).unwrap();
    ws.files.save_bin(&doc, ws.join("doc.bin")).unwrap();
    let cfg_back: ConfigBox = ws.files.load_bin(ws.join("cfg.bin")).unwrap();
    let doc_back: serde_json::Value = ws.files.load_bin(ws.join("doc.bin")).unwrap();

    // Assert
    assert_eq!(cfg_back, cfg);
    assert_eq!(doc_back, doc);
}

#[test]
fn test_load_bin_reconstructs_tagged_and_flattened_types() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(tag = "kind")]
    enum Estimator {
        ElasticNet { alpha: f64, l1_ratio: f64 },
        Mean,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Run {
        estimator: Estimator,
        #[serde(flatten)]
        extra: BTreeMap<String, f64>,
    }

    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.root).unwrap();
    let path = ws.join("run.bin");
    let mut extra = BTreeMap::new();
    extra.insert("rmse".to_string(), 0.73);
    extra.insert("upper".to_string(), f64::INFINITY);
    let run = Run {
        estimator: Estimator::ElasticNet { alpha: 0.2, l1_ratio: 0.1 },
        extra,
    };

    ws.files.save_bin(&run, &path).unwrap();
    let restored: Run = ws.files.load_bin(&path).unwrap();

    assert_eq!(restored, run);
}

#[test]
fn test_save_json_non_finite_value_fails_without_writing() {
    let ws = Workspace::new();
    std::fs::create_dir_all(&ws.root).unwrap();
    let path = ws.join("metrics.json");

    let mut metrics = BTreeMap::new();
    metrics.insert("rmse", f64::INFINITY);
    let err = ws.files.save_json(&path, &metrics).unwrap_err();

    assert!(matches!(err, UtilsError::Json { .. }), "got {err:?}");
    assert!(!path.exists());
}

#[test]
fn test_load_bin_missing_file_is_io_error() {
    let ws = Workspace::new();
    let err = ws.files.load_bin::<Scaler>(ws.join("gone.bin")).unwrap_err();
    assert!(matches!(err, UtilsError::Io { .. }));
}

// ── Size ──────────────────────────────────────────────────────────────────────

#[test]
fn test_get_size_of_2048_byte_file() {
    let ws = Workspace::new();
    let path = ws.join("data/winequality.csv");
    write(&path, &"x".repeat(2048));

    assert_eq!(ws.files.get_size(&path).unwrap(), "2.0 KB");
}

#[test]
fn test_get_size_rounds_exact_ties_to_even() {
    let ws = Workspace::new();
    let cases = [(128, "0.12 KB"), (640, "0.62 KB"), (1152, "1.12 KB")];

    for (bytes, expected) in cases {
        let path = ws.join(&format!("blob_{bytes}.bin"));
        write(&path, &"x".repeat(bytes));
        assert_eq!(ws.files.get_size(&path).unwrap(), expected, "{bytes} bytes");
    }
}

// ── Boundary validation ───────────────────────────────────────────────────────

#[test]
fn test_every_operation_rejects_an_empty_path_before_io() {
    let ws = Workspace::new();
    let empty = Path::new("");

    let results = [
        ws.files.read_yaml(empty).map(|_| ()),
        ws.files.create_directories(&[empty], true),
        ws.files.save_json(empty, &serde_json::json!({})),
        ws.files.load_json(empty).map(|_| ()),
        ws.files.save_bin(&1u8, empty),
        ws.files.load_bin::<u8>(empty).map(|_| ()),
        ws.files.get_size(empty).map(|_| ()),
    ];

    for result in results {
        assert!(matches!(result, Err(ref e) if e.is_type_mismatch()), "got {result:?}");
    }
    assert!(ws.log().is_empty(), "nothing may be logged before validation passes");
}
