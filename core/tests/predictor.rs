use reimburse_core::{
    predictor::{ForestArtifact, RegressionTree, TreeNode, FEATURES, FOREST_FORMAT},
    ForestModel, Predictor, ReimburseError, TripInput,
};
use std::path::PathBuf;

const SMALL_FOREST: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/forest_small.json");

fn trip(days: i64, miles: f64, receipts: f64) -> TripInput {
    TripInput::new(days, miles, receipts).expect("valid trip")
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("reimburse-{}-{name}", std::process::id()));
    std::fs::write(&path, content).expect("write temp file");
    path
}

fn artifact(trees: Vec<RegressionTree>) -> ForestArtifact {
    ForestArtifact {
        format:   FOREST_FORMAT.into(),
        version:  1,
        features: FEATURES.iter().map(|f| f.to_string()).collect(),
        trees,
    }
}

#[test]
fn forest_averages_tree_leaves() {
    let model = ForestModel::load(SMALL_FOREST).expect("fixture loads");
    assert_eq!(model.tree_count(), 2);

    assert_eq!(model.predict(&trip(3, 100.0, 200.0)), 350.0);
    assert_eq!(model.predict(&trip(5, 0.0, 0.0)), 750.0);
    assert_eq!(model.predict(&trip(1, 600.0, 0.0)), 550.0);
    assert_eq!(model.predict(&trip(5, 600.0, 5_000.0)), 1_350.0);
}

#[test]
fn split_threshold_goes_left_on_equality() {
    let model = ForestModel::load(SMALL_FOREST).expect("fixture loads");
    assert_eq!(model.predict(&trip(1, 0.0, 1_000.0)), 350.0);
    assert_eq!(model.predict(&trip(1, 0.0, 1_000.01)), 950.0);
}

#[test]
fn missing_artifact_is_model_unavailable() {
    let err = ForestModel::load("/nonexistent/forest.json").unwrap_err();
    assert!(matches!(err, ReimburseError::ModelUnavailable { .. }), "got {err}");
}

#[test]
fn corrupt_artifact_is_model_unavailable() {
    let path = temp_file("corrupt.json", "{ not json");
    let err = ForestModel::load(&path).unwrap_err();
    assert!(matches!(err, ReimburseError::ModelUnavailable { .. }), "got {err}");
    let _ = std::fs::remove_file(path);
}

#[test]
fn wrong_version_is_rejected() {
    let content = std::fs::read_to_string(SMALL_FOREST)
        .expect("read fixture")
        .replace("\"version\": 1", "\"version\": 2");
    let path = temp_file("v2.json", &content);
    let err = ForestModel::load(&path).unwrap_err();
    assert!(err.to_string().contains("unsupported version 2"), "got {err}");
    let _ = std::fs::remove_file(path);
}

#[test]
fn backward_child_pointer_is_rejected() {
    let looping = RegressionTree {
        nodes: vec![
            TreeNode::Split { feature: 0, threshold: 1.0, left: 1, right: 0 },
            TreeNode::Leaf { value: 1.0 },
        ],
    };
    let err = ForestModel::from_artifact(artifact(vec![looping])).unwrap_err();
    assert!(err.contains("not a later node"), "got {err}");
}

#[test]
fn structural_problems_are_rejected() {
    assert!(ForestModel::from_artifact(artifact(vec![])).is_err());
    assert!(ForestModel::from_artifact(artifact(vec![RegressionTree { nodes: vec![] }])).is_err());

    let bad_feature = RegressionTree {
        nodes: vec![
            TreeNode::Split { feature: 3, threshold: 1.0, left: 1, right: 2 },
            TreeNode::Leaf { value: 1.0 },
            TreeNode::Leaf { value: 2.0 },
        ],
    };
    assert!(ForestModel::from_artifact(artifact(vec![bad_feature])).is_err());

    let bad_leaf = RegressionTree { nodes: vec![TreeNode::Leaf { value: f64::INFINITY }] };
    assert!(ForestModel::from_artifact(artifact(vec![bad_leaf])).is_err());

    let mut reordered = artifact(vec![RegressionTree { nodes: vec![TreeNode::Leaf { value: 1.0 }] }]);
    reordered.features.reverse();
    assert!(ForestModel::from_artifact(reordered).is_err());
}

#[test]
fn loaded_model_is_shareable_across_threads() {
    let model = ForestModel::load(SMALL_FOREST).expect("fixture loads");
    let shared = &model;
    let results: Vec<f64> = std::thread::scope(|s| {
        let mut handles = Vec::new();
        for d in 1..=8 {
            handles.push(s.spawn(move || shared.predict(&trip(d, 0.0, 0.0))));
        }
        handles.into_iter().map(|h| h.join().expect("thread")).collect()
    });
    assert_eq!(results, vec![350.0, 350.0, 350.0, 350.0, 750.0, 750.0, 750.0, 750.0]);
}
