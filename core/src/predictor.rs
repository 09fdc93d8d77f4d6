//! Predictive model adapter.
//!
//! The calculator only needs a point estimate per trip; which model
//! produces it is behind the `Predictor` trait. `ForestModel` is the one
//! concrete adapter: a regression-tree ensemble trained offline and
//! persisted as JSON. It is loaded once and read-only afterwards.

use crate::{
    error::{ReimburseError, ReimburseResult},
    types::TripInput,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const FOREST_FORMAT: &str = "reimburse-forest";
pub const FOREST_VERSION: u32 = 1;

/// Feature order every artifact must declare.
pub const FEATURES: [&str; 3] = ["trip_days", "miles", "receipts"];

/// A trained point estimator. Implementations must be immutable after
/// construction so one instance can serve concurrent callers.
pub trait Predictor: Send + Sync {
    fn predict(&self, trip: &TripInput) -> f64;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Go to `left` when `x[feature] <= threshold`, else `right`.
    Split {
        feature:   usize,
        threshold: f64,
        left:      usize,
        right:     usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    fn predict(&self, x: &[f64; 3]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// Children must point strictly forward so traversal always ends at a leaf.
    fn check(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } if !value.is_finite() => {
                    return Err(format!("node {idx}: leaf value {value} is not finite"));
                }
                TreeNode::Leaf { .. } => {}
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= FEATURES.len() {
                        return Err(format!("node {idx}: feature index {feature} out of range"));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {idx}: threshold is NaN"));
                    }
                    for child in [*left, *right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx}: child {child} is not a later node"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub format:   String,
    pub version:  u32,
    pub features: Vec<String>,
    pub trees:    Vec<RegressionTree>,
}

/// Mean of the leaf values reached in every tree.
#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<RegressionTree>,
}

impl ForestModel {
    /// Load and validate a persisted forest. Any failure is fatal for
    /// blending flows and is reported as `ModelUnavailable`.
    pub fn load(path: impl AsRef<Path>) -> ReimburseResult<Self> {
        let path = path.as_ref();
        let unavailable = |reason: String| ReimburseError::ModelUnavailable {
            path: path.display().to_string(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let artifact: ForestArtifact =
            serde_json::from_str(&content).map_err(|e| unavailable(e.to_string()))?;
        let model = Self::from_artifact(artifact).map_err(unavailable)?;

        log::info!(
            "predictor: loaded forest with {} trees from {}",
            model.tree_count(),
            path.display()
        );
        Ok(model)
    }

    pub fn from_artifact(artifact: ForestArtifact) -> Result<Self, String> {
        if artifact.format != FOREST_FORMAT {
            return Err(format!(
                "expected format '{FOREST_FORMAT}', found '{}'",
                artifact.format
            ));
        }
        if artifact.version != FOREST_VERSION {
            return Err(format!(
                "unsupported version {} (expected {FOREST_VERSION})",
                artifact.version
            ));
        }
        if artifact.features != FEATURES {
            return Err(format!(
                "feature order {:?} does not match {:?}",
                artifact.features, FEATURES
            ));
        }
        if artifact.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        for (i, tree) in artifact.trees.iter().enumerate() {
            tree.check().map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(Self { trees: artifact.trees })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Predictor for ForestModel {
    fn predict(&self, trip: &TripInput) -> f64 {
        let x = [trip.days_f64(), trip.miles, trip.receipts];
        let sum: f64 = self.trees.iter().map(|t| t.predict(&x)).sum();
        sum / self.trees.len() as f64
    }
}
