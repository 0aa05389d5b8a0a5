//! Serializable model artifacts: the trained regressors as they are stored on disk.

use crate::models::error::InferenceFailure;
use crate::models::regressor::Regressor;
use serde::{Deserialize, Serialize};

/// A stored, trained regressor.
///
/// Artifacts are plain serde data so they can be exported from any training
/// environment as JSON, and cached as bincode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForest),
    Linear(LinearModel),
}

impl Regressor for ModelArtifact {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        match self {
            ModelArtifact::RandomForest(forest) => forest.predict(features),
            ModelArtifact::Linear(linear) => linear.predict(features),
        }
    }
}

/// An ensemble of regression trees whose prediction is the mean of the tree outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

/// A regression tree stored as a flat node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Samples with `features[feature] <= threshold` go to `left`, others to `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl DecisionTree {
    /// A tree consisting of a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self {
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    fn evaluate(&self, tree: usize, features: &[f64]) -> Result<f64, InferenceFailure> {
        let mut index = 0;
        // A well-formed tree visits each node at most once before reaching a leaf.
        for _ in 0..=self.nodes.len() {
            let node = self
                .nodes
                .get(index)
                .ok_or(InferenceFailure::NodeOutOfBounds { tree, node: index })?;
            match node {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let x = features
                        .get(*feature)
                        .ok_or(InferenceFailure::FeatureOutOfBounds {
                            tree,
                            feature: *feature,
                        })?;
                    index = if *x <= *threshold { *left } else { *right };
                }
            }
        }
        Err(InferenceFailure::UnterminatedTree { tree })
    }
}

impl RandomForest {
    pub fn predict(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        if features.len() != self.n_features {
            return Err(InferenceFailure::FeatureCountMismatch {
                expected: self.n_features,
                found: features.len(),
            });
        }
        if self.trees.is_empty() {
            return Err(InferenceFailure::EmptyEnsemble);
        }
        let mut sum = 0.0;
        for (i, tree) in self.trees.iter().enumerate() {
            sum += tree.evaluate(i, features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}

/// `intercept + sum(coefficients[i] * features[i])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn predict(&self, features: &[f64]) -> Result<f64, InferenceFailure> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceFailure::FeatureCountMismatch {
                expected: self.coefficients.len(),
                found: features.len(),
            });
        }
        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }
}
