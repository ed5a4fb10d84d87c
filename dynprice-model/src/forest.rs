use dynprice_core::{
    ScoringError, ScoringModel, FEATURE_CONTRACT_VERSION, FEATURE_COUNT, FEATURE_ORDER,
};
use serde::{Deserialize, Serialize};

/// One node of a regression tree. Split nodes compare a feature column
/// against a threshold and route left (<=) or right (>); leaves carry the
/// estimate for their region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree, stored as a node array rooted at index 0.
/// Children always appear after their parent, so evaluation is a bounded
/// forward walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn evaluate(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ScoringError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => {
                    return Err(ScoringError::PredictionFailed(format!(
                        "tree walk escaped node array at index {index}"
                    )))
                }
            }
        }
    }
}

/// The artifact failed structural validation at load time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelValidationError {
    #[error("unsupported feature contract version {got}, expected {expected}")]
    ContractVersionMismatch { expected: u32, got: u32 },

    #[error("feature names do not match the contract at column {column}: expected `{expected}`, got `{got}`")]
    FeatureNameMismatch {
        column: usize,
        expected: String,
        got: String,
    },

    #[error("expected {expected} feature names, got {got}")]
    FeatureCountMismatch { expected: usize, got: usize },

    #[error("model has no trees")]
    Empty,

    #[error("tree {tree} node {node} is invalid: {reason}")]
    InvalidNode {
        tree: usize,
        node: usize,
        reason: String,
    },
}

/// A random-forest-style regressor: prediction is the mean of per-tree leaf
/// values. Read-only after loading; safe for concurrent inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Feature-contract version the model was trained against.
    pub version: u32,
    /// Column names in training order; must equal the contract order exactly.
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

impl ForestModel {
    /// Parse an artifact and validate it structurally. Any mismatch with the
    /// feature contract is rejected here, at load time, rather than showing
    /// up later as silently misaligned columns.
    pub fn from_json_str(raw: &str) -> Result<Self, ForestParseError> {
        let model: ForestModel = serde_json::from_str(raw)?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.version != FEATURE_CONTRACT_VERSION {
            return Err(ModelValidationError::ContractVersionMismatch {
                expected: FEATURE_CONTRACT_VERSION,
                got: self.version,
            });
        }
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(ModelValidationError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                got: self.feature_names.len(),
            });
        }
        for (column, (name, expected)) in
            self.feature_names.iter().zip(FEATURE_ORDER).enumerate()
        {
            if name.as_str() != expected {
                return Err(ModelValidationError::FeatureNameMismatch {
                    column,
                    expected: expected.to_string(),
                    got: name.clone(),
                });
            }
        }
        if self.trees.is_empty() {
            return Err(ModelValidationError::Empty);
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelValidationError::InvalidNode {
                    tree: tree_index,
                    node: 0,
                    reason: "empty node array".to_string(),
                });
            }
            for (node_index, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Leaf { value } => {
                        if !value.is_finite() {
                            return Err(ModelValidationError::InvalidNode {
                                tree: tree_index,
                                node: node_index,
                                reason: format!("non-finite leaf value {value}"),
                            });
                        }
                    }
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(ModelValidationError::InvalidNode {
                                tree: tree_index,
                                node: node_index,
                                reason: format!("feature index {feature} out of range"),
                            });
                        }
                        if !threshold.is_finite() {
                            return Err(ModelValidationError::InvalidNode {
                                tree: tree_index,
                                node: node_index,
                                reason: format!("non-finite threshold {threshold}"),
                            });
                        }
                        // Children after the parent: guarantees termination.
                        for child in [*left, *right] {
                            if child <= node_index || child >= tree.nodes.len() {
                                return Err(ModelValidationError::InvalidNode {
                                    tree: tree_index,
                                    node: node_index,
                                    reason: format!("child index {child} out of order"),
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl ScoringModel for ForestModel {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ScoringError> {
        if self.trees.is_empty() {
            return Err(ScoringError::NotFitted("model has no trees".to_string()));
        }
        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.evaluate(features)?;
        }
        Ok(total / self.trees.len() as f64)
    }
}

/// The artifact could not be parsed or failed validation.
#[derive(Debug, thiserror::Error)]
pub enum ForestParseError {
    #[error("malformed model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ModelValidationError),
}
