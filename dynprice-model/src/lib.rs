//! Tree-ensemble CLV regressor, deserialized from a JSON artifact produced by
//! an external training pipeline. The artifact is data, not code: training is
//! out of scope here.

pub mod forest;

pub use forest::{DecisionTree, ForestModel, ModelValidationError, TreeNode};
