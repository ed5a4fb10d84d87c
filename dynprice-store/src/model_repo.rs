use dynprice_model::{ForestModel, ModelValidationError};
use std::fs;
use std::path::Path;

/// The model artifact could not be turned into a usable model. Loading
/// happens once at startup; any of these is fatal by policy, the service must
/// not come up without a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact at {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("model artifact at {path} is invalid: {source}")]
    Invalid {
        path: String,
        #[source]
        source: ModelValidationError,
    },
}

/// Read, parse, and structurally validate the model artifact.
pub fn load_model(path: &Path) -> Result<ForestModel, ModelLoadError> {
    let path_str = path.display().to_string();

    let raw = fs::read_to_string(path).map_err(|source| ModelLoadError::Io {
        path: path_str.clone(),
        source,
    })?;

    let model: ForestModel =
        serde_json::from_str(&raw).map_err(|source| ModelLoadError::Parse {
            path: path_str.clone(),
            source,
        })?;

    model.validate().map_err(|source| ModelLoadError::Invalid {
        path: path_str.clone(),
        source,
    })?;

    tracing::info!(
        path = %path_str,
        trees = model.trees.len(),
        "loaded scoring model"
    );
    Ok(model)
}
