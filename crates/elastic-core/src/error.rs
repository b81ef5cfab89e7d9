use std::io;

use lyon_tessellation::TessellationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElasticError {
    #[error("failed to tessellate elastic outline: {0:?}")]
    Tessellation(TessellationError),

    #[error("config io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TessellationError> for ElasticError {
    fn from(err: TessellationError) -> Self {
        ElasticError::Tessellation(err)
    }
}
