use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MigrationError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Snapshot serialization error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Model not found: {app_label}.{model}")]
	ModelNotFound { app_label: String, model: String },
}

pub type Result<T> = std::result::Result<T, MigrationError>;
