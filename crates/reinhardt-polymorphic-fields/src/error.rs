//! Errors raised while building field descriptors

use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
	/// A model reference was not of the form `app_label.ModelName`
	#[error("Invalid model reference '{0}': expected 'app_label.ModelName'")]
	InvalidModelReference(String),
}

pub type Result<T> = std::result::Result<T, FieldError>;
