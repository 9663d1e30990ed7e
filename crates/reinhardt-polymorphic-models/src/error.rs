//! Model construction errors
//!
//! These are raised by the host validation layer before parent links are
//! synthesized or normalized. Synthesis and normalization themselves never
//! fail.

use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
	#[error("Model '{model}' inherits from '{base}', which is not registered")]
	UnknownBase { model: String, base: String },

	#[error("Model '{model}' has more than one concrete base: {}", bases.join(", "))]
	MultipleConcreteBases { model: String, bases: Vec<String> },

	/// More than one field is marked as the parent link
	#[error("Model '{model}' declares more than one parent link: {}", fields.join(", "))]
	MultipleParentLinks { model: String, fields: Vec<String> },

	#[error(
		"Parent link '{field}' on model '{model}' points at '{found}', expected its nearest concrete ancestor '{expected}'"
	)]
	ParentLinkTargetMismatch {
		model: String,
		field: String,
		expected: String,
		found: String,
	},

	#[error("Parent link '{field}' on model '{model}' has no concrete ancestor to link to")]
	ParentLinkWithoutAncestor { model: String, field: String },

	#[error("Parent link '{field}' on model '{model}' must be a OneToOneField")]
	ParentLinkNotOneToOne { model: String, field: String },

	/// A primary key other than the parent link on a subclass, or a second primary key
	#[error("Model '{model}' declares conflicting primary key '{field}'")]
	ConflictingPrimaryKey { model: String, field: String },

	#[error("Field '{field}' on model '{model}' clashes with an automatically created field")]
	FieldClash { model: String, field: String },

	#[error("Field '{field}' is declared more than once on model '{model}'")]
	DuplicateField { model: String, field: String },

	#[error("Relation field '{field}' on model '{model}' has no target model")]
	MissingRelationTarget { model: String, field: String },

	#[error("Field contributor failed on model '{model}': {message}")]
	Contributor { model: String, message: String },

	#[error("Finalization hook '{hook}' failed on model '{model}': {message}")]
	Hook {
		hook: String,
		model: String,
		message: String,
	},
}

pub type Result<T> = std::result::Result<T, ModelError>;
