//! Relation targets and remote relation descriptors

use crate::error::{FieldError, Result};
use crate::related_name::RelatedName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference to a model by `app_label` and model name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
	app_label: String,
	model_name: String,
}

impl ModelRef {
	/// Create a new model reference
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::ModelRef;
	///
	/// let target = ModelRef::new("shop", "Product");
	/// assert_eq!(target.label(), "shop.Product");
	/// assert_eq!(target.label_lower(), "shop.product");
	/// ```
	pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
		Self {
			app_label: app_label.into(),
			model_name: model_name.into(),
		}
	}

	/// Parse an `app_label.ModelName` reference
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::ModelRef;
	///
	/// let target = ModelRef::parse("contenttypes.ContentType").unwrap();
	/// assert_eq!(target.app_label(), "contenttypes");
	/// assert_eq!(target.model_name(), "ContentType");
	/// assert!(ModelRef::parse("ContentType").is_err());
	/// ```
	pub fn parse(reference: &str) -> Result<Self> {
		match reference.split_once('.') {
			Some((app, model)) if !app.is_empty() && !model.is_empty() && !model.contains('.') => {
				Ok(Self::new(app, model))
			}
			_ => Err(FieldError::InvalidModelReference(reference.to_string())),
		}
	}

	pub fn app_label(&self) -> &str {
		&self.app_label
	}

	pub fn model_name(&self) -> &str {
		&self.model_name
	}

	pub fn label(&self) -> String {
		format!("{}.{}", self.app_label, self.model_name)
	}

	pub fn label_lower(&self) -> String {
		format!("{}.{}", self.app_label, self.model_name.to_lowercase())
	}

	/// Registry key: `(app_label, lower-cased model name)`
	pub fn key(&self) -> (String, String) {
		(self.app_label.clone(), self.model_name.to_lowercase())
	}
}

impl FromStr for ModelRef {
	type Err = FieldError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl fmt::Display for ModelRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.app_label, self.model_name)
	}
}

/// Deletion behaviour of a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OnDelete {
	/// Delete the referencing row together with the referenced one
	#[default]
	Cascade,
	Protect,
	Restrict,
	SetNull,
	SetDefault,
	DoNothing,
}

impl OnDelete {
	pub fn as_str(&self) -> &'static str {
		match self {
			OnDelete::Cascade => "CASCADE",
			OnDelete::Protect => "PROTECT",
			OnDelete::Restrict => "RESTRICT",
			OnDelete::SetNull => "SET_NULL",
			OnDelete::SetDefault => "SET_DEFAULT",
			OnDelete::DoNothing => "DO_NOTHING",
		}
	}
}

impl fmt::Display for OnDelete {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The relation seen from the target model's side
///
/// Django equivalent: `field.remote_field` (a `OneToOneRel` / `ManyToOneRel`).
/// It keeps its own copy of the reverse accessor policy which must agree with
/// the copy on the owning [`FieldDescriptor`](crate::FieldDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRelation {
	/// Related model; `None` when the reference could not be resolved
	pub model: Option<ModelRef>,
	pub on_delete: OnDelete,
	pub related_name: RelatedName,
	/// Marks the multi-table inheritance join to the parent model
	pub parent_link: bool,
	/// Target column, `None` for the target's primary key
	pub to_field: Option<String>,
}

impl RemoteRelation {
	pub fn new(model: ModelRef, on_delete: OnDelete) -> Self {
		Self {
			model: Some(model),
			on_delete,
			related_name: RelatedName::Unset,
			parent_link: false,
			to_field: None,
		}
	}

	/// A relation whose target is missing
	pub fn detached(on_delete: OnDelete) -> Self {
		Self {
			model: None,
			on_delete,
			related_name: RelatedName::Unset,
			parent_link: false,
			to_field: None,
		}
	}

	pub fn is_hidden(&self) -> bool {
		self.related_name.is_hidden()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("shop")]
	#[case(".Product")]
	#[case("shop.")]
	#[case("a.b.C")]
	fn test_parse_rejects_malformed_reference(#[case] input: &str) {
		assert_eq!(
			ModelRef::parse(input),
			Err(FieldError::InvalidModelReference(input.to_string()))
		);
	}

	#[rstest]
	fn test_key_is_case_insensitive_on_model_name() {
		assert_eq!(
			ModelRef::new("shop", "Product").key(),
			ModelRef::new("shop", "product").key()
		);
	}

	#[rstest]
	fn test_on_delete_names() {
		assert_eq!(OnDelete::Cascade.as_str(), "CASCADE");
		assert_eq!(OnDelete::SetNull.to_string(), "SET_NULL");
	}

	#[rstest]
	fn test_detached_relation_has_no_model() {
		let rel = RemoteRelation::detached(OnDelete::Cascade);

		assert!(rel.model.is_none());
		assert!(!rel.parent_link);
		assert!(!rel.is_hidden());
	}
}
