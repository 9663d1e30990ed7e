//! Field contributors
//!
//! A contributor is a cooperating construction layer that edits a model's
//! class body before it is finalized, the way a custom metaclass injects
//! attributes before the base metaclass sees them. Contributors attached to a
//! model also run for every subclass of that model.

use crate::class::ModelClass;
use crate::definition::ModelDefinition;
use crate::error::Result;
use reinhardt_polymorphic_fields::{FieldDescriptor, OnDelete, RelatedName};
use std::fmt;
use std::sync::Arc;

/// A construction layer that may add or change declared fields
pub trait FieldContributor: Send + Sync + fmt::Debug {
	/// Edit `definition`; `bases` are the resolved direct bases in declaration order
	fn contribute(&self, definition: &mut ModelDefinition, bases: &[Arc<ModelClass>]) -> Result<()>;
}

/// Declares a parent link to the first concrete base, named after the base
///
/// The link is declared with the `'+'` related name so the base does not get
/// a reverse accessor. With the default suffix a subclass of `AssetModel`
/// gets an `assetmodel_link_ptr` field.
///
/// # Examples
///
/// ```
/// use reinhardt_polymorphic_models::{InheritedLinkContributor, ModelDefinition, ModelRegistry};
/// use reinhardt_polymorphic_fields::{FieldDescriptor, RelatedName};
///
/// let registry = ModelRegistry::new();
/// registry
///     .register(ModelDefinition::new("inventory", "AssetModel").polymorphic())
///     .unwrap();
/// let rack = registry
///     .register(
///         ModelDefinition::new("inventory", "RackModel")
///             .inherits("AssetModel")
///             .contributor(InheritedLinkContributor::default())
///             .field("capacity", FieldDescriptor::positive_integer()),
///     )
///     .unwrap();
///
/// let link = rack.get_field("assetmodel_link_ptr").unwrap();
/// assert!(link.is_parent_link_flagged());
/// assert_eq!(link.related_name, RelatedName::Unset);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritedLinkContributor {
	suffix: String,
}

impl InheritedLinkContributor {
	pub fn new(suffix: impl Into<String>) -> Self {
		Self {
			suffix: suffix.into(),
		}
	}

	pub fn suffix(&self) -> &str {
		&self.suffix
	}
}

impl Default for InheritedLinkContributor {
	fn default() -> Self {
		Self::new("_link_ptr")
	}
}

impl FieldContributor for InheritedLinkContributor {
	fn contribute(&self, definition: &mut ModelDefinition, bases: &[Arc<ModelClass>]) -> Result<()> {
		let Some(base) = bases.first() else {
			return Ok(());
		};
		if base.is_abstract() {
			return Ok(());
		}

		let link_name = format!("{}{}", base.name.to_lowercase(), self.suffix);
		if definition.has_field(&link_name) {
			return Ok(());
		}

		let link = FieldDescriptor::one_to_one(base.model_ref(), OnDelete::Cascade)
			.related_name(RelatedName::Suppressed)
			.parent_link(true)
			.primary_key(true);
		definition.add_field(link_name, link);
		Ok(())
	}
}
