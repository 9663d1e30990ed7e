use super::is_parent_link;
use crate::class::ModelClass;
use crate::error::Result;
use crate::hooks::{FinalizationHook, FinalizeContext};
use reinhardt_polymorphic_fields::{FieldDescriptor, RelatedName};

/// Rewrites the `'+'` related name on parent links to the unset form
///
/// Parent links never get a reverse accessor, so `'+'` and unset mean the
/// same thing on them. Only fields classified by [`is_parent_link`] are
/// considered; explicit names and every other field are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentLinkNormalizer;

impl ParentLinkNormalizer {
	/// Normalize every parent link of `model` and return the rewritten field names
	pub fn normalize(model: &mut ModelClass) -> Vec<String> {
		let label = model.label();
		let mut rewritten = Vec::new();

		for (name, field) in model.fields.iter_mut() {
			if !is_parent_link(field) {
				continue;
			}
			if Self::normalize_field(field) {
				tracing::debug!(model = %label, field = %name, "normalized parent link related_name");
				rewritten.push(name.clone());
			} else {
				tracing::trace!(
					model = %label,
					field = %name,
					related_name = %field.related_name,
					"parent link related_name left as is"
				);
			}
		}

		rewritten
	}

	/// Normalize one field; returns whether it changed
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_models::ParentLinkNormalizer;
	/// use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete, RelatedName};
	///
	/// let mut link = FieldDescriptor::one_to_one(ModelRef::new("shop", "BaseModel"), OnDelete::Cascade)
	///     .primary_key(true)
	///     .parent_link(true)
	///     .related_name("+");
	///
	/// assert!(ParentLinkNormalizer::normalize_field(&mut link));
	/// assert_eq!(link.related_name, RelatedName::Unset);
	/// assert!(link.related_name_in_sync());
	/// assert!(!ParentLinkNormalizer::normalize_field(&mut link));
	/// ```
	pub fn normalize_field(field: &mut FieldDescriptor) -> bool {
		if !is_parent_link(field) {
			return false;
		}

		let remote_suppressed = field
			.remote_field
			.as_ref()
			.is_some_and(|remote| remote.related_name.is_suppressed());
		let suppressed = field.related_name.is_suppressed()
			|| (field.related_name.is_unset() && remote_suppressed);
		if !suppressed {
			return false;
		}

		field.set_related_name(RelatedName::Unset);
		true
	}
}

impl FinalizationHook for ParentLinkNormalizer {
	fn name(&self) -> &'static str {
		"parent_link_normalizer"
	}

	fn finalize(&self, model: &mut ModelClass, _ctx: &FinalizeContext<'_>) -> Result<()> {
		Self::normalize(model);
		Ok(())
	}
}
