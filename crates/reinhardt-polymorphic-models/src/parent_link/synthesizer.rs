use super::parent_link_name;
use crate::class::ModelClass;
use crate::error::Result;
use crate::hooks::{FinalizationHook, FinalizeContext};
use reinhardt_polymorphic_fields::{FieldDescriptor, OnDelete, RelatedName};

/// Creates the parent link of a subclass that does not declare one
///
/// The created field is a one-to-one primary key to the nearest concrete
/// ancestor, deleted in cascade, with the `'+'` related name. It is named
/// `<ancestor lower-cased><suffix>`, the name a user declaring the link by
/// hand would pick, and inserted first so it is also the first column.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentLinkSynthesizer;

impl ParentLinkSynthesizer {
	/// Add the parent link to `model` and return its name
	///
	/// Returns `None` without touching `model` when a field is already
	/// flagged as a parent link, or when the conventional name is taken.
	pub fn synthesize(model: &mut ModelClass, ancestor: &ModelClass, suffix: &str) -> Option<String> {
		if model
			.fields
			.values()
			.any(FieldDescriptor::is_parent_link_flagged)
		{
			tracing::trace!(model = %model.label(), "parent link already declared");
			return None;
		}

		let name = parent_link_name(&ancestor.name, suffix);
		if model.has_field(&name) {
			tracing::trace!(model = %model.label(), field = %name, "parent link name already taken");
			return None;
		}

		let mut link = FieldDescriptor::one_to_one(ancestor.model_ref(), OnDelete::Cascade)
			.primary_key(true)
			.parent_link(true)
			.related_name(RelatedName::Suppressed)
			.auto_created(true);
		link.contribute_to_class(&name, &model.app_label, &model.name);
		model.insert_field_first(name.clone(), link);

		tracing::debug!(
			model = %model.label(),
			field = %name,
			ancestor = %ancestor.label(),
			"synthesized parent link"
		);
		Some(name)
	}
}

impl FinalizationHook for ParentLinkSynthesizer {
	fn name(&self) -> &'static str {
		"parent_link_synthesizer"
	}

	fn finalize(&self, model: &mut ModelClass, ctx: &FinalizeContext<'_>) -> Result<()> {
		if let Some(ancestor) = ctx.concrete_parent {
			Self::synthesize(model, ancestor, &ctx.settings.parent_link_suffix);
		}
		Ok(())
	}
}
