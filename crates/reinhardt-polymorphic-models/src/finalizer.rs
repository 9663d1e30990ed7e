//! Class finalization pipeline
//!
//! [`Finalizer::finalize`] turns a [`ModelDefinition`] into a [`ModelClass`]:
//!
//! 1. resolve the bases and run the field contributors,
//! 2. copy abstract base fields and find the nearest concrete ancestor,
//! 3. validate the assembled field set,
//! 4. bind the fields and add the framework fields of polymorphic roots,
//! 5. run the hooks ([`ParentLinkSynthesizer`], then [`ParentLinkNormalizer`],
//!    then any hook added with [`Finalizer::with_hook`]),
//! 6. add the automatic primary key where none exists.
//!
//! Abstract models stop after step 4.

use crate::class::ModelClass;
use crate::contributor::FieldContributor;
use crate::definition::ModelDefinition;
use crate::error::{ModelError, Result};
use crate::hooks::{FinalizationHook, FinalizeContext};
use crate::inheritance;
use crate::parent_link::{ParentLinkNormalizer, ParentLinkSynthesizer};
use crate::registry::ModelRegistry;
use crate::settings::PolymorphicSettings;
use crate::validation::{AUTO_PK_FIELD, ModelValidator, POLYMORPHIC_CTYPE_FIELD};
use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete, RelatedName};
use std::fmt;
use std::sync::Arc;

/// Related name of the content type field; hidden, one per concrete model
const POLYMORPHIC_CTYPE_RELATED_NAME: &str = "polymorphic_%(app_label)s.%(class)s_set+";

/// Runs the finalization pipeline
pub struct Finalizer {
	settings: PolymorphicSettings,
	hooks: Vec<Box<dyn FinalizationHook>>,
}

impl Finalizer {
	/// Create a finalizer with the parent link hooks
	pub fn new(settings: PolymorphicSettings) -> Self {
		Self {
			settings,
			hooks: vec![
				Box::new(ParentLinkSynthesizer),
				Box::new(ParentLinkNormalizer),
			],
		}
	}

	/// Append a hook, run after the built-in ones
	pub fn with_hook(mut self, hook: impl FinalizationHook + 'static) -> Self {
		self.hooks.push(Box::new(hook));
		self
	}

	pub fn settings(&self) -> &PolymorphicSettings {
		&self.settings
	}

	pub fn hook_names(&self) -> Vec<&'static str> {
		self.hooks.iter().map(|hook| hook.name()).collect()
	}

	/// Finalize `definition` against the models already in `registry`
	pub fn finalize(
		&self,
		mut definition: ModelDefinition,
		registry: &ModelRegistry,
	) -> Result<ModelClass> {
		let label = definition.model_ref().label();
		let bases = inheritance::resolve_bases(&definition, registry)?;

		let contributors = collect_contributors(&definition, &bases);
		for contributor in &contributors {
			contributor
				.contribute(&mut definition, &bases)
				.map_err(|e| match e {
					ModelError::Contributor { .. } => e,
					other => ModelError::Contributor {
						model: label.clone(),
						message: other.to_string(),
					},
				})?;
		}

		let concrete_parent = inheritance::concrete_parent(&label, &bases, registry)?;
		let polymorphic =
			definition.options.polymorphic || bases.iter().any(|base| base.is_polymorphic());
		let is_abstract = definition.options.abstract_model;

		let mut fields: Vec<(String, FieldDescriptor)> = inheritance::abstract_fields(&bases)
			.into_iter()
			.filter(|(name, _)| !definition.has_field(name))
			.collect();
		fields.append(&mut definition.fields);

		let polymorphic_root = polymorphic && !is_abstract && concrete_parent.is_none();
		ModelValidator {
			model: label.clone(),
			fields: &fields,
			concrete_parent: concrete_parent.as_deref(),
			is_abstract,
			polymorphic_root,
		}
		.validate(&self.settings)?;

		let mut class = ModelClass::new(
			definition.app_label.clone(),
			definition.name.clone(),
			definition.options.clone(),
		);
		class.bases = definition.bases.clone();
		class.polymorphic = polymorphic;
		class.concrete_parent = concrete_parent.as_ref().map(|parent| parent.model_ref());
		class.contributors = contributors;

		for (name, mut field) in fields {
			if is_abstract {
				// Placeholders expand in each concrete subclass
				field.set_attributes_from_name(&name);
			} else {
				field.contribute_to_class(&name, &class.app_label, &class.name);
			}
			class.add_field(name, field);
		}

		if is_abstract {
			return Ok(class);
		}

		promote_parent_link(&mut class);
		if polymorphic_root && self.settings.add_polymorphic_ctype {
			add_polymorphic_ctype(&mut class);
		}

		let ctx = FinalizeContext {
			settings: &self.settings,
			concrete_parent: concrete_parent.as_deref(),
		};
		for hook in &self.hooks {
			hook.finalize(&mut class, &ctx).map_err(|e| ModelError::Hook {
				hook: hook.name().to_string(),
				model: label.clone(),
				message: e.to_string(),
			})?;
		}

		if class.pk().is_none() {
			if class.has_field(AUTO_PK_FIELD) {
				return Err(ModelError::FieldClash {
					model: label,
					field: AUTO_PK_FIELD.to_string(),
				});
			}
			let mut pk = self.settings.default_auto_field.field();
			pk.set_attributes_from_name(AUTO_PK_FIELD);
			class.insert_field_first(AUTO_PK_FIELD, pk);
		}
		for field in class.fields.values_mut() {
			if field.is_primary_key() {
				field.serialize = false;
			}
		}

		if let Some(parent) = concrete_parent.as_deref()
			&& let Some((link_name, _)) = class.parent_link()
		{
			let link_name = link_name.to_string();
			class.parents.insert(parent.model_ref(), link_name);
		}

		Ok(class)
	}
}

impl Default for Finalizer {
	fn default() -> Self {
		Self::new(PolymorphicSettings::default())
	}
}

impl fmt::Debug for Finalizer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Finalizer")
			.field("settings", &self.settings)
			.field("hooks", &self.hook_names())
			.finish()
	}
}

/// Contributors of the bases, outermost first, then the model's own
fn collect_contributors(
	definition: &ModelDefinition,
	bases: &[Arc<ModelClass>],
) -> Vec<Arc<dyn FieldContributor>> {
	let mut contributors: Vec<Arc<dyn FieldContributor>> = Vec::new();
	let inherited = bases.iter().flat_map(|base| base.contributors.iter());
	for contributor in inherited.chain(definition.contributors.iter()) {
		if !contributors.iter().any(|c| Arc::ptr_eq(c, contributor)) {
			contributors.push(Arc::clone(contributor));
		}
	}
	contributors
}

/// Make a declared parent link the primary key when nothing else is
fn promote_parent_link(class: &mut ModelClass) {
	if class.concrete_parent.is_none() || class.pk().is_some() {
		return;
	}
	if let Some(field) = class
		.fields
		.values_mut()
		.find(|field| field.is_one_to_one() && field.is_parent_link_flagged())
	{
		field.primary_key = true;
	}
}

fn add_polymorphic_ctype(class: &mut ModelClass) {
	let mut field = FieldDescriptor::foreign_key(
		ModelRef::new("contenttypes", "ContentType"),
		OnDelete::Cascade,
	)
	.null(true)
	.editable(false)
	.related_name(RelatedName::named(POLYMORPHIC_CTYPE_RELATED_NAME))
	.auto_created(true);
	field.contribute_to_class(POLYMORPHIC_CTYPE_FIELD, &class.app_label, &class.name);
	class.add_field(POLYMORPHIC_CTYPE_FIELD, field);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parent_link::is_parent_link;
	use rstest::{fixture, rstest};

	#[derive(Debug)]
	struct FailingHook;

	impl FinalizationHook for FailingHook {
		fn name(&self) -> &'static str {
			"failing"
		}

		fn finalize(&self, model: &mut ModelClass, _ctx: &FinalizeContext<'_>) -> Result<()> {
			Err(ModelError::Contributor {
				model: model.label(),
				message: "boom".to_string(),
			})
		}
	}

	#[fixture]
	fn registry() -> ModelRegistry {
		let registry = ModelRegistry::new();
		registry
			.register(
				ModelDefinition::new("shop", "BaseModel")
					.polymorphic()
					.field("name", FieldDescriptor::char(100)),
			)
			.unwrap();
		registry
	}

	#[rstest]
	fn test_root_gets_auto_pk_and_ctype(registry: ModelRegistry) {
		let base = registry.get_model("shop", "BaseModel").unwrap();

		let names: Vec<&String> = base.fields.keys().collect();
		assert_eq!(names, vec!["id", "name", "polymorphic_ctype"]);
		let (_, pk) = base.pk().unwrap();
		assert!(!pk.serialize);
		assert!(pk.auto_created);
		let ctype = base.get_field("polymorphic_ctype").unwrap();
		assert_eq!(
			ctype.related_name,
			RelatedName::named("polymorphic_shop.basemodel_set+")
		);
		assert!(ctype.null);
		assert!(!ctype.editable);
	}

	#[rstest]
	fn test_subclass_inherits_polymorphism(registry: ModelRegistry) {
		// Act
		let child = Finalizer::default()
			.finalize(ModelDefinition::new("shop", "ChildModel").inherits("BaseModel"), &registry)
			.unwrap();

		// Assert
		assert!(child.is_polymorphic());
		assert!(!child.has_field("polymorphic_ctype"));
		let (name, link) = child.pk().unwrap();
		assert_eq!(name, "basemodel_ptr");
		assert!(is_parent_link(link));
		assert!(!link.serialize);
		assert_eq!(
			child.parents.get(&ModelRef::new("shop", "BaseModel")).map(String::as_str),
			Some("basemodel_ptr")
		);
	}

	#[rstest]
	fn test_declared_link_promoted_to_primary_key(registry: ModelRegistry) {
		// Arrange
		let definition = ModelDefinition::new("shop", "ChildModel")
			.inherits("BaseModel")
			.field(
				"base",
				FieldDescriptor::one_to_one(ModelRef::new("shop", "BaseModel"), OnDelete::Cascade)
					.parent_link(true),
			);

		// Act
		let child = Finalizer::default().finalize(definition, &registry).unwrap();

		// Assert
		assert_eq!(child.pk().map(|(name, _)| name), Some("base"));
		assert!(!child.has_field("basemodel_ptr"));
		assert_eq!(child.parent_links().len(), 1);
	}

	#[rstest]
	fn test_abstract_model_has_no_pk(registry: ModelRegistry) {
		let mixin = Finalizer::default()
			.finalize(
				ModelDefinition::new("shop", "Timestamped")
					.abstract_model()
					.field("created", FieldDescriptor::integer()),
				&registry,
			)
			.unwrap();

		assert!(mixin.pk().is_none());
		assert_eq!(mixin.fields.len(), 1);
	}

	#[rstest]
	fn test_hook_error_is_wrapped(registry: ModelRegistry) {
		let finalizer = Finalizer::default().with_hook(FailingHook);

		let result = finalizer.finalize(ModelDefinition::new("shop", "Other"), &registry);

		assert!(matches!(
			result,
			Err(ModelError::Hook { ref hook, .. }) if hook == "failing"
		));
	}

	#[rstest]
	fn test_unknown_base(registry: ModelRegistry) {
		let result = Finalizer::default().finalize(
			ModelDefinition::new("shop", "Orphan").inherits("Missing"),
			&registry,
		);

		assert_eq!(
			result.unwrap_err(),
			ModelError::UnknownBase {
				model: "shop.Orphan".to_string(),
				base: "shop.Missing".to_string(),
			}
		);
	}

	#[rstest]
	fn test_hook_order() {
		let finalizer = Finalizer::default().with_hook(FailingHook);

		assert_eq!(
			finalizer.hook_names(),
			vec!["parent_link_synthesizer", "parent_link_normalizer", "failing"]
		);
	}

	#[rstest]
	fn test_auto_field_setting() {
		// Arrange
		let settings = PolymorphicSettings {
			default_auto_field: crate::settings::AutoFieldKind::AutoField,
			add_polymorphic_ctype: false,
			..Default::default()
		};
		let registry = ModelRegistry::with_finalizer(Finalizer::new(settings));

		// Act
		let model = registry
			.register(ModelDefinition::new("shop", "Plain").polymorphic())
			.unwrap();

		// Assert
		let (_, pk) = model.pk().unwrap();
		assert_eq!(pk.kind, reinhardt_polymorphic_fields::FieldKind::AutoField);
		assert!(!model.has_field("polymorphic_ctype"));
	}
}
