//! Model checks run before finalization hooks
//!
//! Hooks may assume the field set they receive is consistent: at most one
//! parent link, pointing at the nearest concrete ancestor, and no declared
//! field sitting on a name the framework needs.

use crate::class::ModelClass;
use crate::error::{ModelError, Result};
use crate::parent_link::parent_link_name;
use crate::settings::PolymorphicSettings;
use reinhardt_polymorphic_fields::FieldDescriptor;
use std::collections::HashSet;

/// Name of the content type field added to polymorphic roots
pub const POLYMORPHIC_CTYPE_FIELD: &str = "polymorphic_ctype";

/// Name of the automatic primary key
pub const AUTO_PK_FIELD: &str = "id";

/// Checks the assembled field set of one model
#[derive(Debug)]
pub struct ModelValidator<'a> {
	pub model: String,
	pub fields: &'a [(String, FieldDescriptor)],
	pub concrete_parent: Option<&'a ModelClass>,
	pub is_abstract: bool,
	/// Whether the model will be a polymorphic root
	pub polymorphic_root: bool,
}

impl ModelValidator<'_> {
	pub fn validate(&self, settings: &PolymorphicSettings) -> Result<()> {
		self.check_duplicates()?;
		self.check_relation_targets()?;
		if self.is_abstract {
			return Ok(());
		}
		self.check_parent_links()?;
		self.check_primary_keys()?;
		self.check_reserved_names(settings)
	}

	fn check_duplicates(&self) -> Result<()> {
		let mut seen = HashSet::new();
		for (name, _) in self.fields {
			if !seen.insert(name.as_str()) {
				return Err(ModelError::DuplicateField {
					model: self.model.clone(),
					field: name.clone(),
				});
			}
		}
		Ok(())
	}

	fn check_relation_targets(&self) -> Result<()> {
		for (name, field) in self.fields {
			if field.is_relation() && field.target().is_none() {
				return Err(ModelError::MissingRelationTarget {
					model: self.model.clone(),
					field: name.clone(),
				});
			}
		}
		Ok(())
	}

	fn check_parent_links(&self) -> Result<()> {
		let flagged: Vec<&(String, FieldDescriptor)> = self
			.fields
			.iter()
			.filter(|(_, field)| field.is_parent_link_flagged())
			.collect();

		if flagged.len() > 1 {
			return Err(ModelError::MultipleParentLinks {
				model: self.model.clone(),
				fields: flagged.iter().map(|(name, _)| name.clone()).collect(),
			});
		}

		let Some((name, field)) = flagged.first().copied() else {
			return Ok(());
		};
		if !field.is_one_to_one() {
			return Err(ModelError::ParentLinkNotOneToOne {
				model: self.model.clone(),
				field: name.clone(),
			});
		}
		let Some(parent) = self.concrete_parent else {
			return Err(ModelError::ParentLinkWithoutAncestor {
				model: self.model.clone(),
				field: name.clone(),
			});
		};
		let expected = parent.model_ref();
		match field.target() {
			Some(target) if target.key() == expected.key() => Ok(()),
			found => Err(ModelError::ParentLinkTargetMismatch {
				model: self.model.clone(),
				field: name.clone(),
				expected: expected.label(),
				found: found.map(|target| target.label()).unwrap_or_default(),
			}),
		}
	}

	fn check_primary_keys(&self) -> Result<()> {
		let mut keys = self
			.fields
			.iter()
			.filter(|(_, field)| field.is_primary_key() && !field.is_parent_link_flagged());

		// Subclasses use their parent link as the primary key
		let allowed = if self.concrete_parent.is_some() { 0 } else { 1 };
		if let Some((name, _)) = keys.nth(allowed) {
			return Err(ModelError::ConflictingPrimaryKey {
				model: self.model.clone(),
				field: name.clone(),
			});
		}
		Ok(())
	}

	fn check_reserved_names(&self, settings: &PolymorphicSettings) -> Result<()> {
		let mut reserved = Vec::new();

		match self.concrete_parent {
			Some(parent) => {
				if !self.fields.iter().any(|(_, f)| f.is_parent_link_flagged()) {
					reserved.push(parent_link_name(&parent.name, &settings.parent_link_suffix));
				}
			}
			None => {
				if !self.fields.iter().any(|(_, f)| f.is_primary_key()) {
					reserved.push(AUTO_PK_FIELD.to_string());
				}
			}
		}
		if self.polymorphic_root && settings.add_polymorphic_ctype {
			reserved.push(POLYMORPHIC_CTYPE_FIELD.to_string());
		}

		for name in reserved {
			if self.fields.iter().any(|(declared, _)| *declared == name) {
				return Err(ModelError::FieldClash {
					model: self.model.clone(),
					field: name,
				});
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::ModelOptions;
	use reinhardt_polymorphic_fields::{FieldKind, ModelRef, OnDelete, RemoteRelation};
	use rstest::{fixture, rstest};

	#[fixture]
	fn parent() -> ModelClass {
		ModelClass::new(
			"shop",
			"BaseModel",
			ModelOptions {
				polymorphic: true,
				..Default::default()
			},
		)
	}

	fn link_to(app: &str, model: &str) -> FieldDescriptor {
		FieldDescriptor::one_to_one(ModelRef::new(app, model), OnDelete::Cascade)
			.primary_key(true)
			.parent_link(true)
	}

	fn validate(
		fields: &[(String, FieldDescriptor)],
		concrete_parent: Option<&ModelClass>,
	) -> Result<()> {
		ModelValidator {
			model: "shop.ChildModel".to_string(),
			fields,
			concrete_parent,
			is_abstract: false,
			polymorphic_root: concrete_parent.is_none(),
		}
		.validate(&PolymorphicSettings::default())
	}

	#[rstest]
	fn test_valid_declared_link(parent: ModelClass) {
		let fields = vec![("basemodel_ptr".to_string(), link_to("shop", "BaseModel"))];

		assert!(validate(&fields, Some(&parent)).is_ok());
	}

	#[rstest]
	fn test_multiple_parent_links(parent: ModelClass) {
		let fields = vec![
			("first".to_string(), link_to("shop", "BaseModel")),
			("second".to_string(), link_to("shop", "BaseModel")),
		];

		let result = validate(&fields, Some(&parent));

		assert_eq!(
			result,
			Err(ModelError::MultipleParentLinks {
				model: "shop.ChildModel".to_string(),
				fields: vec!["first".to_string(), "second".to_string()],
			})
		);
	}

	#[rstest]
	fn test_parent_link_chain_skip(parent: ModelClass) {
		let fields = vec![("root_ptr".to_string(), link_to("shop", "RootModel"))];

		let result = validate(&fields, Some(&parent));

		assert!(matches!(
			result,
			Err(ModelError::ParentLinkTargetMismatch { ref expected, ref found, .. })
				if expected == "shop.BaseModel" && found == "shop.RootModel"
		));
	}

	#[rstest]
	fn test_parent_link_without_ancestor() {
		let fields = vec![("basemodel_ptr".to_string(), link_to("shop", "BaseModel"))];

		let result = validate(&fields, None);

		assert!(matches!(result, Err(ModelError::ParentLinkWithoutAncestor { .. })));
	}

	#[rstest]
	fn test_parent_link_must_be_one_to_one(parent: ModelClass) {
		let field = FieldDescriptor::foreign_key(parent.model_ref(), OnDelete::Cascade)
			.primary_key(true)
			.parent_link(true);
		let fields = vec![("basemodel_ptr".to_string(), field)];

		let result = validate(&fields, Some(&parent));

		assert!(matches!(result, Err(ModelError::ParentLinkNotOneToOne { .. })));
	}

	#[rstest]
	fn test_field_clash_with_parent_link_name(parent: ModelClass) {
		let fields = vec![("basemodel_ptr".to_string(), FieldDescriptor::integer())];

		let result = validate(&fields, Some(&parent));

		assert_eq!(
			result,
			Err(ModelError::FieldClash {
				model: "shop.ChildModel".to_string(),
				field: "basemodel_ptr".to_string(),
			})
		);
	}

	#[rstest]
	#[case(AUTO_PK_FIELD)]
	#[case(POLYMORPHIC_CTYPE_FIELD)]
	fn test_field_clash_on_root(#[case] name: &str) {
		let fields = vec![(name.to_string(), FieldDescriptor::integer())];

		let result = validate(&fields, None);

		assert!(matches!(result, Err(ModelError::FieldClash { ref field, .. }) if field == name));
	}

	#[rstest]
	fn test_subclass_primary_key_conflicts(parent: ModelClass) {
		let fields = vec![("code".to_string(), FieldDescriptor::char(10).primary_key(true))];

		let result = validate(&fields, Some(&parent));

		assert!(matches!(result, Err(ModelError::ConflictingPrimaryKey { ref field, .. }) if field == "code"));
	}

	#[rstest]
	fn test_duplicate_field() {
		let fields = vec![
			("name".to_string(), FieldDescriptor::char(10)),
			("name".to_string(), FieldDescriptor::text()),
		];

		let result = validate(&fields, None);

		assert!(matches!(result, Err(ModelError::DuplicateField { .. })));
	}

	#[rstest]
	fn test_missing_relation_target() {
		let mut field = FieldDescriptor::new(FieldKind::ForeignKey);
		field.remote_field = Some(RemoteRelation::detached(OnDelete::Cascade));
		let fields = vec![("owner".to_string(), field)];

		let result = validate(&fields, None);

		assert!(matches!(result, Err(ModelError::MissingRelationTarget { .. })));
	}
}
