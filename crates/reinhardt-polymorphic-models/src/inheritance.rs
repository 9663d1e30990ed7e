//! Inheritance resolution and parent link join paths

use crate::class::ModelClass;
use crate::definition::ModelDefinition;
use crate::error::{ModelError, Result};
use crate::registry::ModelRegistry;
use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef};
use std::sync::Arc;

/// Look up every direct base of `definition`
pub fn resolve_bases(
	definition: &ModelDefinition,
	registry: &ModelRegistry,
) -> Result<Vec<Arc<ModelClass>>> {
	definition
		.bases
		.iter()
		.map(|base| {
			registry
				.get_by_ref(base)
				.ok_or_else(|| ModelError::UnknownBase {
					model: definition.model_ref().label(),
					base: base.label(),
				})
		})
		.collect()
}

/// Nearest concrete ancestor, reached directly or through abstract bases
///
/// At most one concrete ancestor is allowed.
pub fn concrete_parent(
	model: &str,
	bases: &[Arc<ModelClass>],
	registry: &ModelRegistry,
) -> Result<Option<Arc<ModelClass>>> {
	let mut found: Vec<Arc<ModelClass>> = Vec::new();

	for base in bases {
		let candidate = if base.is_abstract() {
			match base.concrete_parent {
				Some(ref parent) => registry.get_by_ref(parent),
				None => None,
			}
		} else {
			Some(Arc::clone(base))
		};

		if let Some(candidate) = candidate
			&& !found.iter().any(|f| f.key() == candidate.key())
		{
			found.push(candidate);
		}
	}

	if found.len() > 1 {
		return Err(ModelError::MultipleConcreteBases {
			model: model.to_string(),
			bases: found.iter().map(|base| base.label()).collect(),
		});
	}
	Ok(found.pop())
}

/// Copies of the fields declared on abstract bases, in base order
///
/// Later bases do not override earlier ones.
pub fn abstract_fields(bases: &[Arc<ModelClass>]) -> Vec<(String, FieldDescriptor)> {
	let mut fields: Vec<(String, FieldDescriptor)> = Vec::new();
	for base in bases.iter().filter(|base| base.is_abstract()) {
		for (name, field) in &base.fields {
			if !fields.iter().any(|(existing, _)| existing == name) {
				fields.push((name.clone(), field.clone()));
			}
		}
	}
	fields
}

/// Concrete ancestors of `model`, nearest first
pub fn ancestors(registry: &ModelRegistry, model: &ModelClass) -> Vec<Arc<ModelClass>> {
	let mut chain = Vec::new();
	let mut next = model.concrete_parent.clone();
	while let Some(parent_ref) = next {
		let Some(parent) = registry.get_by_ref(&parent_ref) else {
			break;
		};
		next = parent.concrete_parent.clone();
		chain.push(parent);
	}
	chain
}

/// One hop from a subclass table to its parent table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentLinkJoin {
	pub from_table: String,
	pub from_column: String,
	pub to_table: String,
	pub to_column: String,
}

impl ParentLinkJoin {
	/// Render the join onto the parent table
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_models::ParentLinkJoin;
	///
	/// let join = ParentLinkJoin {
	///     from_table: "shop_childmodel".to_string(),
	///     from_column: "basemodel_ptr_id".to_string(),
	///     to_table: "shop_basemodel".to_string(),
	///     to_column: "id".to_string(),
	/// };
	/// assert_eq!(
	///     join.to_sql(),
	///     "INNER JOIN shop_basemodel ON shop_childmodel.basemodel_ptr_id = shop_basemodel.id"
	/// );
	/// ```
	pub fn to_sql(&self) -> String {
		format!(
			"INNER JOIN {} ON {}.{} = {}.{}",
			self.to_table, self.from_table, self.from_column, self.to_table, self.to_column
		)
	}
}

/// Joins from `model` up to `ancestor` through parent links
///
/// Returns `None` when `ancestor` is not a concrete ancestor of `model`, or
/// when a link in the chain cannot be resolved. The path from a model to
/// itself is empty.
pub fn parent_link_path(
	registry: &ModelRegistry,
	model: &ModelRef,
	ancestor: &ModelRef,
) -> Option<Vec<ParentLinkJoin>> {
	let mut current = registry.get_by_ref(model)?;
	let mut joins = Vec::new();

	while current.key() != ancestor.key() {
		let (_, link) = current.parent_link()?;
		let parent = registry.get_by_ref(link.target()?)?;
		let (_, parent_pk) = parent.pk()?;

		joins.push(ParentLinkJoin {
			from_table: current.table_name.clone(),
			from_column: link.column()?,
			to_table: parent.table_name.clone(),
			to_column: parent_pk.column()?,
		});
		current = parent;
	}

	Some(joins)
}
