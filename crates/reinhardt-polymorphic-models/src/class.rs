//! Finalized model classes

use crate::contributor::FieldContributor;
use crate::options::ModelOptions;
use crate::parent_link::is_parent_link;
use indexmap::IndexMap;
use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef};
use std::sync::Arc;

/// A model after finalization
///
/// Fields are kept in their final order: the primary key first, then the
/// fields in declaration order. `parents` maps each concrete parent to the
/// name of the parent link that joins to it.
#[derive(Debug, Clone)]
pub struct ModelClass {
	pub app_label: String,
	pub name: String,
	pub table_name: String,
	pub options: ModelOptions,
	pub fields: IndexMap<String, FieldDescriptor>,
	/// Direct bases as declared
	pub bases: Vec<ModelRef>,
	pub parents: IndexMap<ModelRef, String>,
	/// Nearest concrete ancestor, reached directly or through abstract bases
	pub concrete_parent: Option<ModelRef>,
	pub polymorphic: bool,
	/// Own and inherited contributors, applied again to subclasses
	pub contributors: Vec<Arc<dyn FieldContributor>>,
}

impl ModelClass {
	pub fn new(app_label: impl Into<String>, name: impl Into<String>, options: ModelOptions) -> Self {
		let app_label = app_label.into();
		let name = name.into();
		let table_name = options.table_name(&app_label, &name);
		let polymorphic = options.polymorphic;
		Self {
			app_label,
			name,
			table_name,
			options,
			fields: IndexMap::new(),
			bases: Vec::new(),
			parents: IndexMap::new(),
			concrete_parent: None,
			polymorphic,
			contributors: Vec::new(),
		}
	}

	pub fn model_name(&self) -> String {
		self.name.to_lowercase()
	}

	pub fn model_ref(&self) -> ModelRef {
		ModelRef::new(self.app_label.clone(), self.name.clone())
	}

	/// Registry key: `(app_label, lower-cased model name)`
	pub fn key(&self) -> (String, String) {
		(self.app_label.clone(), self.model_name())
	}

	pub fn label(&self) -> String {
		format!("{}.{}", self.app_label, self.name)
	}

	pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.get(name)
	}

	pub fn get_field_mut(&mut self, name: &str) -> Option<&mut FieldDescriptor> {
		self.fields.get_mut(name)
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Append a field, replacing any field with the same name in place
	pub fn add_field(&mut self, name: impl Into<String>, field: FieldDescriptor) {
		self.fields.insert(name.into(), field);
	}

	/// Insert a field at the front, where primary keys live
	pub fn insert_field_first(&mut self, name: impl Into<String>, field: FieldDescriptor) {
		self.fields.shift_insert(0, name.into(), field);
	}

	/// The primary key field
	pub fn pk(&self) -> Option<(&str, &FieldDescriptor)> {
		self.fields
			.iter()
			.find(|(_, field)| field.is_primary_key())
			.map(|(name, field)| (name.as_str(), field))
	}

	/// Every field classified as a parent link
	pub fn parent_links(&self) -> Vec<(&str, &FieldDescriptor)> {
		self.fields
			.iter()
			.filter(|(_, field)| is_parent_link(field))
			.map(|(name, field)| (name.as_str(), field))
			.collect()
	}

	/// The parent link joining to the nearest concrete ancestor
	pub fn parent_link(&self) -> Option<(&str, &FieldDescriptor)> {
		let parent = self.concrete_parent.as_ref()?;
		self.parent_links()
			.into_iter()
			.find(|(_, field)| field.target().is_some_and(|target| target.key() == parent.key()))
	}

	pub fn is_abstract(&self) -> bool {
		self.options.abstract_model
	}

	pub fn is_polymorphic(&self) -> bool {
		self.polymorphic
	}

	/// Whether this is the concrete root of a polymorphic hierarchy
	pub fn is_polymorphic_root(&self) -> bool {
		self.polymorphic && !self.is_abstract() && self.concrete_parent.is_none()
	}
}
