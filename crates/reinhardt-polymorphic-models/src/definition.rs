//! Model definitions
//!
//! A [`ModelDefinition`] is the unfinalized class body: the fields written by
//! the user, the bases, the `Meta` options and any field contributors. The
//! registry turns it into a [`ModelClass`](crate::ModelClass).

use crate::contributor::FieldContributor;
use crate::options::ModelOptions;
use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef};
use std::fmt;
use std::sync::Arc;

/// Class body of a model before finalization
///
/// # Examples
///
/// ```
/// use reinhardt_polymorphic_models::ModelDefinition;
/// use reinhardt_polymorphic_fields::FieldDescriptor;
///
/// let child = ModelDefinition::new("shop", "ChildModel")
///     .inherits("BaseModel")
///     .field("extra", FieldDescriptor::char(50));
///
/// assert_eq!(child.bases[0].label(), "shop.BaseModel");
/// assert!(child.has_field("extra"));
/// ```
#[derive(Clone)]
pub struct ModelDefinition {
	pub app_label: String,
	pub name: String,
	pub bases: Vec<ModelRef>,
	/// Declared fields in declaration order
	pub fields: Vec<(String, FieldDescriptor)>,
	pub options: ModelOptions,
	pub contributors: Vec<Arc<dyn FieldContributor>>,
}

impl ModelDefinition {
	pub fn new(app_label: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			app_label: app_label.into(),
			name: name.into(),
			bases: Vec::new(),
			fields: Vec::new(),
			options: ModelOptions::default(),
			contributors: Vec::new(),
		}
	}

	/// Declare a field
	pub fn field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Self {
		self.add_field(name, field);
		self
	}

	/// Inherit from `base`
	///
	/// `base` is either `"app_label.Model"` or a bare model name in the same app.
	pub fn inherits(mut self, base: &str) -> Self {
		let base = match base.split_once('.') {
			Some((app_label, model)) => ModelRef::new(app_label, model),
			None => ModelRef::new(self.app_label.clone(), base),
		};
		self.bases.push(base);
		self
	}

	pub fn inherits_ref(mut self, base: ModelRef) -> Self {
		self.bases.push(base);
		self
	}

	/// Mark the model as the root of a polymorphic hierarchy
	pub fn polymorphic(mut self) -> Self {
		self.options.polymorphic = true;
		self
	}

	pub fn abstract_model(mut self) -> Self {
		self.options.abstract_model = true;
		self
	}

	pub fn db_table(mut self, table: impl Into<String>) -> Self {
		self.options.db_table = Some(table.into());
		self
	}

	/// Attach a field contributor, inherited by every subclass
	pub fn contributor(mut self, contributor: impl FieldContributor + 'static) -> Self {
		self.contributors.push(Arc::new(contributor));
		self
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.fields.iter().any(|(field_name, _)| field_name == name)
	}

	pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields
			.iter()
			.find(|(field_name, _)| field_name == name)
			.map(|(_, field)| field)
	}

	/// Append a field; a field with the same name is kept and reported by validation
	pub fn add_field(&mut self, name: impl Into<String>, field: FieldDescriptor) {
		self.fields.push((name.into(), field));
	}

	pub fn model_ref(&self) -> ModelRef {
		ModelRef::new(self.app_label.clone(), self.name.clone())
	}
}

impl fmt::Debug for ModelDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModelDefinition")
			.field("app_label", &self.app_label)
			.field("name", &self.name)
			.field("bases", &self.bases)
			.field("fields", &self.fields)
			.field("options", &self.options)
			.field("contributors", &self.contributors.len())
			.finish()
	}
}
