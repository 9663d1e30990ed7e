//! Project state snapshots
//!
//! A [`ProjectState`] records the canonical form of every field of every
//! concrete model. It is computed fresh from finalized classes and can be
//! saved as JSON, so two independent runs can be compared.

use crate::error::{MigrationError, Result};
use indexmap::IndexMap;
use reinhardt_polymorphic_fields::FieldDeconstruction;
use reinhardt_polymorphic_models::{ModelClass, ModelRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Canonical form of one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState {
	pub name: String,
	pub deconstruction: FieldDeconstruction,
}

impl FieldState {
	pub fn new(name: impl Into<String>, deconstruction: FieldDeconstruction) -> Self {
		Self {
			name: name.into(),
			deconstruction,
		}
	}
}

/// Fields of one concrete model, keyed by name in table column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelState {
	pub app_label: String,
	pub name: String,
	pub table_name: String,
	pub fields: IndexMap<String, FieldState>,
	/// Labels of the direct bases
	pub bases: Vec<String>,
}

impl ModelState {
	pub fn new(app_label: impl Into<String>, name: impl Into<String>) -> Self {
		let app_label = app_label.into();
		let name = name.into();
		let table_name = format!("{}_{}", app_label, name.to_lowercase());
		Self {
			app_label,
			name,
			table_name,
			fields: IndexMap::new(),
			bases: Vec::new(),
		}
	}

	/// Snapshot a finalized class
	pub fn from_class(class: &ModelClass) -> Self {
		let mut state = Self::new(class.app_label.clone(), class.name.clone());
		state.table_name = class.table_name.clone();
		state.bases = class.bases.iter().map(|base| base.label()).collect();
		for (name, field) in &class.fields {
			state.add_field(FieldState::new(name.clone(), field.deconstruct()));
		}
		state
	}

	pub fn add_field(&mut self, field: FieldState) {
		self.fields.insert(field.name.clone(), field);
	}

	pub fn get_field(&self, name: &str) -> Option<&FieldState> {
		self.fields.get(name)
	}

	pub fn has_field(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	/// Key in [`ProjectState::models`]: `app_label.model` with the model lower-cased
	pub fn key(&self) -> String {
		model_key(&self.app_label, &self.name)
	}
}

fn model_key(app_label: &str, model: &str) -> String {
	format!("{}.{}", app_label, model.to_lowercase())
}

/// Canonical state of every concrete model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
	pub models: BTreeMap<String, ModelState>,
}

impl ProjectState {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot every concrete model in `registry`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_migrations::ProjectState;
	/// use reinhardt_polymorphic_models::{ModelDefinition, ModelRegistry};
	///
	/// let registry = ModelRegistry::new();
	/// registry.register(ModelDefinition::new("shop", "BaseModel").polymorphic()).unwrap();
	/// registry.register(ModelDefinition::new("shop", "ChildModel").inherits("BaseModel")).unwrap();
	///
	/// let state = ProjectState::from_registry(&registry);
	/// let child = state.get_model("shop", "ChildModel").unwrap();
	/// assert!(child.has_field("basemodel_ptr"));
	/// ```
	pub fn from_registry(registry: &ModelRegistry) -> Self {
		Self::from_classes(&registry.get_models())
	}

	/// Snapshot `classes`, skipping abstract ones
	pub fn from_classes(classes: &[Arc<ModelClass>]) -> Self {
		let mut state = Self::new();
		for class in classes.iter().filter(|class| !class.is_abstract()) {
			state.add_model(ModelState::from_class(class));
		}
		state
	}

	pub fn add_model(&mut self, model: ModelState) {
		self.models.insert(model.key(), model);
	}

	pub fn get_model(&self, app_label: &str, model: &str) -> Option<&ModelState> {
		self.models.get(&model_key(app_label, model))
	}

	/// Like [`ProjectState::get_model`], failing when the model is absent
	pub fn require_model(&self, app_label: &str, model: &str) -> Result<&ModelState> {
		self.get_model(app_label, model)
			.ok_or_else(|| MigrationError::ModelNotFound {
				app_label: app_label.to_string(),
				model: model.to_string(),
			})
	}

	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		fs::write(path, self.to_json()?)?;
		Ok(())
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let content = fs::read_to_string(path)?;
		Self::from_json(&content)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete};
	use reinhardt_polymorphic_models::ModelDefinition;
	use rstest::{fixture, rstest};

	#[fixture]
	fn registry() -> ModelRegistry {
		let registry = ModelRegistry::new();
		registry
			.register(ModelDefinition::new("shop", "BaseModel").polymorphic())
			.unwrap();
		registry
			.register(
				ModelDefinition::new("shop", "Timestamped")
					.abstract_model()
					.field("created", FieldDescriptor::integer()),
			)
			.unwrap();
		registry
			.register(
				ModelDefinition::new("shop", "ChildModel")
					.inherits("BaseModel")
					.field(
						"owner",
						FieldDescriptor::foreign_key(ModelRef::new("shop", "BaseModel"), OnDelete::Protect)
							.related_name("+"),
					),
			)
			.unwrap();
		registry
	}

	#[rstest]
	fn test_from_registry_skips_abstract(registry: ModelRegistry) {
		let state = ProjectState::from_registry(&registry);

		let keys: Vec<&String> = state.models.keys().collect();
		assert_eq!(keys, vec!["shop.basemodel", "shop.childmodel"]);
		assert!(state.get_model("shop", "Timestamped").is_none());
	}

	#[rstest]
	fn test_model_state_records_bases_and_table(registry: ModelRegistry) {
		let state = ProjectState::from_registry(&registry);

		let child = state.require_model("shop", "ChildModel").unwrap();
		assert_eq!(child.table_name, "shop_childmodel");
		assert_eq!(child.bases, vec!["shop.BaseModel".to_string()]);
		assert_eq!(
			child.get_field("basemodel_ptr").map(|f| f.deconstruction.path.as_str()),
			Some("reinhardt.orm.models.OneToOneField")
		);
	}

	#[rstest]
	fn test_fields_keep_table_column_order(registry: ModelRegistry) {
		// Arrange
		registry
			.register(
				ModelDefinition::new("shop", "Pet")
					.inherits("BaseModel")
					.field("name", FieldDescriptor::char(50))
					.field("age", FieldDescriptor::integer()),
			)
			.unwrap();

		// Act
		let state = ProjectState::from_registry(&registry);
		let restored = ProjectState::from_json(&state.to_json().unwrap()).unwrap();

		// Assert
		let pet = restored.require_model("shop", "Pet").unwrap();
		let names: Vec<&String> = pet.fields.keys().collect();
		assert_eq!(names, vec!["basemodel_ptr", "name", "age"]);
	}

	#[rstest]
	fn test_json_snapshot_round_trip(registry: ModelRegistry) {
		let state = ProjectState::from_registry(&registry);

		let restored = ProjectState::from_json(&state.to_json().unwrap()).unwrap();

		assert_eq!(restored, state);
	}

	#[rstest]
	fn test_save_and_load(registry: ModelRegistry) {
		// Arrange
		let dir = tempfile::TempDir::new().unwrap();
		let path = dir.path().join("state.json");
		let state = ProjectState::from_registry(&registry);

		// Act
		state.save(&path).unwrap();
		let loaded = ProjectState::load(&path).unwrap();

		// Assert
		assert_eq!(loaded, state);
	}

	#[rstest]
	fn test_require_missing_model() {
		let state = ProjectState::new();
		let result = state.require_model("shop", "Ghost");

		assert!(matches!(
			result,
			Err(MigrationError::ModelNotFound { ref model, .. }) if model == "Ghost"
		));
	}

	#[rstest]
	fn test_load_invalid_json() {
		let result = ProjectState::from_json("{ not json");

		assert!(matches!(result, Err(MigrationError::Json(_))));
	}
}
