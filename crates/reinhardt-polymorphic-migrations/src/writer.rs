//! Migration file writer
//!
//! Renders the detected changes of one app as Rust source. Field definitions
//! go through [`serialize_field`], so identical canonical forms always render
//! as identical text.

use crate::autodetector::DetectedChanges;
use crate::state::ProjectState;
use reinhardt_polymorphic_fields::{FieldDeconstruction, serialize_field};
use std::collections::BTreeSet;

/// One schema operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	CreateModel {
		name: String,
		fields: Vec<(String, FieldDeconstruction)>,
	},
	DeleteModel {
		name: String,
	},
	AddField {
		model: String,
		name: String,
		field: FieldDeconstruction,
	},
	RemoveField {
		model: String,
		name: String,
	},
	AlterField {
		model: String,
		name: String,
		field: FieldDeconstruction,
	},
}

/// Operations of one app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
	pub app_label: String,
	pub name: String,
	pub operations: Vec<Operation>,
}

impl Migration {
	pub fn new(name: impl Into<String>, app_label: impl Into<String>) -> Self {
		Self {
			app_label: app_label.into(),
			name: name.into(),
			operations: Vec::new(),
		}
	}

	pub fn add_operation(mut self, operation: Operation) -> Self {
		self.operations.push(operation);
		self
	}

	/// Build the operations of `app_label` from detected changes
	///
	/// Field definitions are taken from `to_state`; changes whose model or
	/// field is missing from it are skipped.
	pub fn from_changes(
		name: impl Into<String>,
		app_label: &str,
		changes: &DetectedChanges,
		to_state: &ProjectState,
	) -> Self {
		let mut migration = Self::new(name, app_label);
		let field_of = |model: &str, field: &str| {
			to_state
				.get_model(app_label, model)
				.and_then(|state| state.get_field(field))
				.map(|state| state.deconstruction.clone())
		};

		for (app, model) in &changes.created_models {
			if app != app_label {
				continue;
			}
			if let Some(state) = to_state.get_model(app, model) {
				migration.operations.push(Operation::CreateModel {
					name: model.clone(),
					fields: state
						.fields
						.values()
						.map(|field| (field.name.clone(), field.deconstruction.clone()))
						.collect(),
				});
			}
		}
		for (app, model, field) in &changes.added_fields {
			if app == app_label
				&& let Some(dec) = field_of(model, field)
			{
				migration.operations.push(Operation::AddField {
					model: model.clone(),
					name: field.clone(),
					field: dec,
				});
			}
		}
		for (app, model, field) in &changes.altered_fields {
			if app == app_label
				&& let Some(dec) = field_of(model, field)
			{
				migration.operations.push(Operation::AlterField {
					model: model.clone(),
					name: field.clone(),
					field: dec,
				});
			}
		}
		for (app, model, field) in &changes.removed_fields {
			if app == app_label {
				migration.operations.push(Operation::RemoveField {
					model: model.clone(),
					name: field.clone(),
				});
			}
		}
		for (app, model) in &changes.deleted_models {
			if app == app_label {
				migration
					.operations
					.push(Operation::DeleteModel { name: model.clone() });
			}
		}

		migration
	}
}

/// Writer for generating migration files
pub struct MigrationWriter {
	migration: Migration,
}

impl MigrationWriter {
	pub fn new(migration: Migration) -> Self {
		Self { migration }
	}

	/// Generate the migration file content
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::FieldDescriptor;
	/// use reinhardt_polymorphic_migrations::{Migration, MigrationWriter, Operation};
	///
	/// let migration = Migration::new("0001_initial", "shop").add_operation(Operation::AddField {
	///     model: "Product".to_string(),
	///     name: "name".to_string(),
	///     field: FieldDescriptor::char(100).deconstruct(),
	/// });
	///
	/// let content = MigrationWriter::new(migration).as_string();
	/// assert!(content.contains("//! Name: 0001_initial"));
	/// assert!(content.contains("models.CharField(max_length=100)"));
	/// ```
	pub fn as_string(&self) -> String {
		let mut imports = BTreeSet::new();
		let mut body = String::new();

		for operation in &self.migration.operations {
			body.push_str(&Self::serialize_operation(operation, &mut imports));
		}

		let mut content = String::new();
		content.push_str("//! Auto-generated migration\n");
		content.push_str(&format!("//! Name: {}\n", self.migration.name));
		content.push_str(&format!("//! App: {}\n\n", self.migration.app_label));
		for import in &imports {
			content.push_str(&format!("//! Uses: {}\n", import));
		}
		if !imports.is_empty() {
			content.push('\n');
		}

		content.push_str(&format!(
			"pub fn migration_{}() -> Migration {{\n",
			self.migration.name.replace('-', "_")
		));
		content.push_str(&format!(
			"\tMigration::new(\"{}\", \"{}\")\n",
			self.migration.name, self.migration.app_label
		));
		content.push_str(&body);
		content.push_str("}\n");
		content
	}

	fn serialize_operation(operation: &Operation, imports: &mut BTreeSet<String>) -> String {
		let mut field_source = |field: &FieldDeconstruction| {
			let serialized = serialize_field(field);
			imports.extend(serialized.imports);
			serialized.source
		};

		match operation {
			Operation::CreateModel { name, fields } => {
				let mut result = format!("\t\t.add_operation(Operation::CreateModel {{\n\t\t\tname: \"{}\",\n\t\t\tfields: vec![\n", name);
				for (field_name, field) in fields {
					result.push_str(&format!(
						"\t\t\t\t(\"{}\", {}),\n",
						field_name,
						field_source(field)
					));
				}
				result.push_str("\t\t\t],\n\t\t})\n");
				result
			}
			Operation::DeleteModel { name } => {
				format!("\t\t.add_operation(Operation::DeleteModel {{ name: \"{}\" }})\n", name)
			}
			Operation::AddField { model, name, field } => format!(
				"\t\t.add_operation(Operation::AddField {{ model: \"{}\", name: \"{}\", field: {} }})\n",
				model,
				name,
				field_source(field)
			),
			Operation::RemoveField { model, name } => format!(
				"\t\t.add_operation(Operation::RemoveField {{ model: \"{}\", name: \"{}\" }})\n",
				model, name
			),
			Operation::AlterField { model, name, field } => format!(
				"\t\t.add_operation(Operation::AlterField {{ model: \"{}\", name: \"{}\", field: {} }})\n",
				model,
				name,
				field_source(field)
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::autodetector::MigrationAutodetector;
	use reinhardt_polymorphic_fields::FieldDescriptor;
	use reinhardt_polymorphic_models::{ModelDefinition, ModelRegistry};
	use rstest::rstest;

	#[rstest]
	fn test_initial_migration_for_polymorphic_tree() {
		// Arrange
		let registry = ModelRegistry::new();
		registry
			.register(ModelDefinition::new("shop", "BaseModel").polymorphic())
			.unwrap();
		registry
			.register(ModelDefinition::new("shop", "ChildModel").inherits("BaseModel"))
			.unwrap();
		let to_state = ProjectState::from_registry(&registry);
		let changes = MigrationAutodetector::new(ProjectState::new(), to_state.clone()).detect_changes();

		// Act
		let migration = Migration::from_changes("0001_initial", "shop", &changes, &to_state);
		let content = MigrationWriter::new(migration.clone()).as_string();

		// Assert
		assert_eq!(migration.operations.len(), 2);
		assert!(content.contains("//! Uses: reinhardt.orm.models"));
		assert!(content.contains(
			"(\"basemodel_ptr\", models.OneToOneField(on_delete=\"CASCADE\", parent_link=true, primary_key=true, serialize=false, to=\"shop.basemodel\"))"
		));
		assert!(content.contains("related_name=\"polymorphic_shop.basemodel_set+\""));
		assert!(!content.contains("related_name=\"+\""));
	}

	#[rstest]
	fn test_create_model_lists_fields_in_column_order() {
		// Arrange
		let registry = ModelRegistry::new();
		registry
			.register(ModelDefinition::new("shop", "BaseModel").polymorphic())
			.unwrap();
		registry
			.register(
				ModelDefinition::new("shop", "ChildModel")
					.inherits("BaseModel")
					.field("age", FieldDescriptor::integer()),
			)
			.unwrap();
		let to_state = ProjectState::from_registry(&registry);
		let changes = MigrationAutodetector::new(ProjectState::new(), to_state.clone()).detect_changes();

		// Act
		let migration = Migration::from_changes("0001_initial", "shop", &changes, &to_state);
		let content = MigrationWriter::new(migration.clone()).as_string();

		// Assert
		let child_fields = migration
			.operations
			.iter()
			.find_map(|operation| match operation {
				Operation::CreateModel { name, fields } if name == "ChildModel" => Some(fields),
				_ => None,
			})
			.unwrap();
		let names: Vec<&str> = child_fields.iter().map(|(name, _)| name.as_str()).collect();
		assert_eq!(names, vec!["basemodel_ptr", "age"]);
		let link_at = content.find("(\"basemodel_ptr\"").unwrap();
		let age_at = content.find("(\"age\"").unwrap();
		assert!(link_at < age_at);
	}

	#[rstest]
	fn test_from_changes_filters_app() {
		let mut changes = DetectedChanges::default();
		changes
			.removed_fields
			.push(("blog".to_string(), "Post".to_string(), "title".to_string()));
		changes.deleted_models.push(("shop".to_string(), "Old".to_string()));

		let migration = Migration::from_changes("0002", "shop", &changes, &ProjectState::new());

		assert_eq!(
			migration.operations,
			vec![Operation::DeleteModel { name: "Old".to_string() }]
		);
	}
}
