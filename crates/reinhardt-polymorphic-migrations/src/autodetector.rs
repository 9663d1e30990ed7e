//! Change detection between two project states
//!
//! A field is altered exactly when its canonical form differs. Provenance
//! such as `auto_created` is not part of the canonical form, so switching a
//! parent link between an automatically created and a hand-declared one is
//! not a change.

use crate::state::{FieldState, ProjectState};

/// Changes between two project states, each list sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedChanges {
	/// Models that were created: (app_label, model_name)
	pub created_models: Vec<(String, String)>,
	/// Models that were deleted: (app_label, model_name)
	pub deleted_models: Vec<(String, String)>,
	/// Fields that were added: (app_label, model_name, field_name)
	pub added_fields: Vec<(String, String, String)>,
	/// Fields that were removed: (app_label, model_name, field_name)
	pub removed_fields: Vec<(String, String, String)>,
	/// Fields that were altered: (app_label, model_name, field_name)
	pub altered_fields: Vec<(String, String, String)>,
}

impl DetectedChanges {
	pub fn is_empty(&self) -> bool {
		self.created_models.is_empty()
			&& self.deleted_models.is_empty()
			&& self.added_fields.is_empty()
			&& self.removed_fields.is_empty()
			&& self.altered_fields.is_empty()
	}

	/// App labels touched by any change, sorted
	pub fn app_labels(&self) -> Vec<String> {
		let mut labels: Vec<String> = self
			.created_models
			.iter()
			.chain(&self.deleted_models)
			.map(|(app, _)| app.clone())
			.chain(
				self.added_fields
					.iter()
					.chain(&self.removed_fields)
					.chain(&self.altered_fields)
					.map(|(app, _, _)| app.clone()),
			)
			.collect();
		labels.sort();
		labels.dedup();
		labels
	}
}

/// Compares two project states
///
/// # Examples
///
/// ```
/// use reinhardt_polymorphic_migrations::{MigrationAutodetector, ProjectState};
/// use reinhardt_polymorphic_models::{ModelDefinition, ModelRegistry};
///
/// let registry = ModelRegistry::new();
/// registry.register(ModelDefinition::new("shop", "BaseModel")).unwrap();
///
/// let detector = MigrationAutodetector::new(ProjectState::new(), ProjectState::from_registry(&registry));
/// let changes = detector.detect_changes();
///
/// assert_eq!(changes.created_models, vec![("shop".to_string(), "BaseModel".to_string())]);
/// ```
#[derive(Debug, Clone)]
pub struct MigrationAutodetector {
	from_state: ProjectState,
	to_state: ProjectState,
}

impl MigrationAutodetector {
	pub fn new(from_state: ProjectState, to_state: ProjectState) -> Self {
		Self {
			from_state,
			to_state,
		}
	}

	pub fn detect_changes(&self) -> DetectedChanges {
		let mut changes = DetectedChanges::default();

		self.detect_created_models(&mut changes);
		self.detect_deleted_models(&mut changes);
		self.detect_added_fields(&mut changes);
		self.detect_removed_fields(&mut changes);
		self.detect_altered_fields(&mut changes);

		changes.created_models.sort();
		changes.deleted_models.sort();
		changes.added_fields.sort();
		changes.removed_fields.sort();
		changes.altered_fields.sort();

		tracing::debug!(
			created = changes.created_models.len(),
			deleted = changes.deleted_models.len(),
			added = changes.added_fields.len(),
			removed = changes.removed_fields.len(),
			altered = changes.altered_fields.len(),
			"detected schema changes"
		);
		changes
	}

	fn detect_created_models(&self, changes: &mut DetectedChanges) {
		for (key, model) in &self.to_state.models {
			if !self.from_state.models.contains_key(key) {
				changes
					.created_models
					.push((model.app_label.clone(), model.name.clone()));
			}
		}
	}

	fn detect_deleted_models(&self, changes: &mut DetectedChanges) {
		for (key, model) in &self.from_state.models {
			if !self.to_state.models.contains_key(key) {
				changes
					.deleted_models
					.push((model.app_label.clone(), model.name.clone()));
			}
		}
	}

	fn detect_added_fields(&self, changes: &mut DetectedChanges) {
		for (key, to_model) in &self.to_state.models {
			let Some(from_model) = self.from_state.models.get(key) else {
				continue;
			};
			for field_name in to_model.fields.keys() {
				if !from_model.has_field(field_name) {
					changes.added_fields.push((
						to_model.app_label.clone(),
						to_model.name.clone(),
						field_name.clone(),
					));
				}
			}
		}
	}

	fn detect_removed_fields(&self, changes: &mut DetectedChanges) {
		for (key, from_model) in &self.from_state.models {
			let Some(to_model) = self.to_state.models.get(key) else {
				continue;
			};
			for field_name in from_model.fields.keys() {
				if !to_model.has_field(field_name) {
					changes.removed_fields.push((
						to_model.app_label.clone(),
						to_model.name.clone(),
						field_name.clone(),
					));
				}
			}
		}
	}

	fn detect_altered_fields(&self, changes: &mut DetectedChanges) {
		for (key, to_model) in &self.to_state.models {
			let Some(from_model) = self.from_state.models.get(key) else {
				continue;
			};
			for (field_name, to_field) in &to_model.fields {
				if let Some(from_field) = from_model.get_field(field_name)
					&& Self::has_field_changed(from_field, to_field)
				{
					changes.altered_fields.push((
						to_model.app_label.clone(),
						to_model.name.clone(),
						field_name.clone(),
					));
				}
			}
		}
	}

	/// Check if a field's canonical form has changed
	fn has_field_changed(from_field: &FieldState, to_field: &FieldState) -> bool {
		!from_field
			.deconstruction
			.same_definition(&to_field.deconstruction)
	}
}
