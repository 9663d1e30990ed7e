//! Model registry
//!
//! Registering a [`ModelDefinition`] finalizes it against the models already
//! registered and stores the resulting [`ModelClass`]. Bases must be
//! registered before their subclasses.
//!
//! # Django Reference
//! Django's app registry is implemented in `django/apps/registry.py`:
//! - Model registration via `Apps.register_model()`
//! - Model retrieval via `Apps.get_model()` and `Apps.get_models()`
//! - Subclass lookup through `Model.__subclasses__()`

use crate::class::ModelClass;
use crate::definition::ModelDefinition;
use crate::error::Result;
use crate::finalizer::Finalizer;
use crate::settings::PolymorphicSettings;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use reinhardt_polymorphic_fields::ModelRef;
use std::collections::VecDeque;
use std::sync::Arc;

type ModelKey = (String, String);

/// Registry of finalized models
///
/// Cloning a registry yields a handle to the same models.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
	/// Models: (app_label, lower-cased model name) -> class, in registration order
	models: Arc<RwLock<IndexMap<ModelKey, Arc<ModelClass>>>>,
	finalizer: Arc<Finalizer>,
}

impl ModelRegistry {
	pub fn new() -> Self {
		Self::with_finalizer(Finalizer::default())
	}

	pub fn with_settings(settings: PolymorphicSettings) -> Self {
		Self::with_finalizer(Finalizer::new(settings))
	}

	pub fn with_finalizer(finalizer: Finalizer) -> Self {
		Self {
			models: Arc::new(RwLock::new(IndexMap::new())),
			finalizer: Arc::new(finalizer),
		}
	}

	pub fn settings(&self) -> &PolymorphicSettings {
		self.finalizer.settings()
	}

	/// Finalize and register a model
	///
	/// Registering a model under an existing key replaces the previous class.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_models::{ModelDefinition, ModelRegistry};
	///
	/// let registry = ModelRegistry::new();
	/// registry.register(ModelDefinition::new("shop", "BaseModel").polymorphic()).unwrap();
	/// let child = registry
	///     .register(ModelDefinition::new("shop", "ChildModel").inherits("BaseModel"))
	///     .unwrap();
	///
	/// assert!(child.get_field("basemodel_ptr").is_some());
	/// assert_eq!(registry.count(), 2);
	/// ```
	pub fn register(&self, definition: ModelDefinition) -> Result<Arc<ModelClass>> {
		// Finalization reads other models; the write lock is only taken to insert
		let class = Arc::new(self.finalizer.finalize(definition, self)?);

		let mut models = self.models.write();
		if models.insert(class.key(), Arc::clone(&class)).is_some() {
			tracing::warn!(model = %class.label(), "model re-registered, replacing previous class");
		}
		Ok(class)
	}

	/// Look up a model by app label and case-insensitive name
	pub fn get_model(&self, app_label: &str, model_name: &str) -> Option<Arc<ModelClass>> {
		let key = (app_label.to_string(), model_name.to_lowercase());
		self.models.read().get(&key).cloned()
	}

	pub fn get_by_ref(&self, model: &ModelRef) -> Option<Arc<ModelClass>> {
		self.models.read().get(&model.key()).cloned()
	}

	/// All models in registration order
	pub fn get_models(&self) -> Vec<Arc<ModelClass>> {
		self.models.read().values().cloned().collect()
	}

	pub fn get_app_models(&self, app_label: &str) -> Vec<Arc<ModelClass>> {
		self.models
			.read()
			.values()
			.filter(|model| model.app_label == app_label)
			.cloned()
			.collect()
	}

	pub fn remove_model(&self, app_label: &str, model_name: &str) -> Option<Arc<ModelClass>> {
		let key = (app_label.to_string(), model_name.to_lowercase());
		self.models.write().shift_remove(&key)
	}

	pub fn clear(&self) {
		self.models.write().clear();
	}

	pub fn count(&self) -> usize {
		self.models.read().len()
	}

	/// Direct concrete subclasses of `model`
	pub fn subclasses(&self, model: &ModelRef) -> Vec<Arc<ModelClass>> {
		let key = model.key();
		self.models
			.read()
			.values()
			.filter(|class| {
				class
					.concrete_parent
					.as_ref()
					.is_some_and(|parent| parent.key() == key)
			})
			.cloned()
			.collect()
	}

	/// All concrete subclasses of `model`, breadth first
	pub fn descendants(&self, model: &ModelRef) -> Vec<Arc<ModelClass>> {
		let mut found = Vec::new();
		let mut queue = VecDeque::from([model.clone()]);
		while let Some(current) = queue.pop_front() {
			for subclass in self.subclasses(&current) {
				queue.push_back(subclass.model_ref());
				found.push(subclass);
			}
		}
		found
	}
}

impl Default for ModelRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static GLOBAL_REGISTRY: Lazy<ModelRegistry> = Lazy::new(ModelRegistry::new);

/// Process-wide registry with default settings
pub fn global_registry() -> &'static ModelRegistry {
	&GLOBAL_REGISTRY
}
