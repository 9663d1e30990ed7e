//! Model `Meta` options

use serde::{Deserialize, Serialize};

/// Options declared on a model
///
/// # Django Reference
/// A subset of `django.db.models.options.Options`: `abstract` and `db_table`.
/// `polymorphic` marks the root of a polymorphic hierarchy and is inherited
/// by every subclass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
	/// Abstract models have no table; their fields are copied into subclasses
	pub abstract_model: bool,
	pub polymorphic: bool,
	/// Overrides the `<app_label>_<model>` table name
	pub db_table: Option<String>,
}

impl ModelOptions {
	/// Table name for a concrete model
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_models::ModelOptions;
	///
	/// let options = ModelOptions::default();
	/// assert_eq!(options.table_name("shop", "BaseModel"), "shop_basemodel");
	/// ```
	pub fn table_name(&self, app_label: &str, model_name: &str) -> String {
		match self.db_table {
			Some(ref table) => table.clone(),
			None => format!("{}_{}", app_label, model_name.to_lowercase()),
		}
	}
}
