// Field deconstruction API
// Corresponds to Django's Field.deconstruct()

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field deconstruction result
///
/// Returns (name, path, args, kwargs) similar to Django's deconstruct().
/// `kwargs` is ordered by key so that two deconstructions of equivalent fields
/// render to identical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeconstruction {
	pub name: Option<String>,
	pub path: String,
	pub args: Vec<FieldArg>,
	pub kwargs: BTreeMap<String, FieldKwarg>,
}

/// Positional argument for field construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldArg {
	String(String),
	Int(i64),
	Bool(bool),
}

/// Keyword argument for field construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldKwarg {
	String(String),
	Int(i64),
	Bool(bool),
}

impl From<&str> for FieldKwarg {
	fn from(value: &str) -> Self {
		FieldKwarg::String(value.to_string())
	}
}

impl From<String> for FieldKwarg {
	fn from(value: String) -> Self {
		FieldKwarg::String(value)
	}
}

impl From<bool> for FieldKwarg {
	fn from(value: bool) -> Self {
		FieldKwarg::Bool(value)
	}
}

impl From<i64> for FieldKwarg {
	fn from(value: i64) -> Self {
		FieldKwarg::Int(value)
	}
}

impl FieldDeconstruction {
	/// Create an empty deconstruction for the field class at `path`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::{FieldDeconstruction, FieldKwarg};
	///
	/// let dec = FieldDeconstruction::new("reinhardt.orm.models.IntegerField")
	///     .with_name("age")
	///     .with_kwarg("null", true);
	/// assert_eq!(dec.get_kwarg("null"), Some(&FieldKwarg::Bool(true)));
	/// ```
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			name: None,
			path: path.into(),
			args: Vec::new(),
			kwargs: BTreeMap::new(),
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn with_kwarg(mut self, key: impl Into<String>, value: impl Into<FieldKwarg>) -> Self {
		self.kwargs.insert(key.into(), value.into());
		self
	}

	pub fn get_kwarg(&self, key: &str) -> Option<&FieldKwarg> {
		self.kwargs.get(key)
	}

	/// Compare two deconstructions while ignoring the field name
	///
	/// This is the comparison schema diffing uses: two fields with the same
	/// path, args and kwargs describe the same column regardless of which
	/// model attribute holds them.
	pub fn same_definition(&self, other: &Self) -> bool {
		self.path == other.path && self.args == other.args && self.kwargs == other.kwargs
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_kwargs_iterate_in_key_order() {
		let dec = FieldDeconstruction::new("reinhardt.orm.models.OneToOneField")
			.with_kwarg("to", "shop.product")
			.with_kwarg("primary_key", true)
			.with_kwarg("on_delete", "CASCADE");

		let keys: Vec<&str> = dec.kwargs.keys().map(String::as_str).collect();
		assert_eq!(keys, vec!["on_delete", "primary_key", "to"]);
	}

	#[rstest]
	fn test_same_definition_ignores_name() {
		let a = FieldDeconstruction::new("reinhardt.orm.models.IntegerField")
			.with_name("age")
			.with_kwarg("null", true);
		let b = FieldDeconstruction::new("reinhardt.orm.models.IntegerField")
			.with_name("years")
			.with_kwarg("null", true);

		assert!(a.same_definition(&b));
		assert_ne!(a, b);
	}

	#[rstest]
	fn test_same_definition_detects_kwarg_change() {
		let a = FieldDeconstruction::new("reinhardt.orm.models.IntegerField").with_kwarg("null", true);
		let b = FieldDeconstruction::new("reinhardt.orm.models.IntegerField");

		assert!(!a.same_definition(&b));
	}

	#[rstest]
	fn test_json_snapshot_keeps_kwarg_types() {
		let dec = FieldDeconstruction::new("reinhardt.orm.models.CharField")
			.with_name("title")
			.with_kwarg("max_length", 120_i64)
			.with_kwarg("blank", true)
			.with_kwarg("db_column", "title_text");

		let json = serde_json::to_string(&dec).unwrap();
		let restored: FieldDeconstruction = serde_json::from_str(&json).unwrap();

		assert_eq!(restored, dec);
		assert!(json.contains("\"max_length\":120"));
	}
}
