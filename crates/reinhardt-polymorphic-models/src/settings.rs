//! Settings for polymorphic model finalization
//!
//! Settings are layered: defaults, then a TOML file, then environment
//! variables prefixed with `REINHARDT_POLYMORPHIC_`.
//!
//! ```toml
//! parent_link_suffix = "_ptr"
//! default_auto_field = "BigAutoField"
//! add_polymorphic_ctype = true
//! ```

use reinhardt_polymorphic_fields::FieldDescriptor;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Error type for loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid value for '{key}': {value}")]
	InvalidValue { key: String, value: String },

	#[error("Invalid parent link suffix '{0}': must be a non-empty identifier fragment")]
	InvalidSuffix(String),
}

/// Primary key class added to models that declare none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AutoFieldKind {
	AutoField,
	#[default]
	BigAutoField,
}

impl AutoFieldKind {
	/// Build the automatic primary key field
	pub fn field(&self) -> FieldDescriptor {
		let field = match self {
			AutoFieldKind::AutoField => FieldDescriptor::auto(),
			AutoFieldKind::BigAutoField => FieldDescriptor::big_auto(),
		};
		field.auto_created(true)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolymorphicSettings {
	/// Appended to the lower-cased ancestor name to name synthesized parent links
	pub parent_link_suffix: String,
	pub default_auto_field: AutoFieldKind,
	/// Add the `polymorphic_ctype` field to polymorphic root models
	pub add_polymorphic_ctype: bool,
}

impl Default for PolymorphicSettings {
	fn default() -> Self {
		Self {
			parent_link_suffix: "_ptr".to_string(),
			default_auto_field: AutoFieldKind::default(),
			add_polymorphic_ctype: true,
		}
	}
}

impl PolymorphicSettings {
	/// Prefix of environment variables read by [`PolymorphicSettings::with_env_overrides`]
	pub const ENV_PREFIX: &'static str = "REINHARDT_POLYMORPHIC_";

	/// Parse settings from TOML text; missing keys keep their defaults
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_models::PolymorphicSettings;
	///
	/// let settings = PolymorphicSettings::from_toml_str("parent_link_suffix = \"_link\"").unwrap();
	/// assert_eq!(settings.parent_link_suffix, "_link");
	/// assert!(settings.add_polymorphic_ctype);
	/// ```
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let content = fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Apply `REINHARDT_POLYMORPHIC_*` environment variables
	pub fn with_env_overrides(self) -> Result<Self, SettingsError> {
		let vars = std::env::vars().filter_map(|(key, value)| {
			key.strip_prefix(Self::ENV_PREFIX)
				.map(|stripped| (stripped.to_lowercase(), value))
		});
		self.apply_overrides(vars)
	}

	/// Apply `(key, value)` overrides; unknown keys are ignored
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_models::PolymorphicSettings;
	///
	/// let settings = PolymorphicSettings::default()
	///     .apply_overrides([("add_polymorphic_ctype".to_string(), "off".to_string())])
	///     .unwrap();
	/// assert!(!settings.add_polymorphic_ctype);
	/// ```
	pub fn apply_overrides<I>(mut self, overrides: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		for (key, value) in overrides {
			match key.as_str() {
				"parent_link_suffix" => self.parent_link_suffix = value,
				"add_polymorphic_ctype" => {
					self.add_polymorphic_ctype = parse_bool(&key, &value)?;
				}
				"default_auto_field" => {
					self.default_auto_field = match value.trim() {
						"AutoField" => AutoFieldKind::AutoField,
						"BigAutoField" => AutoFieldKind::BigAutoField,
						_ => return Err(SettingsError::InvalidValue { key, value }),
					};
				}
				_ => {}
			}
		}
		self.validate()?;
		Ok(self)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		let suffix = &self.parent_link_suffix;
		if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
			return Err(SettingsError::InvalidSuffix(suffix.clone()));
		}
		Ok(())
	}
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
	match value.trim().to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(SettingsError::InvalidValue {
			key: key.to_string(),
			value: value.to_string(),
		}),
	}
}
