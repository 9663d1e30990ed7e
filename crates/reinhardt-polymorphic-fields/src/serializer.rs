//! Text serialization of deconstructed fields
//!
//! Renders a [`FieldDeconstruction`] the way the migration writer embeds it:
//! `models.OneToOneField(on_delete="CASCADE", primary_key=true, ...)`.
//! Keyword arguments come out in key order, so equal deconstructions always
//! produce identical text.

use crate::deconstruct::{FieldArg, FieldDeconstruction, FieldKwarg};
use std::collections::BTreeSet;

/// Serialized field source and the modules it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedField {
	pub source: String,
	pub imports: BTreeSet<String>,
}

/// Serialize a deconstructed field
///
/// # Examples
///
/// ```
/// use reinhardt_polymorphic_fields::{FieldDescriptor, serialize_field};
///
/// let serialized = serialize_field(&FieldDescriptor::char(100).null(true).deconstruct());
/// assert_eq!(serialized.source, "models.CharField(max_length=100, null=true)");
/// assert!(serialized.imports.contains("reinhardt.orm.models"));
/// ```
pub fn serialize_field(dec: &FieldDeconstruction) -> SerializedField {
	let (module, class_name) = match dec.path.rsplit_once('.') {
		Some((module, class_name)) => (Some(module), class_name),
		None => (None, dec.path.as_str()),
	};

	let mut imports = BTreeSet::new();
	let callee = match module {
		Some(module) => {
			imports.insert(module.to_string());
			let alias = module.rsplit('.').next().unwrap_or(module);
			format!("{}.{}", alias, class_name)
		}
		None => class_name.to_string(),
	};

	let mut parts: Vec<String> = dec.args.iter().map(render_arg).collect();
	parts.extend(
		dec.kwargs
			.iter()
			.map(|(key, value)| format!("{}={}", key, render_kwarg(value))),
	);

	SerializedField {
		source: format!("{}({})", callee, parts.join(", ")),
		imports,
	}
}

fn render_arg(arg: &FieldArg) -> String {
	match arg {
		FieldArg::String(value) => quote(value),
		FieldArg::Int(value) => value.to_string(),
		FieldArg::Bool(value) => value.to_string(),
	}
}

fn render_kwarg(kwarg: &FieldKwarg) -> String {
	match kwarg {
		FieldKwarg::String(value) => quote(value),
		FieldKwarg::Int(value) => value.to_string(),
		FieldKwarg::Bool(value) => value.to_string(),
	}
}

fn quote(value: &str) -> String {
	let mut quoted = String::with_capacity(value.len() + 2);
	quoted.push('"');
	for c in value.chars() {
		match c {
			'"' => quoted.push_str("\\\""),
			'\\' => quoted.push_str("\\\\"),
			'\n' => quoted.push_str("\\n"),
			other => quoted.push(other),
		}
	}
	quoted.push('"');
	quoted
}
