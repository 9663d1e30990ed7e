//! Reverse accessor policy for relation fields
//!
//! Django spells this as a nullable `related_name` string where `None` means
//! "use the default accessor name" and `'+'` means "install no reverse
//! accessor". Here the three cases are distinct variants so the sentinel can
//! never be mistaken for a real accessor name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The related name value that suppresses the reverse accessor
pub const SUPPRESS_REVERSE: &str = "+";

/// Reverse accessor policy of a relation field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelatedName {
	/// No explicit name was given
	#[default]
	Unset,
	/// The `'+'` sentinel: no reverse accessor is created
	Suppressed,
	/// An explicit accessor name chosen by the user
	Named(String),
}

impl RelatedName {
	/// Build a policy from an explicit name, mapping the sentinel to [`RelatedName::Suppressed`]
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::RelatedName;
	///
	/// assert_eq!(RelatedName::named("+"), RelatedName::Suppressed);
	/// assert_eq!(RelatedName::named("children"), RelatedName::Named("children".to_string()));
	/// ```
	pub fn named(name: impl Into<String>) -> Self {
		let name = name.into();
		if name == SUPPRESS_REVERSE {
			RelatedName::Suppressed
		} else {
			RelatedName::Named(name)
		}
	}

	/// Build a policy from an optional declaration (`None` is [`RelatedName::Unset`])
	pub fn parse(value: Option<&str>) -> Self {
		match value {
			None => RelatedName::Unset,
			Some(name) => RelatedName::named(name),
		}
	}

	pub fn is_unset(&self) -> bool {
		matches!(self, RelatedName::Unset)
	}

	/// Whether this value is the suppress sentinel
	///
	/// A `Named("+")` built without going through [`RelatedName::named`] is
	/// still the sentinel.
	pub fn is_suppressed(&self) -> bool {
		match self {
			RelatedName::Suppressed => true,
			RelatedName::Named(name) => name == SUPPRESS_REVERSE,
			RelatedName::Unset => false,
		}
	}

	/// Whether no reverse accessor is installed on the target
	///
	/// Django hides the accessor for any name ending in `'+'`, not only for
	/// the bare sentinel.
	pub fn is_hidden(&self) -> bool {
		match self {
			RelatedName::Suppressed => true,
			RelatedName::Named(name) => name.ends_with('+'),
			RelatedName::Unset => false,
		}
	}

	/// The explicit name, if any
	pub fn as_name(&self) -> Option<&str> {
		match self {
			RelatedName::Named(name) if name != SUPPRESS_REVERSE => Some(name),
			_ => None,
		}
	}

	/// Value written to the `related_name` keyword argument, `None` when unset
	pub fn as_kwarg(&self) -> Option<&str> {
		match self {
			RelatedName::Unset => None,
			RelatedName::Suppressed => Some(SUPPRESS_REVERSE),
			RelatedName::Named(name) => Some(name),
		}
	}

	/// Expand `%(app_label)s` and `%(class)s` placeholders
	///
	/// `%(class)s` expands to the lower-cased class name.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::RelatedName;
	///
	/// let name = RelatedName::named("polymorphic_%(app_label)s.%(class)s_set+");
	/// assert_eq!(
	///     name.expand("shop", "Product"),
	///     RelatedName::named("polymorphic_shop.product_set+"),
	/// );
	/// ```
	pub fn expand(&self, app_label: &str, class_name: &str) -> Self {
		match self {
			RelatedName::Named(name) => RelatedName::named(
				name.replace("%(app_label)s", &app_label.to_lowercase())
					.replace("%(class)s", &class_name.to_lowercase()),
			),
			other => other.clone(),
		}
	}
}

impl From<&str> for RelatedName {
	fn from(value: &str) -> Self {
		RelatedName::named(value)
	}
}

impl From<String> for RelatedName {
	fn from(value: String) -> Self {
		RelatedName::named(value)
	}
}

impl From<Option<&str>> for RelatedName {
	fn from(value: Option<&str>) -> Self {
		RelatedName::parse(value)
	}
}

impl fmt::Display for RelatedName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.as_kwarg() {
			Some(value) => write!(f, "{}", value),
			None => write!(f, "<unset>"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, RelatedName::Unset)]
	#[case(Some("+"), RelatedName::Suppressed)]
	#[case(Some("child_link"), RelatedName::Named("child_link".to_string()))]
	fn test_parse(#[case] input: Option<&str>, #[case] expected: RelatedName) {
		assert_eq!(RelatedName::parse(input), expected);
	}

	#[rstest]
	fn test_raw_named_sentinel_is_suppressed() {
		let raw = RelatedName::Named("+".to_string());

		assert!(raw.is_suppressed());
		assert_eq!(raw.as_name(), None);
	}

	#[rstest]
	#[case(RelatedName::Unset, false)]
	#[case(RelatedName::Suppressed, true)]
	#[case(RelatedName::named("items_set+"), true)]
	#[case(RelatedName::named("items"), false)]
	fn test_is_hidden(#[case] value: RelatedName, #[case] hidden: bool) {
		assert_eq!(value.is_hidden(), hidden);
	}

	#[rstest]
	fn test_hidden_name_is_not_the_sentinel() {
		let value = RelatedName::named("polymorphic_shop.product_set+");

		assert!(value.is_hidden());
		assert!(!value.is_suppressed());
	}

	#[rstest]
	fn test_expand_leaves_non_named_values() {
		assert_eq!(RelatedName::Unset.expand("a", "B"), RelatedName::Unset);
		assert_eq!(
			RelatedName::Suppressed.expand("a", "B"),
			RelatedName::Suppressed
		);
	}

	#[rstest]
	fn test_display() {
		assert_eq!(RelatedName::Unset.to_string(), "<unset>");
		assert_eq!(RelatedName::Suppressed.to_string(), "+");
		assert_eq!(RelatedName::named("kids").to_string(), "kids");
	}
}
