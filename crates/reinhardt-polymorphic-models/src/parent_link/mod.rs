//! Parent links
//!
//! A parent link is the one-to-one primary key relation that joins a
//! multi-table inheritance subclass row to its concrete parent row.
//!
//! Two finalization hooks work on them:
//!
//! - [`ParentLinkSynthesizer`] creates the link when the subclass does not
//!   declare one.
//! - [`ParentLinkNormalizer`] rewrites the `'+'` related name on any parent
//!   link to the unset form, so that a declared link and a created link
//!   deconstruct identically.
//!
//! # Django Reference
//! `ModelBase.__new__` creates `<parent>_ptr` fields in
//! `django/db/models/base.py`; django-polymorphic normalizes their
//! `related_name` when the class is prepared.

mod normalizer;
mod synthesizer;

pub use normalizer::ParentLinkNormalizer;
pub use synthesizer::ParentLinkSynthesizer;

use reinhardt_polymorphic_fields::FieldDescriptor;

/// Whether `field` is a parent link
///
/// A parent link is a one-to-one relation that is both the primary key and
/// flagged as the parent link, and that has a target. Fields flagged as parent
/// links but missing a target are malformed and not classified.
///
/// # Examples
///
/// ```
/// use reinhardt_polymorphic_models::is_parent_link;
/// use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete};
///
/// let base = ModelRef::new("shop", "BaseModel");
/// let link = FieldDescriptor::one_to_one(base.clone(), OnDelete::Cascade)
///     .primary_key(true)
///     .parent_link(true);
/// let plain = FieldDescriptor::one_to_one(base, OnDelete::Cascade).parent_link(true);
///
/// assert!(is_parent_link(&link));
/// assert!(!is_parent_link(&plain));
/// ```
pub fn is_parent_link(field: &FieldDescriptor) -> bool {
	field.is_one_to_one()
		&& field.is_primary_key()
		&& field.is_parent_link_flagged()
		&& field.target().is_some()
}

/// Conventional name of the parent link to `ancestor_name`
///
/// # Examples
///
/// ```
/// use reinhardt_polymorphic_models::parent_link_name;
///
/// assert_eq!(parent_link_name("BaseModel", "_ptr"), "basemodel_ptr");
/// ```
pub fn parent_link_name(ancestor_name: &str, suffix: &str) -> String {
	format!("{}{}", ancestor_name.to_lowercase(), suffix)
}
