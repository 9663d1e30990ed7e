//! # Reinhardt Polymorphic Fields
//!
//! Field descriptors for models that take part in polymorphic multi-table
//! inheritance.
//!
//! A [`FieldDescriptor`] is the declarative description of one column or
//! relation on a model. Relation fields carry a paired [`RemoteRelation`] that
//! describes the relation from the target's point of view. Both hold a copy of
//! the reverse accessor policy, modeled as the tagged [`RelatedName`] enum
//! rather than a nullable string.
//!
//! [`FieldDescriptor::deconstruct`] produces the canonical `(path, args, kwargs)`
//! form consumed by schema diffing, and [`serialize_field`] renders it as
//! byte-stable text.
//!
//! ## Example
//!
//! ```
//! use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete, RelatedName};
//!
//! let mut link = FieldDescriptor::one_to_one(ModelRef::new("shop", "Product"), OnDelete::Cascade)
//!     .primary_key(true)
//!     .parent_link(true)
//!     .related_name(RelatedName::Suppressed);
//! link.set_attributes_from_name("product_ptr");
//!
//! let dec = link.deconstruct();
//! assert_eq!(dec.path, "reinhardt.orm.models.OneToOneField");
//! assert_eq!(dec.name.as_deref(), Some("product_ptr"));
//! ```

pub mod deconstruct;
pub mod descriptor;
pub mod error;
pub mod related_name;
pub mod relation;
pub mod serializer;

pub use deconstruct::{FieldArg, FieldDeconstruction, FieldKwarg};
pub use descriptor::{FieldDescriptor, FieldKind};
pub use error::{FieldError, Result};
pub use related_name::{RelatedName, SUPPRESS_REVERSE};
pub use relation::{ModelRef, OnDelete, RemoteRelation};
pub use serializer::{SerializedField, serialize_field};
