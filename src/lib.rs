//! # Reinhardt Polymorphic
//!
//! Polymorphic multi-table inheritance for Reinhardt models, inspired by
//! django-polymorphic.
//!
//! Each concrete subclass of a polymorphic model gets its own table, joined to
//! its parent's table through a one-to-one primary key: the parent link. When
//! a model is registered, its parent link is created if the subclass does not
//! declare one, and the `'+'` related name on parent links is normalized away,
//! so the schema differ sees the same field whether the link was created
//! automatically, declared by hand, or injected by a field contributor.
//!
//! ## Crates
//!
//! - [`fields`]: field descriptors and their canonical deconstruction
//! - [`models`]: model definitions, finalization hooks and the model registry
//! - [`migrations`]: project state snapshots and change detection
//!   (feature `migrations`, enabled by default)
//!
//! ## Quick Start
//!
//! ```
//! use reinhardt_polymorphic::prelude::*;
//!
//! let registry = ModelRegistry::new();
//! registry
//!     .register(
//!         ModelDefinition::new("shop", "Product")
//!             .polymorphic()
//!             .field("name", FieldDescriptor::char(100)),
//!     )
//!     .unwrap();
//! let book = registry
//!     .register(
//!         ModelDefinition::new("shop", "Book")
//!             .inherits("Product")
//!             .field("isbn", FieldDescriptor::char(13)),
//!     )
//!     .unwrap();
//!
//! let (name, link) = book.parent_link().unwrap();
//! assert_eq!(name, "product_ptr");
//! assert_eq!(link.related_name, RelatedName::Unset);
//!
//! let joins = parent_link_path(&registry, &book.model_ref(), &ModelRef::new("shop", "Product")).unwrap();
//! assert_eq!(
//!     joins[0].to_sql(),
//!     "INNER JOIN shop_product ON shop_book.product_ptr_id = shop_product.id"
//! );
//! ```

pub use reinhardt_polymorphic_fields as fields;
#[cfg(feature = "migrations")]
pub use reinhardt_polymorphic_migrations as migrations;
pub use reinhardt_polymorphic_models as models;

pub mod prelude {
	pub use reinhardt_polymorphic_fields::{
		FieldDeconstruction, FieldDescriptor, FieldKind, ModelRef, OnDelete, RelatedName,
		serialize_field,
	};
	pub use reinhardt_polymorphic_models::{
		FieldContributor, FinalizationHook, FinalizeContext, InheritedLinkContributor, ModelClass,
		ModelDefinition, ModelError, ModelRegistry, PolymorphicSettings, global_registry,
		is_parent_link, parent_link_path,
	};

	#[cfg(feature = "migrations")]
	pub use reinhardt_polymorphic_migrations::{
		MigrationAutodetector, MigrationWriter, ProjectState,
	};
}
