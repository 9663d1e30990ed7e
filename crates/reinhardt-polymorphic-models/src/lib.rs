//! # Reinhardt Polymorphic Models
//!
//! Polymorphic multi-table inheritance for Reinhardt models.
//!
//! Every concrete subclass of a polymorphic model is stored in its own table
//! and joined to its parent's table by a one-to-one primary key, the parent
//! link. This crate builds finalized [`ModelClass`]es from
//! [`ModelDefinition`]s and guarantees that each subclass ends up with exactly
//! one parent link whose reverse accessor policy is canonical, however the
//! link was declared.
//!
//! ## Example
//!
//! ```
//! use reinhardt_polymorphic_models::{ModelDefinition, ModelRegistry, is_parent_link};
//! use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete, RelatedName};
//!
//! let registry = ModelRegistry::new();
//! registry
//!     .register(ModelDefinition::new("shop", "BaseModel").polymorphic())
//!     .unwrap();
//!
//! // Declared by hand with the '+' related name
//! let child = registry
//!     .register(
//!         ModelDefinition::new("shop", "ChildModel")
//!             .inherits("BaseModel")
//!             .field(
//!                 "basemodel_ptr",
//!                 FieldDescriptor::one_to_one(ModelRef::new("shop", "BaseModel"), OnDelete::Cascade)
//!                     .primary_key(true)
//!                     .parent_link(true)
//!                     .related_name("+"),
//!             ),
//!     )
//!     .unwrap();
//!
//! let link = child.get_field("basemodel_ptr").unwrap();
//! assert!(is_parent_link(link));
//! assert_eq!(link.related_name, RelatedName::Unset);
//! ```

pub mod class;
pub mod contributor;
pub mod definition;
pub mod error;
pub mod finalizer;
pub mod hooks;
pub mod inheritance;
pub mod options;
pub mod parent_link;
pub mod registry;
pub mod settings;
pub mod validation;

pub use class::ModelClass;
pub use contributor::{FieldContributor, InheritedLinkContributor};
pub use definition::ModelDefinition;
pub use error::{ModelError, Result};
pub use finalizer::Finalizer;
pub use hooks::{FinalizationHook, FinalizeContext};
pub use inheritance::{ParentLinkJoin, ancestors, parent_link_path};
pub use options::ModelOptions;
pub use parent_link::{
	ParentLinkNormalizer, ParentLinkSynthesizer, is_parent_link, parent_link_name,
};
pub use registry::{ModelRegistry, global_registry};
pub use settings::{AutoFieldKind, PolymorphicSettings, SettingsError};
