//! # Reinhardt Polymorphic Migrations
//!
//! Schema diffing for polymorphic models.
//!
//! [`ProjectState`] snapshots the canonical form of every field,
//! [`MigrationAutodetector`] compares two snapshots and [`MigrationWriter`]
//! renders the result. Because parent links are normalized before they are
//! snapshotted, switching between an automatically created parent link and
//! an equivalent declared one produces no changes.
//!
//! ## Example
//!
//! ```
//! use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete};
//! use reinhardt_polymorphic_migrations::{MigrationAutodetector, ProjectState};
//! use reinhardt_polymorphic_models::{ModelDefinition, ModelRegistry};
//!
//! let auto = ModelRegistry::new();
//! auto.register(ModelDefinition::new("shop", "BaseModel").polymorphic()).unwrap();
//! auto.register(ModelDefinition::new("shop", "ChildModel").inherits("BaseModel")).unwrap();
//!
//! let declared = ModelRegistry::new();
//! declared.register(ModelDefinition::new("shop", "BaseModel").polymorphic()).unwrap();
//! declared
//!     .register(
//!         ModelDefinition::new("shop", "ChildModel").inherits("BaseModel").field(
//!             "basemodel_ptr",
//!             FieldDescriptor::one_to_one(ModelRef::new("shop", "BaseModel"), OnDelete::Cascade)
//!                 .primary_key(true)
//!                 .parent_link(true)
//!                 .related_name("+"),
//!         ),
//!     )
//!     .unwrap();
//!
//! let changes = MigrationAutodetector::new(
//!     ProjectState::from_registry(&auto),
//!     ProjectState::from_registry(&declared),
//! )
//! .detect_changes();
//! assert!(changes.is_empty());
//! ```

pub mod autodetector;
pub mod error;
pub mod state;
pub mod writer;

pub use autodetector::{DetectedChanges, MigrationAutodetector};
pub use error::{MigrationError, Result};
pub use state::{FieldState, ModelState, ProjectState};
pub use writer::{Migration, MigrationWriter, Operation};
