//! Finalization hooks
//!
//! Finalization runs once per registered model, after the class body has
//! been assembled from declared fields, abstract bases and contributors.
//! Each [`FinalizationHook`] sees the complete field set of the class being
//! finalized and may only change that class.

use crate::class::ModelClass;
use crate::error::Result;
use crate::settings::PolymorphicSettings;

/// What a hook may read besides the class it is finalizing
#[derive(Debug, Clone, Copy)]
pub struct FinalizeContext<'a> {
	pub settings: &'a PolymorphicSettings,
	/// Nearest concrete ancestor, already finalized
	pub concrete_parent: Option<&'a ModelClass>,
}

/// A step run on every concrete model during finalization
pub trait FinalizationHook: Send + Sync {
	fn name(&self) -> &'static str;

	fn finalize(&self, model: &mut ModelClass, ctx: &FinalizeContext<'_>) -> Result<()>;
}
