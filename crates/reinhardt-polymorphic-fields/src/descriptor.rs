// Field descriptors
// Corresponds to Django's django.db.models.fields

use crate::deconstruct::FieldDeconstruction;
use crate::related_name::RelatedName;
use crate::relation::{ModelRef, OnDelete, RemoteRelation};
use serde::{Deserialize, Serialize};

const FIELD_MODULE: &str = "reinhardt.orm.models";

/// Field class of a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
	AutoField,
	BigAutoField,
	CharField { max_length: u32 },
	TextField,
	IntegerField,
	PositiveIntegerField,
	BooleanField,
	ForeignKey,
	OneToOneField,
}

impl FieldKind {
	pub fn class_name(&self) -> &'static str {
		match self {
			FieldKind::AutoField => "AutoField",
			FieldKind::BigAutoField => "BigAutoField",
			FieldKind::CharField { .. } => "CharField",
			FieldKind::TextField => "TextField",
			FieldKind::IntegerField => "IntegerField",
			FieldKind::PositiveIntegerField => "PositiveIntegerField",
			FieldKind::BooleanField => "BooleanField",
			FieldKind::ForeignKey => "ForeignKey",
			FieldKind::OneToOneField => "OneToOneField",
		}
	}

	/// Dotted import path of the field class
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::FieldKind;
	///
	/// assert_eq!(FieldKind::OneToOneField.path(), "reinhardt.orm.models.OneToOneField");
	/// ```
	pub fn path(&self) -> String {
		format!("{}.{}", FIELD_MODULE, self.class_name())
	}

	pub fn is_relation(&self) -> bool {
		matches!(self, FieldKind::ForeignKey | FieldKind::OneToOneField)
	}

	pub fn is_auto(&self) -> bool {
		matches!(self, FieldKind::AutoField | FieldKind::BigAutoField)
	}
}

/// Declarative description of one column or relation on a model
///
/// Relation fields own a [`RemoteRelation`]. The reverse accessor policy is
/// stored both here (`related_name`, Django's `field._related_name`) and on the
/// remote relation; use [`FieldDescriptor::set_related_name`] to keep the two
/// copies in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
	pub name: Option<String>,
	pub kind: FieldKind,
	pub null: bool,
	pub blank: bool,
	pub primary_key: bool,
	pub unique: bool,
	pub editable: bool,
	pub serialize: bool,
	/// Set on fields the framework created rather than the user
	pub auto_created: bool,
	pub db_column: Option<String>,
	pub related_name: RelatedName,
	pub remote_field: Option<RemoteRelation>,
}

impl FieldDescriptor {
	pub fn new(kind: FieldKind) -> Self {
		Self {
			name: None,
			kind,
			null: false,
			blank: false,
			primary_key: false,
			unique: false,
			editable: true,
			serialize: true,
			auto_created: false,
			db_column: None,
			related_name: RelatedName::Unset,
			remote_field: None,
		}
	}

	pub fn auto() -> Self {
		Self::new(FieldKind::AutoField).primary_key(true)
	}

	pub fn big_auto() -> Self {
		Self::new(FieldKind::BigAutoField).primary_key(true)
	}

	/// Create a character field with maximum length
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::{FieldDescriptor, FieldKwarg};
	///
	/// let dec = FieldDescriptor::char(150).deconstruct();
	/// assert_eq!(dec.get_kwarg("max_length"), Some(&FieldKwarg::Int(150)));
	/// ```
	pub fn char(max_length: u32) -> Self {
		Self::new(FieldKind::CharField { max_length })
	}

	pub fn text() -> Self {
		Self::new(FieldKind::TextField)
	}

	pub fn integer() -> Self {
		Self::new(FieldKind::IntegerField)
	}

	pub fn positive_integer() -> Self {
		Self::new(FieldKind::PositiveIntegerField)
	}

	pub fn boolean() -> Self {
		Self::new(FieldKind::BooleanField)
	}

	/// Create a many-to-one relation to `to`
	pub fn foreign_key(to: ModelRef, on_delete: OnDelete) -> Self {
		let mut field = Self::new(FieldKind::ForeignKey);
		field.remote_field = Some(RemoteRelation::new(to, on_delete));
		field
	}

	/// Create a one-to-one relation to `to`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete};
	///
	/// let field = FieldDescriptor::one_to_one(ModelRef::new("auth", "User"), OnDelete::Cascade);
	/// assert!(field.is_one_to_one());
	/// assert_eq!(field.target().map(|m| m.label()), Some("auth.User".to_string()));
	/// ```
	pub fn one_to_one(to: ModelRef, on_delete: OnDelete) -> Self {
		let mut field = Self::new(FieldKind::OneToOneField);
		field.remote_field = Some(RemoteRelation::new(to, on_delete));
		field
	}

	pub fn primary_key(mut self, primary_key: bool) -> Self {
		self.primary_key = primary_key;
		self
	}

	pub fn null(mut self, null: bool) -> Self {
		self.null = null;
		self
	}

	pub fn blank(mut self, blank: bool) -> Self {
		self.blank = blank;
		self
	}

	pub fn unique(mut self, unique: bool) -> Self {
		self.unique = unique;
		self
	}

	pub fn editable(mut self, editable: bool) -> Self {
		self.editable = editable;
		self
	}

	pub fn auto_created(mut self, auto_created: bool) -> Self {
		self.auto_created = auto_created;
		self
	}

	pub fn db_column(mut self, db_column: impl Into<String>) -> Self {
		self.db_column = Some(db_column.into());
		self
	}

	/// Mark the relation as the multi-table inheritance link to its parent
	///
	/// Has no effect on fields without a remote relation.
	pub fn parent_link(mut self, parent_link: bool) -> Self {
		if let Some(remote) = self.remote_field.as_mut() {
			remote.parent_link = parent_link;
		}
		self
	}

	pub fn related_name(mut self, related_name: impl Into<RelatedName>) -> Self {
		self.set_related_name(related_name.into());
		self
	}

	pub fn to_field(mut self, to_field: impl Into<String>) -> Self {
		if let Some(remote) = self.remote_field.as_mut() {
			remote.to_field = Some(to_field.into());
		}
		self
	}

	/// Write the reverse accessor policy to the field and its remote relation
	pub fn set_related_name(&mut self, related_name: RelatedName) {
		if let Some(remote) = self.remote_field.as_mut() {
			remote.related_name = related_name.clone();
		}
		self.related_name = related_name;
	}

	/// Whether the two copies of the reverse accessor policy agree
	pub fn related_name_in_sync(&self) -> bool {
		self.remote_field
			.as_ref()
			.is_none_or(|remote| remote.related_name == self.related_name)
	}

	pub fn set_attributes_from_name(&mut self, name: &str) {
		self.name = Some(name.to_string());
	}

	/// Bind the field to its model
	///
	/// Sets the attribute name and expands `%(app_label)s` / `%(class)s`
	/// placeholders in the reverse accessor policy.
	pub fn contribute_to_class(&mut self, name: &str, app_label: &str, class_name: &str) {
		self.set_attributes_from_name(name);
		let expanded = self.related_name.expand(app_label, class_name);
		self.set_related_name(expanded);
	}

	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub fn is_primary_key(&self) -> bool {
		self.primary_key
	}

	pub fn is_relation(&self) -> bool {
		self.kind.is_relation()
	}

	pub fn is_one_to_one(&self) -> bool {
		matches!(self.kind, FieldKind::OneToOneField)
	}

	/// Whether the remote relation carries the parent link marker
	pub fn is_parent_link_flagged(&self) -> bool {
		self.remote_field
			.as_ref()
			.is_some_and(|remote| remote.parent_link)
	}

	pub fn target(&self) -> Option<&ModelRef> {
		self.remote_field
			.as_ref()
			.and_then(|remote| remote.model.as_ref())
	}

	/// Database column name
	///
	/// Relations store the related key in `<name>_id` unless `db_column` is set.
	pub fn column(&self) -> Option<String> {
		if let Some(ref column) = self.db_column {
			return Some(column.clone());
		}
		let name = self.name.as_ref()?;
		if self.is_relation() {
			Some(format!("{}_id", name))
		} else {
			Some(name.clone())
		}
	}

	/// Deconstruct the field into its canonical serializable form
	///
	/// `auto_created` is provenance, not schema, and is never emitted. The
	/// `related_name` keyword is omitted entirely while the policy is unset.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_polymorphic_fields::{FieldDescriptor, FieldKwarg, ModelRef, OnDelete};
	///
	/// let field = FieldDescriptor::foreign_key(ModelRef::new("shop", "Product"), OnDelete::Protect)
	///     .related_name("reviews");
	/// let dec = field.deconstruct();
	/// assert_eq!(dec.get_kwarg("to"), Some(&FieldKwarg::String("shop.product".to_string())));
	/// assert_eq!(dec.get_kwarg("on_delete"), Some(&FieldKwarg::String("PROTECT".to_string())));
	/// assert_eq!(dec.get_kwarg("related_name"), Some(&FieldKwarg::String("reviews".to_string())));
	/// ```
	pub fn deconstruct(&self) -> FieldDeconstruction {
		let mut dec = FieldDeconstruction::new(self.kind.path());
		dec.name = self.name.clone();

		if self.null {
			dec.kwargs.insert("null".to_string(), true.into());
		}
		if self.blank {
			dec.kwargs.insert("blank".to_string(), true.into());
		}
		if self.primary_key {
			dec.kwargs.insert("primary_key".to_string(), true.into());
		}
		// One-to-one relations are unique by definition
		if self.unique && !self.is_one_to_one() {
			dec.kwargs.insert("unique".to_string(), true.into());
		}
		if !self.editable {
			dec.kwargs.insert("editable".to_string(), false.into());
		}
		if !self.serialize {
			dec.kwargs.insert("serialize".to_string(), false.into());
		}
		if let Some(ref db_column) = self.db_column {
			dec.kwargs
				.insert("db_column".to_string(), db_column.clone().into());
		}
		if let FieldKind::CharField { max_length } = self.kind {
			dec.kwargs
				.insert("max_length".to_string(), i64::from(max_length).into());
		}

		if let Some(ref remote) = self.remote_field {
			if let Some(ref model) = remote.model {
				dec.kwargs.insert("to".to_string(), model.label_lower().into());
			}
			dec.kwargs
				.insert("on_delete".to_string(), remote.on_delete.as_str().into());
			if remote.parent_link {
				dec.kwargs.insert("parent_link".to_string(), true.into());
			}
			if let Some(related_name) = self.related_name.as_kwarg() {
				dec.kwargs
					.insert("related_name".to_string(), related_name.into());
			}
			if let Some(ref to_field) = remote.to_field {
				dec.kwargs
					.insert("to_field".to_string(), to_field.clone().into());
			}
		}

		dec
	}
}
