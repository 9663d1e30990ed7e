//! Migration stability of parent links
//!
//! Switching a subclass between an automatically created parent link and a
//! declared one must never be detected as a schema change.

use reinhardt_polymorphic_fields::{FieldDescriptor, ModelRef, OnDelete, RelatedName};
use reinhardt_polymorphic_migrations::{
	Migration, MigrationAutodetector, MigrationWriter, ProjectState,
};
use reinhardt_polymorphic_models::{InheritedLinkContributor, ModelDefinition, ModelRegistry};
use rstest::rstest;

const APP: &str = "serialization_test";

#[derive(Debug, Clone, Copy)]
enum LinkStyle {
	Auto,
	DeclaredSuppressed,
	DeclaredUnset,
	Contributed,
}

fn project(style: LinkStyle) -> ProjectState {
	let registry = ModelRegistry::new();
	registry
		.register(
			ModelDefinition::new(APP, "BaseModel")
				.polymorphic()
				.field("name", FieldDescriptor::char(100)),
		)
		.unwrap();

	let link = |related_name: RelatedName| {
		FieldDescriptor::one_to_one(ModelRef::new(APP, "BaseModel"), OnDelete::Cascade)
			.primary_key(true)
			.parent_link(true)
			.related_name(related_name)
	};
	let mut child = ModelDefinition::new(APP, "ChildModel").inherits("BaseModel");
	child = match style {
		LinkStyle::Auto => child,
		LinkStyle::DeclaredSuppressed => child.field("basemodel_ptr", link(RelatedName::Suppressed)),
		LinkStyle::DeclaredUnset => child.field("basemodel_ptr", link(RelatedName::Unset)),
		LinkStyle::Contributed => child.contributor(InheritedLinkContributor::new("_ptr")),
	};
	registry
		.register(child.field("extra", FieldDescriptor::char(50)))
		.unwrap();

	ProjectState::from_registry(&registry)
}

#[rstest]
#[case(LinkStyle::Auto, LinkStyle::DeclaredSuppressed)]
#[case(LinkStyle::DeclaredSuppressed, LinkStyle::Auto)]
#[case(LinkStyle::Auto, LinkStyle::DeclaredUnset)]
#[case(LinkStyle::Auto, LinkStyle::Contributed)]
#[case(LinkStyle::Contributed, LinkStyle::DeclaredSuppressed)]
fn test_switching_link_style_detects_no_changes(#[case] from: LinkStyle, #[case] to: LinkStyle) {
	// Act
	let changes = MigrationAutodetector::new(project(from), project(to)).detect_changes();

	// Assert
	assert!(changes.is_empty(), "unexpected changes: {:?}", changes);
}

#[rstest]
fn test_explicit_name_is_a_real_change() {
	// Arrange
	let registry = ModelRegistry::new();
	registry
		.register(
			ModelDefinition::new(APP, "BaseModel")
				.polymorphic()
				.field("name", FieldDescriptor::char(100)),
		)
		.unwrap();
	registry
		.register(
			ModelDefinition::new(APP, "ChildModel")
				.inherits("BaseModel")
				.field(
					"basemodel_ptr",
					FieldDescriptor::one_to_one(ModelRef::new(APP, "BaseModel"), OnDelete::Cascade)
						.primary_key(true)
						.parent_link(true)
						.related_name("child_link"),
				)
				.field("extra", FieldDescriptor::char(50)),
		)
		.unwrap();

	// Act
	let changes = MigrationAutodetector::new(
		project(LinkStyle::Auto),
		ProjectState::from_registry(&registry),
	)
	.detect_changes();

	// Assert
	assert_eq!(
		changes.altered_fields,
		vec![(
			APP.to_string(),
			"ChildModel".to_string(),
			"basemodel_ptr".to_string()
		)]
	);
}

#[rstest]
#[case(LinkStyle::Auto)]
#[case(LinkStyle::DeclaredSuppressed)]
#[case(LinkStyle::Contributed)]
fn test_serialized_migration_has_no_suppressed_parent_link(#[case] style: LinkStyle) {
	// Arrange
	let state = project(style);
	let changes = MigrationAutodetector::new(ProjectState::new(), state.clone()).detect_changes();

	// Act
	let migration = Migration::from_changes("0001_initial", APP, &changes, &state);
	let content = MigrationWriter::new(migration).as_string();

	// Assert
	assert!(!content.contains("related_name=\"+\""), "{}", content);
	assert!(content.contains("(\"basemodel_ptr\", models.OneToOneField("));
}

#[rstest]
#[case(LinkStyle::Auto)]
#[case(LinkStyle::DeclaredSuppressed)]
#[case(LinkStyle::Contributed)]
fn test_migration_text_is_identical_across_styles(#[case] style: LinkStyle) {
	let render = |state: ProjectState| {
		let changes = MigrationAutodetector::new(ProjectState::new(), state.clone()).detect_changes();
		MigrationWriter::new(Migration::from_changes("0001_initial", APP, &changes, &state))
			.as_string()
	};

	assert_eq!(render(project(style)), render(project(LinkStyle::Auto)));
}

#[rstest]
fn test_snapshot_from_earlier_run_matches() {
	// Arrange
	let dir = tempfile::TempDir::new().unwrap();
	let path = dir.path().join("project_state.json");
	project(LinkStyle::Auto).save(&path).unwrap();

	// Act
	let previous = ProjectState::load(&path).unwrap();
	let changes =
		MigrationAutodetector::new(previous, project(LinkStyle::DeclaredSuppressed)).detect_changes();

	// Assert
	assert!(changes.is_empty());
}
