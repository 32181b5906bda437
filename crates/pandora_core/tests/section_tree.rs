use pandora_core::{Entity, EntityWithMetadata, File, NamedEntity, PandoraError, Section};
use std::collections::BTreeSet;

fn ids(sections: &[Section]) -> BTreeSet<String> {
    sections.iter().map(|section| section.id().to_string()).collect()
}

#[test]
fn root_and_child_iteration_follow_parent_links() {
    let file = File::in_memory().unwrap();
    let a = file.create_section("A", "experiment").unwrap();
    let b = a.create_section("B", "subject").unwrap();
    let c = a.create_section("C", "setup").unwrap();

    let roots: Vec<Section> = file.sections().unwrap();
    assert_eq!(ids(&roots), BTreeSet::from([a.id().to_string()]));

    let children = a.children().unwrap();
    assert_eq!(
        ids(&children),
        BTreeSet::from([b.id().to_string(), c.id().to_string()])
    );
    assert!(b.children().unwrap().is_empty());

    assert_eq!(file.section_count().unwrap(), 1);
    assert_eq!(a.section_count().unwrap(), 2);
    assert!(a.has_section(b.id()).unwrap());
    assert!(!b.has_section(c.id()).unwrap());
}

#[test]
fn parent_resolves_to_the_linked_section() {
    let file = File::in_memory().unwrap();
    let a = file.create_section("A", "experiment").unwrap();
    let b = a.create_section("B", "subject").unwrap();

    assert_eq!(a.parent().unwrap(), None);
    assert_eq!(b.parent_id().unwrap().as_deref(), Some(a.id()));
    assert_eq!(b.parent().unwrap().unwrap(), a);
}

#[test]
fn childless_section_iterates_nothing() {
    let file = File::in_memory().unwrap();
    let a = file.create_section("A", "experiment").unwrap();
    a.create_section("B", "subject").unwrap();

    let iter = file.get_section(a.id()).unwrap().sections().unwrap();
    assert!(!iter.is_end());

    let orphan = a.create_section("D", "subject").unwrap();
    let empty = orphan.sections().unwrap();
    assert!(empty.is_end());
    assert!(empty.begin().unwrap() == empty.end());
}

#[test]
fn dereferencing_the_end_is_out_of_bounds() {
    let file = File::in_memory().unwrap();
    file.create_section("A", "experiment").unwrap();

    let mut iter = file.root_sections().unwrap();
    assert_eq!(iter.get().unwrap().name().unwrap(), "A");

    iter.advance().unwrap();
    assert!(iter.is_end());
    assert!(iter == iter.end());
    assert!(matches!(
        iter.get().unwrap_err(),
        PandoraError::OutOfBounds {
            kind: "section",
            ..
        }
    ));

    iter.advance().unwrap();
    assert!(iter.is_end());
}

#[test]
fn begin_rescans_live_state() {
    let file = File::in_memory().unwrap();
    let a = file.create_section("A", "experiment").unwrap();

    let stale = a.sections().unwrap();
    assert!(stale.is_end());

    let b = a.create_section("B", "subject").unwrap();
    let fresh = stale.begin().unwrap();
    assert_eq!(fresh.get().unwrap(), b);
    assert_eq!(fresh.size(), 2);
}

#[test]
fn removing_a_section_cascades_to_descendants() {
    let file = File::in_memory().unwrap();
    let a = file.create_section("A", "experiment").unwrap();
    let b = a.create_section("B", "subject").unwrap();
    let c = b.create_section("C", "cell").unwrap();
    let other = file.create_section("Other", "hardware").unwrap();

    assert!(file.remove_section(a.id()).unwrap());
    for removed in [&a, &b, &c] {
        assert!(!file.has_section(removed.id()).unwrap());
    }
    assert!(file.has_section(other.id()).unwrap());
    assert!(!file.remove_section(a.id()).unwrap());
}

#[test]
fn metadata_links_resolve_and_detect_removed_sections() {
    let file = File::in_memory().unwrap();
    let block = file.blocks().create("session", "recording").unwrap();
    let section = file.create_section("Recording", "metadata").unwrap();

    assert_eq!(block.metadata().unwrap(), None);
    block.set_metadata(&section).unwrap();
    assert_eq!(block.metadata().unwrap(), Some(section.clone()));

    file.remove_section(section.id()).unwrap();
    assert!(block.metadata().unwrap_err().is_not_found());

    assert!(block.remove_metadata().unwrap());
    assert_eq!(block.metadata().unwrap(), None);
}

#[test]
fn metadata_from_another_file_is_rejected() {
    let file = File::in_memory().unwrap();
    let other = File::in_memory().unwrap();
    let block = file.blocks().create("session", "recording").unwrap();
    let foreign = other.create_section("Foreign", "metadata").unwrap();

    let err = block.set_metadata(&foreign).unwrap_err();
    assert!(matches!(err, PandoraError::NotFound { kind: "section", .. }));
}

#[test]
fn repository_is_stored_per_section() {
    let file = File::in_memory().unwrap();
    let section = file.create_section("A", "experiment").unwrap();

    assert_eq!(section.repository().unwrap(), None);
    section.set_repository("https://terminologies.example/v1").unwrap();
    assert_eq!(
        file.get_section(section.id()).unwrap().repository().unwrap().as_deref(),
        Some("https://terminologies.example/v1")
    );
}
