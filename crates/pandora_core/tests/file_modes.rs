use pandora_core::{Entity, File, FileMode, NamedEntity, PandoraError, Storage};

#[test]
fn new_files_carry_format_and_version() {
    let file = File::in_memory().unwrap();

    assert_eq!(file.format().unwrap().as_deref(), Some("pandora"));
    assert_eq!(file.version().unwrap().as_deref(), Some("1.0.0"));
    assert!(file.created_at().unwrap().is_some());
    assert_eq!(file.mode(), FileMode::ReadWrite);
}

#[test]
fn read_write_reopen_keeps_entities() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trial.pandora");

    let block_id = {
        let file = File::open(&path, FileMode::ReadWrite).unwrap();
        let block = file.blocks().create("session", "recording").unwrap();
        block.sources().create("tetrode", "electrode").unwrap();
        block.id().to_string()
    };

    let reopened = File::open(&path, FileMode::ReadWrite).unwrap();
    let block = reopened.blocks().get(&block_id).unwrap();
    assert_eq!(block.name().unwrap(), "session");
    assert_eq!(block.sources().count().unwrap(), 1);
}

#[test]
fn read_only_files_reject_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trial.pandora");
    let block_id = {
        let file = File::open(&path, FileMode::ReadWrite).unwrap();
        file.blocks()
            .create("session", "recording")
            .unwrap()
            .id()
            .to_string()
    };

    let file = File::open(&path, FileMode::ReadOnly).unwrap();
    assert_eq!(file.mode(), FileMode::ReadOnly);
    let block = file.blocks().get(&block_id).unwrap();
    assert_eq!(block.name().unwrap(), "session");

    assert!(matches!(
        block.set_name("renamed").unwrap_err(),
        PandoraError::Db(_)
    ));
    assert!(file.blocks().create("second", "recording").is_err());
    assert_eq!(file.blocks().count().unwrap(), 1);
}

#[test]
fn read_only_open_of_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.pandora");

    assert!(matches!(
        File::open(&path, FileMode::ReadOnly).unwrap_err(),
        PandoraError::Db(_)
    ));
    assert!(!path.exists());
}

#[test]
fn overwrite_discards_existing_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trial.pandora");
    {
        let file = File::open(&path, FileMode::ReadWrite).unwrap();
        file.blocks().create("session", "recording").unwrap();
        file.create_section("A", "experiment").unwrap();
    }

    let file = File::open(&path, FileMode::Overwrite).unwrap();
    assert_eq!(file.blocks().count().unwrap(), 0);
    assert_eq!(file.section_count().unwrap(), 0);
    assert_eq!(file.format().unwrap().as_deref(), Some("pandora"));
}

#[test]
fn foreign_format_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("foreign.pandora");
    {
        let storage = Storage::open(&path, FileMode::ReadWrite).unwrap();
        storage.root().set_attr("format", "other").unwrap();
    }

    assert!(matches!(
        File::open(&path, FileMode::ReadWrite).unwrap_err(),
        PandoraError::InvalidData(_)
    ));
}

#[test]
fn entity_handles_keep_the_file_open() {
    let file = File::in_memory().unwrap();
    let storage = file.storage().clone();
    let baseline = storage.handle_count();

    let block = file.blocks().create("session", "recording").unwrap();
    assert!(storage.handle_count() > baseline);

    drop(file);
    assert_eq!(block.name().unwrap(), "session");
    assert!(block.node().group().storage().same_file(&storage));

    drop(block);
    assert_eq!(storage.handle_count(), 1);
}
