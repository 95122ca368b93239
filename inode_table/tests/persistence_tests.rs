//! Integration tests for the backing store
//!
//! These tests exercise load/save against real files:
//! - Bootstrap when no store exists
//! - Round-trips through save and load
//! - Drop-and-warn for individually corrupt records
//! - Fatal handling of rootless stores

use inode_table::{
    encode_record, load, save, CodecError, DropReason, Inode, InodeId, InodeKind, InodeName,
    InodeTable, TableError, MAX_INODES, RECORD_SIZE,
};
use std::fs;
use tempfile::tempdir;

fn name(raw: &str) -> InodeName {
    InodeName::new(raw).unwrap()
}

fn sample_table() -> InodeTable {
    let mut table = InodeTable::bootstrap();
    let docs = table
        .append(InodeId::ROOT, InodeKind::Directory, name("docs"))
        .unwrap();
    let notes = table
        .append(docs, InodeKind::Directory, name("notes"))
        .unwrap();
    table.append(notes, InodeKind::File, name("todo.txt")).unwrap();
    table
        .append(InodeId::ROOT, InodeKind::File, name("readme"))
        .unwrap();
    table
}

#[test]
fn test_missing_store_bootstraps_root() {
    let dir = tempdir().unwrap();
    let (table, report) = load(&dir.path().join("inodes_list")).unwrap();

    assert!(!report.store_existed);
    assert_eq!(table.len(), 1);
    assert!(table.get(InodeId::ROOT).unwrap().is_root());
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");
    let table = sample_table();

    save(&table, &path).unwrap();
    assert_eq!(
        fs::metadata(&path).unwrap().len() as usize,
        table.len() * RECORD_SIZE
    );

    let (loaded, report) = load(&path).unwrap();
    assert!(report.store_existed);
    assert!(report.is_clean());

    let before: Vec<&Inode> = table.iter().collect();
    let after: Vec<&Inode> = loaded.iter().collect();
    assert_eq!(before, after);
    assert_eq!(loaded.next_id(), table.next_id());
}

#[test]
fn test_save_overwrites_previous_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");

    save(&sample_table(), &path).unwrap();
    save(&InodeTable::bootstrap(), &path).unwrap();

    let (loaded, _) = load(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(fs::metadata(&path).unwrap().len() as usize, RECORD_SIZE);
}

#[test]
fn test_save_leaves_no_temporary_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");
    save(&sample_table(), &path).unwrap();

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_save_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("inodes_list");
    let table = sample_table();

    let result = save(&table, &path);
    assert!(matches!(result, Err(CodecError::Io { .. })));
    assert_eq!(table.len(), 5);
}

#[test]
fn test_corrupt_record_is_dropped_not_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");

    let table = sample_table();
    let mut bytes = Vec::new();
    for inode in table.iter() {
        bytes.extend_from_slice(&encode_record(inode));
    }

    // A record pointing at a parent that does not exist
    let stray = Inode::new(InodeId::new(5), InodeId::new(900), InodeKind::File, name("stray"));
    bytes.extend_from_slice(&encode_record(&stray));
    fs::write(&path, &bytes).unwrap();

    let (loaded, report) = load(&path).unwrap();
    assert_eq!(loaded.len(), table.len());
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].id, 5);
    assert_eq!(
        report.dropped[0].reason,
        DropReason::Rejected(TableError::ParentNotFound(InodeId::new(900)))
    );
}

#[test]
fn test_invalid_kind_is_dropped_not_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");

    let table = sample_table();
    let mut bytes = Vec::new();
    for inode in table.iter() {
        bytes.extend_from_slice(&encode_record(inode));
    }
    let mut bad = encode_record(&Inode::new(
        InodeId::new(5),
        InodeId::ROOT,
        InodeKind::File,
        name("bad"),
    ));
    bad[8] = b'z';
    bytes.extend_from_slice(&bad);
    fs::write(&path, &bytes).unwrap();

    let (loaded, report) = load(&path).unwrap();
    assert_eq!(loaded.len(), table.len());
    assert_eq!(report.dropped[0].reason, DropReason::UnknownKind(b'z'));
}

#[test]
fn test_next_id_after_lossy_load_does_not_collide() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&encode_record(&Inode::root()));
    let mut bad = encode_record(&Inode::new(
        InodeId::new(1),
        InodeId::ROOT,
        InodeKind::File,
        name("bad"),
    ));
    bad[8] = 0;
    bytes.extend_from_slice(&bad);
    bytes.extend_from_slice(&encode_record(&Inode::new(
        InodeId::new(2),
        InodeId::ROOT,
        InodeKind::File,
        name("good"),
    )));
    fs::write(&path, &bytes).unwrap();

    let (mut loaded, _) = load(&path).unwrap();
    assert_eq!(loaded.len(), 2);
    let id = loaded
        .append(InodeId::ROOT, InodeKind::File, name("new"))
        .unwrap();
    assert_eq!(id, InodeId::new(3));
}

#[test]
fn test_empty_store_is_rootless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");
    fs::write(&path, b"").unwrap();

    let result = load(&path);
    assert!(matches!(result, Err(CodecError::CorruptNamespace(_))));
}

#[test]
fn test_store_without_directory_root_is_rootless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");
    let fake_root = Inode::new(InodeId::ROOT, InodeId::ROOT, InodeKind::File, InodeName::root());
    fs::write(&path, encode_record(&fake_root)).unwrap();

    let result = load(&path);
    assert!(matches!(result, Err(CodecError::CorruptNamespace(_))));
}

#[test]
fn test_store_missing_id_zero_is_rootless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");
    let first = Inode::new(InodeId::new(1), InodeId::ROOT, InodeKind::Directory, name("a"));
    fs::write(&path, encode_record(&first)).unwrap();

    let result = load(&path);
    assert!(matches!(result, Err(CodecError::CorruptNamespace(_))));
}

#[test]
fn test_records_beyond_capacity_are_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");

    let mut bytes = encode_record(&Inode::root()).to_vec();
    for raw in 1..(MAX_INODES as u32 + 2) {
        let inode = Inode::new(
            InodeId::new(raw),
            InodeId::ROOT,
            InodeKind::File,
            name(&format!("f{}", raw)),
        );
        bytes.extend_from_slice(&encode_record(&inode));
    }
    fs::write(&path, &bytes).unwrap();

    let (loaded, report) = load(&path).unwrap();
    assert_eq!(loaded.len(), MAX_INODES);
    assert!(loaded.is_full());
    assert_eq!(report.ignored_records, 2);
    assert!(report.dropped.is_empty());
}

#[test]
fn test_named_root_survives_load_and_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");

    let root = Inode::new(InodeId::ROOT, InodeId::ROOT, InodeKind::Directory, name("docs"));
    let child = Inode::new(InodeId::new(1), InodeId::ROOT, InodeKind::File, name("a.txt"));
    let mut bytes = encode_record(&root).to_vec();
    bytes.extend_from_slice(&encode_record(&child));
    fs::write(&path, &bytes).unwrap();

    let (table, report) = load(&path).unwrap();
    assert!(report.is_clean());
    save(&table, &path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_root_after_garbage_still_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("inodes_list");

    let mut junk = encode_record(&Inode::new(
        InodeId::new(5000),
        InodeId::new(7),
        InodeKind::File,
        name("junk"),
    ));
    junk[8] = b'z';
    let mut bytes = junk.to_vec();
    bytes.extend_from_slice(&encode_record(&Inode::root()));
    bytes.extend_from_slice(&encode_record(&Inode::new(
        InodeId::new(1),
        InodeId::ROOT,
        InodeKind::File,
        name("a"),
    )));
    fs::write(&path, &bytes).unwrap();

    let (table, report) = load(&path).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].position, 0);
    assert_eq!(report.dropped[0].reason, DropReason::UnknownKind(b'z'));
}
