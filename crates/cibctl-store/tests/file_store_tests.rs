mod common;

use std::fs;

use cibctl_core::{apply, parse_constraint_args, CommandOptions, ExError};
use cibctl_store::{CibStore, FileCibStore, MemoryCibStore};
use common::{args, cib_file, SAMPLE_CIB};

fn apply_line(store: &mut dyn CibStore, line: &str) {
    let cib = store.load().unwrap();
    let cmd = parse_constraint_args(&args(line)).unwrap();
    let outcome = apply(cib, cmd, &CommandOptions::default()).unwrap();
    store.replace_configuration(&outcome.cib).unwrap();
}

#[test]
fn test_file_store_persists_new_constraint() {
    let (_dir, path) = cib_file(SAMPLE_CIB);
    let mut store = FileCibStore::new(&path);

    apply_line(&mut store, "order A then B");

    let reloaded = store.load().unwrap();
    assert_eq!(reloaded.constraints.constraints().len(), 2);
    assert!(reloaded.id_exists("order-A-B-mandatory"));
}

#[test]
fn test_file_store_keeps_unrelated_content() {
    let (_dir, path) = cib_file(SAMPLE_CIB);
    let mut store = FileCibStore::new(&path);

    apply_line(&mut store, "remove location-A-node1-INFINITY");

    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.contains(r#"<cib epoch="7" num_updates="0""#));
    assert!(xml.contains(r#"name="stonith-enabled" value="false""#));
    assert!(xml.contains(r#"<node_state id="1" uname="node1"/>"#));
    assert!(xml.contains(r#"<primitive id="web" class="ocf""#));
    assert!(xml.contains("<constraints/>"));
    assert!(!xml.contains("location-A-node1-INFINITY"));
}

#[test]
fn test_file_store_write_leaves_no_temp_files() {
    let (dir, path) = cib_file(SAMPLE_CIB);
    let mut store = FileCibStore::new(&path);

    apply_line(&mut store, "location B prefers node2");
    apply_line(&mut store, "colocation add A with B");

    let entries: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["cib.xml".to_string()]);
}

#[test]
fn test_foreign_ids_block_new_constraint_ids() {
    let (_dir, path) = cib_file(SAMPLE_CIB);
    let store = FileCibStore::new(&path);
    let cib = store.load().unwrap();

    assert!(cib.id_exists("cib-bootstrap-options-stonith-enabled"));
    assert!(cib.id_exists("web-clone"));
    let cmd = parse_constraint_args(&args("location add cib-bootstrap-options A node2 100")).unwrap();
    let err = apply(cib, cmd, &CommandOptions::default()).unwrap_err();
    assert_eq!(ExError::from(err).code(), "ERR_ID_IN_USE");
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = FileCibStore::new(dir.path().join("absent.xml"));

    assert_eq!(store.load().unwrap_err().code(), "ERR_IO");
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let (_dir, path) = cib_file("<cib><configuration>");
    let store = FileCibStore::new(&path);

    assert_eq!(store.load().unwrap_err().code(), "ERR_SERIALIZATION");
}

#[test]
fn test_memory_store_counts_writes() {
    let mut store = MemoryCibStore::new(SAMPLE_CIB);

    apply_line(&mut store, "ticket add T1 A");

    assert_eq!(store.writes(), 1);
    assert!(store.xml().contains(r#"<rsc_ticket id="ticket-T1-A" ticket="T1" rsc="A"/>"#));
}
