#[path = "../src/backup.rs"]
mod backup;

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn sqlite_bytes(payload: &[u8]) -> Vec<u8> {
    let mut bytes = backup::SQLITE_HEADER.to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

fn write_bundle(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let f = File::create(path).expect("create zip");
    let mut zip = zip::ZipWriter::new(f);
    for (name, bytes) in entries {
        zip.start_file(*name, zip::write::FileOptions::default())
            .expect("start entry");
        zip.write_all(bytes).expect("write entry");
    }
    zip.finish().expect("finish zip");
}

#[test]
fn bundle_carries_database_and_images() {
    let workspace = temp_dir("sabl-backup-src");
    let restored_ws = temp_dir("sabl-backup-dst");
    let out_dir = temp_dir("sabl-backup-out");

    let db_bytes = sqlite_bytes(b"sqlite-test-payload");
    std::fs::write(workspace.join("sabl.sqlite3"), &db_bytes).expect("write source db");
    let bucket = workspace.join("storage").join("winners");
    std::fs::create_dir_all(&bucket).expect("bucket dir");
    std::fs::write(bucket.join("1700000000000_john.jpg"), b"jpeg").expect("write image");

    let bundle_path = out_dir.join("workspace.sabl.zip");
    let export = backup::export_workspace_bundle(&workspace, &bundle_path).expect("export bundle");
    assert_eq!(export.bundle_format, backup::BUNDLE_FORMAT);
    assert_eq!(export.entry_count, 4);

    let f = File::open(&bundle_path).expect("open bundle");
    let mut archive = zip::ZipArchive::new(f).expect("open zip archive");
    let mut manifest = String::new();
    archive
        .by_name("manifest.json")
        .expect("manifest entry")
        .read_to_string(&mut manifest)
        .expect("read manifest");
    let manifest: serde_json::Value = serde_json::from_str(&manifest).expect("manifest json");
    assert_eq!(manifest["format"], backup::BUNDLE_FORMAT);
    assert_eq!(manifest["imageCount"], 1);
    archive.by_name("db/sabl.sqlite3").expect("database entry");
    archive
        .by_name("storage/winners/1700000000000_john.jpg")
        .expect("image entry");

    let import =
        backup::import_workspace_bundle(&bundle_path, &restored_ws).expect("import bundle");
    assert_eq!(import.bundle_format_detected, backup::BUNDLE_FORMAT);
    assert_eq!(import.images_restored, 1);
    assert_eq!(
        std::fs::read(restored_ws.join("sabl.sqlite3")).expect("restored db"),
        db_bytes
    );
    assert_eq!(
        std::fs::read(restored_ws.join("storage/winners/1700000000000_john.jpg"))
            .expect("restored image"),
        b"jpeg"
    );

    let _ = std::fs::remove_dir_all(workspace);
    let _ = std::fs::remove_dir_all(restored_ws);
    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn raw_sqlite_file_is_accepted() {
    let out_dir = temp_dir("sabl-backup-raw");
    let workspace = temp_dir("sabl-backup-raw-dst");

    let raw = out_dir.join("copy.sqlite3");
    std::fs::write(&raw, sqlite_bytes(b"raw-sqlite-copy")).expect("write raw sqlite file");

    let import = backup::import_workspace_bundle(&raw, &workspace).expect("import raw sqlite");
    assert_eq!(import.bundle_format_detected, backup::RAW_SQLITE_FORMAT);
    assert_eq!(
        std::fs::read(workspace.join("sabl.sqlite3")).expect("restored sqlite"),
        sqlite_bytes(b"raw-sqlite-copy")
    );

    let _ = std::fs::remove_dir_all(out_dir);
    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn foreign_bundles_and_missing_database_are_rejected() {
    let workspace = temp_dir("sabl-backup-empty");
    let out_dir = temp_dir("sabl-backup-foreign");
    assert!(backup::export_workspace_bundle(&workspace, &out_dir.join("x.zip")).is_err());

    let foreign = out_dir.join("foreign.zip");
    write_bundle(&foreign, &[("manifest.json", &br#"{"format":"something-else"}"#[..])]);
    let err = backup::import_workspace_bundle(&foreign, &workspace).expect_err("foreign format");
    assert!(err.to_string().contains("unsupported bundle format"));

    let _ = std::fs::remove_dir_all(workspace);
    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn invalid_database_leaves_live_file_in_place() {
    let workspace = temp_dir("sabl-backup-guard");
    let out_dir = temp_dir("sabl-backup-guard-in");
    let live = sqlite_bytes(b"live-database");
    std::fs::write(workspace.join("sabl.sqlite3"), &live).expect("write live db");

    let text = out_dir.join("notes.txt");
    std::fs::write(&text, b"this is not a database at all").expect("write text");
    let err = backup::import_workspace_bundle(&text, &workspace).expect_err("text file");
    assert!(format!("{err:#}").contains("not a SQLite database"));

    let manifest: &[u8] = br#"{"format":"sabl-workspace-v1"}"#;
    let bad_entry = out_dir.join("bad-entry.zip");
    write_bundle(
        &bad_entry,
        &[("manifest.json", manifest), ("db/sabl.sqlite3", &b"garbage"[..])],
    );
    assert!(backup::import_workspace_bundle(&bad_entry, &workspace).is_err());

    let no_db = out_dir.join("no-db.zip");
    write_bundle(&no_db, &[("manifest.json", manifest)]);
    let err = backup::import_workspace_bundle(&no_db, &workspace).expect_err("missing db");
    assert!(err.to_string().contains("bundle missing db/sabl.sqlite3"));

    assert_eq!(
        std::fs::read(workspace.join("sabl.sqlite3")).expect("live db"),
        live
    );
    assert!(!workspace.join("sabl.sqlite3.importing").exists());

    let _ = std::fs::remove_dir_all(workspace);
    let _ = std::fs::remove_dir_all(out_dir);
}

#[test]
fn bundle_restore_replaces_stored_images() {
    let workspace = temp_dir("sabl-backup-orphans");
    let out_dir = temp_dir("sabl-backup-orphans-in");
    let stale = workspace.join("storage").join("gallery");
    std::fs::create_dir_all(&stale).expect("stale dir");
    std::fs::write(stale.join("old.png"), b"old").expect("stale image");

    let bundle = out_dir.join("bundle.zip");
    let db = sqlite_bytes(b"restored");
    write_bundle(
        &bundle,
        &[
            ("manifest.json", &br#"{"format":"sabl-workspace-v1"}"#[..]),
            ("db/sabl.sqlite3", db.as_slice()),
            ("storage/winners/new.jpg", &b"new"[..]),
        ],
    );
    let import = backup::import_workspace_bundle(&bundle, &workspace).expect("import bundle");
    assert_eq!(import.images_restored, 1);
    assert!(!stale.join("old.png").exists());
    assert_eq!(
        std::fs::read(workspace.join("storage/winners/new.jpg")).expect("new image"),
        b"new"
    );

    let _ = std::fs::remove_dir_all(workspace);
    let _ = std::fs::remove_dir_all(out_dir);
}
