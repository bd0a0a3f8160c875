//! Workspace bundles: a zip holding the database and uploaded images.
//!
//! Layout:
//! - `manifest.json` (format tag, app version, export time, image count)
//! - `db/sabl.sqlite3`
//! - `meta/workspace.json`
//! - `storage/<bucket>/<file>` for every uploaded image
//!
//! A raw SQLite file is also accepted on import. Either way the candidate
//! database must carry the SQLite header before it replaces the live file.

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const DB_FILE: &str = "sabl.sqlite3";
const STORAGE_DIR: &str = "storage";
const MANIFEST_ENTRY: &str = "manifest.json";
const DB_ENTRY: &str = "db/sabl.sqlite3";
const META_ENTRY: &str = "meta/workspace.json";
pub const BUNDLE_FORMAT: &str = "sabl-workspace-v1";
pub const RAW_SQLITE_FORMAT: &str = "raw-sqlite3";
pub const SQLITE_HEADER: &[u8; 16] = b"SQLite format 3\0";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub bundle_format_detected: String,
    pub images_restored: usize,
}

/// Files under `<workspace>/storage`, as forward-slash paths relative to the workspace.
fn storage_files(workspace: &Path) -> Result<Vec<(String, PathBuf)>> {
    let root = workspace.join(STORAGE_DIR);
    let mut out = Vec::new();
    if !root.is_dir() {
        return Ok(out);
    }
    let mut pending = vec![root];
    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir)
            .with_context(|| format!("failed to list {}", dir.to_string_lossy()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("failed to list {}", dir.to_string_lossy()))?
                .path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            let rel = path
                .strip_prefix(workspace)
                .context("storage file outside workspace")?
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.push((rel, path));
        }
    }
    out.sort();
    Ok(out)
}

fn write_json_entry<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    value: &serde_json::Value,
    opts: FileOptions,
) -> Result<()> {
    zip.start_file(name, opts)
        .with_context(|| format!("failed to start {name}"))?;
    let text = serde_json::to_string_pretty(value).with_context(|| format!("failed to serialize {name}"))?;
    zip.write_all(text.as_bytes())
        .with_context(|| format!("failed to write {name}"))?;
    Ok(())
}

pub fn export_workspace_bundle(workspace: &Path, out_path: &Path) -> Result<ExportSummary> {
    let db_path = workspace.join(DB_FILE);
    if !db_path.is_file() {
        bail!("workspace database not found: {}", db_path.to_string_lossy());
    }
    let images = storage_files(workspace)?;

    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    let out_file = File::create(out_path)
        .with_context(|| format!("failed to create {}", out_path.to_string_lossy()))?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": chrono::Utc::now().to_rfc3339(),
        "imageCount": images.len(),
    });
    write_json_entry(&mut zip, MANIFEST_ENTRY, &manifest, opts)?;

    zip.start_file(DB_ENTRY, opts)
        .context("failed to start database entry")?;
    let mut db_file = File::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.to_string_lossy()))?;
    std::io::copy(&mut db_file, &mut zip).context("failed to write database entry")?;

    let meta = json!({ "sourceWorkspace": workspace.to_string_lossy() });
    write_json_entry(&mut zip, META_ENTRY, &meta, opts)?;

    // Images are already compressed.
    let stored = FileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, path) in &images {
        zip.start_file(name.as_str(), stored)
            .with_context(|| format!("failed to start {name}"))?;
        let mut f = File::open(path)
            .with_context(|| format!("failed to open {}", path.to_string_lossy()))?;
        std::io::copy(&mut f, &mut zip).with_context(|| format!("failed to write {name}"))?;
    }

    zip.finish().context("failed to finalize zip bundle")?;
    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT.to_string(),
        entry_count: 3 + images.len(),
    })
}

/// Only plain relative `storage/...` paths are restored.
fn safe_storage_path(name: &Path) -> bool {
    let mut comps = name.components();
    matches!(comps.next(), Some(Component::Normal(first)) if first == STORAGE_DIR)
        && comps.all(|c| matches!(c, Component::Normal(_)))
}

/// Copies `src` into `tmp` and checks it is a SQLite file. `tmp` is removed on failure.
fn stage_database<R: Read>(src: &mut R, tmp: &Path) -> Result<()> {
    let staged = write_staged(src, tmp).and_then(|()| {
        if has_sqlite_header(tmp)? {
            Ok(())
        } else {
            bail!("not a SQLite database")
        }
    });
    if staged.is_err() {
        let _ = std::fs::remove_file(tmp);
    }
    staged
}

fn write_staged<R: Read>(src: &mut R, tmp: &Path) -> Result<()> {
    let mut out = File::create(tmp)
        .with_context(|| format!("failed to create {}", tmp.to_string_lossy()))?;
    std::io::copy(src, &mut out).context("failed to extract database")?;
    out.flush().context("failed to flush extracted database")?;
    Ok(())
}

fn swap_in(tmp: &Path, dst: &Path) -> Result<()> {
    if dst.exists() {
        std::fs::remove_file(dst)
            .with_context(|| format!("failed to remove {}", dst.to_string_lossy()))?;
    }
    std::fs::rename(tmp, dst)
        .with_context(|| format!("failed to move database into {}", dst.to_string_lossy()))
}

/// Replaces the workspace database with `in_path`, either a bundle or a raw
/// SQLite file. The live database is untouched unless the candidate is valid.
/// A bundle restore also replaces `storage/` with the bundle's images.
pub fn import_workspace_bundle(in_path: &Path, workspace: &Path) -> Result<ImportSummary> {
    std::fs::create_dir_all(workspace)
        .with_context(|| format!("failed to create workspace {}", workspace.to_string_lossy()))?;
    let dst = workspace.join(DB_FILE);
    let tmp = workspace.join(format!("{DB_FILE}.importing"));

    if !is_zip_file(in_path)? {
        let mut src = File::open(in_path)
            .with_context(|| format!("failed to open {}", in_path.to_string_lossy()))?;
        stage_database(&mut src, &tmp)
            .with_context(|| format!("cannot restore {}", in_path.to_string_lossy()))?;
        swap_in(&tmp, &dst)?;
        return Ok(ImportSummary {
            bundle_format_detected: RAW_SQLITE_FORMAT.to_string(),
            images_restored: 0,
        });
    }

    let in_file = File::open(in_path)
        .with_context(|| format!("failed to open bundle {}", in_path.to_string_lossy()))?;
    let mut archive = ZipArchive::new(in_file).context("invalid zip archive")?;

    let mut manifest_text = String::new();
    archive
        .by_name(MANIFEST_ENTRY)
        .context("bundle missing manifest.json")?
        .read_to_string(&mut manifest_text)
        .context("failed to read manifest.json")?;
    let manifest: serde_json::Value =
        serde_json::from_str(&manifest_text).context("manifest.json is invalid JSON")?;
    let format = manifest.get("format").and_then(|v| v.as_str()).unwrap_or("");
    if format != BUNDLE_FORMAT {
        bail!("unsupported bundle format: {format}");
    }

    {
        let mut entry = archive
            .by_name(DB_ENTRY)
            .context("bundle missing db/sabl.sqlite3")?;
        stage_database(&mut entry, &tmp).context("bundle database entry is invalid")?;
    }
    swap_in(&tmp, &dst)?;

    let storage_root = workspace.join(STORAGE_DIR);
    if storage_root.is_dir() {
        std::fs::remove_dir_all(&storage_root)
            .with_context(|| format!("failed to clear {}", storage_root.to_string_lossy()))?;
    }
    let mut images_restored = 0usize;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).context("failed to read bundle entry")?;
        if entry.is_dir() {
            continue;
        }
        let Some(rel) = entry.enclosed_name().map(Path::to_path_buf) else {
            continue;
        };
        if !safe_storage_path(&rel) {
            continue;
        }
        let target = workspace.join(&rel);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.to_string_lossy()))?;
        }
        let mut out = File::create(&target)
            .with_context(|| format!("failed to create {}", target.to_string_lossy()))?;
        std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("failed to extract {}", rel.to_string_lossy()))?;
        images_restored += 1;
    }

    Ok(ImportSummary {
        bundle_format_detected: BUNDLE_FORMAT.to_string(),
        images_restored,
    })
}

fn has_sqlite_header(path: &Path) -> Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open {}", path.to_string_lossy()))?;
    let mut head = [0u8; 16];
    match f.read_exact(&mut head) {
        Ok(()) => Ok(&head == SQLITE_HEADER),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e).context("failed to read database header"),
    }
}

fn is_zip_file(path: &Path) -> Result<bool> {
    let mut f = File::open(path)
        .with_context(|| format!("failed to open {}", path.to_string_lossy()))?;
    let mut sig = [0u8; 4];
    let read = f.read(&mut sig).context("failed to read file signature")?;
    Ok(read == 4 && sig == [0x50, 0x4B, 0x03, 0x04])
}
