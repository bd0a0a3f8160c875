//! Image uploads kept under `<workspace>/storage/<bucket>/`.

use crate::auth::sha256_hex;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const STORAGE_DIR: &str = "storage";
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Workspace-relative path with forward slashes.
    pub url: String,
    pub bytes: u64,
    pub sha256: String,
}

pub fn is_valid_bucket(bucket: &str) -> bool {
    !bucket.is_empty()
        && bucket
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `<millis>_<8 hex of a v4 uuid>_<name>`.
fn stored_file_name(file_name: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        chrono::Utc::now().timestamp_millis(),
        &id[..8],
        file_name
    )
}

pub fn store_image(workspace: &Path, bucket: &str, source: &Path) -> Result<StoredImage> {
    if !is_valid_bucket(bucket) {
        bail!("invalid bucket name: {bucket}");
    }
    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .map(sanitize_file_name)
        .with_context(|| format!("source has no file name: {}", source.to_string_lossy()))?;
    if !is_image_file(Path::new(&file_name)) {
        bail!("unsupported image type: {file_name}");
    }

    let bytes = std::fs::read(source)
        .with_context(|| format!("failed to read {}", source.to_string_lossy()))?;
    let dir = workspace.join(STORAGE_DIR).join(bucket);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create {}", dir.to_string_lossy()))?;

    let stored_name = stored_file_name(&file_name);
    let dest = dir.join(&stored_name);
    let mut out = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&dest)
        .with_context(|| format!("failed to create {}", dest.to_string_lossy()))?;
    out.write_all(&bytes)
        .with_context(|| format!("failed to write {}", dest.to_string_lossy()))?;

    let stored = StoredImage {
        url: format!("{STORAGE_DIR}/{bucket}/{stored_name}"),
        bytes: bytes.len() as u64,
        sha256: sha256_hex(&bytes),
    };
    tracing::info!(url = %stored.url, bytes = stored.bytes, "stored image");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(prefix: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("{}-{}", prefix, nanos));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn bucket_names() {
        assert!(is_valid_bucket("winners"));
        assert!(is_valid_bucket("activity-photos_2"));
        assert!(!is_valid_bucket(""));
        assert!(!is_valid_bucket("../etc"));
        assert!(!is_valid_bucket("Winners"));
    }

    #[test]
    fn stores_copy_with_digest() {
        let ws = temp_dir("sabld-storage-ws");
        let src_dir = temp_dir("sabld-storage-src");
        let src = src_dir.join("my photo.PNG");
        std::fs::write(&src, b"png-bytes").expect("write source");

        let stored = store_image(&ws, "winners", &src).expect("store");
        assert!(stored.url.starts_with("storage/winners/"));
        assert!(stored.url.ends_with("_my_photo.PNG"));
        assert_eq!(stored.bytes, 9);
        assert_eq!(stored.sha256, sha256_hex(b"png-bytes"));
        let on_disk = std::fs::read(ws.join(&stored.url)).expect("read stored");
        assert_eq!(on_disk, b"png-bytes");
    }

    #[test]
    fn same_name_uploads_get_distinct_files() {
        let ws = temp_dir("sabld-storage-twice");
        let src_dir = temp_dir("sabld-storage-twice-src");
        let src = src_dir.join("team.jpg");
        std::fs::write(&src, b"first").expect("write source");
        let first = store_image(&ws, "gallery", &src).expect("first store");
        std::fs::write(&src, b"second").expect("rewrite source");
        let second = store_image(&ws, "gallery", &src).expect("second store");

        assert_ne!(first.url, second.url);
        assert_eq!(std::fs::read(ws.join(&first.url)).expect("first"), b"first");
        assert_eq!(std::fs::read(ws.join(&second.url)).expect("second"), b"second");
    }

    #[test]
    fn rejects_non_images_and_bad_buckets() {
        let ws = temp_dir("sabld-storage-reject");
        let src = ws.join("notes.txt");
        std::fs::write(&src, b"text").expect("write");
        assert!(store_image(&ws, "gallery", &src).is_err());

        let img = ws.join("a.jpg");
        std::fs::write(&img, b"jpg").expect("write");
        assert!(store_image(&ws, "../up", &img).is_err());
        assert!(store_image(&ws, "gallery", &ws.join("missing.jpg")).is_err());
    }
}
