use super::{require_non_empty, DataError, DataResult};
use crate::model::{gallery_from_row, now_timestamp, GalleryImage, GalleryImageInput, GALLERY_COLUMNS};
use rusqlite::{params, Connection, OptionalExtension};

pub fn list_gallery(conn: &Connection) -> DataResult<Vec<GalleryImage>> {
    let sql = format!(
        "SELECT {} FROM gallery ORDER BY uploaded_at DESC, id DESC",
        GALLERY_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], gallery_from_row)
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())?;
    Ok(rows)
}

pub fn get_gallery_image(conn: &Connection, id: i64) -> DataResult<GalleryImage> {
    let sql = format!("SELECT {} FROM gallery WHERE id = ?", GALLERY_COLUMNS);
    conn.query_row(&sql, [id], gallery_from_row)
        .optional()?
        .ok_or_else(|| DataError::not_found("gallery image"))
}

pub fn create_gallery_image(conn: &Connection, input: &GalleryImageInput) -> DataResult<GalleryImage> {
    require_non_empty("url", &input.url)?;
    let (url, title) = input.to_record();
    conn.execute(
        "INSERT INTO gallery(image_url, title, uploaded_at) VALUES(?, ?, ?)",
        params![url, title, now_timestamp()],
    )
    .map_err(|e| DataError::write_failed("db_insert_failed", "gallery", e))?;
    get_gallery_image(conn, conn.last_insert_rowid())
}

pub fn update_gallery_image(
    conn: &Connection,
    id: i64,
    input: &GalleryImageInput,
) -> DataResult<GalleryImage> {
    require_non_empty("url", &input.url)?;
    let (url, title) = input.to_record();
    let changed = conn
        .execute(
            "UPDATE gallery SET image_url = ?, title = ? WHERE id = ?",
            params![url, title, id],
        )
        .map_err(|e| DataError::write_failed("db_update_failed", "gallery", e))?;
    if changed == 0 {
        return Err(DataError::not_found("gallery image"));
    }
    get_gallery_image(conn, id)
}

pub fn delete_gallery_image(conn: &Connection, id: i64) -> DataResult<()> {
    let changed = conn
        .execute("DELETE FROM gallery WHERE id = ?", [id])
        .map_err(|e| DataError::write_failed("db_delete_failed", "gallery", e))?;
    if changed == 0 {
        return Err(DataError::not_found("gallery image"));
    }
    Ok(())
}
