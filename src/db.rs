use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "sabl.sqlite3";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join(DB_FILE_NAME);
    let conn = Connection::open(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    // Upcoming and completed activities share one table; status is a column.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS activities(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            activity_date TEXT NOT NULL,
            description TEXT,
            details TEXT,
            poster_url TEXT,
            image_url TEXT,
            form_link TEXT,
            photos TEXT,
            status TEXT NOT NULL DEFAULT 'upcoming'
                CHECK(status IN ('upcoming', 'completed')),
            created_at TEXT
        )",
        [],
    )?;
    ensure_activities_image_url(conn)?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_activities_status_date ON activities(status, activity_date)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS winners(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            roll_number TEXT NOT NULL DEFAULT '',
            event TEXT NOT NULL,
            date TEXT NOT NULL,
            photo_url TEXT,
            year INTEGER,
            is_week_winner INTEGER,
            position INTEGER,
            activity_type TEXT,
            week_number INTEGER,
            created_at TEXT
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_winners_roll_number ON winners(roll_number)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS gallery(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image_url TEXT,
            title TEXT,
            uploaded_at TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pin TEXT NOT NULL UNIQUE COLLATE NOCASE,
            name TEXT NOT NULL,
            branch TEXT NOT NULL,
            year TEXT NOT NULL,
            section TEXT NOT NULL,
            created_at TEXT
        )",
        [],
    )?;
    // Older workspaces predate bulk extra-marks uploads.
    ensure_students_extra_marks(conn)?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_name ON students(name)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS participants(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            activity_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            roll_number TEXT NOT NULL,
            department TEXT NOT NULL,
            college TEXT NOT NULL,
            award TEXT NOT NULL
                CHECK(award IN ('1st Place', '2nd Place', '3rd Place', 'Participation', 'Volunteer')),
            student_pin TEXT COLLATE NOCASE,
            marks INTEGER,
            created_at TEXT,
            FOREIGN KEY(activity_id) REFERENCES activities(id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_participants_activity ON participants(activity_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_participants_student_pin ON participants(student_pin)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_participants_roll_number ON participants(roll_number)",
        [],
    )?;

    Ok(())
}

fn ensure_activities_image_url(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "activities", "image_url")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE activities ADD COLUMN image_url TEXT", [])?;
    Ok(())
}

fn ensure_students_extra_marks(conn: &Connection) -> anyhow::Result<()> {
    if table_has_column(conn, "students", "extra_marks")? {
        return Ok(());
    }
    conn.execute("ALTER TABLE students ADD COLUMN extra_marks INTEGER", [])?;
    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> anyhow::Result<bool> {
    let sql = format!("PRAGMA table_info({})", table);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
