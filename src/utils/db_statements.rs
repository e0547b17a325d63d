// This file contains all SQL statements issued by the greeting server.
#![forbid(unsafe_code)]

// ========================= greetings table =========================
pub const INSERT_GREETING: &str = concat!(
    "INSERT INTO greetings (content, created) ",
    "VALUES (?, ?) RETURNING id",
);

// Saving a greeting that already has an id replaces its content.
pub const UPSERT_GREETING: &str = concat!(
    "INSERT INTO greetings (id, content, created) ",
    "VALUES (?, ?, ?) ",
    "ON CONFLICT(id) DO UPDATE SET content = excluded.content",
);

pub const LIST_GREETINGS: &str = concat!(
    "SELECT id, content, created ",
    "FROM greetings ORDER BY id",
);
