use crate::Database;
use crate::models::{MessageDetailRow, MessageRow, MessageSideRow, ProfileRow, UserRow};
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &UserRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users
                    (username, password_hash, first_name, last_name, phone, joined_at, last_login_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    user.username,
                    user.password_hash,
                    user.first_name,
                    user.last_name,
                    user.phone,
                    user.joined_at,
                    user.last_login_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn list_users(&self) -> Result<Vec<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, first_name, last_name, phone FROM users ORDER BY username",
            )?;
            let rows = stmt
                .query_map([], profile_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Set `last_login_at` for a user. Returns the number of rows touched;
    /// zero means the username does not exist.
    pub fn touch_last_login(&self, username: &str, now: DateTime<Utc>) -> Result<usize> {
        self.with_conn(|conn| {
            let affected = conn.execute(
                "UPDATE users SET last_login_at = ?2 WHERE username = ?1",
                rusqlite::params![username, now],
            )?;
            Ok(affected)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        from_username: &str,
        to_username: &str,
        body: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (from_username, to_username, body, sent_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![from_username, to_username, body, sent_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_message(&self, id: i64) -> Result<Option<MessageDetailRow>> {
        self.with_conn(|conn| query_message_detail(conn, id))
    }

    /// Set `read_at` if it is still unset, then return the final value.
    /// Idempotent: re-marking an already-read message leaves the original
    /// timestamp in place. `None` means no such message.
    pub fn mark_message_read(&self, id: i64, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE messages SET read_at = COALESCE(read_at, ?2) WHERE id = ?1",
                rusqlite::params![id, now],
            )?;
            let read_at = conn
                .query_row(
                    "SELECT read_at FROM messages WHERE id = ?1",
                    [id],
                    |row| row.get::<_, DateTime<Utc>>(0),
                )
                .optional()?;
            Ok(read_at)
        })
    }

    /// Messages sent by `username`, each with the recipient's profile.
    pub fn messages_from(&self, username: &str) -> Result<Vec<MessageSideRow>> {
        self.with_conn(|conn| {
            query_message_side(
                conn,
                "SELECT m.id, u.username, u.first_name, u.last_name, u.phone,
                        m.body, m.sent_at, m.read_at
                 FROM messages m
                 JOIN users u ON m.to_username = u.username
                 WHERE m.from_username = ?1
                 ORDER BY m.sent_at",
                username,
            )
        })
    }

    /// Messages received by `username`, each with the sender's profile.
    pub fn messages_to(&self, username: &str) -> Result<Vec<MessageSideRow>> {
        self.with_conn(|conn| {
            query_message_side(
                conn,
                "SELECT m.id, u.username, u.first_name, u.last_name, u.phone,
                        m.body, m.sent_at, m.read_at
                 FROM messages m
                 JOIN users u ON m.from_username = u.username
                 WHERE m.to_username = ?1
                 ORDER BY m.sent_at",
                username,
            )
        })
    }
}

/// True when an insert failed because a key (primary or foreign) constraint
/// was violated. Used as the backstop for register/send races.
pub fn is_constraint_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, password_hash, first_name, last_name, phone, joined_at, last_login_at
         FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                password_hash: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                phone: row.get(4)?,
                joined_at: row.get(5)?,
                last_login_at: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_message_detail(conn: &Connection, id: i64) -> Result<Option<MessageDetailRow>> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.from_username, m.to_username, m.body, m.sent_at, m.read_at,
                f.username, f.first_name, f.last_name, f.phone,
                t.username, t.first_name, t.last_name, t.phone
         FROM messages m
         JOIN users f ON m.from_username = f.username
         JOIN users t ON m.to_username = t.username
         WHERE m.id = ?1",
    )?;

    let row = stmt
        .query_row([id], |row| {
            Ok(MessageDetailRow {
                message: MessageRow {
                    id: row.get(0)?,
                    from_username: row.get(1)?,
                    to_username: row.get(2)?,
                    body: row.get(3)?,
                    sent_at: row.get(4)?,
                    read_at: row.get(5)?,
                },
                from_user: ProfileRow {
                    username: row.get(6)?,
                    first_name: row.get(7)?,
                    last_name: row.get(8)?,
                    phone: row.get(9)?,
                },
                to_user: ProfileRow {
                    username: row.get(10)?,
                    first_name: row.get(11)?,
                    last_name: row.get(12)?,
                    phone: row.get(13)?,
                },
            })
        })
        .optional()?;

    Ok(row)
}

fn query_message_side(conn: &Connection, sql: &str, username: &str) -> Result<Vec<MessageSideRow>> {
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt
        .query_map([username], |row| {
            Ok(MessageSideRow {
                id: row.get(0)?,
                counterpart: ProfileRow {
                    username: row.get(1)?,
                    first_name: row.get(2)?,
                    last_name: row.get(3)?,
                    phone: row.get(4)?,
                },
                body: row.get(5)?,
                sent_at: row.get(6)?,
                read_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn profile_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProfileRow> {
    Ok(ProfileRow {
        username: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone: row.get(3)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
