use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// The user-locale projection of the user entity.
///
/// The language-change service is the only writer of the pending-code
/// fields (`pending_language`, `otp_code`, `otp_expiry`, `otp_type`); the
/// broader application owns the rest.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub phone_number: Option<String>,
    pub language: String,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub pending_language: Option<String>,
    pub otp_code: Option<String>,
    /// Unix milliseconds after which `otp_code` is invalid
    pub otp_expiry: Option<i64>,
    /// Channel that issued the pending code: "email" or "sms"
    pub otp_type: Option<String>,
}

impl UserRecord {
    /// Whether a code is in flight, expired or not.
    pub fn has_pending_code(&self) -> bool {
        self.otp_code.is_some()
    }

    /// Whether a code is in flight and still inside its window.
    pub fn has_unexpired_code(&self, now_ms: i64) -> bool {
        matches!(self.otp_expiry, Some(expiry) if now_ms < expiry)
    }
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Initialize database connection and create tables
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL,
                phone_number TEXT,
                language TEXT NOT NULL DEFAULT 'en',
                email_verified INTEGER NOT NULL DEFAULT 0,
                phone_verified INTEGER NOT NULL DEFAULT 0,
                pending_language TEXT,
                otp_code TEXT,
                otp_expiry INTEGER,
                otp_type TEXT
            )",
            [],
        )
        .context("Failed to create users table")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a user record with the default language
    pub fn create_user(&self, email: &str, phone_number: Option<&str>) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (email, phone_number) VALUES (?1, ?2)",
            params![email, phone_number],
        )
        .context("Failed to create user")?;

        Ok(conn.last_insert_rowid())
    }

    /// Load a user record by id
    pub fn get_user(&self, id: i64) -> Result<Option<UserRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, email, phone_number, language, email_verified, phone_verified,
                    pending_language, otp_code, otp_expiry, otp_type
             FROM users WHERE id = ?1",
        )?;

        let user = stmt
            .query_row(params![id], |row| {
                Ok(UserRecord {
                    id: row.get(0)?,
                    email: row.get(1)?,
                    phone_number: row.get(2)?,
                    language: row.get(3)?,
                    email_verified: row.get::<_, i64>(4)? != 0,
                    phone_verified: row.get::<_, i64>(5)? != 0,
                    pending_language: row.get(6)?,
                    otp_code: row.get(7)?,
                    otp_expiry: row.get(8)?,
                    otp_type: row.get(9)?,
                })
            })
            .optional()?;

        Ok(user)
    }

    /// Add or replace the user's phone number
    pub fn set_phone_number(&self, id: i64, phone_number: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn
            .execute(
                "UPDATE users SET phone_number = ?1 WHERE id = ?2",
                params![phone_number, id],
            )
            .context("Failed to set phone number")?;

        Ok(rows_affected > 0)
    }

    /// Commit a language immediately and drop any in-flight code.
    /// Used for locales that need no verification.
    pub fn set_language(&self, id: i64, language: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn
            .execute(
                "UPDATE users SET language = ?1,
                        pending_language = NULL, otp_code = NULL,
                        otp_expiry = NULL, otp_type = NULL
                 WHERE id = ?2",
                params![language, id],
            )
            .context("Failed to set language")?;

        Ok(rows_affected > 0)
    }

    /// Write the pending state for a freshly issued code.
    ///
    /// Conditional on no unexpired code existing: two concurrent requests
    /// can both pass the in-memory cooldown check, but only one of these
    /// writes can succeed. Returns false when the row was not updated,
    /// meaning another request holds the cooldown.
    pub fn begin_pending_change(
        &self,
        id: i64,
        pending_language: &str,
        code: &str,
        expiry_ms: i64,
        channel: &str,
        now_ms: i64,
    ) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn
            .execute(
                "UPDATE users SET pending_language = ?1, otp_code = ?2,
                        otp_expiry = ?3, otp_type = ?4
                 WHERE id = ?5 AND (otp_expiry IS NULL OR otp_expiry <= ?6)",
                params![pending_language, code, expiry_ms, channel, id, now_ms],
            )
            .context("Failed to write pending language change")?;

        Ok(rows_affected > 0)
    }

    /// Commit a verified language change in one write: promote the pending
    /// language, mark the issuing channel verified, clear the pending fields.
    ///
    /// Conditional on the stored code still matching and being unexpired, so
    /// a concurrent supersession or expiry cannot be committed over.
    pub fn commit_language_change(&self, id: i64, code: &str, now_ms: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let rows_affected = conn
            .execute(
                "UPDATE users SET
                        language = pending_language,
                        email_verified = CASE WHEN otp_type = 'email' THEN 1 ELSE email_verified END,
                        phone_verified = CASE WHEN otp_type = 'sms' THEN 1 ELSE phone_verified END,
                        pending_language = NULL, otp_code = NULL,
                        otp_expiry = NULL, otp_type = NULL
                 WHERE id = ?1 AND otp_code = ?2
                       AND pending_language IS NOT NULL AND otp_expiry >= ?3",
                params![id, code, now_ms],
            )
            .context("Failed to commit language change")?;

        Ok(rows_affected > 0)
    }

    /// Clear the pending fields without touching the committed language.
    /// Used when a code is found expired.
    pub fn clear_pending(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE users SET pending_language = NULL, otp_code = NULL,
                    otp_expiry = NULL, otp_type = NULL
             WHERE id = ?1",
            params![id],
        )
        .context("Failed to clear pending language change")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== Helper Functions ====================

    /// Create a temporary database for testing
    fn create_test_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test_users.db");
        let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
        (db, temp_dir)
    }

    fn create_test_user(db: &Database) -> i64 {
        db.create_user("user@example.com", None)
            .expect("Failed to create user")
    }

    const NOW: i64 = 1_700_000_000_000;

    // ==================== User Record Tests ====================

    #[test]
    fn test_create_and_get_user() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);

        let user = db.get_user(id).unwrap().expect("user should exist");
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.language, "en");
        assert!(user.phone_number.is_none());
        assert!(!user.email_verified);
        assert!(!user.phone_verified);
        assert!(!user.has_pending_code());
    }

    #[test]
    fn test_get_missing_user() {
        let (db, _tmp) = create_test_db();
        assert!(db.get_user(42).unwrap().is_none());
    }

    #[test]
    fn test_set_phone_number() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);

        assert!(db.set_phone_number(id, "+14155550100").unwrap());
        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.phone_number.as_deref(), Some("+14155550100"));

        assert!(!db.set_phone_number(999, "+14155550100").unwrap());
    }

    // ==================== Pending State Tests ====================

    #[test]
    fn test_begin_pending_change_stores_all_fields() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);

        let wrote = db
            .begin_pending_change(id, "es", "123456", NOW + 300_000, "sms", NOW)
            .unwrap();
        assert!(wrote);

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.pending_language.as_deref(), Some("es"));
        assert_eq!(user.otp_code.as_deref(), Some("123456"));
        assert_eq!(user.otp_expiry, Some(NOW + 300_000));
        assert_eq!(user.otp_type.as_deref(), Some("sms"));
        assert!(user.has_unexpired_code(NOW + 60_000));
        // The committed language is untouched until verification.
        assert_eq!(user.language, "en");
    }

    #[test]
    fn test_begin_pending_change_rejected_while_unexpired() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);

        assert!(db
            .begin_pending_change(id, "es", "123456", NOW + 300_000, "sms", NOW)
            .unwrap());

        // Second writer loses the compare-and-swap.
        let wrote = db
            .begin_pending_change(id, "hi", "654321", NOW + 360_000, "sms", NOW + 60_000)
            .unwrap();
        assert!(!wrote);

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.otp_code.as_deref(), Some("123456"));
        assert_eq!(user.pending_language.as_deref(), Some("es"));
    }

    #[test]
    fn test_begin_pending_change_allowed_after_expiry() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);

        assert!(db
            .begin_pending_change(id, "es", "123456", NOW + 300_000, "sms", NOW)
            .unwrap());

        // Exactly at the expiry instant: the cooldown no longer holds,
        // matching has_unexpired_code (now < expiry).
        let after_expiry = NOW + 300_000;
        let wrote = db
            .begin_pending_change(id, "hi", "654321", after_expiry + 300_000, "sms", after_expiry)
            .unwrap();
        assert!(wrote);

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.pending_language.as_deref(), Some("hi"));
        assert_eq!(user.otp_code.as_deref(), Some("654321"));
    }

    // ==================== Commit Tests ====================

    #[test]
    fn test_commit_promotes_pending_and_marks_sms_verified() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);
        db.begin_pending_change(id, "es", "123456", NOW + 300_000, "sms", NOW)
            .unwrap();

        assert!(db.commit_language_change(id, "123456", NOW + 60_000).unwrap());

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.language, "es");
        assert!(user.phone_verified);
        assert!(!user.email_verified);
        assert!(user.pending_language.is_none());
        assert!(user.otp_code.is_none());
        assert!(user.otp_expiry.is_none());
        assert!(user.otp_type.is_none());
    }

    #[test]
    fn test_commit_marks_email_verified_for_email_channel() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);
        db.begin_pending_change(id, "fr", "222333", NOW + 300_000, "email", NOW)
            .unwrap();

        assert!(db.commit_language_change(id, "222333", NOW).unwrap());

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.language, "fr");
        assert!(user.email_verified);
        assert!(!user.phone_verified);
    }

    #[test]
    fn test_commit_refused_for_wrong_code_or_expiry() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);
        db.begin_pending_change(id, "es", "123456", NOW + 300_000, "sms", NOW)
            .unwrap();

        assert!(!db.commit_language_change(id, "000000", NOW).unwrap());
        assert!(!db
            .commit_language_change(id, "123456", NOW + 300_001)
            .unwrap());

        // Still pending: nothing was promoted or cleared.
        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.language, "en");
        assert_eq!(user.otp_code.as_deref(), Some("123456"));
    }

    #[test]
    fn test_commit_refused_with_no_pending_state() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);
        assert!(!db.commit_language_change(id, "123456", NOW).unwrap());
    }

    #[test]
    fn test_clear_pending() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);
        db.begin_pending_change(id, "zh", "777888", NOW + 300_000, "sms", NOW)
            .unwrap();

        db.clear_pending(id).unwrap();

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.language, "en");
        assert!(user.pending_language.is_none());
        assert!(user.otp_code.is_none());
        assert!(user.otp_expiry.is_none());
        assert!(user.otp_type.is_none());
    }

    #[test]
    fn test_set_language_clears_pending() {
        let (db, _tmp) = create_test_db();
        let id = create_test_user(&db);
        db.begin_pending_change(id, "es", "123456", NOW + 300_000, "sms", NOW)
            .unwrap();

        assert!(db.set_language(id, "en").unwrap());

        let user = db.get_user(id).unwrap().unwrap();
        assert_eq!(user.language, "en");
        assert!(!user.has_pending_code());
    }
}
