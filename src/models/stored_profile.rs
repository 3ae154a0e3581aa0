//! Stored profile model
//!
//! Latest generated profile snapshot per user and kind. Regenerating a
//! profile replaces the whole snapshot; there are no partial updates.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Which engine produced the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Nutrition,
    Allergy,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Nutrition => "nutrition",
            ProfileKind::Allergy => "allergy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "nutrition" => Some(ProfileKind::Nutrition),
            "allergy" | "allergies" => Some(ProfileKind::Allergy),
            _ => None,
        }
    }
}

/// A persisted profile snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub user_id: String,
    pub kind: ProfileKind,
    pub version: String,
    pub generated_at: String,
    pub payload: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

impl StoredProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind_str: String = row.get("kind")?;
        let kind = ProfileKind::from_str(&kind_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                1,
                Type::Text,
                format!("unknown profile kind '{}'", kind_str).into(),
            )
        })?;

        let payload_str: String = row.get("payload")?;
        let payload = serde_json::from_str(&payload_str).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
        })?;

        Ok(Self {
            user_id: row.get("user_id")?,
            kind,
            version: row.get("version")?,
            generated_at: row.get("generated_at")?,
            payload,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Save a profile snapshot, replacing any previous one for the same user and kind
    pub fn save<T: Serialize>(
        conn: &Connection,
        user_id: &str,
        kind: ProfileKind,
        version: &str,
        generated_at: &DateTime<Utc>,
        profile: &T,
    ) -> DbResult<Self> {
        let payload = serde_json::to_string(profile)?;
        let generated_at = generated_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        conn.execute(
            r#"
            INSERT INTO profiles (user_id, kind, version, generated_at, payload)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, kind) DO UPDATE SET
                version = excluded.version,
                generated_at = excluded.generated_at,
                payload = excluded.payload,
                updated_at = datetime('now')
            "#,
            params![user_id, kind.as_str(), version, generated_at, payload],
        )?;

        Self::get(conn, user_id, kind)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get the snapshot for a user and kind
    pub fn get(conn: &Connection, user_id: &str, kind: ProfileKind) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1 AND kind = ?2")?;

        let result = stmt.query_row(params![user_id, kind.as_str()], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All snapshots stored for a user
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE user_id = ?1 ORDER BY kind")?;
        let profiles = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Delete one kind, or every kind when `kind` is None. Returns rows removed.
    pub fn delete(conn: &Connection, user_id: &str, kind: Option<ProfileKind>) -> DbResult<usize> {
        let rows = match kind {
            Some(k) => conn.execute(
                "DELETE FROM profiles WHERE user_id = ?1 AND kind = ?2",
                params![user_id, k.as_str()],
            )?,
            None => conn.execute("DELETE FROM profiles WHERE user_id = ?1", [user_id])?,
        };
        Ok(rows)
    }

    /// Decode the payload back into a typed profile
    pub fn decode<T: DeserializeOwned>(&self) -> DbResult<T> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}
