//! Profile and notification repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use core_kernel::{CaseId, NotificationId, ProfileId};
use domain_cases::{Notification, Profile, Role};

use super::cases::{enum_text, parse_enum};
use crate::error::DatabaseError;

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub profile_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = DatabaseError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(DatabaseError::SerializationError)?;
        Ok(Profile::new(ProfileId::from(row.profile_id), row.full_name, row.email, role))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub notification_id: Uuid,
    pub recipient_id: Uuid,
    pub case_id: Option<Uuid>,
    pub kind: String,
    pub message: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DatabaseError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: NotificationId::from(row.notification_id),
            recipient_id: ProfileId::from(row.recipient_id),
            case_id: row.case_id.map(CaseId::from),
            kind: parse_enum(&row.kind)?,
            message: row.message,
            read_at: row.read_at,
            created_at: row.created_at,
        })
    }
}

/// Repository for user profiles and their notifications
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, profile_id: Uuid) -> Result<ProfileRow, DatabaseError> {
        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT profile_id, full_name, email, role
            FROM profiles
            WHERE profile_id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Profile", profile_id))
    }

    pub async fn upsert(&self, profile: &Profile) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (profile_id, full_name, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (profile_id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                email = EXCLUDED.email,
                role = EXCLUDED.role,
                updated_at = now()
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(profile.role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn insert_notification(&self, notification: &Notification) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (notification_id, recipient_id, case_id, kind, message, read_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.recipient_id.as_uuid())
        .bind(notification.case_id.map(Uuid::from))
        .bind(enum_text(&notification.kind)?)
        .bind(&notification.message)
        .bind(notification.read_at)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn notifications_for(&self, recipient_id: Uuid) -> Result<Vec<NotificationRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT notification_id, recipient_id, case_id, kind, message, read_at, created_at
            FROM notifications
            WHERE recipient_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Sets `read_at` once; marking an already-read notification is a no-op
    pub async fn mark_read(&self, recipient_id: Uuid, notification_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read_at = COALESCE(read_at, now())
            WHERE notification_id = $1 AND recipient_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Notification", notification_id));
        }
        Ok(())
    }
}
