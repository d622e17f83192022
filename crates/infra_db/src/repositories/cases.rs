//! Case repository implementation
//!
//! Each table stores the serialized domain record in a `data` JSONB column
//! next to the key columns it is looked up and ordered by. Child tables
//! reference `cases` with `ON DELETE CASCADE`.

use std::collections::HashMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use domain_cases::{Case, CaseNote, Communication, DeletionSummary, Document, RtwPlan, Stakeholder};

use crate::error::DatabaseError;

/// A child record as stored: owning case plus payload
type ChildRow<T> = (Uuid, Json<T>);

/// Case row before children are attached
type CaseRow = (Json<Case>,);

/// Repository for cases and their child records
#[derive(Debug, Clone)]
pub struct CaseRepository {
    pool: PgPool,
}

impl CaseRepository {
    /// Creates a new CaseRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All cases with children, newest first
    pub async fn list(&self) -> Result<Vec<Case>, DatabaseError> {
        let rows: Vec<CaseRow> = sqlx::query_as(
            r#"
            SELECT data
            FROM cases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut cases: Vec<Case> = rows.into_iter().map(|(Json(case),)| case).collect();
        let ids: Vec<Uuid> = cases.iter().map(|c| *c.id.as_uuid()).collect();

        let mut documents = self.children::<Document>("case_documents", &ids).await?;
        let mut communications = self.children::<Communication>("case_communications", &ids).await?;
        let mut notes = self.children::<CaseNote>("case_notes", &ids).await?;
        let mut stakeholders = self.children::<Stakeholder>("case_stakeholders", &ids).await?;
        let mut plans = self.children::<RtwPlan>("rtw_plans", &ids).await?;

        for case in cases.iter_mut() {
            let id = case.id.as_uuid();
            case.documents = documents.remove(id).unwrap_or_default();
            case.communications = communications.remove(id).unwrap_or_default();
            case.notes = notes.remove(id).unwrap_or_default();
            case.stakeholders = stakeholders.remove(id).unwrap_or_default();
            case.rtw_plan = plans.remove(id).and_then(|mut p| p.pop());
        }
        Ok(cases)
    }

    /// One case with children
    pub async fn get(&self, case_id: Uuid) -> Result<Case, DatabaseError> {
        let (Json(mut case),): CaseRow = sqlx::query_as(
            r#"
            SELECT data
            FROM cases
            WHERE case_id = $1
            "#,
        )
        .bind(case_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Case", case_id))?;

        let ids = [case_id];
        case.documents = self.children_of::<Document>("case_documents", &ids).await?;
        case.communications = self.children_of::<Communication>("case_communications", &ids).await?;
        case.notes = self.children_of::<CaseNote>("case_notes", &ids).await?;
        case.stakeholders = self.children_of::<Stakeholder>("case_stakeholders", &ids).await?;
        case.rtw_plan = self.children_of::<RtwPlan>("rtw_plans", &ids).await?.pop();
        Ok(case)
    }

    /// Inserts the case row; children are written through their own methods
    pub async fn insert(&self, case: &Case) -> Result<(), DatabaseError> {
        let row = strip_children(case);
        sqlx::query(
            r#"
            INSERT INTO cases (case_id, claim_number, status, case_manager_id, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(case.id.as_uuid())
        .bind(&case.claim_number)
        .bind(case.status.as_str())
        .bind(case.case_manager_id.as_uuid())
        .bind(Json(&row))
        .bind(case.created_at)
        .bind(case.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_claim(e, &case.claim_number))?;
        Ok(())
    }

    /// Rewrites the case row
    pub async fn update(&self, case: &Case) -> Result<(), DatabaseError> {
        let row = strip_children(case);
        let result = sqlx::query(
            r#"
            UPDATE cases
            SET claim_number = $2, status = $3, case_manager_id = $4, data = $5, updated_at = $6
            WHERE case_id = $1
            "#,
        )
        .bind(case.id.as_uuid())
        .bind(&case.claim_number)
        .bind(case.status.as_str())
        .bind(case.case_manager_id.as_uuid())
        .bind(Json(&row))
        .bind(case.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| duplicate_claim(e, &case.claim_number))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Case", case.id));
        }
        Ok(())
    }

    /// Deletes a case; foreign keys cascade to every child table
    pub async fn delete(&self, case_id: Uuid) -> Result<DeletionSummary, DatabaseError> {
        let mut tx: Transaction<'_, Postgres> = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        let counts: (i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM case_documents WHERE case_id = $1),
                (SELECT COUNT(*) FROM case_communications WHERE case_id = $1),
                (SELECT COUNT(*) FROM case_notes WHERE case_id = $1),
                (SELECT COUNT(*) FROM case_stakeholders WHERE case_id = $1),
                (SELECT COUNT(*) FROM rtw_plans WHERE case_id = $1)
            "#,
        )
        .bind(case_id)
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM cases WHERE case_id = $1")
            .bind(case_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Case", case_id));
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;

        Ok(DeletionSummary {
            documents: counts.0 as usize,
            communications: counts.1 as usize,
            notes: counts.2 as usize,
            stakeholders: counts.3 as usize,
            plans: counts.4 as usize,
        })
    }

    pub async fn insert_document(&self, document: &Document) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO case_documents (document_id, case_id, storage_path, recorded_at, data)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(document.id.as_uuid())
        .bind(document.case_id.as_uuid())
        .bind(&document.storage_path)
        .bind(document.uploaded_at)
        .bind(Json(document))
        .execute(&self.pool)
        .await
        .map_err(|e| missing_case(e, document.case_id))?;
        Ok(())
    }

    pub async fn documents(&self, case_id: Uuid) -> Result<Vec<Document>, DatabaseError> {
        self.require_case(case_id).await?;
        self.children_of("case_documents", &[case_id]).await
    }

    pub async fn insert_communication(&self, communication: &Communication) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO case_communications (communication_id, case_id, recorded_at, data)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(communication.id.as_uuid())
        .bind(communication.case_id.as_uuid())
        .bind(communication.occurred_at)
        .bind(Json(communication))
        .execute(&self.pool)
        .await
        .map_err(|e| missing_case(e, communication.case_id))?;
        Ok(())
    }

    pub async fn insert_note(&self, note: &CaseNote) -> Result<(), DatabaseError> {
        let kind = enum_text(&note.kind)?;
        sqlx::query(
            r#"
            INSERT INTO case_notes (note_id, case_id, kind, recorded_at, data)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(note.id.as_uuid())
        .bind(note.case_id.as_uuid())
        .bind(kind)
        .bind(note.created_at)
        .bind(Json(note))
        .execute(&self.pool)
        .await
        .map_err(|e| missing_case(e, note.case_id))?;
        Ok(())
    }

    pub async fn insert_stakeholder(&self, stakeholder: &Stakeholder) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO case_stakeholders (stakeholder_id, case_id, recorded_at, data)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(stakeholder.id.as_uuid())
        .bind(stakeholder.case_id.as_uuid())
        .bind(Utc::now())
        .bind(Json(stakeholder))
        .execute(&self.pool)
        .await
        .map_err(|e| missing_case(e, stakeholder.case_id))?;
        Ok(())
    }

    pub async fn delete_stakeholder(&self, case_id: Uuid, stakeholder_id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM case_stakeholders WHERE case_id = $1 AND stakeholder_id = $2")
            .bind(case_id)
            .bind(stakeholder_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Stakeholder", stakeholder_id));
        }
        Ok(())
    }

    /// Inserts or replaces the plan for its case
    pub async fn upsert_plan(&self, plan: &RtwPlan) -> Result<(), DatabaseError> {
        let status = enum_text(&plan.status)?;
        sqlx::query(
            r#"
            INSERT INTO rtw_plans (plan_id, case_id, status, recorded_at, data)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (case_id) DO UPDATE
            SET plan_id = EXCLUDED.plan_id,
                status = EXCLUDED.status,
                recorded_at = EXCLUDED.recorded_at,
                data = EXCLUDED.data
            "#,
        )
        .bind(plan.id.as_uuid())
        .bind(plan.case_id.as_uuid())
        .bind(status)
        .bind(plan.updated_at)
        .bind(Json(plan))
        .execute(&self.pool)
        .await
        .map_err(|e| missing_case(e, plan.case_id))?;
        Ok(())
    }

    /// Child rows the database still holds for `case_id`, across all child tables
    pub async fn child_count(&self, case_id: Uuid) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM case_documents WHERE case_id = $1)
              + (SELECT COUNT(*) FROM case_communications WHERE case_id = $1)
              + (SELECT COUNT(*) FROM case_notes WHERE case_id = $1)
              + (SELECT COUNT(*) FROM case_stakeholders WHERE case_id = $1)
              + (SELECT COUNT(*) FROM rtw_plans WHERE case_id = $1)
            "#,
        )
        .bind(case_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn require_case(&self, case_id: Uuid) -> Result<(), DatabaseError> {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT case_id FROM cases WHERE case_id = $1")
            .bind(case_id)
            .fetch_optional(&self.pool)
            .await?;
        exists.map(|_| ()).ok_or_else(|| DatabaseError::not_found("Case", case_id))
    }

    /// Child payloads for the given cases, oldest first
    async fn children_of<T>(&self, table: &'static str, case_ids: &[Uuid]) -> Result<Vec<T>, DatabaseError>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let rows: Vec<ChildRow<T>> = sqlx::query_as(&format!(
            "SELECT case_id, data FROM {table} WHERE case_id = ANY($1) ORDER BY recorded_at ASC"
        ))
        .bind(case_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(_, Json(record))| record).collect())
    }

    /// Child payloads grouped by owning case
    async fn children<T>(
        &self,
        table: &'static str,
        case_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<T>>, DatabaseError>
    where
        T: DeserializeOwned + Send + Unpin + 'static,
    {
        let rows: Vec<ChildRow<T>> = sqlx::query_as(&format!(
            "SELECT case_id, data FROM {table} WHERE case_id = ANY($1) ORDER BY recorded_at ASC"
        ))
        .bind(case_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<T>> = HashMap::new();
        for (case_id, Json(record)) in rows {
            grouped.entry(case_id).or_default().push(record);
        }
        Ok(grouped)
    }
}

fn strip_children(case: &Case) -> Case {
    let mut row = case.clone();
    row.documents.clear();
    row.communications.clear();
    row.notes.clear();
    row.stakeholders.clear();
    row.rtw_plan = None;
    row
}

/// Text form of a snake_case serde enum
pub(crate) fn enum_text<T: Serialize>(value: &T) -> Result<String, DatabaseError> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(s) => Ok(s),
        other => Err(DatabaseError::SerializationError(format!("expected string enum, got {other}"))),
    }
}

pub(crate) fn parse_enum<T: DeserializeOwned>(text: &str) -> Result<T, DatabaseError> {
    Ok(serde_json::from_value(serde_json::Value::String(text.to_string()))?)
}

fn duplicate_claim(error: sqlx::Error, claim_number: &str) -> DatabaseError {
    match DatabaseError::from(error) {
        DatabaseError::DuplicateEntry(_) => DatabaseError::duplicate("Case", "claim number", claim_number),
        other => other,
    }
}

fn missing_case(error: sqlx::Error, case_id: impl std::fmt::Display) -> DatabaseError {
    match DatabaseError::from(error) {
        DatabaseError::ForeignKeyViolation(_) => DatabaseError::not_found("Case", case_id),
        other => other,
    }
}
