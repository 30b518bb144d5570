//! Bug repository
//!
//! The list query materializes a derived comment count per bug; single-row
//! lookups skip it and leave the field at its default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::patch::Patch;
use crate::repository::{RepositoryError, RepositoryResult};

const BUG_COLUMNS: &str = "bug_id, title, description, status, priority, \
                           project_id, reported_by, assigned_to, created_at";

/// Bug database entity
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BugRow {
    pub bug_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub project_id: i64,
    pub reported_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub created_at: DateTime<Utc>,
    /// Derived; populated by list queries only
    #[sqlx(default)]
    pub comment_count: i64,
}

/// DTO for creating a bug
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBug {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub project_id: i64,
    pub reported_by: Option<i64>,
    pub assigned_to: Option<i64>,
}

/// DTO for updating a bug.
///
/// `description` and `assigned_to` are nullable columns and use [`Patch`]
/// so a client can clear them explicitly; the rest use plain `Option`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBug {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub assigned_to: Patch<i64>,
}

impl UpdateBug {
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || !self.description.is_absent()
            || self.status.is_some()
            || self.priority.is_some()
            || !self.assigned_to.is_absent()
    }
}

/// Bug repository implementation
#[derive(Clone)]
pub struct BugRepository {
    pool: PgPool,
}

impl BugRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All bugs with comment counts, newest first
    pub async fn find_all(&self) -> RepositoryResult<Vec<BugRow>> {
        let rows = sqlx::query_as::<_, BugRow>(&format!(
            "SELECT {BUG_COLUMNS}, \
             (SELECT COUNT(*) FROM comments c WHERE c.bug_id = bugs.bug_id) AS comment_count \
             FROM bugs ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<BugRow>> {
        let row = sqlx::query_as::<_, BugRow>(&format!(
            "SELECT {BUG_COLUMNS} FROM bugs WHERE bug_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn find_by_project(&self, project_id: i64) -> RepositoryResult<Vec<BugRow>> {
        self.find_by_column("project_id", project_id).await
    }

    pub async fn find_by_assignee(&self, assignee_id: i64) -> RepositoryResult<Vec<BugRow>> {
        self.find_by_column("assigned_to", assignee_id).await
    }

    pub async fn find_by_reporter(&self, reporter_id: i64) -> RepositoryResult<Vec<BugRow>> {
        self.find_by_column("reported_by", reporter_id).await
    }

    pub async fn find_by_status(&self, status: &str) -> RepositoryResult<Vec<BugRow>> {
        let rows = sqlx::query_as::<_, BugRow>(&format!(
            "SELECT {BUG_COLUMNS} FROM bugs WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // column name is a compile-time constant, never user input
    async fn find_by_column(&self, column: &'static str, id: i64) -> RepositoryResult<Vec<BugRow>> {
        let rows = sqlx::query_as::<_, BugRow>(&format!(
            "SELECT {BUG_COLUMNS} FROM bugs WHERE {column} = $1 ORDER BY created_at DESC"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a bug and return the materialized row
    pub async fn create(&self, dto: CreateBug) -> RepositoryResult<BugRow> {
        let row = sqlx::query_as::<_, BugRow>(&format!(
            "INSERT INTO bugs (title, description, status, priority, project_id, \
             reported_by, assigned_to) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {BUG_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.status.as_deref().unwrap_or("Open"))
        .bind(dto.priority.as_deref().unwrap_or("Medium"))
        .bind(dto.project_id)
        .bind(dto.reported_by)
        .bind(dto.assigned_to)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Partial update; `None` when the id matched no row
    pub async fn update(&self, id: i64, dto: UpdateBug) -> RepositoryResult<Option<BugRow>> {
        if !dto.has_changes() {
            return Err(RepositoryError::NothingToUpdate);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE bugs SET ");
        {
            let mut fields = builder.separated(", ");
            if let Some(title) = &dto.title {
                fields.push("title = ").push_bind_unseparated(title);
            }
            if let Some(description) = dto.description.as_update() {
                fields
                    .push("description = ")
                    .push_bind_unseparated(description.cloned());
            }
            if let Some(status) = &dto.status {
                fields.push("status = ").push_bind_unseparated(status);
            }
            if let Some(priority) = &dto.priority {
                fields.push("priority = ").push_bind_unseparated(priority);
            }
            if let Some(assigned_to) = dto.assigned_to.as_update() {
                fields
                    .push("assigned_to = ")
                    .push_bind_unseparated(assigned_to.copied());
            }
        }
        builder.push(" WHERE bug_id = ").push_bind(id);
        builder.push(format!(" RETURNING {BUG_COLUMNS}"));

        let row = builder
            .build_query_as::<BugRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// True iff at least one row was removed
    pub async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM bugs WHERE bug_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_has_no_changes() {
        let dto: UpdateBug = serde_json::from_str("{}").unwrap();
        assert!(!dto.has_changes());
    }

    #[test]
    fn test_unassign_is_distinct_from_omission() {
        let cleared: UpdateBug =
            serde_json::from_str(r#"{"assignedTo": null}"#).unwrap();
        assert_eq!(cleared.assigned_to, Patch::Null);
        assert!(cleared.has_changes());

        let omitted: UpdateBug = serde_json::from_str(r#"{"status": "Closed"}"#).unwrap();
        assert!(omitted.assigned_to.is_absent());
    }

    #[test]
    fn test_create_defaults_applied_at_bind_time() {
        let dto: CreateBug =
            serde_json::from_str(r#"{"title": "crash", "projectId": 7}"#).unwrap();
        assert_eq!(dto.status.as_deref().unwrap_or("Open"), "Open");
        assert_eq!(dto.priority.as_deref().unwrap_or("Medium"), "Medium");
        assert_eq!(dto.project_id, 7);
    }
}
