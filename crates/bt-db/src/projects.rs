//! Project repository

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::patch::Patch;
use crate::repository::{RepositoryError, RepositoryResult};

const PROJECT_COLUMNS: &str = "project_id, project_name, description, created_by, created_at";

/// Project database entity
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRow {
    pub project_id: i64,
    pub project_name: String,
    pub description: Option<String>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub project_name: String,
    pub description: Option<String>,
    pub created_by: i64,
}

/// DTO for updating a project.
///
/// `description` is nullable, so it uses [`Patch`]: an omitted key leaves
/// the column alone while an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub project_name: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl UpdateProject {
    pub fn has_changes(&self) -> bool {
        self.project_name.is_some() || !self.description.is_absent()
    }
}

/// Project repository implementation
#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All projects, newest first
    pub async fn find_all(&self) -> RepositoryResult<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ProjectRow>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE project_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Projects created by a given user
    pub async fn find_by_creator(&self, creator_id: i64) -> RepositoryResult<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE created_by = $1 ORDER BY created_at DESC"
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a project and return the materialized row
    pub async fn create(&self, dto: CreateProject) -> RepositoryResult<ProjectRow> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "INSERT INTO projects (project_name, description, created_by) \
             VALUES ($1, $2, $3) \
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(&dto.project_name)
        .bind(&dto.description)
        .bind(dto.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Partial update; `None` when the id matched no row
    pub async fn update(
        &self,
        id: i64,
        dto: UpdateProject,
    ) -> RepositoryResult<Option<ProjectRow>> {
        if !dto.has_changes() {
            return Err(RepositoryError::NothingToUpdate);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE projects SET ");
        {
            let mut fields = builder.separated(", ");
            if let Some(project_name) = &dto.project_name {
                fields
                    .push("project_name = ")
                    .push_bind_unseparated(project_name);
            }
            if let Some(description) = dto.description.as_update() {
                fields
                    .push("description = ")
                    .push_bind_unseparated(description.cloned());
            }
        }
        builder.push(" WHERE project_id = ").push_bind(id);
        builder.push(format!(" RETURNING {PROJECT_COLUMNS}"));

        let row = builder
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    /// True iff at least one row was removed
    pub async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE project_id = $1")
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
    fn test_empty_update_rejected_shape() {
        let dto: UpdateProject = serde_json::from_str("{}").unwrap();
        assert!(!dto.has_changes());
    }

    #[test]
    fn test_clearing_description_counts_as_change() {
        let dto: UpdateProject = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(dto.description, Patch::Null);
        assert!(dto.has_changes());
    }

    #[test]
    fn test_rename_only() {
        let dto: UpdateProject =
            serde_json::from_str(r#"{"projectName": "Tracker"}"#).unwrap();
        assert_eq!(dto.project_name.as_deref(), Some("Tracker"));
        assert!(dto.description.is_absent());
    }
}
