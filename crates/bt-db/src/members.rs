//! Project membership repository
//!
//! Join entity between projects and users; a membership role is distinct
//! from the user's global role.

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::projects::ProjectRow;
use crate::repository::RepositoryResult;

/// Project member database entity
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberRow {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub role_in_project: String,
}

/// Project member repository implementation
#[derive(Clone)]
pub struct ProjectMemberRepository {
    pool: PgPool,
}

impl ProjectMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Members of one project
    pub async fn find_by_project(
        &self,
        project_id: i64,
    ) -> RepositoryResult<Vec<ProjectMemberRow>> {
        let rows = sqlx::query_as::<_, ProjectMemberRow>(
            "SELECT id, project_id, user_id, role_in_project \
             FROM project_members WHERE project_id = $1 ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Projects a user belongs to, through the membership join
    pub async fn find_projects_by_member(
        &self,
        user_id: i64,
    ) -> RepositoryResult<Vec<ProjectRow>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT p.project_id, p.project_name, p.description, p.created_by, p.created_at \
             FROM projects p \
             JOIN project_members pm ON pm.project_id = p.project_id \
             WHERE pm.user_id = $1 \
             ORDER BY p.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
