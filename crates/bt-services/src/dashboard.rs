//! Dashboard aggregation
//!
//! Fans out to the three repositories concurrently and reshapes the rows
//! into display records. Any single fetch failure fails the whole
//! dashboard; there is no partial result.

use serde::Serialize;
use serde_json::{Map, Value};

use bt_db::bugs::{BugRepository, BugRow};
use bt_db::projects::{ProjectRepository, ProjectRow};
use bt_db::users::{UserRepository, UserRow};

use crate::result::ServiceResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBug {
    pub id: i64,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub project_id: i64,
    pub created_at: String,
    pub assigned_to: Option<i64>,
    /// Placeholder array whose length is the bug's comment count
    pub comments: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardUser {
    pub id: i64,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardProject {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub bugs: Vec<DashboardBug>,
    pub projects: Vec<DashboardProject>,
    pub users: Vec<DashboardUser>,
}

/// Kebab-case a status label for display ("In Progress" -> "in-progress")
fn format_status(status: &str) -> String {
    status.to_lowercase().replace(' ', "-")
}

fn format_bug(bug: &BugRow) -> DashboardBug {
    DashboardBug {
        id: bug.bug_id,
        title: bug.title.clone(),
        status: format_status(&bug.status),
        priority: bug.priority.to_lowercase(),
        project_id: bug.project_id,
        created_at: bug.created_at.format("%Y-%m-%d").to_string(),
        assigned_to: bug.assigned_to,
        comments: vec![Value::Object(Map::new()); bug.comment_count.max(0) as usize],
    }
}

fn format_user(user: &UserRow) -> DashboardUser {
    DashboardUser {
        id: user.user_id,
        name: user.username.clone(),
        role: user.role.clone(),
    }
}

fn format_project(project: &ProjectRow) -> DashboardProject {
    DashboardProject {
        id: project.project_id,
        name: project.project_name.clone(),
    }
}

/// Dashboard aggregation over the three entity repositories
#[derive(Clone)]
pub struct DashboardService {
    users: UserRepository,
    projects: ProjectRepository,
    bugs: BugRepository,
}

impl DashboardService {
    pub fn new(users: UserRepository, projects: ProjectRepository, bugs: BugRepository) -> Self {
        Self {
            users,
            projects,
            bugs,
        }
    }

    pub async fn load(&self) -> ServiceResult<DashboardData> {
        let (users, projects, bugs) = tokio::try_join!(
            self.users.find_all(),
            self.projects.find_all(),
            self.bugs.find_all(),
        )?;

        Ok(DashboardData {
            bugs: bugs.iter().map(format_bug).collect(),
            projects: projects.iter().map(format_project).collect(),
            users: users.iter().map(format_user).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_bug() -> BugRow {
        BugRow {
            bug_id: 3,
            title: "Login broken".into(),
            description: None,
            status: "In Progress".into(),
            priority: "High".into(),
            project_id: 7,
            reported_by: Some(1),
            assigned_to: Some(2),
            created_at: Utc.with_ymd_and_hms(2024, 5, 17, 13, 45, 0).unwrap(),
            comment_count: 3,
        }
    }

    #[test]
    fn test_status_kebab_cased() {
        assert_eq!(format_status("In Progress"), "in-progress");
        assert_eq!(format_status("Open"), "open");
    }

    #[test]
    fn test_bug_reshaped_for_display() {
        let display = format_bug(&sample_bug());
        assert_eq!(display.status, "in-progress");
        assert_eq!(display.priority, "high");
        assert_eq!(display.created_at, "2024-05-17");
        assert_eq!(display.comments.len(), 3);
        assert!(display.comments.iter().all(|c| c == &Value::Object(Map::new())));
    }

    #[test]
    fn test_zero_comments_gives_empty_array() {
        let mut bug = sample_bug();
        bug.comment_count = 0;
        assert!(format_bug(&bug).comments.is_empty());
    }
}
