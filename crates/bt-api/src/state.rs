//! Application state shared across handlers
//!
//! Built once at startup from the pool, the JWT service and the mailer;
//! cloned per request. Repositories and services hold pool handles, so
//! cloning is cheap.

use std::sync::Arc;

use sqlx::PgPool;

use bt_auth::JwtService;
use bt_db::bugs::BugRepository;
use bt_db::members::ProjectMemberRepository;
use bt_db::projects::ProjectRepository;
use bt_db::users::UserRepository;
use bt_services::dashboard::DashboardService;
use bt_services::mailer::VerificationMailer;
use bt_services::users::UserService;
use bt_services::verification::VerificationService;

#[derive(Clone)]
pub struct AppState {
    pub jwt: Arc<JwtService>,
    pub users: UserService,
    pub verification: VerificationService,
    pub dashboard: DashboardService,
    pub projects: ProjectRepository,
    pub members: ProjectMemberRepository,
    pub bugs: BugRepository,
}

impl AppState {
    pub fn new(pool: PgPool, jwt: Arc<JwtService>, mailer: Arc<dyn VerificationMailer>) -> Self {
        let user_repo = UserRepository::new(pool.clone());
        let project_repo = ProjectRepository::new(pool.clone());
        let bug_repo = BugRepository::new(pool.clone());
        let member_repo = ProjectMemberRepository::new(pool);

        Self {
            users: UserService::new(user_repo.clone(), jwt.clone()),
            verification: VerificationService::new(user_repo.clone(), mailer),
            dashboard: DashboardService::new(
                user_repo,
                project_repo.clone(),
                bug_repo.clone(),
            ),
            projects: project_repo,
            members: member_repo,
            bugs: bug_repo,
            jwt,
        }
    }
}
