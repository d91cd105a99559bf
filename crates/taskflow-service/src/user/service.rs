//! User administration and profile editing.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use validator::Validate;

use taskflow_auth::{AccessControl, Principal};
use taskflow_core::AppError;
use taskflow_core::result::AppResult;
use taskflow_core::traits::Repository;
use taskflow_core::types::pagination::{PageRequest, PageResponse};
use taskflow_entity::user::{CreateUser, UpdateUser, User, UserRole};

use crate::audit::AuditRecorder;
use crate::context::RequestContext;
use crate::intercept::{AuditedRepository, CallInterceptor};

/// Handles user lookups, creation, edits and removal.
#[derive(Clone)]
pub struct UserService {
    users: AuditedRepository<User>,
    access: AccessControl,
    calls: CallInterceptor,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        users: Arc<dyn Repository<User>>,
        recorder: AuditRecorder,
        access: AccessControl,
        calls: CallInterceptor,
    ) -> Self {
        Self {
            users: AuditedRepository::new(users, recorder),
            access,
            calls,
        }
    }

    async fn load(&self, id: i64) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Gets a user by id.
    pub async fn get(&self, ctx: &RequestContext, id: i64) -> AppResult<User> {
        self.calls
            .around(ctx, "UserService.get", self.load(id))
            .await
    }

    /// Lists users, ordered by id.
    pub async fn list(&self, ctx: &RequestContext, page: PageRequest) -> AppResult<PageResponse<User>> {
        self.calls
            .around(ctx, "UserService.list", async {
                let all = self.users.find_all().await?;
                Ok(PageResponse::from_vec(all, &page))
            })
            .await
    }

    /// Creates a user. Admin only.
    ///
    /// The role is stored upper case; without an explicit access level the
    /// role's default is used. The creator must outrank the new user.
    pub async fn create(&self, ctx: &RequestContext, input: CreateUser) -> AppResult<User> {
        self.calls
            .around(ctx, "UserService.create", async {
                let creator = self.access.require_admin(ctx)?;
                input.validate()?;

                let role: UserRole = input.role.parse()?;
                let username = input.username.trim().to_string();
                let level = input
                    .access_level
                    .unwrap_or_else(|| role.default_access_level());

                let creator_level = creator.access_level.ok_or_else(|| {
                    AppError::forbidden(
                        "Your access level is not configured. Please contact administrator.",
                    )
                })?;
                if level >= creator_level {
                    return Err(AppError::forbidden(format!(
                        "Cannot create user '{username}' with access level {level}. \
                         Administrators can only create users with lower access levels. \
                         (Your level: {creator_level})"
                    )));
                }

                let taken = self
                    .users
                    .find_all()
                    .await?
                    .iter()
                    .any(|u| u.username.eq_ignore_ascii_case(&username));
                if taken {
                    return Err(AppError::conflict(format!(
                        "Username '{username}' is already taken"
                    )));
                }

                let user = User {
                    id: None,
                    username,
                    email: input.email,
                    role: Some(role.as_str().to_string()),
                    access_level: Some(level),
                    job_title: input.job_title,
                    department: input.department,
                    reporting_to: input.reporting_to,
                    created_at: Some(Utc::now()),
                };

                let saved = self.users.for_actor(ctx).save(&user).await?;
                info!(user_id = saved.id, username = %saved.username, role = %role, "User created");
                Ok(saved)
            })
            .await
    }

    /// Updates a user's profile, subject to the edit permission check.
    ///
    /// Role and access level can only be changed by administrators.
    pub async fn update(&self, ctx: &RequestContext, id: i64, input: UpdateUser) -> AppResult<User> {
        self.calls
            .around(ctx, "UserService.update", async {
                input.validate()?;
                let current = ctx.current_user()?;
                let mut target = self.load(id).await?;
                self.access
                    .check_edit_permission(Some(current), Some(&target))?;

                if (input.role.is_some() || input.access_level.is_some()) && !current.is_admin() {
                    return Err(AppError::forbidden(
                        "Only administrators can change roles or access levels",
                    ));
                }

                if let Some(email) = input.email {
                    target.email = Some(email);
                }
                if let Some(role) = input.role {
                    let role: UserRole = role.parse()?;
                    target.role = Some(role.as_str().to_string());
                }
                if let Some(level) = input.access_level {
                    target.access_level = Some(level);
                }
                if let Some(job_title) = input.job_title {
                    target.job_title = Some(job_title);
                }
                if let Some(department) = input.department {
                    target.department = Some(department);
                }
                if let Some(reporting_to) = input.reporting_to {
                    target.reporting_to = Some(reporting_to);
                }

                let saved = self.users.for_actor(ctx).save(&target).await?;
                info!(user_id = id, editor = %current.username, "User updated");
                Ok(saved)
            })
            .await
    }

    /// Deletes a user. Users cannot delete their own account.
    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        self.calls
            .around(ctx, "UserService.delete", async {
                let current = ctx.current_user()?;
                if current.id == Some(id) {
                    return Err(AppError::forbidden("You cannot delete your own account"));
                }
                let target = self.load(id).await?;
                self.access
                    .check_edit_permission(Some(current), Some(&target))?;

                self.users.for_actor(ctx).delete(&target).await?;
                info!(user_id = id, editor = %current.username, "User deleted");
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{admin, user};
    use taskflow_core::error::ErrorKind;
    use taskflow_database::{MemoryAuditStore, MemoryRepository};

    async fn setup() -> (UserService, Arc<MemoryRepository<User>>) {
        let users = Arc::new(MemoryRepository::<User>::new());
        users
            .seed([admin(1, "root"), user(2, "dave", Some("dave@example.com"))])
            .await;
        let service = UserService::new(
            users.clone(),
            AuditRecorder::new(Arc::new(MemoryAuditStore::new())),
            AccessControl::new(),
            CallInterceptor::default(),
        );
        (service, users)
    }

    fn as_user(u: User) -> RequestContext {
        RequestContext::authenticated(u, None)
    }

    #[tokio::test]
    async fn test_create_normalises_role_and_level() {
        let (service, _) = setup().await;
        let created = service
            .create(
                &as_user(admin(1, "root")),
                CreateUser {
                    username: "erin".to_string(),
                    email: Some("erin@example.com".to_string()),
                    role: "manager".to_string(),
                    access_level: None,
                    job_title: None,
                    department: None,
                    reporting_to: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(created.role.as_deref(), Some("MANAGER"));
        assert_eq!(created.access_level, Some(4));
    }

    fn new_admin(username: &str, access_level: Option<i32>) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            email: None,
            role: "ADMIN".to_string(),
            access_level,
            job_title: None,
            department: None,
            reporting_to: None,
        }
    }

    #[tokio::test]
    async fn test_create_cannot_outrank_creator() {
        let (service, users) = setup().await;
        let root = as_user(admin(1, "root"));

        let err = service
            .create(&root, new_admin("boss", Some(9)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        // ADMIN defaults to level 5, same as the creator.
        let err = service
            .create(&root, new_admin("peer", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.message.contains("(Your level: 5)"));

        let created = service
            .create(&root, new_admin("junior", Some(4)))
            .await
            .unwrap();
        assert_eq!(created.access_level, Some(4));
        assert_eq!(users.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_create_requires_creator_level() {
        let (service, _) = setup().await;
        let unlevelled = User {
            access_level: None,
            ..admin(1, "root")
        };
        let err = service
            .create(&as_user(unlevelled), new_admin("x", Some(1)))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.message.starts_with("Your access level is not configured"));
    }

    #[tokio::test]
    async fn test_create_requires_admin() {
        let (service, _) = setup().await;
        let err = service
            .create(
                &as_user(user(2, "dave", None)),
                CreateUser {
                    username: "mallory".to_string(),
                    email: None,
                    role: "ADMIN".to_string(),
                    access_level: None,
                    job_title: None,
                    department: None,
                    reporting_to: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_self_edit_cannot_raise_level() {
        let (service, _) = setup().await;
        let dave = as_user(user(2, "dave", None));

        let ok = service
            .update(
                &dave,
                2,
                UpdateUser {
                    department: Some("QA".to_string()),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(ok.department.as_deref(), Some("QA"));

        let err = service
            .update(
                &dave,
                2,
                UpdateUser {
                    access_level: Some(9),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_delete_self_is_rejected() {
        let (service, users) = setup().await;
        let err = service
            .delete(&as_user(admin(1, "root")), 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        service.delete(&as_user(admin(1, "root")), 2).await.unwrap();
        assert_eq!(users.count().await.unwrap(), 1);
    }
}
