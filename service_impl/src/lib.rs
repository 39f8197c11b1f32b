use std::sync::Arc;

use async_trait::async_trait;
use service::permission::Authentication;
use service::ServiceError;

pub mod appointment;
pub mod availability;
pub mod catalog;
pub mod clock;
pub mod macros;
pub mod scheduling;
pub mod trainer;
pub mod uuid_service;

#[cfg(test)]
mod test;

pub struct PermissionServiceImpl<PermissionDao, UserService>
where
    PermissionDao: dao::PermissionDao + Send + Sync,
    UserService: service::user_service::UserService + Send + Sync,
{
    pub permission_dao: Arc<PermissionDao>,
    pub user_service: Arc<UserService>,
}
impl<PermissionDao, UserService> PermissionServiceImpl<PermissionDao, UserService>
where
    PermissionDao: dao::PermissionDao + Send + Sync,
    UserService: service::user_service::UserService + Send + Sync,
{
    pub fn new(permission_dao: Arc<PermissionDao>, user_service: Arc<UserService>) -> Self {
        Self {
            permission_dao,
            user_service,
        }
    }
}

#[async_trait]
impl<PermissionDao, UserService> service::PermissionService
    for PermissionServiceImpl<PermissionDao, UserService>
where
    PermissionDao: dao::PermissionDao + Send + Sync,
    UserService: service::user_service::UserService + Send + Sync,
{
    type Context = UserService::Context;

    async fn check_permission(
        &self,
        privilege: &str,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(context) => {
                let current_user = self.user_service.current_user(context).await?;
                if self
                    .permission_dao
                    .has_privilege(current_user.as_ref(), privilege)
                    .await?
                {
                    Ok(())
                } else {
                    Err(ServiceError::Forbidden)
                }
            }
        }
    }

    async fn current_user_id(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Arc<str>>, ServiceError> {
        match context {
            Authentication::Full => Ok(None),
            Authentication::Context(context) => {
                Ok(Some(self.user_service.current_user(context).await?))
            }
        }
    }
}

/// Always authenticates as DEVUSER. Stands in for a login service during
/// development; a real identity provider is wired in at the boundary.
pub struct UserServiceDev;

#[async_trait]
impl service::user_service::UserService for UserServiceDev {
    type Context = ();

    async fn current_user(&self, _context: Self::Context) -> Result<Arc<str>, ServiceError> {
        Ok("DEVUSER".into())
    }
}

#[cfg(test)]
mod permission_tests {
    use super::*;
    use mockall::predicate::eq;
    use service::PermissionService;

    #[tokio::test]
    async fn test_check_permission() {
        let mut permission_dao = dao::MockPermissionDao::new();
        permission_dao
            .expect_has_privilege()
            .with(eq("DEVUSER"), eq("admin"))
            .returning(|_, _| Ok(true));

        let mut user_service = service::user_service::MockUserService::new();
        user_service
            .expect_current_user()
            .returning(|_| Ok("DEVUSER".into()));

        let permission_service =
            PermissionServiceImpl::new(Arc::new(permission_dao), Arc::new(user_service));
        let result = permission_service
            .check_permission("admin", ().into())
            .await;
        result.expect("Expected successful authorization");
    }

    #[tokio::test]
    async fn test_check_permission_denied() {
        let mut permission_dao = dao::MockPermissionDao::new();
        permission_dao
            .expect_has_privilege()
            .with(eq("DEVUSER"), eq("admin"))
            .returning(|_, _| Ok(false));

        let mut user_service = service::user_service::MockUserService::new();
        user_service
            .expect_current_user()
            .returning(|_| Ok("DEVUSER".into()));

        let permission_service =
            PermissionServiceImpl::new(Arc::new(permission_dao), Arc::new(user_service));
        let result = permission_service
            .check_permission("admin", ().into())
            .await;
        if let Err(ServiceError::Forbidden) = result {
            // All good
        } else {
            panic!("Expected forbidden error");
        }
    }

    #[tokio::test]
    async fn test_full_authentication_bypasses_lookup() {
        let permission_dao = dao::MockPermissionDao::new();
        let user_service = service::user_service::MockUserService::new();

        let permission_service =
            PermissionServiceImpl::new(Arc::new(permission_dao), Arc::new(user_service));
        permission_service
            .check_permission("admin", Authentication::Full)
            .await
            .expect("Expected full authentication to pass");
    }

    #[tokio::test]
    async fn test_user_service_dev() {
        use service::user_service::UserService;
        let user_service = UserServiceDev;
        assert_eq!(
            "DEVUSER",
            user_service.current_user(()).await.unwrap().as_ref()
        );
    }
}
