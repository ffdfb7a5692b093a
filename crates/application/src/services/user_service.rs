use std::sync::Arc;

use domain::{DomainError, NewUser, UserEvent, UserEventKind, UserId, User, UserEmail, Username};

use crate::{
    clock::Clock,
    dto::UserDto,
    error::ApplicationError,
    password::PasswordHasher,
    publisher::{EventPublisher, PublishOutcome},
    repository::UserRepository,
};

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub clock: Arc<dyn Clock>,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<UserDto, ApplicationError> {
        let username = Username::parse(request.username)?;
        let email = UserEmail::parse(request.email)?;
        if request.password.is_empty() {
            return Err(ApplicationError::Domain(DomainError::invalid_argument(
                "password",
                "cannot be empty",
            )));
        }

        let password = self.deps.password_hasher.hash(&request.password).await?;

        let stored = self
            .deps
            .user_repository
            .create(NewUser {
                username,
                email,
                password,
            })
            .await?;

        self.publish(UserEventKind::Created, &stored).await;
        Ok(UserDto::from(&stored))
    }

    pub async fn get_by_username(
        &self,
        username: impl Into<String>,
    ) -> Result<UserDto, ApplicationError> {
        let username = Username::parse(username)?;
        let user = self
            .deps
            .user_repository
            .find_by_username(username)
            .await?
            .ok_or(ApplicationError::Domain(DomainError::UserNotFound))?;

        self.publish(UserEventKind::FetchedByName, &user).await;
        Ok(UserDto::from(&user))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<UserDto, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_id(UserId::new(id))
            .await?
            .ok_or(ApplicationError::Domain(DomainError::UserNotFound))?;

        self.publish(UserEventKind::FetchedById, &user).await;
        Ok(UserDto::from(&user))
    }

    /// 发布操作事件并等待确认排空后再返回。
    ///
    /// 发布失败只记录日志，存储结果照常返回给调用方。
    async fn publish(&self, kind: UserEventKind, user: &User) {
        let event = UserEvent::new(kind, user, self.deps.clock.now());
        let topic = event.topic();

        match self.deps.event_publisher.publish(event).await {
            Ok(PublishOutcome::Delivered) => {}
            Ok(PublishOutcome::Uncertain) => {
                tracing::warn!(topic, "事件投递未在 flush 预算内得到确认");
            }
            Err(err) => {
                tracing::warn!(topic, error = %err, "用户事件发布失败");
            }
        }
    }
}
