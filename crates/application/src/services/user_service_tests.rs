//! 用户服务单元测试
//!
//! 使用内存仓储和记录型事件发布器，验证三个操作的
//! 存储、哈希与事件发布行为。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use domain::{
    DomainError, NewUser, PasswordHash, RepositoryError, User, UserEvent, UserEventKind, UserId,
    Username,
};

use crate::{
    clock::SystemClock,
    error::ApplicationError,
    password::{PasswordHasher, PasswordHasherError},
    publisher::{EventPublisher, PublishError, PublishOutcome},
    repository::UserRepository,
    services::{CreateUserRequest, UserService, UserServiceDependencies},
};

#[derive(Default)]
struct InMemoryUserRepository {
    data: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut guard = self.data.lock().unwrap();
        if guard
            .iter()
            .any(|u| u.username.as_str() == user.username.as_str())
        {
            return Err(RepositoryError::Conflict);
        }
        let stored = User {
            id: UserId::new(guard.len() as i64 + 1),
            username: user.username,
            email: user.email,
            password: user.password,
            created_at: Utc::now(),
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_username(&self, username: Username) -> Result<Option<User>, RepositoryError> {
        let guard = self.data.lock().unwrap();
        Ok(guard
            .iter()
            .find(|u| u.username.as_str() == username.as_str())
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let guard = self.data.lock().unwrap();
        Ok(guard.iter().find(|u| u.id == id).cloned())
    }
}

struct FakeHasher;

#[async_trait]
impl PasswordHasher for FakeHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        PasswordHash::new(format!("hashed:{plaintext}"))
            .map_err(|err| PasswordHasherError::hash_error(err.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hashed.as_str() == format!("hashed:{plaintext}"))
    }
}

/// 记录所有发布的事件；可配置为失败或预算耗尽
#[derive(Default)]
struct CapturingPublisher {
    events: Mutex<Vec<UserEvent>>,
    fail_connection: bool,
    report_uncertain: bool,
}

#[async_trait]
impl EventPublisher for CapturingPublisher {
    async fn publish(&self, event: UserEvent) -> Result<PublishOutcome, PublishError> {
        if self.fail_connection {
            return Err(PublishError::Connection("broker unreachable".into()));
        }
        self.events.lock().unwrap().push(event);
        if self.report_uncertain {
            Ok(PublishOutcome::Uncertain)
        } else {
            Ok(PublishOutcome::Delivered)
        }
    }
}

fn build_service(publisher: Arc<CapturingPublisher>) -> (UserService, Arc<InMemoryUserRepository>) {
    let repository = Arc::new(InMemoryUserRepository::default());
    let service = UserService::new(UserServiceDependencies {
        user_repository: repository.clone(),
        password_hasher: Arc::new(FakeHasher),
        event_publisher: publisher,
        clock: Arc::new(SystemClock),
    });
    (service, repository)
}

fn create_request() -> CreateUserRequest {
    CreateUserRequest {
        username: "alice".to_string(),
        email: "alice@x.com".to_string(),
        password: "secret123".to_string(),
    }
}

#[tokio::test]
async fn create_user_stores_hash_not_plaintext() {
    let publisher = Arc::new(CapturingPublisher::default());
    let (service, repository) = build_service(publisher);

    let dto = service.create_user(create_request()).await.unwrap();
    assert_eq!(dto.username, "alice");

    let stored = repository
        .find_by_username(Username::parse("alice").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.password.as_str().is_empty());
    assert_ne!(stored.password.as_str(), "secret123");
}

#[tokio::test]
async fn create_user_publishes_exactly_one_event_on_create_topic() {
    let publisher = Arc::new(CapturingPublisher::default());
    let (service, _) = build_service(publisher.clone());

    service.create_user(create_request()).await.unwrap();

    let events = publisher.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, UserEventKind::Created);
    assert_eq!(events[0].topic(), "create-user");
    assert_eq!(events[0].payload.username, "alice");
}

#[tokio::test]
async fn event_timestamp_not_earlier_than_store_completion() {
    let publisher = Arc::new(CapturingPublisher::default());
    let (service, repository) = build_service(publisher.clone());

    service.create_user(create_request()).await.unwrap();

    let stored = repository
        .find_by_username(Username::parse("alice").unwrap())
        .await
        .unwrap()
        .unwrap();
    let events = publisher.events.lock().unwrap();
    assert!(events[0].payload.requested_at >= stored.created_at);
}

#[tokio::test]
async fn create_user_rejects_empty_password_before_store() {
    let publisher = Arc::new(CapturingPublisher::default());
    let (service, _) = build_service(publisher.clone());

    let result = service
        .create_user(CreateUserRequest {
            password: String::new(),
            ..create_request()
        })
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InvalidArgument { .. }))
    ));
    assert!(publisher.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_username_is_a_conflict_without_event() {
    let publisher = Arc::new(CapturingPublisher::default());
    let (service, _) = build_service(publisher.clone());

    service.create_user(create_request()).await.unwrap();
    let result = service.create_user(create_request()).await;

    assert!(matches!(
        result,
        Err(ApplicationError::Repository(RepositoryError::Conflict))
    ));
    // 第二次失败的创建不再发布事件
    assert_eq!(publisher.events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn lookup_miss_returns_not_found_and_publishes_nothing() {
    let publisher = Arc::new(CapturingPublisher::default());
    let (service, _) = build_service(publisher.clone());

    let result = service.get_by_username("doesnotexist").await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UserNotFound))
    ));

    let result = service.get_by_id(9999).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::UserNotFound))
    ));

    assert!(publisher.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn lookup_hits_publish_on_their_own_topics() {
    let publisher = Arc::new(CapturingPublisher::default());
    let (service, _) = build_service(publisher.clone());

    let created = service.create_user(create_request()).await.unwrap();

    let by_name = service.get_by_username("alice").await.unwrap();
    assert_eq!(by_name.id, created.id);

    let by_id = service.get_by_id(created.id).await.unwrap();
    assert_eq!(by_id.username, "alice");

    let events = publisher.events.lock().unwrap();
    let topics: Vec<_> = events.iter().map(|e| e.topic()).collect();
    assert_eq!(topics, vec!["create-user", "get-user-username", "get-user-id"]);
}

#[tokio::test]
async fn publish_failure_does_not_fail_the_operation() {
    let publisher = Arc::new(CapturingPublisher {
        fail_connection: true,
        ..Default::default()
    });
    let (service, _) = build_service(publisher);

    let dto = service.create_user(create_request()).await.unwrap();
    assert_eq!(dto.username, "alice");
}

#[tokio::test]
async fn uncertain_delivery_does_not_fail_the_operation() {
    let publisher = Arc::new(CapturingPublisher {
        report_uncertain: true,
        ..Default::default()
    });
    let (service, _) = build_service(publisher.clone());

    service.create_user(create_request()).await.unwrap();
    assert_eq!(publisher.events.lock().unwrap().len(), 1);
}
