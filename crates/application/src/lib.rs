//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理输入校验、
//! 以及对外部适配器（密码哈希、仓储、事件发布）的抽象。

pub mod clock;
pub mod dto;
pub mod error;
pub mod password;
pub mod publisher;
pub mod repository;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use dto::UserDto;
pub use error::ApplicationError;
pub use password::{PasswordHasher, PasswordHasherError};
pub use publisher::{EventPublisher, PublishError, PublishOutcome};
pub use repository::UserRepository;
pub use services::{UserService, UserServiceDependencies};
