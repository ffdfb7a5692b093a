//! 基础设施层实现。
//!
//! 提供数据库仓储、密码哈希、Kafka 事件发布等适配器，实现应用层定义的接口。

pub mod kafka;
pub mod password;
pub mod repository;

pub use kafka::{KafkaError, KafkaEventPublisher, RequestScopedProducer};
pub use password::ShaBcryptHasher;
pub use repository::{create_pg_pool, PgUserRepository};
