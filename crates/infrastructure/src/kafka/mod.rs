//! Kafka 消息队列模块
//!
//! 提供按请求作用域的生产者和用户事件发布器实现。

pub mod error;
pub mod producer;
pub mod publisher;

// 重新导出
pub use error::*;
pub use producer::*;
pub use publisher::*;
