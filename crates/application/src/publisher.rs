use async_trait::async_trait;
use domain::UserEvent;
use thiserror::Error;

/// 事件发布错误。
///
/// 发布失败只影响可观测性，不影响调用方看到的 HTTP 结果。
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("broker connection error: {0}")]
    Connection(String),
    #[error("produce error: {0}")]
    Produce(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// flush 完成后的投递状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// 所有已提交消息在 flush 预算内得到确认
    Delivered,
    /// flush 预算耗尽，仍有消息未确认，投递结果未知
    Uncertain,
}

/// 用户事件发布端口。
///
/// 一次调用完成一条事件的完整发布流程：建立连接、提交消息、
/// 等待确认、释放连接。实现方保证在返回之前已经排空确认等待。
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: UserEvent) -> Result<PublishOutcome, PublishError>;
}
