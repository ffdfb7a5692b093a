//! 用户事件发布器
//!
//! 把应用层的发布端口落到 Kafka：每次发布建立独立的生产者连接，
//! 提交一条消息，排空确认后释放连接。

use application::{EventPublisher, PublishError, PublishOutcome};
use async_trait::async_trait;
use config::KafkaConfig;
use domain::UserEvent;

use crate::kafka::RequestScopedProducer;

pub struct KafkaEventPublisher {
    config: KafkaConfig,
}

impl KafkaEventPublisher {
    pub fn new(config: KafkaConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, event: UserEvent) -> Result<PublishOutcome, PublishError> {
        let payload = serde_json::to_string(&event.payload)
            .map_err(|err| PublishError::Serialization(err.to_string()))?;

        let producer = RequestScopedProducer::connect(&self.config)
            .map_err(|err| PublishError::Connection(err.to_string()))?;

        producer
            .produce(event.topic(), &payload)
            .map_err(|err| PublishError::Produce(err.to_string()))?;

        // 返回之前排空确认；连接随作用域释放
        Ok(producer.flush_until_empty())
    }
}
