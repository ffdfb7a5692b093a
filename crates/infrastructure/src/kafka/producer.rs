//! 按请求作用域的 Kafka 生产者
//!
//! 每个请求建立一个独立的生产者连接：提交消息后同步排空确认，
//! 后台任务消费投递报告，连接随请求作用域释放。

use std::time::Duration;

use application::PublishOutcome;
use config::KafkaConfig;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{DeliveryFuture, FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::kafka::{KafkaError, KafkaResult};

struct InFlightReport {
    topic: &'static str,
    delivery: DeliveryFuture,
}

/// 生命周期与单个请求绑定的生产者。
///
/// 释放（drop）时投递报告通道关闭，排空任务随之退出。
pub struct RequestScopedProducer {
    producer: FutureProducer,
    reports: mpsc::UnboundedSender<InFlightReport>,
    flush_max_attempts: u32,
}

impl RequestScopedProducer {
    /// 建立新的生产者连接并启动投递报告排空任务。
    ///
    /// 连接失败只影响当前请求：调用方记录日志后照常返回存储结果。
    pub fn connect(config: &KafkaConfig) -> KafkaResult<Self> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &config.bootstrap_servers)
            .set("message.timeout.ms", config.send_timeout_ms.to_string());

        let producer: FutureProducer =
            client_config
                .create()
                .map_err(|e| KafkaError::ConnectionError {
                    message: format!("创建 Kafka 生产者失败: {}", e),
                })?;

        let (reports, mut pending) = mpsc::unbounded_channel::<InFlightReport>();

        // 投递报告排空任务：逐条消费确认结果并记录，通道关闭即退出
        tokio::spawn(async move {
            while let Some(report) = pending.recv().await {
                match report.delivery.await {
                    Ok(Ok(_)) => {
                        debug!(topic = report.topic, "消息投递成功");
                    }
                    Ok(Err((err, _message))) => {
                        error!(topic = report.topic, error = %err, "消息投递失败");
                    }
                    Err(_) => {
                        error!(topic = report.topic, "生产者在投递确认前被关闭");
                    }
                }
            }
        });

        Ok(Self {
            producer,
            reports,
            flush_max_attempts: config.flush_max_attempts,
        })
    }

    /// 非阻塞提交一条消息到目标主题，分区自动分配。
    pub fn produce(&self, topic: &'static str, payload: &str) -> KafkaResult<()> {
        let record: FutureRecord<'_, (), str> = FutureRecord::to(topic).payload(payload);

        let delivery =
            self.producer
                .send_result(record)
                .map_err(|(err, _record)| KafkaError::ProducerError {
                    message: format!("提交消息失败: {}", err),
                })?;

        // 排空任务退出只发生在生产者释放之后，这里的发送失败可以忽略
        let _ = self.reports.send(InFlightReport { topic, delivery });
        Ok(())
    }

    /// 反复执行一秒预算的 flush，直到生产者不再持有未确认消息。
    ///
    /// 轮数受 `flush_max_attempts` 限制；预算耗尽时返回
    /// [`PublishOutcome::Uncertain`]，由调用方记录，不再继续等待。
    /// 没有未确认消息时立即返回，不消耗任何轮数。
    pub fn flush_until_empty(&self) -> PublishOutcome {
        let mut attempts = 0u32;

        while self.producer.in_flight_count() > 0 {
            if attempts >= self.flush_max_attempts {
                warn!(
                    in_flight = self.producer.in_flight_count(),
                    attempts, "flush 轮数达到上限，放弃等待投递确认"
                );
                return PublishOutcome::Uncertain;
            }
            attempts += 1;

            if self
                .producer
                .flush(Timeout::After(Duration::from_secs(1)))
                .is_err()
            {
                debug!(attempt = attempts, "仍在等待未确认消息");
            }
        }

        PublishOutcome::Delivered
    }
}
