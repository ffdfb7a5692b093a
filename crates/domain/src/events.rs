//! 用户事件定义
//!
//! 每个成功的用户操作都会向 Kafka 发布一条事件，主题按事件类型区分。

use serde::{Deserialize, Serialize};

use crate::user::User;
use crate::value_objects::Timestamp;

/// 事件类型，每种类型对应一个固定主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserEventKind {
    /// 用户创建
    Created,
    /// 按用户名查询
    FetchedByName,
    /// 按 ID 查询
    FetchedById,
}

impl UserEventKind {
    /// 事件发布的目标主题
    pub fn topic(&self) -> &'static str {
        match self {
            UserEventKind::Created => "create-user",
            UserEventKind::FetchedByName => "get-user-username",
            UserEventKind::FetchedById => "get-user-id",
        }
    }
}

/// 发布到消息队列的事件载荷。
///
/// 不包含密码哈希，凭证材料不离开存储层。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEventPayload {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub requested_at: Timestamp,
}

/// 一次操作产生的用户事件，构造后立即发布、不持久化。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEvent {
    pub kind: UserEventKind,
    pub payload: UserEventPayload,
}

impl UserEvent {
    pub fn new(kind: UserEventKind, user: &User, requested_at: Timestamp) -> Self {
        Self {
            kind,
            payload: UserEventPayload {
                user_id: user.id.into(),
                username: user.username.as_str().to_owned(),
                email: user.email.as_str().to_owned(),
                requested_at,
            },
        }
    }

    pub fn topic(&self) -> &'static str {
        self.kind.topic()
    }
}
