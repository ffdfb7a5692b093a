use crate::value_objects::{PasswordHash, Timestamp, UserEmail, UserId, Username};

/// 持久化的用户实体。
///
/// `id` 和 `created_at` 由存储层分配；`password` 在实体构造之前就已经是
/// 哈希值，任何位置都不允许出现明文。
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: UserEmail,
    #[serde(skip_serializing)] // 密码哈希不暴露给客户端
    pub password: PasswordHash,
    pub created_at: Timestamp,
}

/// 尚未入库的新用户，id 和创建时间等待存储层分配。
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: UserEmail,
    pub password: PasswordHash,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn user_serialization_excludes_password() {
        let user = User {
            id: UserId::new(7),
            username: Username::parse("alice").unwrap(),
            email: UserEmail::parse("alice@x.com").unwrap(),
            password: PasswordHash::new("$2b$12$abcdefg").unwrap(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["id"], 7);
    }
}
