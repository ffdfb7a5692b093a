//! 用户服务核心领域模型
//!
//! 包含用户实体、值对象、领域错误以及发布到消息队列的用户事件定义。

pub mod errors;
pub mod events;
pub mod user;
pub mod value_objects;

// 重新导出常用类型
pub use errors::*;
pub use events::*;
pub use user::*;
pub use value_objects::*;
