mod user_service;

#[cfg(test)]
mod user_service_tests;

pub use user_service::{CreateUserRequest, UserService, UserServiceDependencies};
