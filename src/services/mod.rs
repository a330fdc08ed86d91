//! Business logic services layer

pub mod auth_service;
pub mod city_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use city_service::CityService;
pub use user_service::UserService;
