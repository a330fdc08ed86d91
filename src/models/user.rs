//! User domain models

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::city::City;
use super::pagination::PaginationMeta;

/// +7XXXXXXXXXX 或 8XXXXXXXXXX
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+7|8)[0-9]{10}$").expect("phone regex is valid"));

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub other_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<i32>,
    pub additional_info: Option<String>,
    pub is_admin: bool,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub hashed_password: String,
}

/// Fields for a new row; `is_active` is always true on insert
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub other_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<i32>,
    pub additional_info: Option<String>,
    pub is_admin: bool,
    pub hashed_password: String,
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub other_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<i32>,
    pub additional_info: Option<String>,
    pub is_admin: Option<bool>,
    pub hashed_password: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.other_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.birthday.is_none()
            && self.city.is_none()
            && self.additional_info.is_none()
            && self.is_admin.is_none()
            && self.hashed_password.is_none()
    }
}

fn trim_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

// 空白字符串视为未提供
fn trim_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

/// Admin create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[serde(deserialize_with = "trim_string")]
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(length(min = 1, max = 50))]
    pub other_name: Option<String>,
    #[serde(deserialize_with = "trim_string")]
    #[validate(email)]
    pub email: String,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(regex(path = *PHONE_REGEX, message = "Неверный формат номера телефона"))]
    pub phone: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub city: Option<i32>,
    #[serde(default)]
    pub additional_info: Option<String>,
    pub is_admin: bool,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Admin partial update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    /// 可选；若提供必须与路径中的 id 一致
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(length(min = 1, max = 50))]
    pub other_name: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(regex(path = *PHONE_REGEX, message = "Неверный формат номера телефона"))]
    pub phone: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub city: Option<i32>,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: Option<String>,
}

/// Self-service partial update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCurrentUserRequest {
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(length(min = 1, max = 50))]
    pub other_name: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trim_opt_string")]
    #[validate(regex(path = *PHONE_REGEX, message = "Неверный формат номера телефона"))]
    pub phone: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

impl From<UpdateCurrentUserRequest> for UserChanges {
    fn from(req: UpdateCurrentUserRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            other_name: req.other_name,
            email: req.email,
            phone: req.phone,
            birthday: req.birthday,
            ..Default::default()
        }
    }
}

/// Minimal list projection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserListItem {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserListItem {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}

/// Current user profile (login response and GET /users/current)
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub first_name: String,
    pub last_name: String,
    pub other_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub is_admin: bool,
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self {
            first_name: user.first_name,
            last_name: user.last_name,
            other_name: user.other_name,
            email: user.email,
            phone: user.phone,
            birthday: user.birthday,
            is_admin: user.is_admin,
        }
    }
}

/// PATCH /users/current response
#[derive(Debug, Serialize)]
pub struct UpdatedUserResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub other_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl From<User> for UpdatedUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            other_name: user.other_name,
            email: user.email,
            phone: user.phone,
            birthday: user.birthday,
        }
    }
}

/// Full projection for the admin surface
#[derive(Debug, Serialize)]
pub struct UserDetailResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub other_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub city: Option<i32>,
    pub additional_info: Option<String>,
    pub is_admin: bool,
}

impl From<User> for UserDetailResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            other_name: user.other_name,
            email: user.email,
            phone: user.phone,
            birthday: user.birthday,
            city: user.city,
            additional_info: user.additional_info,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersListMeta {
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub data: Vec<UserListItem>,
    pub meta: UsersListMeta,
}

#[derive(Debug, Serialize)]
pub struct UsersListHint {
    pub city: Vec<City>,
}

#[derive(Debug, Serialize)]
pub struct PrivateUsersListMeta {
    pub pagination: PaginationMeta,
    pub hint: UsersListHint,
}

#[derive(Debug, Serialize)]
pub struct PrivateUsersListResponse {
    pub data: Vec<UserListItem>,
    pub meta: PrivateUsersListMeta,
}
