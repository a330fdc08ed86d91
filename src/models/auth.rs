//! Authentication-related models

use serde::Deserialize;
use validator::Validate;

/// Login request; `login` is the account email
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub login: String,
    #[validate(length(min = 1))]
    pub password: String,
}
