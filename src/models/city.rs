//! City dictionary model

use serde::{Deserialize, Serialize};

/// City row; also serialized as the `meta.hint.city` entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct City {
    pub id: i32,
    pub name: String,
}
