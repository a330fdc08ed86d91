//! Database repository layer
//!
//! 仓库只借用调用方提供的连接（通常是事务），从不提交。

pub mod city_repo;
pub mod user_repo;

pub use city_repo::*;
pub use user_repo::*;

use crate::error::UniqueField;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Unique constraint violated on {field:?}")]
    UniquenessViolation { field: UniqueField },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// 将唯一约束冲突映射为具体字段，其余错误原样返回
pub(crate) fn map_unique_violation(e: sqlx::Error) -> RepoError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(field) = db_err.constraint().and_then(unique_field_for_constraint) {
                return RepoError::UniquenessViolation { field };
            }
        }
    }
    RepoError::Database(e)
}

fn unique_field_for_constraint(constraint: &str) -> Option<UniqueField> {
    match constraint {
        "user_email_key" => Some(UniqueField::Email),
        "user_phone_key" => Some(UniqueField::Phone),
        "city_name_key" => Some(UniqueField::CityName),
        _ => None,
    }
}
