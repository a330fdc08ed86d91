//! 分页参数与分页元数据

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// `?page=&size=`，页码从 1 开始
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1))]
    pub size: i64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            total,
            page: self.page,
            size: self.size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub size: i64,
}
