//! 数据模型模块

pub mod auth;
pub mod city;
pub mod pagination;
pub mod user;
