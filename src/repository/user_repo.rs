//! User repository (数据库访问层)

use super::{map_unique_violation, RepoError};
use crate::models::user::{NewUser, User, UserChanges};
use sqlx::PgConnection;

const USER_COLUMNS: &str = r#"id, first_name, last_name, other_name, email, phone, birthday,
    city, additional_info, is_admin, is_active, hashed_password"#;

pub struct UserRepository<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> UserRepository<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// 创建用户，is_active 恒为 true
    pub async fn create(&mut self, user: &NewUser) -> Result<User, RepoError> {
        let sql = format!(
            r#"
            INSERT INTO "user" (first_name, last_name, other_name, email, phone, birthday,
                                city, additional_info, is_admin, is_active, hashed_password)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, $10)
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.other_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.birthday)
            .bind(user.city)
            .bind(&user.additional_info)
            .bind(user.is_admin)
            .bind(&user.hashed_password)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(map_unique_violation)
    }

    /// 根据 ID 查找用户
    pub async fn get_by_id(
        &mut self,
        id: i32,
        include_inactive: bool,
    ) -> Result<Option<User>, RepoError> {
        let sql = format!(
            r#"SELECT {USER_COLUMNS} FROM "user" WHERE id = $1 AND ($2 OR is_active)"#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(include_inactive)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(user)
    }

    /// 根据邮箱查找用户
    pub async fn get_by_email(
        &mut self,
        email: &str,
        include_inactive: bool,
    ) -> Result<Option<User>, RepoError> {
        let sql = format!(
            r#"SELECT {USER_COLUMNS} FROM "user" WHERE email = $1 AND ($2 OR is_active)"#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(include_inactive)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(user)
    }

    /// 根据手机号查找用户（包含已停用用户，唯一约束覆盖全部行）
    pub async fn get_by_phone(&mut self, phone: &str) -> Result<Option<User>, RepoError> {
        let sql = format!(r#"SELECT {USER_COLUMNS} FROM "user" WHERE phone = $1"#);

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(phone)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(user)
    }

    /// 分页列出活跃用户，page 从 1 开始，按 id 升序
    pub async fn list(&mut self, page: i64, size: i64) -> Result<Vec<User>, RepoError> {
        let offset = (page - 1).max(0).saturating_mul(size);
        let sql = format!(
            r#"SELECT {USER_COLUMNS} FROM "user" WHERE is_active ORDER BY id ASC LIMIT $1 OFFSET $2"#
        );

        let users = sqlx::query_as::<_, User>(&sql)
            .bind(size)
            .bind(offset)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(users)
    }

    /// 统计活跃用户数量
    pub async fn count_active(&mut self) -> Result<i64, RepoError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "user" WHERE is_active"#)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count)
    }

    /// 部分更新活跃用户；目标不存在或已停用时返回 None
    pub async fn update(
        &mut self,
        id: i32,
        changes: &UserChanges,
    ) -> Result<Option<User>, RepoError> {
        let sql = format!(
            r#"
            UPDATE "user"
            SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                other_name = COALESCE($4, other_name),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                birthday = COALESCE($7, birthday),
                city = COALESCE($8, city),
                additional_info = COALESCE($9, additional_info),
                is_admin = COALESCE($10, is_admin),
                hashed_password = COALESCE($11, hashed_password)
            WHERE id = $1 AND is_active
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.other_name)
            .bind(&changes.email)
            .bind(&changes.phone)
            .bind(changes.birthday)
            .bind(changes.city)
            .bind(&changes.additional_info)
            .bind(changes.is_admin)
            .bind(&changes.hashed_password)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(map_unique_violation)
    }

    /// 软删除：仅当恰好一行从活跃变为停用时返回 true
    pub async fn soft_delete(&mut self, id: i32) -> Result<bool, RepoError> {
        let result = sqlx::query(r#"UPDATE "user" SET is_active = FALSE WHERE id = $1 AND is_active"#)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
