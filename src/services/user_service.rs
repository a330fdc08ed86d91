//! 用户应用服务：自助与管理员两套用户操作

use crate::{
    auth::password::PasswordHasher,
    error::{AppError, Result, UniqueField},
    models::{
        pagination::PaginationParams,
        user::{
            AdminUpdateUserRequest, CreateUserRequest, NewUser, PrivateUsersListMeta,
            PrivateUsersListResponse, UpdateCurrentUserRequest, UpdatedUserResponse, User,
            UserChanges, UserDetailResponse, UserListItem, UsersListHint, UsersListMeta,
            UsersListResponse,
        },
    },
    repository::{CityRepository, UserRepository},
};
use sqlx::PgPool;

pub struct UserService {
    db: PgPool,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(db: PgPool, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    /// 活跃用户分页列表（精简字段）
    pub async fn list_users(&self, params: PaginationParams) -> Result<UsersListResponse> {
        let mut tx = self.db.begin().await?;
        let mut users = UserRepository::new(&mut tx);
        let total = users.count_active().await?;
        let page = users.list(params.page, params.size).await?;
        tx.commit().await?;

        Ok(UsersListResponse {
            data: page.into_iter().map(UserListItem::from).collect(),
            meta: UsersListMeta {
                pagination: params.meta(total),
            },
        })
    }

    /// 更新当前用户自己的资料
    pub async fn update_current(
        &self,
        current: &User,
        req: UpdateCurrentUserRequest,
    ) -> Result<UpdatedUserResponse> {
        let changes = UserChanges::from(req);
        if changes.is_empty() {
            return Ok(current.clone().into());
        }

        let mut tx = self.db.begin().await?;
        let user = UserRepository::new(&mut tx)
            .update(current.id, &changes)
            .await?
            .ok_or(AppError::NotFound)?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "User updated own profile");

        Ok(user.into())
    }

    /// 管理员用户列表，附带城市字典
    pub async fn admin_list(&self, params: PaginationParams) -> Result<PrivateUsersListResponse> {
        let mut tx = self.db.begin().await?;

        let mut users = UserRepository::new(&mut tx);
        let total = users.count_active().await?;
        let page = users.list(params.page, params.size).await?;

        let cities = CityRepository::new(&mut tx).list().await?;
        tx.commit().await?;

        Ok(PrivateUsersListResponse {
            data: page.into_iter().map(UserListItem::from).collect(),
            meta: PrivateUsersListMeta {
                pagination: params.meta(total),
                hint: UsersListHint { city: cities },
            },
        })
    }

    /// 管理员创建用户；邮箱、手机号重复时返回 DuplicateField
    pub async fn admin_create(&self, req: CreateUserRequest) -> Result<UserDetailResponse> {
        let hashed_password = self.hasher.hash_blocking(req.password).await?;

        let new_user = NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            other_name: req.other_name,
            email: req.email,
            phone: req.phone,
            birthday: req.birthday,
            city: req.city,
            additional_info: req.additional_info,
            is_admin: req.is_admin,
            hashed_password,
        };

        let mut tx = self.db.begin().await?;
        let mut users = UserRepository::new(&mut tx);

        if users.get_by_email(&new_user.email, true).await?.is_some() {
            return Err(AppError::DuplicateField(UniqueField::Email));
        }
        if let Some(phone) = &new_user.phone {
            if users.get_by_phone(phone).await?.is_some() {
                return Err(AppError::DuplicateField(UniqueField::Phone));
            }
        }

        let user = users.create(&new_user).await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, is_admin = user.is_admin, "User created");

        Ok(user.into())
    }

    /// 管理员按 id 查询用户
    pub async fn admin_get(&self, id: i32, include_inactive: bool) -> Result<UserDetailResponse> {
        let mut tx = self.db.begin().await?;
        let user = UserRepository::new(&mut tx)
            .get_by_id(id, include_inactive)
            .await?
            .ok_or(AppError::NotFound)?;
        tx.commit().await?;

        Ok(user.into())
    }

    /// 管理员部分更新用户
    pub async fn admin_update(
        &self,
        id: i32,
        req: AdminUpdateUserRequest,
    ) -> Result<UserDetailResponse> {
        if req.id.is_some_and(|body_id| body_id != id) {
            return Err(AppError::validation("id: does not match the user id in the path"));
        }

        let hashed_password = match req.password {
            Some(password) => Some(self.hasher.hash_blocking(password).await?),
            None => None,
        };

        let changes = UserChanges {
            first_name: req.first_name,
            last_name: req.last_name,
            other_name: req.other_name,
            email: req.email,
            phone: req.phone,
            birthday: req.birthday,
            city: req.city,
            additional_info: req.additional_info,
            is_admin: req.is_admin,
            hashed_password,
        };

        let mut tx = self.db.begin().await?;
        let user = UserRepository::new(&mut tx)
            .update(id, &changes)
            .await?
            .ok_or(AppError::NotFound)?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, "User updated by admin");

        Ok(user.into())
    }

    /// 管理员软删除用户，返回是否有行受影响
    pub async fn admin_delete(&self, id: i32) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        let deleted = UserRepository::new(&mut tx).soft_delete(id).await?;
        tx.commit().await?;

        if deleted {
            tracing::info!(user_id = id, "User deactivated");
        }

        Ok(deleted)
    }

    /// 引导脚本使用：直接创建管理员
    pub async fn create_admin(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: String,
    ) -> Result<User> {
        let hashed_password = self.hasher.hash_blocking(password).await?;

        let mut tx = self.db.begin().await?;
        let user = UserRepository::new(&mut tx)
            .create(&NewUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                other_name: None,
                email: email.to_string(),
                phone: None,
                birthday: None,
                city: None,
                additional_info: None,
                is_admin: true,
                hashed_password,
            })
            .await?;
        tx.commit().await?;

        Ok(user)
    }
}
