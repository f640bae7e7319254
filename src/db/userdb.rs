// db/userdb.rs
use async_trait::async_trait;
use uuid::Uuid;

use super::db::DBClient;

use crate::{
    dtos::userdtos::{UpdateProfileDto, UpdateUserDto},
    models::usermodel::{User, UserRole},
};

#[async_trait]
pub trait UserExt {
    /// Look a user up by id or by (case-insensitive) email.
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    async fn get_users(
        &self,
        page: u32,
        limit: usize,
        role: Option<UserRole>,
        department: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error>;

    async fn get_user_count(
        &self,
        role: Option<UserRole>,
        department: Option<&str>,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error>;

    /// Active IT staff, for assignment pickers.
    async fn get_it_users(&self) -> Result<Vec<User>, sqlx::Error>;

    async fn save_user<T: Into<String> + Send>(
        &self,
        email: T,
        password: T,
        first_name: T,
        last_name: T,
        role: UserRole,
        department: Option<String>,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, sqlx::Error>;

    async fn update_user(
        &self,
        user_id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User, sqlx::Error>;

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error>;

    async fn set_user_active(
        &self,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<User, sqlx::Error>;

    async fn delete_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password, first_name, last_name, role,
                       department, phone, is_active, created_at, updated_at
                FROM users
                WHERE id = $1
                "#,
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(
                r#"
                SELECT id, email, password, first_name, last_name, role,
                       department, phone, is_active, created_at, updated_at
                FROM users
                WHERE email = LOWER($1)
                "#,
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn get_users(
        &self,
        page: u32,
        limit: usize,
        role: Option<UserRole>,
        department: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error> {
        let offset = (page - 1) as i64 * limit as i64;

        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, first_name, last_name, role,
                   department, phone, is_active, created_at, updated_at
            FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::varchar IS NULL OR department = $2)
              AND ($3::varchar IS NULL
                   OR first_name ILIKE '%' || $3 || '%'
                   OR last_name ILIKE '%' || $3 || '%'
                   OR email ILIKE '%' || $3 || '%')
            ORDER BY first_name ASC, last_name ASC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(role)
        .bind(department)
        .bind(search)
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_user_count(
        &self,
        role: Option<UserRole>,
        department: Option<&str>,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
              AND ($2::varchar IS NULL OR department = $2)
              AND ($3::varchar IS NULL
                   OR first_name ILIKE '%' || $3 || '%'
                   OR last_name ILIKE '%' || $3 || '%'
                   OR email ILIKE '%' || $3 || '%')
            "#,
        )
        .bind(role)
        .bind(department)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    async fn get_it_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, first_name, last_name, role,
                   department, phone, is_active, created_at, updated_at
            FROM users
            WHERE role IN ('it_user'::user_role, 'it_admin'::user_role)
              AND is_active = TRUE
            ORDER BY first_name ASC, last_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn save_user<T: Into<String> + Send>(
        &self,
        email: T,
        password: T,
        first_name: T,
        last_name: T,
        role: UserRole,
        department: Option<String>,
        phone: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password, first_name, last_name, role, department, phone)
            VALUES (LOWER($1), $2, $3, $4, $5, $6, $7)
            RETURNING id, email, password, first_name, last_name, role,
                      department, phone, is_active, created_at, updated_at
            "#,
        )
        .bind(email.into())
        .bind(password.into())
        .bind(first_name.into())
        .bind(last_name.into())
        .bind(role)
        .bind(department)
        .bind(phone)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                department = COALESCE($4, department),
                phone = COALESCE($5, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password, first_name, last_name, role,
                      department, phone, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(dto.first_name)
        .bind(dto.last_name)
        .bind(dto.department)
        .bind(dto.phone)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user(
        &self,
        user_id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                role = COALESCE($4, role),
                department = COALESCE($5, department),
                phone = COALESCE($6, phone),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password, first_name, last_name, role,
                      department, phone, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(dto.first_name)
        .bind(dto.last_name)
        .bind(dto.role)
        .bind(dto.department)
        .bind(dto.phone)
        .bind(dto.is_active)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_user_password(
        &self,
        user_id: Uuid,
        password: String,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password, first_name, last_name, role,
                      department, phone, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(password)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_user_active(
        &self,
        user_id: Uuid,
        is_active: bool,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_active = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, password, first_name, last_name, role,
                      department, phone, is_active, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(is_active)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
