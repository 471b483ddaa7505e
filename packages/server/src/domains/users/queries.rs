//! Database access for users.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::common::UserId;

use super::models::User;

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub auto_response_enabled: bool,
    pub auto_response_delay: i32,
}

pub async fn insert_user(pool: &PgPool, new_user: NewUser<'_>) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (
            id, username, email, password_hash, first_name, last_name,
            auto_response_enabled, auto_response_delay
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(UserId::new())
    .bind(new_user.username)
    .bind(new_user.email)
    .bind(new_user.password_hash)
    .bind(new_user.first_name)
    .bind(new_user.last_name)
    .bind(new_user.auto_response_enabled)
    .bind(new_user.auto_response_delay)
    .fetch_one(pool)
    .await
    .context("failed to insert user")
}

pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by id")
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .context("failed to fetch user by username")
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
        .context("failed to check username")
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
        .context("failed to check email")
}
