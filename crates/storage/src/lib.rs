use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Role, User, UserId};

mod amenities;
mod bookings;
mod directory;
mod messages;
mod rooms;
mod seed;

pub use bookings::BookingWrite;
pub use seed::DEMO_ADMIN_EMAIL;

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: Role,
        password: &str,
    ) -> Result<User> {
        let id = UserId::generate();
        let password_hash = hash_password(password)?;
        let email = email.trim().to_lowercase();
        sqlx::query(
            "INSERT INTO users (id, email, name, role, password_hash)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(&email)
        .bind(name.trim())
        .bind(role.as_str())
        .bind(&password_hash)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert user '{email}'"))?;

        Ok(User {
            id,
            email,
            name: name.trim().to_string(),
            role,
        })
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email.trim().to_lowercase())
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn load_user(&self, user_id: &UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, name, role FROM users WHERE id = ?")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| user_from_row(&r)))
    }

    pub async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Returns the user only when `password` matches the stored argon2 hash.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let email = email.trim().to_lowercase();
        let row = sqlx::query(
            "SELECT id, email, name, role, password_hash
             FROM users WHERE email = ?",
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let stored: String = row.get(4);
        let parsed = PasswordHash::new(&stored)
            .map_err(|err| anyhow!("invalid stored password hash for '{email}': {err}"))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(None);
        }
        Ok(Some(user_from_row(&row)))
    }

    async fn delete_by_id(&self, table: &'static str, id: &str) -> Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete '{id}' from {table}"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn user_from_row(r: &SqliteRow) -> User {
    User {
        id: UserId(r.get::<String, _>(0)),
        email: r.get::<String, _>(1),
        name: r.get::<String, _>(2),
        role: Role::parse(&r.get::<String, _>(3)).unwrap_or(Role::Guest),
    }
}

/// PHC-format argon2 hash with a fresh random salt.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("failed to hash password: {err}"))?
        .to_string();
    Ok(hashed)
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
