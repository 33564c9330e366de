use crate::record::{PostRecord, UserRecord};
use postboard_common::model::post::{Post, PostMarker, PostText};
use postboard_common::model::user::{NewUser, User, UserMarker};
use postboard_common::model::{Id, ModelValidationError};
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqlitePool, query, query_as};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error("Applying database migrations failed: {0}")]
    Migrate(#[from] MigrateError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug)]
pub struct DbClient {
    pool: SqlitePool,
}

impl DbClient {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database.
    ///
    /// The pool holds exactly one connection that is never recycled, since every
    /// SQLite connection to `:memory:` sees its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!().run(&self.pool).await?;
        debug!("Database migrations applied");

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let records = query_as::<_, UserRecord>(
            "
            SELECT
                users.id,
                users.name
            FROM
                users
            ORDER BY
                users.id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        let users = records
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub async fn fetch_user(&self, user_id: Id<UserMarker>) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(
            "
            SELECT
                users.id,
                users.name
            FROM
                users
            WHERE
                users.id = ?1
            ",
        )
        .bind(user_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let user = record.map(User::try_from).transpose()?;
        Ok(user)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        let record = query_as::<_, UserRecord>(
            "
            INSERT INTO users (name)
            VALUES (?1)
            RETURNING id, name
            ",
        )
        .bind(user.name.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(record.try_into()?)
    }

    /// Returns whether a user with this id existed and was updated.
    pub async fn update_user(&self, user_id: Id<UserMarker>, user: &NewUser) -> Result<bool> {
        let result = query(
            "
            UPDATE users
            SET name = ?1
            WHERE users.id = ?2
            ",
        )
        .bind(user.name.get())
        .bind(user_id.get().cast_signed())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes the user together with all of their posts.
    ///
    /// Returns whether a user with this id existed.
    pub async fn delete_user(&self, user_id: Id<UserMarker>) -> Result<bool> {
        let result = query(
            "
            DELETE FROM users
            WHERE users.id = ?1
            ",
        )
        .bind(user_id.get().cast_signed())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn fetch_user_posts(&self, user_id: Id<UserMarker>) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(
            "
            SELECT
                posts.id,
                posts.user_id,
                posts.text
            FROM
                posts
            WHERE
                posts.user_id = ?1
            ORDER BY
                posts.id
            ",
        )
        .bind(user_id.get().cast_signed())
        .fetch_all(&self.pool)
        .await?;

        let posts = records
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(posts)
    }

    pub async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(
            "
            SELECT
                posts.id,
                posts.user_id,
                posts.text
            FROM
                posts
            WHERE
                posts.id = ?1
            ",
        )
        .bind(post_id.get().cast_signed())
        .fetch_optional(&self.pool)
        .await?;

        let post = record.map(Post::try_from).transpose()?;
        Ok(post)
    }

    pub async fn create_post(&self, user_id: Id<UserMarker>, text: &PostText) -> Result<Post> {
        let record = query_as::<_, PostRecord>(
            "
            INSERT INTO posts (user_id, text)
            VALUES (?1, ?2)
            RETURNING id, user_id, text
            ",
        )
        .bind(user_id.get().cast_signed())
        .bind(text.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(record.try_into()?)
    }
}
