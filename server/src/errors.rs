use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("could not acquire a database connection after {attempts} attempts: {source}")]
    PoolExhausted { attempts: u32, source: sqlx::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
