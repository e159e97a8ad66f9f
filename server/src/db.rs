use crate::config::DbConfig;
use crate::errors::{Error, Result};
use crate::metrics::POOL_RETRIES_TOTAL;
use crate::model::{IncomingReading, StoredReading};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlConnection};
use std::time::Duration;
use tracing::{info, warn};

const ACQUIRE_ATTEMPTS: u32 = 3;
const ACQUIRE_RETRY_DELAY: Duration = Duration::from_secs(2);

pub fn connect_options(cfg: &DbConfig) -> MySqlConnectOptions {
    let opts = MySqlConnectOptions::new()
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.database);

    match &cfg.cloud_sql_connection_name {
        // Cloud Run mounts the instance under /cloudsql/<instance>.
        Some(instance) => opts.socket(format!("/cloudsql/{instance}")),
        None => opts.host(&cfg.host).port(cfg.port),
    }
}

pub async fn make_pool(cfg: &DbConfig) -> Result<MySqlPool> {
    info!("Connecting to database...");
    let pool = MySqlPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(connect_options(cfg))
        .await?;

    info!("Database connection established");
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed");

    Ok(pool)
}

/// Pool acquisition with a bounded number of fixed-delay retries. No backoff;
/// the caller is an HTTP request and has to answer within a few seconds.
pub async fn acquire_with_retry(pool: &MySqlPool) -> Result<PoolConnection<MySql>> {
    let mut attempts = 0;
    loop {
        attempts += 1;
        match pool.acquire().await {
            Ok(conn) => return Ok(conn),
            Err(e) if attempts < ACQUIRE_ATTEMPTS => {
                warn!(
                    "could not acquire connection (attempt {}/{}): {}",
                    attempts, ACQUIRE_ATTEMPTS, e
                );
                POOL_RETRIES_TOTAL.inc();
                tokio::time::sleep(ACQUIRE_RETRY_DELAY).await;
            }
            Err(e) => {
                return Err(Error::PoolExhausted {
                    attempts,
                    source: e,
                })
            }
        }
    }
}

pub async fn insert_reading(conn: &mut MySqlConnection, reading: &IncomingReading) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO datos (id_vaca, temp_ambiente, temp_objeto, ritmo_cardiaco, oxigeno,
                           gyro_x, gyro_y, gyro_z, latitud, longitud, satelites)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&reading.id_vaca)
    .bind(reading.temp_ambiente)
    .bind(reading.temp_objeto)
    .bind(reading.ritmo_cardiaco)
    .bind(reading.oxigeno)
    .bind(reading.gyro_x)
    .bind(reading.gyro_y)
    .bind(reading.gyro_z)
    .bind(reading.latitud)
    .bind(reading.longitud)
    .bind(reading.satelites)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn latest_readings(conn: &mut MySqlConnection) -> Result<Vec<StoredReading>> {
    let rows = sqlx::query_as::<_, StoredReading>(
        r#"
        SELECT id, id_vaca, temp_ambiente, temp_objeto, ritmo_cardiaco, oxigeno,
               gyro_x, gyro_y, gyro_z, latitud, longitud, satelites, fecha
        FROM datos
        ORDER BY fecha DESC
        LIMIT 100
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}
