use crate::config::DbConfig;
use crate::reading::Reading;
use anyhow::Result;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;

/// A destination accepting ordered sequences of readings.
pub trait Sink {
    async fn store(&mut self, readings: &[Reading]) -> Result<()>;
}

/// The remote MySQL store. All readings of one call are inserted inside a
/// single transaction, so a partial replay never commits.
pub struct RemoteStore {
    pool: MySqlPool,
}

impl RemoteStore {
    /// Lazy pool: the relay must come up while the network is down.
    pub fn connect_lazy(cfg: &DbConfig) -> Self {
        let opts = MySqlConnectOptions::new()
            .username(&cfg.user)
            .password(&cfg.password)
            .database(&cfg.database);
        let opts = match &cfg.cloud_sql_connection_name {
            Some(instance) => opts.socket(format!("/cloudsql/{instance}")),
            None => opts.host(&cfg.host).port(cfg.port),
        };

        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy_with(opts);

        Self { pool }
    }
}

impl Sink for RemoteStore {
    async fn store(&mut self, readings: &[Reading]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for r in readings {
            sqlx::query(
                r#"
                INSERT INTO datos (id_vaca, temp_ambiente, temp_objeto, ritmo_cardiaco, oxigeno,
                                   gyro_x, gyro_y, gyro_z, latitud, longitud, satelites, fecha)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&r.id_vaca)
            .bind(r.temp_ambiente)
            .bind(r.temp_objeto)
            .bind(r.ritmo_cardiaco)
            .bind(r.oxigeno)
            .bind(r.gyro_x)
            .bind(r.gyro_y)
            .bind(r.gyro_z)
            .bind(r.latitud)
            .bind(r.longitud)
            .bind(r.satelites)
            .bind(r.fecha)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
