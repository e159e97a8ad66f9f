use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One telemetry sample from a monitored animal. Absent measurements stay
/// NULL all the way to the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub id_vaca: String,
    pub temp_ambiente: Option<f64>,
    pub temp_objeto: Option<f64>,
    pub ritmo_cardiaco: Option<f64>,
    pub oxigeno: Option<f64>,
    pub gyro_x: Option<f64>,
    pub gyro_y: Option<f64>,
    pub gyro_z: Option<f64>,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    pub satelites: Option<f64>,
    pub fecha: DateTime<Utc>,
}

// Paddock reference point; collars jitter within a few hundred meters.
const PADDOCK_LAT: f64 = 20.946033;
const PADDOCK_LON: f64 = -89.637785;

pub fn generate_reading(rng: &mut impl Rng, herd_size: u32) -> Reading {
    let id_vaca = format!("V-{}", rng.gen_range(1..=herd_size));

    let temp_objeto = if rng.gen_bool(0.05) {
        rng.gen_range(39.5..41.0) // fever outliers
    } else {
        rng.gen_range(37.5..39.0)
    };

    // GPS fix drops under tree cover roughly a tenth of the time.
    let fix = rng.gen_bool(0.9);

    Reading {
        id_vaca,
        temp_ambiente: Some(round2(rng.gen_range(18.0..36.0))),
        temp_objeto: Some(round2(temp_objeto)),
        ritmo_cardiaco: Some(round2(rng.gen_range(55.0..90.0))),
        oxigeno: Some(round2(rng.gen_range(94.0..100.0))),
        gyro_x: Some(round2(rng.gen_range(-120.0..120.0))),
        gyro_y: Some(round2(rng.gen_range(-120.0..120.0))),
        gyro_z: Some(round2(rng.gen_range(-120.0..120.0))),
        latitud: fix.then(|| PADDOCK_LAT + rng.gen_range(-0.002..0.002)),
        longitud: fix.then(|| PADDOCK_LON + rng.gen_range(-0.002..0.002)),
        satelites: fix.then(|| f64::from(rng.gen_range(4u32..=12))),
        fecha: Utc::now(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_reading_stays_in_herd() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let reading = generate_reading(&mut rng, 5);
            let n: u32 = reading.id_vaca.strip_prefix("V-").unwrap().parse().unwrap();
            assert!((1..=5).contains(&n));
            assert!(reading.temp_objeto.unwrap() >= 37.5);
            assert!(reading.temp_objeto.unwrap() < 41.0);
        }
    }

    #[test]
    fn test_gps_fields_drop_together() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let reading = generate_reading(&mut rng, 10);
            assert_eq!(reading.latitud.is_some(), reading.longitud.is_some());
            assert_eq!(reading.latitud.is_some(), reading.satelites.is_some());
        }
    }
}
