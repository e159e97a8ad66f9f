use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Reading as posted by a collar device. Measurements arrive as numbers,
/// numeric strings, the `"N/A"` sentinel, empty strings, or not at all.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingReading {
    pub id_vaca: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp_ambiente: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp_objeto: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ritmo_cardiaco: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub oxigeno: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub gyro_x: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub gyro_y: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub gyro_z: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitud: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitud: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub satelites: Option<f64>,
}

/// One stored row of the `datos` table, keyed by column name on the wire.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredReading {
    pub id: i64,
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

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_f64(Option::<Value>::deserialize(deserializer)?))
}

/// Best-effort numeric coercion. Anything that is not a number or a numeric
/// string becomes NULL rather than a request error.
fn coerce_f64(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "N/A" {
                None
            } else {
                s.parse().ok()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_sentinels_to_null() {
        assert_eq!(coerce_f64(Some(json!("N/A"))), None);
        assert_eq!(coerce_f64(Some(json!(""))), None);
        assert_eq!(coerce_f64(Some(json!(null))), None);
        assert_eq!(coerce_f64(None), None);
    }

    #[test]
    fn test_coerce_non_numeric_to_null() {
        assert_eq!(coerce_f64(Some(json!("not a number"))), None);
        assert_eq!(coerce_f64(Some(json!(true))), None);
        assert_eq!(coerce_f64(Some(json!([1.0]))), None);
        assert_eq!(coerce_f64(Some(json!({"v": 1.0}))), None);
    }

    #[test]
    fn test_coerce_valid_values() {
        assert_eq!(coerce_f64(Some(json!(36.5))), Some(36.5));
        assert_eq!(coerce_f64(Some(json!(72))), Some(72.0));
        assert_eq!(coerce_f64(Some(json!("36.5"))), Some(36.5));
        assert_eq!(coerce_f64(Some(json!(" 36.5 "))), Some(36.5));
        assert_eq!(coerce_f64(Some(json!("-89.637785"))), Some(-89.637785));
    }

    #[test]
    fn test_partial_payload_deserializes_with_nulls() {
        let reading: IncomingReading = serde_json::from_value(json!({
            "id_vaca": "V-3",
            "temp_ambiente": "36.5",
            "satelites": "N/A"
        }))
        .unwrap();

        assert_eq!(reading.id_vaca, "V-3");
        assert_eq!(reading.temp_ambiente, Some(36.5));
        assert_eq!(reading.satelites, None);
        assert_eq!(reading.ritmo_cardiaco, None);
        assert_eq!(reading.latitud, None);
    }

    #[test]
    fn test_full_payload_deserializes() {
        let reading: IncomingReading = serde_json::from_value(json!({
            "id_vaca": "V-7",
            "temp_ambiente": 28.1,
            "temp_objeto": 38.4,
            "ritmo_cardiaco": "72",
            "oxigeno": 97.2,
            "gyro_x": -0.5,
            "gyro_y": 0.25,
            "gyro_z": "12.0",
            "latitud": 20.946033,
            "longitud": -89.637785,
            "satelites": 8
        }))
        .unwrap();

        assert_eq!(reading.temp_objeto, Some(38.4));
        assert_eq!(reading.ritmo_cardiaco, Some(72.0));
        assert_eq!(reading.gyro_z, Some(12.0));
        assert_eq!(reading.satelites, Some(8.0));
    }

    #[test]
    fn test_missing_id_vaca_is_rejected() {
        let result = serde_json::from_value::<IncomingReading>(json!({
            "temp_ambiente": 28.1
        }));
        assert!(result.is_err());
    }
}
