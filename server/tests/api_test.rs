//! End-to-end tests against a running server + database.
//!
//! Start the stack (MySQL + `farmwatch-server`), then:
//! `cargo test -p farmwatch-server -- --ignored --test-threads=1`

use chrono::DateTime;
use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("FARMWATCH_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

#[tokio::test]
#[ignore]
async fn test_enviar_then_datos_roundtrip() {
    let base = base_url();
    let client = reqwest::Client::new();

    let id_vaca = format!("it-vaca-{}", rand::random::<u32>());
    let payload = json!({
        "id_vaca": id_vaca,
        "temp_ambiente": "36.5",
        "temp_objeto": 38.2,
        "ritmo_cardiaco": 72,
        "oxigeno": 97.5,
        "gyro_x": 0.1,
        "gyro_y": -0.2,
        "gyro_z": 0.05,
        "latitud": 20.946033,
        "longitud": -89.637785,
        "satelites": "N/A"
    });

    let res = client
        .post(format!("{base}/api/enviar"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let res = client
        .get(format!("{base}/api/datos"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let rows: Vec<Value> = res.json().await.unwrap();
    let row = rows
        .iter()
        .find(|r| r["id_vaca"] == id_vaca.as_str())
        .expect("inserted row should be among the latest readings");

    assert_eq!(row["temp_ambiente"].as_f64(), Some(36.5));
    assert_eq!(row["temp_objeto"].as_f64(), Some(38.2));
    assert!(row["satelites"].is_null());
    assert!(row["fecha"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_datos_caps_at_100_rows_newest_first() {
    let base = base_url();
    let client = reqwest::Client::new();

    for i in 0..101 {
        let payload = json!({
            "id_vaca": format!("it-cap-{i}"),
            "ritmo_cardiaco": 60 + (i % 40),
        });
        let res = client
            .post(format!("{base}/api/enviar"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 201);
    }

    let rows: Vec<Value> = client
        .get(format!("{base}/api/datos"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(rows.len(), 100);

    let fechas: Vec<DateTime<chrono::Utc>> = rows
        .iter()
        .map(|r| {
            DateTime::parse_from_rfc3339(r["fecha"].as_str().unwrap())
                .unwrap()
                .with_timezone(&chrono::Utc)
        })
        .collect();
    assert!(
        fechas.windows(2).all(|w| w[0] >= w[1]),
        "rows must be ordered newest first"
    );
}

#[tokio::test]
#[ignore]
async fn test_invalid_body_is_not_a_500() {
    let base = base_url();
    let client = reqwest::Client::new();

    // Missing id_vaca is a request-shape problem, not a server failure.
    let res = client
        .post(format!("{base}/api/enviar"))
        .json(&json!({"temp_ambiente": 25.0}))
        .send()
        .await
        .unwrap();
    assert!(res.status().is_client_error());
}
