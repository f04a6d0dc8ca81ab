//! Operator switch toggling through the admin API.

use std::time::Duration;

use serde_json::{json, Value};

mod common;

const CERT_DATE_SWITCH: &str = "course_detail.course_detail_update_certificate_date";

fn admin_config() -> lms_monitoring::ServiceConfig {
    let admin_addr = common::free_addr();
    let mut config = lms_monitoring::ServiceConfig::default();
    config.admin.enabled = true;
    config.admin.api_key = "admin-secret".into();
    config.admin.bind_address = admin_addr.to_string();
    config
}

fn admin_url(config: &lms_monitoring::ServiceConfig, path: &str) -> String {
    format!("http://{}{}", config.admin.bind_address, path)
}

#[tokio::test]
async fn test_certificate_date_follows_switch() {
    let config = admin_config();
    let server = common::start_server(config.clone()).await;
    let client = common::client();
    let details_url = server.url("/api/courses/course-v1:edX+Demo+2026/details");

    let body = json!({
        "start_date": "2026-01-05T00:00:00Z",
        "certificate_available_date": "2026-06-01T00:00:00Z",
    });

    let res: Value = client.put(&details_url).json(&body).send().await.unwrap().json().await.unwrap();
    assert_eq!(res["start_date"], "2026-01-05T00:00:00Z");
    assert_eq!(res["certificate_available_date"], Value::Null);

    let res = client
        .put(admin_url(&config, &format!("/admin/switches/{CERT_DATE_SWITCH}")))
        .bearer_auth("admin-secret")
        .json(&json!({ "active": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res: Value = client.put(&details_url).json(&body).send().await.unwrap().json().await.unwrap();
    assert_eq!(res["certificate_available_date"], "2026-06-01T00:00:00Z");

    let res: Value = client.get(&details_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(res["certificate_available_date"], "2026-06-01T00:00:00Z");
}

#[tokio::test]
async fn test_switch_seeds_and_listing() {
    let mut config = admin_config();
    config.waffle.switches.insert(CERT_DATE_SWITCH.to_string(), true);
    let server = common::start_server(config.clone()).await;
    let client = common::client();

    let res: Value = client
        .get(admin_url(&config, "/admin/switches"))
        .bearer_auth("admin-secret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res[CERT_DATE_SWITCH], true);

    let res = client
        .get(admin_url(&config, "/admin/switches"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    // Seeds from a reload overwrite the operator's choice for listed switches.
    client
        .put(admin_url(&config, &format!("/admin/switches/{CERT_DATE_SWITCH}")))
        .bearer_auth("admin-secret")
        .json(&json!({ "active": false }))
        .send()
        .await
        .unwrap();
    server.config_updates.send(config.clone()).unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let res: Value = client
        .get(admin_url(&config, "/admin/switches"))
        .bearer_auth("admin-secret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(res[CERT_DATE_SWITCH], true);
}

#[tokio::test]
async fn test_code_owner_report() {
    let mut config = admin_config();
    config.code_owner_mappings = Some(toml::Value::Array(vec![toml::Value::String(
        "invalid_setting_as_list".into(),
    )]));
    let _server = common::start_server(config.clone()).await;

    let res: Value = common::client()
        .get(admin_url(&config, "/admin/code-owners"))
        .bearer_auth("admin-secret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(res["configured"], true);
    assert_eq!(res["prefixes"], json!([]));
    assert_eq!(res["errors"][0]["NotATable"]["found"], "array");
}
