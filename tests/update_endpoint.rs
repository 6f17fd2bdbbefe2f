//! Integration tests for `/update` and `/update-types`.

mod helpers;

use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::{json, Value};

use helpers::{settings_with_categories, spawn_app};

#[tokio::test]
async fn test_update_fans_out_in_order() {
    let upstream = Server::run();
    upstream.expect(
        Expectation::matching(all_of![
            request::method_path("GET", "/first"),
            request::headers(contains(("accept", "application/json"))),
        ])
        .respond_with(json_encoded(json!({"updated": 10}))),
    );
    upstream.expect(
        Expectation::matching(request::method_path("GET", "/second"))
            .respond_with(status_code(500).body("database locked")),
    );

    let first = upstream.url("/first").to_string();
    let second = upstream.url("/second").to_string();
    let app = spawn_app(settings_with_categories(vec![(
        "max",
        vec![first.clone(), second.clone(), "http://127.0.0.1:9/third".into()],
    )]))
    .await;

    let response = app
        .client
        .get(app.url("/update?type=max"))
        .send()
        .await
        .expect("Request should succeed");
    assert_eq!(response.status(), 200);

    let report: Value = response.json().await.expect("JSON body");
    assert_eq!(report["category"], "max");
    assert_eq!(report["success"], true);

    let results = report["results"].as_array().expect("results");
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["originalUrl"], first.as_str());
    assert_eq!(results[0]["status"], "success");
    assert_eq!(results[0]["data"], json!({"updated": 10}));
    assert_eq!(results[1]["originalUrl"], second.as_str());
    assert_eq!(results[1]["status"], "failed");
    assert!(results[1]["errorDetail"]
        .as_str()
        .expect("detail")
        .contains("database locked"));
    assert_eq!(results[2]["status"], "error");
    assert!(results[2]["proxiedUrl"]
        .as_str()
        .expect("proxied url")
        .starts_with("/proxy?url=http%3A%2F%2F127.0.0.1%3A9"));
}

#[tokio::test]
async fn test_update_all_failed_reports_unsuccessful() {
    let app = spawn_app(settings_with_categories(vec![(
        "zzw",
        vec!["http://127.0.0.1:9/a".into(), "http://127.0.0.1:9/b".into()],
    )]))
    .await;

    let report: Value = app
        .client
        .get(app.url("/update?type=zzw"))
        .send()
        .await
        .expect("Request should succeed")
        .json()
        .await
        .expect("JSON body");

    assert_eq!(report["success"], false);
    assert_eq!(report["results"].as_array().expect("results").len(), 2);
}

#[tokio::test]
async fn test_update_unknown_type_is_not_found() {
    let app = spawn_app(settings_with_categories(vec![(
        "max",
        vec!["http://127.0.0.1:9/a".into()],
    )]))
    .await;

    for path in ["/update?type=nope", "/update?type=..%2Fetc"] {
        let response = app
            .client
            .get(app.url(path))
            .send()
            .await
            .expect("Request should succeed");
        assert_eq!(response.status(), 404, "path {path}");
        let report: Value = response.json().await.expect("JSON body");
        assert_eq!(report["success"], false);
        assert_eq!(report["results"], json!([]));
    }
}

#[tokio::test]
async fn test_update_without_type_is_bad_request() {
    let app = spawn_app(settings_with_categories(vec![(
        "max",
        vec!["http://127.0.0.1:9/a".into()],
    )]))
    .await;

    for path in ["/update", "/update?type="] {
        let response = app
            .client
            .get(app.url(path))
            .send()
            .await
            .expect("Request should succeed");
        assert_eq!(response.status(), 400, "path {path}");
    }
}

#[tokio::test]
async fn test_update_types_lists_non_empty_categories() {
    let app = spawn_app(settings_with_categories(vec![
        ("max", vec!["http://max.example.com/api".into()]),
        ("empty", vec![]),
        ("zzw", vec!["http://zzw.example.com/api".into()]),
    ]))
    .await;

    for method in [reqwest::Method::GET, reqwest::Method::POST] {
        let body: Value = app
            .client
            .request(method, app.url("/update-types"))
            .send()
            .await
            .expect("Request should succeed")
            .json()
            .await
            .expect("JSON body");

        assert_eq!(body["types"], json!(["max", "zzw"]));
        assert_eq!(body["defaultType"], "max");
    }
}
