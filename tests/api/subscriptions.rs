use std::{sync::Arc, time::Duration};

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{
    spawn_with, spawn_with_registry, BrokenRegistry, StuckRegistry, TestApp, ADMIN_EMAIL,
};

async fn mount_email_ok(app: &TestApp) {
    Mock::given(path("/v3/mail/send"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&app.email_server)
        .await;
}

#[tokio::test]
async fn subscribe_new_email_ok() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_ok(&app).await;

    let res = app.post_subscribe(&json!({ "email": "a@x.com" })).await?;

    assert_eq!(
        res.status(),
        StatusCode::OK,
        "Wrong response StatusCode: {}",
        res.status()
    );
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Subscribed successfully!" }));
    assert_eq!(app.registry.len()?, 1);

    Ok(())
}

#[tokio::test]
async fn subscribe_twice_is_already_subscribed() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_ok(&app).await;

    let first: Value = app
        .post_subscribe(&json!({ "email": "a@x.com" }))
        .await?
        .json()
        .await?;
    let res = app.post_subscribe(&json!({ "email": "a@x.com" })).await?;

    assert_eq!(first["message"], "Subscribed successfully!");
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Already subscribed" }));
    assert_eq!(app.registry.len()?, 1);

    // Only the first call notifies.
    app.wait_for_emails(2).await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    let requests = app.email_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);

    Ok(())
}

#[tokio::test]
async fn subscribe_sends_welcome_and_admin_alert() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_ok(&app).await;

    app.post_subscribe(&json!({ "email": "a@x.com" })).await?;

    let emails = app.wait_for_emails(2).await?;
    let recipient = |body: &Value| body["personalizations"][0]["to"][0]["email"].clone();

    let welcome = emails
        .iter()
        .find(|body| recipient(body) == "a@x.com")
        .ok_or_else(|| anyhow::anyhow!("no welcome email"))?;
    assert_eq!(welcome["from"]["email"], "news@example.com");
    assert_eq!(welcome["content"].as_array().map(Vec::len), Some(2));

    let alert = emails
        .iter()
        .find(|body| recipient(body) == ADMIN_EMAIL)
        .ok_or_else(|| anyhow::anyhow!("no admin alert"))?;
    assert_eq!(alert["content"][0]["value"], "A new user subscribed: a@x.com");

    Ok(())
}

#[tokio::test]
async fn subscribe_missing_email_is_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;

    let tests = [
        (json!({}), "Empty json"),
        (json!({ "email": null }), "Null email"),
        (json!({ "email": "" }), "Empty email"),
        (json!({ "email": "   " }), "Whitespace email"),
        (json!({ "email": 42 }), "Email is not a string"),
        (json!("a@x.com"), "Not an object"),
    ];

    for (json_request, params) in tests {
        let res = app.post_subscribe(&json_request).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "Wrong response: ({}), Expected: ({}); for request with: {params}",
            res.status(),
            StatusCode::BAD_REQUEST
        );
        let body: Value = res.json().await?;
        assert_eq!(body, json!({ "message": "Email is required" }), "{params}");
    }

    assert!(app.registry.is_empty()?);

    Ok(())
}

#[tokio::test]
async fn subscribe_non_json_body_is_bad_request() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(format!("http://{}/subscribe", app.addr))
        .header("Content-Type", "text/plain")
        .body("email=a@x.com")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Email is required");

    Ok(())
}

#[tokio::test]
async fn subscribe_keeps_email_verbatim() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_ok(&app).await;

    let upper: Value = app
        .post_subscribe(&json!({ "email": "A@x.com" }))
        .await?
        .json()
        .await?;
    let lower: Value = app
        .post_subscribe(&json!({ "email": "a@x.com" }))
        .await?
        .json()
        .await?;

    assert_eq!(upper["message"], "Subscribed successfully!");
    assert_eq!(lower["message"], "Subscribed successfully!");
    assert_eq!(app.registry.len()?, 2);

    Ok(())
}

#[tokio::test]
async fn subscribe_ok_even_if_email_delivery_fails() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.email_server)
        .await;

    let res = app.post_subscribe(&json!({ "email": "a@x.com" })).await?;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Subscribed successfully!");
    // Both sends are attempted.
    app.wait_for_emails(2).await?;

    Ok(())
}

#[tokio::test]
async fn subscribe_does_not_wait_for_email_delivery() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(202).set_delay(Duration::from_secs(30)))
        .mount(&app.email_server)
        .await;

    let res = tokio::time::timeout(
        Duration::from_secs(1),
        app.post_subscribe(&json!({ "email": "a@x.com" })),
    )
    .await??;

    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn subscribe_registry_failure_is_internal_error() -> Result<()> {
    let (addr, _email_server) = spawn_with_registry(Arc::new(BrokenRegistry)).await?;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/subscribe"))
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    // No internal detail leaks into the response.
    assert_eq!(body, json!({ "message": "Something went wrong" }));

    Ok(())
}

#[tokio::test]
async fn subscribe_registry_timeout_is_internal_error() -> Result<()> {
    let (addr, _email_server) =
        spawn_with(Arc::new(StuckRegistry), Duration::from_millis(100)).await?;

    let res = reqwest::Client::new()
        .post(format!("http://{addr}/subscribe"))
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "message": "Something went wrong" }));

    Ok(())
}

#[tokio::test]
async fn subscribe_concurrent_duplicates_create_one_record() -> Result<()> {
    let app = TestApp::spawn().await?;
    mount_email_ok(&app).await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = app.http_client.clone();
            let url = format!("http://{}/subscribe", app.addr);
            tokio::spawn(async move {
                let body: Value = client
                    .post(url)
                    .json(&json!({ "email": "a@x.com" }))
                    .send()
                    .await?
                    .json()
                    .await?;
                anyhow::Ok(body)
            })
        })
        .collect();

    let mut subscribed = 0;
    for handle in handles {
        let body = handle.await??;
        match body["message"].as_str() {
            Some("Subscribed successfully!") => subscribed += 1,
            Some("Already subscribed") => {}
            other => anyhow::bail!("unexpected response: {other:?}"),
        }
    }

    assert_eq!(subscribed, 1);
    assert_eq!(app.registry.len()?, 1);

    Ok(())
}
