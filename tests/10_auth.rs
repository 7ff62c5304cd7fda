mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Method, StatusCode};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, ADMIN_ID, ADMIN_PASSWORD};
use policy_desk::auth::{Claims, Role, TokenIssuer};

#[tokio::test]
async fn root_and_health_are_public() -> Result<()> {
    let app = TestApp::new()?;

    let root = app.get("/", None).await?;
    assert_eq!(root.status, StatusCode::OK);

    let health = app.get("/health", None).await?;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["success"], true);
    Ok(())
}

#[tokio::test]
async fn admin_login_provisions_identity_once() -> Result<()> {
    let app = TestApp::new()?;

    let first = app.login(ADMIN_ID, ADMIN_PASSWORD).await?;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["expiresIn"], 86400);
    assert_eq!(first.data()["user"]["role"], "admin");
    assert_eq!(first.data()["user"]["userId"], ADMIN_ID);

    let second = app.login(ADMIN_ID, ADMIN_PASSWORD).await?;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.data()["user"]["id"], second.data()["user"]["id"]);
    Ok(())
}

#[tokio::test]
async fn failed_logins_are_indistinguishable() -> Result<()> {
    let app = TestApp::new()?;
    app.create_sales_manager("right-pass").await?;

    let wrong_password = app.login("SM0001", "wrong-pass").await?;
    let unknown_user = app.login("SM0999", "right-pass").await?;
    let wrong_admin = app.login(ADMIN_ID, "nope").await?;

    for res in [&wrong_password, &unknown_user, &wrong_admin] {
        assert_eq!(res.status, StatusCode::UNAUTHORIZED);
        assert_eq!(res.error(), "Invalid credentials");
    }
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let app = TestApp::new()?;

    let res = app.post("/auth/login", None, json!({ "userId": "SM0001" })).await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "Please provide userId and password");
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_rejected() -> Result<()> {
    let app = TestApp::new()?;

    let res = app
        .send(Method::POST, "/auth/login", None, Body::from("{\"userId\": \"admin\","))
        .await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], "INVALID_JSON");
    assert_eq!(res.body["success"], false);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() -> Result<()> {
    let app = TestApp::new()?;

    let missing = app.get("/health-insurance", None).await?;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.error(), "Not authorized, no token");

    let garbage = app.get("/health-insurance", Some("not.a.jwt")).await?;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.error(), "Not authorized, token failed");

    let forged = TokenIssuer::new("some-other-secret")?
        .issue(&Claims::new(Uuid::new_v4(), "SM0001".into(), Role::SalesManager))?;
    let res = app.get("/health-insurance", Some(&forged)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_tokens_are_rejected() -> Result<()> {
    let app = TestApp::new()?;
    let login = app.login(ADMIN_ID, ADMIN_PASSWORD).await?;
    let sub: Uuid = login.data()["user"]["id"].as_str().unwrap_or_default().parse()?;

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub,
        user_id: ADMIN_ID.into(),
        role: Role::Admin,
        exp: now - 60,
        iat: now - 3600,
    };
    let token = TokenIssuer::new(&app.config.security.jwt_secret)?.issue(&claims)?;

    let res = app.get("/auth/me", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error(), "Not authorized, token expired");
    Ok(())
}

#[tokio::test]
async fn me_returns_the_resolved_identity() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.sales_manager_token().await?;

    let res = app.get("/auth/me", Some(&token)).await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.data()["userId"], "SM0001");
    assert_eq!(res.data()["role"], "salesManager");
    assert!(res.data().get("passwordHash").is_none());
    Ok(())
}

#[tokio::test]
async fn roles_gate_each_surface() -> Result<()> {
    let app = TestApp::new()?;
    let admin = app.admin_token().await?;
    let manager = app.sales_manager_token().await?;

    let res = app.get("/users/sales-managers", Some(&manager)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error(), "Not authorized as an admin");

    let res = app.get("/motor-insurance", Some(&admin)).await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.error(), "Access denied. Sales Manager role required.");

    let res = app
        .post(
            "/auth/change-password",
            Some(&admin),
            json!({ "currentPassword": ADMIN_PASSWORD, "newPassword": "other" }),
        )
        .await?;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn sales_manager_changes_own_password() -> Result<()> {
    let app = TestApp::new()?;
    let token = app.sales_manager_token().await?;

    let wrong = app
        .post(
            "/auth/change-password",
            Some(&token),
            json!({ "currentPassword": "guess", "newPassword": "fresh-pass" }),
        )
        .await?;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let missing = app
        .post("/auth/change-password", Some(&token), json!({ "currentPassword": "secret-pass" }))
        .await?;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);

    let ok = app
        .post(
            "/auth/change-password",
            Some(&token),
            json!({ "currentPassword": "secret-pass", "newPassword": "fresh-pass" }),
        )
        .await?;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.data()["message"], "Password updated successfully");

    assert_eq!(app.login("SM0001", "secret-pass").await?.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.login("SM0001", "fresh-pass").await?.status, StatusCode::OK);
    Ok(())
}
