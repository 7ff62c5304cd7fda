#![allow(dead_code)]

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use policy_desk::config::{AppConfig, Argon2Config};
use policy_desk::database::MemoryStore;
use policy_desk::{app, AppState};

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// In-process application over a fresh memory store
pub struct TestApp {
    pub router: Router,
    pub config: AppConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        config.security.admin_id = ADMIN_ID.to_string();
        config.security.admin_password = ADMIN_PASSWORD.to_string();
        config.security.argon2 = Argon2Config {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        };

        let state = AppState::new(config.clone(), Arc::new(MemoryStore::new()))?;
        Ok(Self { router: app(state), config })
    }

    pub async fn request(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Result<TestResponse> {
        let body = match body {
            Some(value) => Body::from(serde_json::to_vec(&value)?),
            None => Body::empty(),
        };
        self.send(method, uri, token, body).await
    }

    /// Send a raw body with a JSON content type
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Body) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = self.router.clone().oneshot(builder.body(body)?).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };

        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn login(&self, user_id: &str, password: &str) -> Result<TestResponse> {
        self.post("/auth/login", None, json!({ "userId": user_id, "password": password })).await
    }

    pub async fn admin_token(&self) -> Result<String> {
        let res = self.login(ADMIN_ID, ADMIN_PASSWORD).await?;
        assert_eq!(res.status, StatusCode::OK, "admin login failed: {}", res.body);
        token_of(&res)
    }

    /// Create a sales manager as admin, returning its record
    pub async fn create_sales_manager(&self, password: &str) -> Result<Value> {
        let admin = self.admin_token().await?;
        let res = self
            .post("/users/sales-managers", Some(&admin), json!({ "password": password }))
            .await?;
        assert_eq!(res.status, StatusCode::CREATED, "create failed: {}", res.body);
        Ok(res.data().clone())
    }

    /// Create a fresh sales manager and log in as it
    pub async fn sales_manager_token(&self) -> Result<String> {
        let manager = self.create_sales_manager("secret-pass").await?;
        let user_id = manager["userId"].as_str().unwrap_or_default().to_string();
        let res = self.login(&user_id, "secret-pass").await?;
        assert_eq!(res.status, StatusCode::OK, "sales manager login failed: {}", res.body);
        token_of(&res)
    }
}

pub fn token_of(res: &TestResponse) -> Result<String> {
    res.data()["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no token in {}", res.body))
}

pub fn health_policy(holder: &str, end_date: &str) -> Value {
    json!({
        "policyStartDate": "2023-01-01",
        "policyEndDate": end_date,
        "mobileNumber": "9876543210",
        "policyHolderName": holder,
        "policyHolderDOB": "1980-02-02",
        "nomineeName": "Meera",
        "nomineeDOB": "2005-06-06",
        "companyName": "Star Health",
        "tpaName": "MediAssist",
        "premiumAmount": 12500,
        "policyCopyLink": "https://docs.example.com/health.pdf"
    })
}

pub fn life_policy(holder: &str, commencement: &str, plan_term_ppt: &str) -> Value {
    json!({
        "policyHolderName": holder,
        "policyHolderAddress": "12 MG Road, Pune",
        "policyNumber": "LIC-778812",
        "dateOfCommencement": commencement,
        "planTermPPT": plan_term_ppt,
        "premiumAmount": 18000,
        "firstUnpaidPremium": "2025-03-15",
        "paymentMode": "Yearly",
        "sumAssured": 500000,
        "dateOfLastPremium": "2034-03-15",
        "maturityAmount": 750000,
        "mobileNumber": "9123456780",
        "dateOfBirth": "1979-11-11",
        "agentCode": "AG-204",
        "nomineeName": "Kabir",
        "nomineeRelation": "Son",
        "nomineeDOB": "2008-01-20"
    })
}
