use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use super::schema::{FieldKind, FieldSpec, PolicySchema};

/// Field map of a policy document, keyed by camelCase field name
pub type Document = Map<String, Value>;

static PLAN_TERM_PPT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}/\d{1,2}/\d{1,2}$").expect("static regex"));

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }
}

impl PolicySchema {
    /// Keep only declared fields; ownership and system fields never pass through
    pub fn accept(&self, input: &Document) -> Document {
        input
            .iter()
            .filter(|(key, _)| self.field(key).is_some())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Check every declared field and return the normalised document.
    ///
    /// All failures are collected so the caller sees the full list at once.
    pub fn validate(&self, input: &Document) -> Result<Document, ValidationError> {
        let mut out = Document::new();
        let mut field_errors = BTreeMap::new();

        for spec in self.fields {
            match input.get(spec.name).filter(|v| !is_blank(v)) {
                Some(value) => match normalize(spec, value) {
                    Ok(normalized) => {
                        out.insert(spec.name.to_string(), normalized);
                    }
                    Err(msg) => {
                        field_errors.insert(spec.name.to_string(), msg);
                    }
                },
                None if spec.required => {
                    field_errors.insert(spec.name.to_string(), format!("Path `{}` is required.", spec.name));
                }
                None => {
                    if let Some(default) = spec.default {
                        out.insert(spec.name.to_string(), Value::String(default.to_string()));
                    }
                }
            }
        }

        if field_errors.is_empty() {
            Ok(out)
        } else {
            Err(ValidationError {
                message: format!("{} validation failed", self.policy_type.label()),
                field_errors,
            })
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn normalize(spec: &FieldSpec, value: &Value) -> Result<Value, String> {
    match spec.kind {
        FieldKind::Text => match value {
            Value::String(s) => Ok(Value::String(s.trim().to_string())),
            Value::Number(n) => Ok(Value::String(n.to_string())),
            _ => Err(format!("`{}` must be a string", spec.name)),
        },
        FieldKind::Date => value
            .as_str()
            .and_then(parse_date)
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .ok_or_else(|| format!("`{}` must be a calendar date (YYYY-MM-DD)", spec.name)),
        FieldKind::Amount => {
            let number = match value {
                Value::Number(n) => Some(n.clone()),
                Value::String(s) => parse_number(s.trim()),
                _ => None,
            }
            .ok_or_else(|| format!("`{}` must be a number", spec.name))?;

            match number.as_f64() {
                Some(f) if f.is_finite() && f >= 0.0 => Ok(Value::Number(number)),
                _ => Err(format!("`{}` must not be negative", spec.name)),
            }
        }
        FieldKind::Link => {
            let s = value.as_str().map(str::trim).unwrap_or_default();
            match url::Url::parse(s) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Value::String(s.to_string())),
                _ => Err(format!("`{}` must be an http(s) URL", spec.name)),
            }
        }
        FieldKind::PlanTermPpt => match value.as_str().map(str::trim) {
            Some(s) if PLAN_TERM_PPT.is_match(s) => Ok(Value::String(s.to_string())),
            _ => Err(format!(
                "{} is not a valid Plan/Term/PPT format! Use format: nnn/nn/nn",
                display(value)
            )),
        },
        FieldKind::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => Ok(Value::String(s.to_string())),
            _ => Err(format!(
                "{} is not a valid value for `{}` (expected one of: {})",
                display(value),
                spec.name,
                allowed.join(", ")
            )),
        },
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp (taken as its UTC calendar date)
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Utc).date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyType;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn life() -> Document {
        doc(json!({
            "policyHolderName": "Asha Rao",
            "policyHolderAddress": "12 MG Road, Pune",
            "policyNumber": "LIC-99812",
            "dateOfCommencement": "2024-03-15",
            "planTermPPT": "100/20/15",
            "premiumAmount": "12500",
            "firstUnpaidPremium": "2025-03-15",
            "paymentMode": "Yearly",
            "sumAssured": 500000,
            "dateOfLastPremium": "2038-03-15",
            "maturityAmount": 750000.5,
            "mobileNumber": "9876543210",
            "dateOfBirth": "1988-07-01",
            "agentCode": "AG-17",
            "nomineeName": "Ravi Rao",
            "nomineeRelation": "Spouse",
            "nomineeDOB": "1986-01-20",
            "document": ""
        }))
    }

    #[test]
    fn accepts_valid_life_policy_and_normalises() {
        let out = PolicyType::Life.schema().validate(&life()).unwrap();
        assert_eq!(out["premiumAmount"], json!(12500));
        assert_eq!(out["maturityAmount"], json!(750000.5));
        assert!(!out.contains_key("document"), "blank optional link is omitted");
    }

    #[test]
    fn plan_term_ppt_group_widths() {
        let schema = PolicyType::Life.schema();
        for ok in ["100/20/15", "1/2/3", "999/99/99"] {
            let mut input = life();
            input.insert("planTermPPT".into(), json!(ok));
            assert!(schema.validate(&input).is_ok(), "{} should pass", ok);
        }
        for bad in ["1000/20/15", "100/200/15", "100/20/150", "100-20-15", "100/20", "a/b/c"] {
            let mut input = life();
            input.insert("planTermPPT".into(), json!(bad));
            let err = schema.validate(&input).unwrap_err();
            assert!(err.field_errors.contains_key("planTermPPT"), "{} should fail", bad);
        }
    }

    #[test]
    fn payment_mode_must_be_listed() {
        let mut input = life();
        input.insert("paymentMode".into(), json!("Weekly"));
        let err = PolicyType::Life.schema().validate(&input).unwrap_err();
        assert_eq!(err.message, "LifeInsurance validation failed");
        assert!(err.field_errors["paymentMode"].contains("Half-Yearly"));
    }

    #[test]
    fn collects_every_failure() {
        let input = doc(json!({ "policyHolderName": "X", "premiumAmount": -5, "policyEndDate": "31/12/2024" }));
        let err = PolicyType::Health.schema().validate(&input).unwrap_err();

        assert_eq!(err.field_errors["premiumAmount"], "`premiumAmount` must not be negative");
        assert!(err.field_errors["policyEndDate"].contains("calendar date"));
        assert_eq!(err.field_errors["tpaName"], "Path `tpaName` is required.");
        assert!(!err.field_errors.contains_key("policyHolderName"));
        assert!(!err.field_errors.contains_key("agentName"), "agentName is optional for health");
    }

    #[test]
    fn health_agent_name_defaults_to_empty() {
        let input = doc(json!({
            "policyStartDate": "2024-01-01",
            "policyEndDate": "2024-12-31T18:30:00.000Z",
            "mobileNumber": "9000000000",
            "policyHolderName": "Meera",
            "policyHolderDOB": "1990-02-02",
            "nomineeName": "Kiran",
            "nomineeDOB": "1992-03-03",
            "companyName": "Star Health",
            "tpaName": "MediAssist",
            "premiumAmount": 8000,
            "policyCopyLink": "https://docs.example.com/p/1.pdf"
        }));
        let out = PolicyType::Health.schema().validate(&input).unwrap();
        assert_eq!(out["agentName"], json!(""));
        assert_eq!(out["policyEndDate"], json!("2024-12-31"));
    }

    #[test]
    fn links_must_be_absolute_http() {
        let mut input = life();
        input.insert("document".into(), json!("file:///etc/passwd"));
        let err = PolicyType::Life.schema().validate(&input).unwrap_err();
        assert!(err.field_errors.contains_key("document"));
    }

    #[test]
    fn accept_drops_unknown_and_ownership_fields() {
        let input = doc(json!({ "policyHolderName": "A", "createdBy": "someone", "_id": "x", "colour": "red" }));
        let kept = PolicyType::Motor.schema().accept(&input);
        assert_eq!(kept.len(), 1);
        assert!(kept.contains_key("policyHolderName"));
    }

    #[test]
    fn parses_dates() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("2024-06-30T23:30:00-02:00"), NaiveDate::from_ymd_opt(2024, 7, 1));
        assert_eq!(parse_date("soon"), None);
    }
}
