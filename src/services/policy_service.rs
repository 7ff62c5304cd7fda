use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::database::models::PolicyRecord;
use crate::database::{DatabaseError, Store};
use crate::filter::{FilterParams, PolicyFilter, PolicyQuery};
use crate::policy::{Document, PolicyType, ValidationError};

#[derive(Debug, Error)]
pub enum PolicyError {
    /// Absent and not-owned records are reported the same way
    #[error("Policy not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// One CRUD and listing engine shared by every policy type
#[derive(Clone)]
pub struct PolicyService {
    store: Arc<dyn Store>,
}

impl PolicyService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        owner: Uuid,
        policy_type: PolicyType,
        params: &FilterParams,
    ) -> Result<Vec<PolicyRecord>, PolicyError> {
        self.list_as_of(owner, policy_type, params, Utc::now().date_naive()).await
    }

    /// Listing with an explicit "today", which supplies the year for month-only filters
    pub async fn list_as_of(
        &self,
        owner: Uuid,
        policy_type: PolicyType,
        params: &FilterParams,
        today: NaiveDate,
    ) -> Result<Vec<PolicyRecord>, PolicyError> {
        let query = PolicyQuery::new(owner, policy_type, PolicyFilter::resolve(params, today));
        Ok(self.store.find_policies(&query).await?)
    }

    pub async fn create(&self, owner: Uuid, policy_type: PolicyType, body: &Value) -> Result<PolicyRecord, PolicyError> {
        let schema = policy_type.schema();
        let fields = schema.validate(&schema.accept(as_document(body)?))?;

        let record = self.store.insert_policy(PolicyRecord::new(policy_type, owner, fields)).await?;
        info!(policy_type = %policy_type, id = %record.id, "Policy created");
        Ok(record)
    }

    /// Merge `body` onto the stored fields and re-validate the result
    pub async fn update(
        &self,
        owner: Uuid,
        policy_type: PolicyType,
        id: &str,
        body: &Value,
    ) -> Result<PolicyRecord, PolicyError> {
        let schema = policy_type.schema();
        let changes = schema.accept(as_document(body)?);

        let mut record = self.find_owned(owner, policy_type, id).await?;
        let mut merged = record.fields.clone();
        merged.extend(changes);

        record.fields = schema.validate(&merged)?;
        record.updated_at = Utc::now();

        if !self.store.replace_policy(&record).await? {
            return Err(PolicyError::NotFound);
        }
        info!(policy_type = %policy_type, id = %record.id, "Policy updated");
        Ok(record)
    }

    pub async fn delete(&self, owner: Uuid, policy_type: PolicyType, id: &str) -> Result<(), PolicyError> {
        let id = Uuid::parse_str(id).map_err(|_| PolicyError::NotFound)?;
        if !self.store.delete_policy(policy_type, id, owner).await? {
            return Err(PolicyError::NotFound);
        }
        info!(policy_type = %policy_type, id = %id, "Policy deleted");
        Ok(())
    }

    async fn find_owned(&self, owner: Uuid, policy_type: PolicyType, id: &str) -> Result<PolicyRecord, PolicyError> {
        let id = Uuid::parse_str(id).map_err(|_| PolicyError::NotFound)?;
        self.store
            .find_policy(policy_type, id, owner)
            .await?
            .ok_or(PolicyError::NotFound)
    }
}

fn as_document(body: &Value) -> Result<&Document, ValidationError> {
    body.as_object()
        .ok_or_else(|| ValidationError::new("Request body must be a JSON object"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use serde_json::json;

    fn motor(name: &str, end: &str) -> Value {
        json!({
            "registrationNumber": "MH12AB1234",
            "policyStartDate": "2024-01-01",
            "policyEndDate": end,
            "policyNumber": "MOT-1",
            "insuranceCompanyName": "ICICI Lombard",
            "mobileNumber": "9000000001",
            "policyHolderName": name,
            "policyHolderDOB": "1985-04-04",
            "nomineeName": "Sia",
            "nomineeDOB": "2010-09-09",
            "agentName": "Rakesh",
            "serviceProviderCompanyName": "PolicyBazaar",
            "premiumAmount": 4200,
            "policyCopyLink": "https://example.com/motor.pdf",
            "createdBy": Uuid::new_v4()
        })
    }

    #[tokio::test]
    async fn create_forces_owner_and_update_merges() {
        let svc = PolicyService::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::new_v4();

        let created = svc.create(owner, PolicyType::Motor, &motor("Dev", "2025-05-05")).await.unwrap();
        assert_eq!(created.created_by, owner);

        let updated = svc
            .update(owner, PolicyType::Motor, &created.id.to_string(), &json!({ "premiumAmount": 5000 }))
            .await
            .unwrap();
        assert_eq!(updated.fields["premiumAmount"], json!(5000));
        assert_eq!(updated.fields["policyHolderName"], json!("Dev"));
        assert_eq!(updated.created_by, owner);
    }

    #[tokio::test]
    async fn update_revalidates_merged_record() {
        let svc = PolicyService::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::new_v4();
        let created = svc.create(owner, PolicyType::Motor, &motor("Dev", "2025-05-05")).await.unwrap();

        let err = svc
            .update(owner, PolicyType::Motor, &created.id.to_string(), &json!({ "policyEndDate": "" }))
            .await
            .unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));
    }

    #[tokio::test]
    async fn foreign_and_malformed_ids_are_not_found() {
        let svc = PolicyService::new(Arc::new(MemoryStore::new()));
        let owner = Uuid::new_v4();
        let created = svc.create(owner, PolicyType::Motor, &motor("Dev", "2025-05-05")).await.unwrap();
        let id = created.id.to_string();

        let stranger = Uuid::new_v4();
        assert!(matches!(svc.delete(stranger, PolicyType::Motor, &id).await, Err(PolicyError::NotFound)));
        assert!(matches!(svc.delete(owner, PolicyType::Health, &id).await, Err(PolicyError::NotFound)));
        assert!(matches!(svc.delete(owner, PolicyType::Motor, "42").await, Err(PolicyError::NotFound)));
        assert!(svc.delete(owner, PolicyType::Motor, &id).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_non_object_bodies() {
        let svc = PolicyService::new(Arc::new(MemoryStore::new()));
        let err = svc.create(Uuid::new_v4(), PolicyType::Life, &json!([1, 2])).await.unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));
    }
}
