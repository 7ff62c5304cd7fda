use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use uuid::Uuid;

use crate::policy::validate::parse_date;
use crate::policy::{Document, PolicyType};

/// One stored policy document. `created_by` is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyRecord {
    pub id: Uuid,
    pub policy_type: PolicyType,
    pub created_by: Uuid,
    pub fields: Document,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PolicyRecord {
    pub fn new(policy_type: PolicyType, created_by: Uuid, fields: Document) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            policy_type,
            created_by,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Value of the type's designated date field (`policyEndDate` or `dateOfCommencement`)
    pub fn designated_date(&self) -> Option<NaiveDate> {
        self.fields
            .get(self.policy_type.schema().date_field)
            .and_then(|v| v.as_str())
            .and_then(parse_date)
    }

    pub fn holder_name(&self) -> &str {
        self.fields
            .get(self.policy_type.schema().name_field)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

// Flattened wire shape: {id, ...fields, createdBy, createdAt, updatedAt}
impl Serialize for PolicyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 4))?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("createdBy", &self.created_by)?;
        map.serialize_entry("createdAt", &self.created_at)?;
        map.serialize_entry("updatedAt", &self.updated_at)?;
        map.end()
    }
}
