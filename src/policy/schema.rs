use super::PolicyType;

/// Accepted values for the life policy `paymentMode` field
pub const PAYMENT_MODES: &[&str] = &["Monthly ECS", "Quarterly", "Half-Yearly", "Yearly"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty string
    Text,
    /// ISO calendar date, `YYYY-MM-DD` on the wire
    Date,
    /// Non-negative monetary amount
    Amount,
    /// Absolute http(s) URL to an externally stored document
    Link,
    /// `nnn/nn/nn` plan, term and premium-paying term
    PlanTermPpt,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Value stored when an optional field is omitted
    pub default: Option<&'static str>,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind, required: true, default: None }
}

const fn optional(name: &'static str, kind: FieldKind, default: Option<&'static str>) -> FieldSpec {
    FieldSpec { name, kind, required: false, default }
}

#[derive(Debug)]
pub struct PolicySchema {
    pub policy_type: PolicyType,
    /// Field used for month/year filtering and ordering
    pub date_field: &'static str,
    /// Field matched by free-text search
    pub name_field: &'static str,
    pub fields: &'static [FieldSpec],
}

impl PolicySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub(super) static HEALTH: PolicySchema = PolicySchema {
    policy_type: PolicyType::Health,
    date_field: "policyEndDate",
    name_field: "policyHolderName",
    fields: &[
        required("policyStartDate", FieldKind::Date),
        required("policyEndDate", FieldKind::Date),
        required("mobileNumber", FieldKind::Text),
        required("policyHolderName", FieldKind::Text),
        required("policyHolderDOB", FieldKind::Date),
        required("nomineeName", FieldKind::Text),
        required("nomineeDOB", FieldKind::Date),
        required("companyName", FieldKind::Text),
        required("tpaName", FieldKind::Text),
        required("premiumAmount", FieldKind::Amount),
        required("policyCopyLink", FieldKind::Link),
        optional("agentName", FieldKind::Text, Some("")),
    ],
};

pub(super) static MOTOR: PolicySchema = PolicySchema {
    policy_type: PolicyType::Motor,
    date_field: "policyEndDate",
    name_field: "policyHolderName",
    fields: &[
        required("registrationNumber", FieldKind::Text),
        required("policyStartDate", FieldKind::Date),
        required("policyEndDate", FieldKind::Date),
        required("policyNumber", FieldKind::Text),
        required("insuranceCompanyName", FieldKind::Text),
        required("mobileNumber", FieldKind::Text),
        required("policyHolderName", FieldKind::Text),
        required("policyHolderDOB", FieldKind::Date),
        required("nomineeName", FieldKind::Text),
        required("nomineeDOB", FieldKind::Date),
        required("agentName", FieldKind::Text),
        required("serviceProviderCompanyName", FieldKind::Text),
        required("premiumAmount", FieldKind::Amount),
        required("policyCopyLink", FieldKind::Link),
    ],
};

pub(super) static LIFE: PolicySchema = PolicySchema {
    policy_type: PolicyType::Life,
    date_field: "dateOfCommencement",
    name_field: "policyHolderName",
    fields: &[
        required("policyHolderName", FieldKind::Text),
        required("policyHolderAddress", FieldKind::Text),
        required("policyNumber", FieldKind::Text),
        required("dateOfCommencement", FieldKind::Date),
        required("planTermPPT", FieldKind::PlanTermPpt),
        required("premiumAmount", FieldKind::Amount),
        required("firstUnpaidPremium", FieldKind::Date),
        required("paymentMode", FieldKind::OneOf(PAYMENT_MODES)),
        required("sumAssured", FieldKind::Amount),
        required("dateOfLastPremium", FieldKind::Date),
        required("maturityAmount", FieldKind::Amount),
        required("mobileNumber", FieldKind::Text),
        required("dateOfBirth", FieldKind::Date),
        required("agentCode", FieldKind::Text),
        required("nomineeName", FieldKind::Text),
        required("nomineeRelation", FieldKind::Text),
        required("nomineeDOB", FieldKind::Date),
        optional("document", FieldKind::Link, None),
        optional("proposalForm", FieldKind::Link, None),
    ],
};
