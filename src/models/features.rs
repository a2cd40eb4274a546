use serde::{Deserialize, Serialize};

use crate::error::{Result, ScorecardError};
use crate::models::client::ClientRecord;

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// The eight non-id fields of a client, serialized under the exact upstream
/// key names. The endpoint schema is strict about shape: exactly these keys,
/// no more, no fewer. Using a fixed struct (rather than a map assembled at
/// call sites) makes any other shape unrepresentable.
///
/// `days_*` values carry the stored sign convention: non-positive, counting
/// days back from "today".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "AMT_INCOME_TOTAL")]
    pub income_total: f64,
    #[serde(rename = "AMT_CREDIT")]
    pub credit_amount: f64,
    #[serde(rename = "AMT_ANNUITY")]
    pub annuity_amount: f64,
    #[serde(rename = "CNT_FAM_MEMBERS")]
    pub family_members: f64,
    #[serde(rename = "DAYS_BIRTH")]
    pub days_birth: f64,
    #[serde(rename = "DAYS_EMPLOYED")]
    pub days_employed: f64,
    #[serde(rename = "DAYS_REGISTRATION")]
    pub days_registration: f64,
    #[serde(rename = "DAYS_ID_PUBLISH")]
    pub days_id_publish: f64,
}

impl FeatureVector {
    /// Build the payload for a stored client. Stored records already carry
    /// negative day offsets, so every field copies over unchanged.
    pub fn from_record(record: &ClientRecord) -> Self {
        Self {
            income_total: record.income_total,
            credit_amount: record.credit_amount,
            annuity_amount: record.annuity_amount,
            family_members: record.family_members,
            days_birth: record.days_birth,
            days_employed: record.days_employed,
            days_registration: record.days_registration,
            days_id_publish: record.days_id_publish,
        }
    }
}

impl From<&ClientRecord> for FeatureVector {
    fn from(record: &ClientRecord) -> Self {
        FeatureVector::from_record(record)
    }
}

// ---------------------------------------------------------------------------
// SimulationInput
// ---------------------------------------------------------------------------

/// What a person types into the simulation form: the four amounts plus four
/// **non-negative** "how long ago, in days" values (age, employment,
/// registration, id publication).
///
/// [`to_features`](Self::to_features) is the single place where the sign
/// convention flips: each day value is negated exactly once. Inputs are kept
/// positive in this type and negative in [`FeatureVector`], so neither a
/// missed nor a doubled negation can slip through the types.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    pub income_total: f64,
    pub credit_amount: f64,
    pub annuity_amount: f64,
    pub family_members: f64,
    /// Age in days (non-negative).
    pub age_days: f64,
    /// Days since employment started (non-negative).
    pub employed_days: f64,
    /// Days since registration (non-negative).
    pub registration_days: f64,
    /// Days since the identity document was published (non-negative).
    pub id_publish_days: f64,
}

impl SimulationInput {
    /// Prefill the form from a stored client, the way the dashboard seeds the
    /// simulation view: amounts copy over, stored non-positive day offsets are
    /// flipped to the positive "days ago" convention.
    pub fn from_record(record: &ClientRecord) -> Self {
        Self {
            income_total: record.income_total,
            credit_amount: record.credit_amount,
            annuity_amount: record.annuity_amount,
            family_members: record.family_members,
            age_days: -record.days_birth,
            employed_days: -record.days_employed,
            registration_days: -record.days_registration,
            id_publish_days: -record.days_id_publish,
        }
    }

    /// Convert to the endpoint payload, negating each day field exactly once.
    ///
    /// A negative day input is rejected before any negation happens: it would
    /// end up positive on the wire, a semantically invalid request the
    /// endpoint cannot be trusted to reject.
    pub fn to_features(&self) -> Result<FeatureVector> {
        for (name, value) in [
            ("age in days", self.age_days),
            ("days employed", self.employed_days),
            ("days since registration", self.registration_days),
            ("days since id publication", self.id_publish_days),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ScorecardError::InvalidArgument(format!(
                    "{name} must be a non-negative number of days, got {value}"
                )));
            }
        }

        Ok(FeatureVector {
            income_total: self.income_total,
            credit_amount: self.credit_amount,
            annuity_amount: self.annuity_amount,
            family_members: self.family_members,
            days_birth: -self.age_days,
            days_employed: -self.employed_days,
            days_registration: -self.registration_days,
            days_id_publish: -self.id_publish_days,
        })
    }
}
