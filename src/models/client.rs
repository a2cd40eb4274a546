use serde::{Deserialize, Serialize};

use crate::error::{Result, ScorecardError};

// ---------------------------------------------------------------------------
// ClientRecord
// ---------------------------------------------------------------------------

/// A single credit applicant as stored in `clients.csv`.
///
/// All nine fields are mandatory; a row missing any of them fails
/// deserialization rather than surfacing as a half-filled record later.
/// Field names are serde-renamed to the upstream column names so the CSV
/// header and the scoring payload stay byte-compatible with the source data.
///
/// The `days_*` fields follow the upstream sign convention: a count of days
/// offset from "today", non-positive (negative = in the past). The scoring
/// endpoint expects that convention verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(rename = "SK_ID_CURR")]
    pub id: i64,
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

impl ClientRecord {
    /// Check the domain constraints that typed deserialization alone cannot:
    /// amounts non-negative, family count strictly positive, day offsets
    /// non-positive, and every value finite.
    ///
    /// Both the sampler and the table loader call this, so an invalid record
    /// is rejected at construction time rather than at first use.
    pub fn validate(&self) -> Result<()> {
        let fail = |why: String| {
            Err(ScorecardError::Data(format!("client {}: {}", self.id, why)))
        };

        for (name, value) in self.amount_fields() {
            if !value.is_finite() {
                return fail(format!("{name} is not a finite number"));
            }
            if value < 0.0 {
                return fail(format!("{name} must be non-negative, got {value}"));
            }
        }

        if !self.family_members.is_finite() {
            return fail("CNT_FAM_MEMBERS is not a finite number".to_string());
        }
        if self.family_members <= 0.0 {
            return fail(format!(
                "CNT_FAM_MEMBERS must be positive, got {}",
                self.family_members
            ));
        }

        for (name, value) in self.day_fields() {
            if !value.is_finite() {
                return fail(format!("{name} is not a finite number"));
            }
            if value > 0.0 {
                return fail(format!("{name} must be non-positive, got {value}"));
            }
        }

        Ok(())
    }

    fn amount_fields(&self) -> [(&'static str, f64); 3] {
        [
            ("AMT_INCOME_TOTAL", self.income_total),
            ("AMT_CREDIT", self.credit_amount),
            ("AMT_ANNUITY", self.annuity_amount),
        ]
    }

    fn day_fields(&self) -> [(&'static str, f64); 4] {
        [
            ("DAYS_BIRTH", self.days_birth),
            ("DAYS_EMPLOYED", self.days_employed),
            ("DAYS_REGISTRATION", self.days_registration),
            ("DAYS_ID_PUBLISH", self.days_id_publish),
        ]
    }
}
