use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://impl-mentez-un-modele-de-scoring.onrender.com/predict";

pub const DEFAULT_SOURCE_FILE: &str = "application_train.csv";
pub const DEFAULT_CLIENTS_FILE: &str = "clients.csv";

pub const DEFAULT_SAMPLE_SIZE: usize = 1000;
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Operating point of the deployed scoring model. Both values are policy
/// defaults, not universal constants; they move if the model is retrained.
pub const DEFAULT_THRESHOLD: f64 = 0.65;
pub const DEFAULT_CAUTION_MARGIN: f64 = 0.05;

pub const ACCEPT_LABEL: &str = "Crédit accordé";
pub const REFUSE_LABEL: &str = "Crédit refusé";

/// Column order of the client table file. The scoring endpoint and the
/// sampler both depend on these exact upstream names.
pub const ID_COLUMN: &str = "SK_ID_CURR";

pub const FEATURE_COLUMNS: [&str; 8] = [
    "AMT_INCOME_TOTAL",
    "AMT_CREDIT",
    "AMT_ANNUITY",
    "CNT_FAM_MEMBERS",
    "DAYS_BIRTH",
    "DAYS_EMPLOYED",
    "DAYS_REGISTRATION",
    "DAYS_ID_PUBLISH",
];

pub fn required_columns() -> Vec<&'static str> {
    let mut cols = vec![ID_COLUMN];
    cols.extend(FEATURE_COLUMNS);
    cols
}
