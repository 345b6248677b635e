use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of `test_results`, as inserted by the results service.
///
/// `id`, `test_date` and `created_at` are filled in by column defaults when
/// left out of an insert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_phone: String,
    pub skill_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_date: Option<DateTime<Utc>>,
    pub score: i32,
    pub total_questions: i32,
    pub percentage: i32,
    pub performance_level: String,
    pub self_evaluation: String,
    pub assessment: String,
    pub detailed_results: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
