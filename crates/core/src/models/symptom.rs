use serde::{Deserialize, Serialize};

use super::provider::Provider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeSymptomsRequest {
    pub symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAssessment {
    pub specialization: String,
    pub matched_keyword: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeSymptomsResponse {
    #[serde(flatten)]
    pub assessment: SymptomAssessment,
    pub doctors: Vec<Provider>,
}
