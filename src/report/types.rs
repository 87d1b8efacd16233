use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::LlmError;

/// Structured extraction of one lab-report image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportAnalysis {
    pub patient_name: Option<String>,
    pub patient_age: Option<String>,
    pub patient_sex: Option<String>,
    /// `YYYY-MM-DD` as the model returned it; see [`ReportAnalysis::report_date`].
    pub date: Option<String>,
    pub lab_name: Option<String>,
    pub report_type: Option<String>,
    pub overall_health_indication: Option<String>,
    pub clinical_summary: Option<String>,
    pub parameters: Vec<AnalyzedParameter>,
    pub system_summaries: Vec<SystemSummary>,
    pub normal_values_summary: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedParameter {
    pub name: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub normal_range: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSummary {
    pub category: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ReportAnalysis {
    /// Parse the model's JSON object. Scalar fields of the wrong type become
    /// `None`; list items that do not deserialize are dropped.
    pub fn from_json(value: &Value) -> Result<Self, LlmError> {
        let obj = value
            .as_object()
            .ok_or_else(|| LlmError::JsonParsing("Expected a JSON object".into()))?;

        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(String::from);

        Ok(Self {
            patient_name: text("patient_name"),
            patient_age: text("patient_age"),
            patient_sex: text("patient_sex"),
            date: text("date"),
            lab_name: text("lab_name"),
            report_type: text("report_type"),
            overall_health_indication: text("overall_health_indication"),
            clinical_summary: text("clinical_summary"),
            parameters: parse_array_lenient(obj.get("parameters")),
            system_summaries: parse_array_lenient(obj.get("system_summaries")),
            normal_values_summary: text("normal_values_summary"),
            summary: text("summary"),
        })
    }

    /// The report date, when the model returned a valid ISO date.
    pub fn report_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Parameters flagged `high` or `low`.
    pub fn abnormal_parameters(&self) -> impl Iterator<Item = &AnalyzedParameter> {
        self.parameters.iter().filter(|p| {
            p.flag
                .as_deref()
                .is_some_and(|f| f.eq_ignore_ascii_case("high") || f.eq_ignore_ascii_case("low"))
        })
    }
}

/// Parse an array leniently — skip items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(items: Option<&Value>) -> Vec<T> {
    match items.and_then(Value::as_array) {
        None => vec![],
        Some(arr) => arr
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
    }
}
