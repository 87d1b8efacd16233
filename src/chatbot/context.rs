use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::first_non_empty;

/// Report row as the app stores it. All fields are optional: older reports
/// were saved before some columns existed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "type", default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub lab_name: Option<String>,
    #[serde(default)]
    pub flag_level: Option<String>,
}

/// One measured parameter. `value` may be numeric or text depending on how
/// the extraction read it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParameter {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub normal_range: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParameterExplanation {
    #[serde(default)]
    pub parameter_id: Option<Value>,
    #[serde(default)]
    pub meaning: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportContext<'a> {
    report_metadata: ReportMetadata<'a>,
    parameters: Vec<ContextParameter<'a>>,
}

#[derive(Debug, Serialize)]
struct ReportMetadata<'a> {
    #[serde(rename = "type")]
    report_type: Option<&'a str>,
    date: Option<&'a str>,
    lab: Option<&'a str>,
    overall_flag: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ContextParameter<'a> {
    name: Option<&'a str>,
    value: Option<&'a Value>,
    unit: Option<&'a str>,
    ref_range: Option<&'a str>,
    flag: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation_meaning: Option<&'a str>,
}

/// Explanation attached to this parameter. Both ids must be present.
fn find_explanation<'a>(
    parameter: &ReportParameter,
    explanations: &'a [ParameterExplanation],
) -> Option<&'a ParameterExplanation> {
    let id = parameter.id.as_ref()?;
    explanations
        .iter()
        .find(|e| e.parameter_id.as_ref() == Some(id))
}

/// Pretty-printed JSON context for the model: report metadata plus each
/// parameter with its explanation folded in.
pub fn build_context_json(
    report: &ReportRecord,
    parameters: &[ReportParameter],
    explanations: &[ParameterExplanation],
) -> Result<String, serde_json::Error> {
    let context = ReportContext {
        report_metadata: ReportMetadata {
            report_type: report.report_type.as_deref(),
            date: report.date.as_deref(),
            lab: report.lab_name.as_deref(),
            overall_flag: report.flag_level.as_deref(),
        },
        parameters: parameters
            .iter()
            .map(|p| ContextParameter {
                name: p.name.as_deref(),
                value: p.value.as_ref(),
                unit: p.unit.as_deref(),
                ref_range: first_non_empty(&[p.range.as_deref(), p.normal_range.as_deref()]),
                flag: p.flag.as_deref(),
                explanation_meaning: find_explanation(p, explanations)
                    .and_then(|e| e.meaning.as_deref()),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hemoglobin() -> ReportParameter {
        serde_json::from_value(json!({
            "id": 7,
            "name": "Hemoglobin",
            "value": 13.5,
            "unit": "g/dL",
            "range": "",
            "normal_range": "12-16",
            "flag": "normal"
        }))
        .unwrap()
    }

    #[test]
    fn metadata_maps_report_columns() {
        let report: ReportRecord = serde_json::from_value(json!({
            "type": "CBC",
            "date": "2025-03-01",
            "lab_name": "City Lab",
            "flag_level": "Normal",
            "user_id": "ignored"
        }))
        .unwrap();

        let ctx: Value = serde_json::from_str(&build_context_json(&report, &[], &[]).unwrap()).unwrap();

        assert_eq!(ctx["report_metadata"]["type"], "CBC");
        assert_eq!(ctx["report_metadata"]["lab"], "City Lab");
        assert_eq!(ctx["report_metadata"]["overall_flag"], "Normal");
        assert_eq!(ctx["parameters"], json!([]));
    }

    #[test]
    fn ref_range_falls_back_to_normal_range() {
        let ctx: Value = serde_json::from_str(
            &build_context_json(&ReportRecord::default(), &[hemoglobin()], &[]).unwrap(),
        )
        .unwrap();
        assert_eq!(ctx["parameters"][0]["ref_range"], "12-16");
        assert_eq!(ctx["parameters"][0]["value"], 13.5);
    }

    #[test]
    fn explanation_is_attached_by_parameter_id() {
        let explanations = vec![
            ParameterExplanation { parameter_id: Some(json!(3)), meaning: Some("other".into()) },
            ParameterExplanation {
                parameter_id: Some(json!(7)),
                meaning: Some("Carries oxygen in the blood.".into()),
            },
        ];
        let ctx: Value = serde_json::from_str(
            &build_context_json(&ReportRecord::default(), &[hemoglobin()], &explanations).unwrap(),
        )
        .unwrap();
        assert_eq!(
            ctx["parameters"][0]["explanation_meaning"],
            "Carries oxygen in the blood."
        );
    }

    #[test]
    fn no_explanation_key_without_match() {
        let mut param = hemoglobin();
        param.id = None;
        let explanations = vec![ParameterExplanation { parameter_id: None, meaning: Some("x".into()) }];
        let ctx: Value = serde_json::from_str(
            &build_context_json(&ReportRecord::default(), &[param], &explanations).unwrap(),
        )
        .unwrap();
        assert!(ctx["parameters"][0].get("explanation_meaning").is_none());
    }

    #[test]
    fn output_is_two_space_indented() {
        let text = build_context_json(&ReportRecord::default(), &[], &[]).unwrap();
        assert!(text.starts_with("{\n  \"report_metadata\": {\n    \"type\": null"));
    }
}
