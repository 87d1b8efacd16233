pub const VALIDATION_PROMPT: &str =
    "Is this image a medical lab report or health document? Reply strictly with YES or NO.";

pub const ANALYSIS_PROMPT: &str = r#"You are an expert medical AI assistant. Analyze this medical lab report image and extract the following information in strict JSON format:

1.  **patient_name**: Name of the patient. Return null if not explicitly found. DO NOT guess or return "Unknown".
2.  **patient_age**: Age of the patient. Look for labels like "Age", "Age / Gender", "Age/Sex", "Age (Yrs)".
    - If you see "Age / Gender : 20 Yrs / Female", extract "20 Yrs" exactly.
    - Include the unit if present (e.g., "20 Yrs", "20 Years").
    - Return strictly text as seen. Return null if not explicitly found.
3.  **patient_sex**: Sex/Gender. Look for labels like "Gender", "Sex", "Age / Gender".
    - If you see "Age / Gender : 20 Yrs / Female", extract "Female" exactly.
    - Return strictly text as seen (e.g., "Male", "Female", "M", "F"). Return null if not explicitly found.
4.  **date**: Date of the report (YYYY-MM-DD format required. Return null if not found or ambiguous).
5.  **lab_name**: Name of the laboratory/hospital.
6.  **report_type**: Type of report (e.g., "CBC", "Lipid Profile", "Thyroid Profile").
7.  **overall_health_indication**: A one-word status of the report (e.g., "Normal", "Mildly Abnormal", "Attention Required").
8.  **clinical_summary**: A concise, holistic clinical summary of the entire report for the patient.
    - Explain the overall health indication.
    - Reassure the user where results are normal.
    - Briefly mention areas that might need attention without being alarming.
    - Use very simple English (10th-grade level).
    - Tone: Calm, professional, reassuring.
9.  **parameters**: A list of test results, where each item has:
    -   **name**: Name of the test/parameter.
    -   **value**: Measured value.
    -   **unit**: Unit of measurement (e.g., mg/dL).
    -   **normal_range**: Reference range provided in the report.
    -   **flag**: "high", "low", or "normal" based on the value and range.
    -   **category**: The physiological system or category this test belongs to (e.g., "Blood Counts", "White Blood Cell Profile", "Liver Function", "Kidney Function").
    -   **explanation**: A conceptual explanation of the test.
        -   Explain WHAT the test measures.
        -   Explain WHY it is important.
        -   Explain what a NORMAL result generally means.
        -   MUST NOT repeat the reference range.
        -   MUST NOT use medical jargon.
10. **system_summaries**: A list of objects summarizing groups of parameters:
    -   **category**: The category name (e.g., "Blood Counts").
    -   **status**: "Normal" or "Attention Required".
    -   **description**: A brief (1-2 sentence) explanation of what these results mean for that system. Use reassurance for normal systems.
11. **normal_values_summary**: A single, reassuring paragraph summarizing all the parameters that are within normal range.
    - Mention the key systems/categories that are healthy (e.g., "Your Kidney Function and Electrolytes are within normal limits").
    - Do not list every single parameter.
    - Keep it concise and encouraging.
12. **summary**: A brief, friendly 2-3 sentence overview for the home screen.

Return ONLY the valid JSON object. Do not include markdown code blocks or additional text."#;

const JSON_SUFFIX: &str = "\n\nReturn strict JSON.";

/// Append a JSON instruction unless the prompt already asks for JSON.
pub fn ensure_json_instruction(prompt: &str) -> String {
    if prompt.contains("JSON") {
        prompt.to_string()
    } else {
        format!("{prompt}{JSON_SUFFIX}")
    }
}

pub fn build_report_chat_prompt(report_context: &str, question: &str) -> String {
    format!(
        "Context: The user has uploaded a medical report with the following details:\n\
         {report_context}\n\n\
         User Question: {question}\n\n\
         Answer the user's question accurately, helpful, and empathetic manner based ONLY on the provided context.\n\
         If the answer is not in the report, use general medical knowledge but clarify that it's general advice.\n\
         Keep the answer concise and easy to understand."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_instruction_added_once() {
        assert_eq!(
            ensure_json_instruction("List the tests."),
            "List the tests.\n\nReturn strict JSON."
        );
        assert_eq!(ensure_json_instruction("Return JSON please"), "Return JSON please");
    }

    #[test]
    fn chat_prompt_embeds_context_and_question() {
        let prompt = build_report_chat_prompt("TSH: 2.1 mIU/L", "Is my thyroid ok?");
        assert!(prompt.contains("following details:\nTSH: 2.1 mIU/L\n\nUser Question: Is my thyroid ok?"));
        assert!(prompt.contains("based ONLY on the provided context"));
    }

    #[test]
    fn analysis_prompt_lists_every_field() {
        for field in [
            "patient_name", "patient_age", "patient_sex", "date", "lab_name", "report_type",
            "overall_health_indication", "clinical_summary", "parameters", "system_summaries",
            "normal_values_summary", "summary",
        ] {
            assert!(ANALYSIS_PROMPT.contains(&format!("**{field}**")), "missing {field}");
        }
    }
}
