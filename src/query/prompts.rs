use crate::db::execute::ResultRow;

/// Prompt asking the LLM to translate a question into SQL, grounded in the
/// schema description.
pub fn sql_prompt(schema: &str, question: &str) -> String {
    format!(
        r#"Convert this question into a valid MySQL SQL query.
Use the following schema for accuracy:
{}

Only return the SQL query.

User question: {}
"#,
        schema, question
    )
}

/// Correction prompt carrying the database error from the failed attempt.
pub fn correction_prompt(error: &str, question: &str, schema: &str) -> String {
    format!(
        r#"The previous SQL query caused an error: "{}"

Please generate a corrected SQL query for:
"{}"
Using this schema:
{}

Only return the corrected SQL query.
"#,
        error, question, schema
    )
}

/// Prompt asking the LLM to explain a result set in prose.
pub fn explain_prompt(results: &[ResultRow]) -> String {
    format!(
        "Explain these SQL results in simple terms: {}",
        serde_json::to_string(results).unwrap_or_default()
    )
}
