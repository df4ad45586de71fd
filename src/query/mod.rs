pub mod prompts;

use crate::config::DatabaseConfig;
use crate::db::execute::{MySqlExecutor, QueryExecutor, ResultRow};
use crate::db::introspect;
use crate::llm::sanitize::strip_code_fences;
use crate::llm::{LlmError, TextGenerator};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tracing::{debug, error, info};

/// Final payload of a successful chat request. `sql_query` is always the
/// statement that actually produced `results` (the original on first
/// success, the corrected one after a retry).
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub sql_query: String,
    pub results: Vec<ResultRow>,
    pub explanation: String,
}

#[derive(Debug)]
pub enum ChatError {
    /// The text-generation service failed on either attempt; carries the raw
    /// failure details from the remote service.
    Generation {
        message: String,
        details: Option<String>,
    },
    /// SQL execution failed after the single correction attempt, or the
    /// execution connection could not be opened at all.
    Execution(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Generation { message, .. } => write!(f, "{}", message),
            ChatError::Execution(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for ChatError {}

impl From<LlmError> for ChatError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::ResponseError { message, details } => {
                ChatError::Generation { message, details }
            }
            other => ChatError::Generation {
                message: other.to_string(),
                details: None,
            },
        }
    }
}

/// Runs the whole question-to-answer workflow for one request:
/// schema fetch, SQL generation, execution with a single correction attempt
/// on statement failure, then a prose explanation of the results.
pub async fn answer_question(
    db: &DatabaseConfig,
    llm: &dyn TextGenerator,
    question: &str,
) -> Result<ChatResponse, ChatError> {
    // 1. Schema description, fetched fresh; introspection failure degrades
    //    to an error fragment and the workflow continues.
    let schema = introspect::describe_schema(db).await.join("\n");

    // 2. Primary SQL generation
    let raw_sql = llm.generate(&prompts::sql_prompt(&schema, question)).await?;
    let sql_query = strip_code_fences(&raw_sql);
    debug!("Generated SQL: {}", sql_query);

    // 3. The execution connection. Failing to open it is an infrastructure
    //    fault, not a statement failure: no correction attempt, straight to
    //    the generic error path.
    let mut executor = MySqlExecutor::connect(db)
        .await
        .map_err(|e| ChatError::Execution(e.to_string()))?;

    let response = execute_and_explain(llm, &mut executor, sql_query, question, &schema).await;
    executor.close().await;
    response
}

/// Executes the generated SQL with a single correction attempt on statement
/// failure, then asks for an explanation. Both attempts run on the same
/// executor; a failure of the corrected statement is final.
async fn execute_and_explain(
    llm: &dyn TextGenerator,
    executor: &mut dyn QueryExecutor,
    mut sql_query: String,
    question: &str,
    schema: &str,
) -> Result<ChatResponse, ChatError> {
    let results = match executor.run(&sql_query).await {
        Ok(rows) => rows,
        Err(db_err) => {
            let error_msg = db_err.to_string();
            info!("SQL execution failed, requesting correction: {}", error_msg);

            let raw_retry = llm
                .generate(&prompts::correction_prompt(&error_msg, question, schema))
                .await?;
            sql_query = strip_code_fences(&raw_retry);
            debug!("Corrected SQL: {}", sql_query);

            executor
                .run(&sql_query)
                .await
                .map_err(|e| ChatError::Execution(e.to_string()))?
        }
    };
    info!("Executed query returned {} rows", results.len());

    // Explanation failure is tolerated, the SQL and results are already
    // worth returning.
    let explanation = match llm.generate(&prompts::explain_prompt(&results)).await {
        Ok(text) => text,
        Err(e) => {
            error!("Explanation call failed: {}", e);
            String::new()
        }
    };

    Ok(ChatResponse {
        sql_query,
        results,
        explanation,
    })
}
