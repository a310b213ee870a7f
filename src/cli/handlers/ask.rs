//! Ask command handler: one question, or an interactive session

use std::sync::Arc;

use tokio::io::BufReader;

use crate::cli::output::print_info;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::query::render_outcome;
use crate::query::run_shell;
use crate::query::QueryOutcome;
use crate::query::QueryService;
use crate::AppConfig;
use crate::FaqRagError;
use crate::Result;

/// Handle ask command.
///
/// Startup failures (embedding model, database connection) are returned
/// before any question is read.
pub async fn handle_ask_command(
    config: &AppConfig,
    question: Option<String>,
    json: bool,
) -> Result<()> {
    let embedder = Arc::new(EmbeddingService::init(config).await?);
    let database = Database::from_config(config).await?;
    let mut service = QueryService::new(embedder.clone(), Arc::new(database.clone()));

    let result = match question {
        Some(question) => answer_once(&mut service, &question, json).await,
        None => {
            print_info(&format!(
                "Embedding model '{}' and database '{}' ready",
                embedder.model(),
                config.database.name
            ));
            run_shell(
                &mut service,
                BufReader::new(tokio::io::stdin()),
                &mut std::io::stdout(),
            )
            .await
        }
    };

    drop(service);
    database.close().await;
    if let Ok(service) = Arc::try_unwrap(embedder) {
        service.shutdown();
    }
    result
}

async fn answer_once(service: &mut QueryService, question: &str, json: bool) -> Result<()> {
    match service.handle(question).await {
        QueryOutcome::EmbeddingFailed(e) => Err(FaqRagError::EmbeddingError(e)),
        QueryOutcome::StorageFailed(e) => Err(FaqRagError::StorageError(e)),
        QueryOutcome::Found(mut found) if json => {
            found.record.embedding = None;
            println!("{}", serde_json::to_string_pretty(&found)?);
            Ok(())
        }
        QueryOutcome::NoMatch if json => {
            println!("null");
            Ok(())
        }
        outcome => Ok(render_outcome(&outcome, &mut std::io::stdout())?),
    }
}
