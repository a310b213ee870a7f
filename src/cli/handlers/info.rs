//! Information display handlers (stats, config)

use crate::cli::output::print_config;
use crate::cli::output::print_info;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::database::FaqStore;
use crate::database::FAQ_TABLE;
use crate::AppConfig;
use crate::Result;

pub async fn handle_stats_command(config: &AppConfig) -> Result<()> {
    let database = Database::from_config(config).await?;

    if database.is_schema_initialized().await? {
        let count = database.count().await?;
        print_info(&format!("📊 {count} records in '{FAQ_TABLE}'"));
        println!("  Embedding dimension: {}", database.dimension());
        println!("  Embedding model: {}", config.embedding_model());
    } else {
        print_warning(&format!(
            "Table '{FAQ_TABLE}' does not exist yet; run `faqrag init`"
        ));
    }

    database.close().await;
    Ok(())
}

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
