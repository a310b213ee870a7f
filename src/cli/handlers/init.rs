//! Database initialization handler

use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::database::Database;
use crate::database::FAQ_TABLE;
use crate::AppConfig;
use crate::FaqRagError;
use crate::Result;

/// Handle database initialization command
pub async fn handle_init_command(config: &AppConfig, skip_index: bool) -> Result<()> {
    let database = Database::from_config(config).await?;

    print_info("🗄️  Initializing faqrag database...");
    if let Err(e) = database.init_schema().await {
        if e.to_string().contains("vector") || e.to_string().contains("extension") {
            print_warning(&format!("Could not enable the pgvector extension: {e}"));
            print_warning("Install pgvector on the server, then as a superuser run:");
            println!(
                "  psql -d {} -c 'CREATE EXTENSION IF NOT EXISTS vector;'",
                config.database.name
            );
        }
        return Err(e);
    }
    print_success(&format!(
        "Table '{FAQ_TABLE}' ready (embedding dimension {})",
        database.dimension()
    ));

    if skip_index || !config.vector_index_enabled() {
        print_info("⏭️  Skipping vector index creation");
    } else {
        print_info("📊 Creating HNSW vector index...");
        database.create_vector_index(&config.performance).await?;
        print_success("Vector index created");
    }

    if !database.is_schema_initialized().await? {
        return Err(FaqRagError::StorageError(format!(
            "table '{FAQ_TABLE}' is missing after initialization"
        )));
    }

    database.close().await;
    print_success("🎉 Database initialization complete!");
    print_info("To load records, run:");
    println!("   faqrag ingest <records.json>");
    Ok(())
}
