//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::*;
    use crate::FaqRagError;

    const FULL_CONFIG: &str = r#"
[database]
host = "db.internal"
port = 5433
name = "faqs"
user = "faq"
password = "secret"

[embeddings]
model = "all-minilm"
dimension = 384
"#;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn expect_config_error(result: crate::Result<AppConfig>) -> String {
        match result {
            Err(FaqRagError::ConfigError(msg)) => msg,
            Err(other) => panic!("expected ConfigError, got {other}"),
            Ok(_) => panic!("expected ConfigError, got a config"),
        }
    }

    // ====== Loading ======

    #[test]
    fn test_full_file_loads_with_defaults() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = AppConfig::from_sources(Some(&path), true, vars(&[])).unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.max_connections(), 5);
        assert_eq!(config.min_connections(), 1);
        assert_eq!(config.statement_timeout().as_secs(), 30);
        assert_eq!(config.embedding_dimension(), 384);
        assert_eq!(config.embeddings.provider, ProviderKind::Ollama);
        assert_eq!(config.ingest.concurrency, 4);
        assert!(!config.ingest.dedup);
        assert!(config.vector_index_enabled());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_environment_only() {
        let config = AppConfig::from_sources(
            None,
            false,
            vars(&[
                ("DB_HOST", "localhost"),
                ("DB_PORT", "5432"),
                ("DB_NAME", "faqs"),
                ("DB_USER", "faq"),
                ("DB_PASSWORD", "pw"),
            ]),
        )
        .unwrap();

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.password, "pw");
    }

    #[test]
    fn test_required_file_must_exist() {
        let err = AppConfig::from_sources(Some(Path::new("/nonexistent/faqrag.toml")), true, vars(&[]))
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_optional_file_may_be_missing() {
        let msg = expect_config_error(AppConfig::from_sources(
            Some(Path::new("/nonexistent/faqrag.toml")),
            false,
            vars(&[]),
        ));
        // Falls through to validation, which names the first missing field
        assert!(msg.contains("database.host is required"), "{msg}");
    }

    // ====== Validation ======

    #[test]
    fn test_missing_field_is_named() {
        let (_dir, path) = write_config(
            r#"
[database]
host = "localhost"
port = 5432
name = "faqs"
user = "faq"
"#,
        );
        let msg = expect_config_error(AppConfig::from_sources(Some(&path), true, vars(&[])));
        assert!(msg.contains("database.password is required"), "{msg}");
    }

    #[test]
    fn test_blank_field_counts_as_missing() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let msg = expect_config_error(AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[("DB_USER", "  ")]),
        ));
        assert!(msg.contains("database.user is required"), "{msg}");
    }

    #[test]
    fn test_non_numeric_port_rejected() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let msg = expect_config_error(AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[("DB_PORT", "fifty")]),
        ));
        assert!(msg.contains("'fifty' is not a valid port number"), "{msg}");
    }

    #[test]
    fn test_out_of_range_port_rejected() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let result = AppConfig::from_sources(Some(&path), true, vars(&[("DB_PORT", "70000")]));
        assert!(matches!(result, Err(FaqRagError::ConfigError(_))));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let result = AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[("FAQRAG__EMBEDDINGS__DIMENSION", "0")]),
        );
        assert!(matches!(result, Err(FaqRagError::ConfigError(_))));
    }

    #[test]
    fn test_zero_statement_timeout_rejected() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let msg = expect_config_error(AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[("FAQRAG__DATABASE__STATEMENT_TIMEOUT_SECS", "0")]),
        ));
        assert!(msg.contains("statement_timeout_secs"), "{msg}");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let msg = expect_config_error(AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[("FAQRAG__INGEST__BASE_URL", "not a url")]),
        ));
        assert!(msg.contains("ingest.base_url"), "{msg}");
    }

    // ====== Precedence ======

    #[test]
    fn test_db_variables_override_file() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[("DB_HOST", "10.0.0.7"), ("DB_PORT", "6543")]),
        )
        .unwrap();

        assert_eq!(config.database.host, "10.0.0.7");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.name, "faqs");
    }

    #[test]
    fn test_prefixed_variables_override_file() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[
                ("FAQRAG__EMBEDDINGS__PROVIDER", "openai"),
                ("FAQRAG__INGEST__CONCURRENCY", "8"),
                ("FAQRAG__INGEST__DEDUP", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.embeddings.provider, ProviderKind::OpenAI);
        assert_eq!(config.ingest.concurrency, 8);
        assert!(config.ingest.dedup);
    }

    #[test]
    fn test_prefixed_variables_beat_db_variables() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[
                ("FAQRAG__DATABASE__HOST", "prefixed"),
                ("DB_HOST", "plain"),
                ("DB_USER", "plain-user"),
            ]),
        )
        .unwrap();
        assert_eq!(config.database.host, "prefixed");
        assert_eq!(config.database.user, "plain-user");
    }

    #[test]
    fn test_numeric_looking_strings_kept_verbatim() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[
                ("FAQRAG__DATABASE__PASSWORD", "007"),
                ("DB_NAME", "1e3"),
                ("FAQRAG__EMBEDDINGS__API_KEY", "0123"),
            ]),
        )
        .unwrap();
        assert_eq!(config.database.password, "007");
        assert_eq!(config.database.name, "1e3");
        assert_eq!(config.embeddings.api_key.as_deref(), Some("0123"));
    }

    // ====== Redaction ======

    #[test]
    fn test_redacted_masks_secrets() {
        let (_dir, path) = write_config(FULL_CONFIG);
        let config = AppConfig::from_sources(
            Some(&path),
            true,
            vars(&[("FAQRAG__EMBEDDINGS__API_KEY", "sk-live")]),
        )
        .unwrap();

        let redacted = config.redacted();
        assert_eq!(redacted.database.password, "********");
        assert_eq!(redacted.embeddings.api_key.as_deref(), Some("********"));
        assert_eq!(redacted.database.host, config.database.host);
    }
}
