//! CLI output formatting utilities
//!
//! This module provides consistent output formatting for the `faqrag` CLI

use crate::ingest::IngestReport;
use crate::AppConfig;
use crate::FaqRagError;

/// Safely truncate a string at character boundary (not byte boundary)
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Print an ingestion report
pub fn print_ingest_report(report: &IngestReport) {
    println!("📥 Ingestion report:");
    println!("  Records read: {}", report.total);
    println!(
        "  Embeddings: {} computed, {} reused, {} failed",
        report.embedding.embedded, report.embedding.reused, report.embedding.failed
    );
    println!("  Inserted: {}", report.inserted);
    println!("  Skipped: {}", report.skipped_total());
    for (label, count) in report.skipped.breakdown() {
        println!("    - {label}: {count}");
    }

    if !report.skipped_records.is_empty() {
        println!();
        println!("  Skipped records:");
        for skipped in report.skipped_records.iter().take(20) {
            println!(
                "    #{} {:?}: {}",
                skipped.index,
                truncate_str(&skipped.question, 60),
                skipped.reason
            );
        }
        if report.skipped_records.len() > 20 {
            println!("    ... and {} more", report.skipped_records.len() - 20);
        }
    }
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    println!("📋 faqrag configuration:");
    println!();
    match toml::to_string_pretty(&config.redacted()) {
        Ok(text) => println!("{text}"),
        Err(e) => print_error(&format!("Cannot render configuration: {e}")),
    }
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("❌ {msg}");
}

/// Follow-up advice for a failed command, if any
#[must_use]
pub const fn failure_hint(err: &FaqRagError) -> Option<&'static str> {
    if err.is_fatal() {
        Some("Check the configuration with: faqrag config")
    } else {
        None
    }
}

/// Print a failed command's error once, followed by its hint
pub fn print_failure(err: &FaqRagError) {
    print_error(&err.to_string());
    if let Some(hint) = failure_hint(err) {
        eprintln!("\n💡 {hint}");
    }
}
