//! Line-oriented interactive front end for the query service

use std::io::Write;

use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;

use super::QueryOutcome;
use super::QueryService;
use crate::errors::Result;

const PROMPT: &str = "Enter your question: ";

/// Read questions from `input` until `exit` or end of input.
///
/// Only I/O failures on `input` or `out` end the loop early; every
/// per-question failure is printed and the loop carries on.
pub async fn run_shell<R, W>(service: &mut QueryService, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "--- FAQ assistant ---")?;
    writeln!(out, "Type your question and press Enter. Type 'exit' to quit.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            // End of input behaves like `exit`
            writeln!(out)?;
            render_outcome(&QueryOutcome::Quit, out)?;
            break;
        };

        let outcome = service.handle(&line).await;
        render_outcome(&outcome, out)?;
        if matches!(outcome, QueryOutcome::Quit) {
            break;
        }
    }

    Ok(())
}

/// Human readable rendering of one outcome
pub fn render_outcome<W: Write>(outcome: &QueryOutcome, out: &mut W) -> std::io::Result<()> {
    match outcome {
        QueryOutcome::Quit => writeln!(out, "Goodbye!"),
        QueryOutcome::NoInput => writeln!(out, "No question received!"),
        QueryOutcome::NoMatch => writeln!(out, "No similar FAQ found."),
        QueryOutcome::EmbeddingFailed(e) => {
            writeln!(out, "Could not process the question: {e}")
        }
        QueryOutcome::StorageFailed(e) => {
            writeln!(out, "Database error (transaction rolled back): {e}")
        }
        QueryOutcome::Found(found) => {
            let record = &found.record;
            writeln!(out, "Closest FAQ (distance {:.4}):", found.distance)?;
            writeln!(out, "FAQ: {}", record.question)?;
            writeln!(out, "URL: {}", record.url.as_deref().unwrap_or("-"))?;
            writeln!(out, "Answer: {}", record.answer)?;
            if !record.tags.is_empty() {
                writeln!(out, "Tags: {}", record.tags.join(", "))?;
            }
            if !record.suggestions.is_empty() {
                writeln!(out, "Suggested:")?;
                for suggestion in &record.suggestions {
                    match &suggestion.url {
                        Some(url) => writeln!(out, "  - {} ({url})", suggestion.text)?,
                        None => writeln!(out, "  - {}", suggestion.text)?,
                    }
                }
            }
            Ok(())
        }
    }
}
