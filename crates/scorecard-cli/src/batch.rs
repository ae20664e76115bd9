//! CSV batch mode: one input row per repository, one output row per result.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use scorecard_core::report::{header_record, render_table, score_record};
use scorecard_core::{AppError, RepoRef, Transport};

use crate::scorer::Scorer;

/// Counts reported once a batch completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub repositories: usize,
}

/// Score every repository listed in `input` and write one record per row to
/// `output`.
///
/// The input's first row is a header and is skipped. Field 0 and field 1
/// are copied to the output as the row's identity; field 1 must be a
/// github.com repository URL. Each output row is flushed as soon as it is
/// written and its results table is printed, so a batch that stops early
/// keeps everything scored before the failing row. A malformed row or an
/// unsupported host stops the batch.
pub async fn run_batch<T, R, W>(
    scorer: &Scorer<T>,
    input: R,
    output: W,
    write_header: bool,
) -> Result<BatchSummary>
where
    T: Transport + Clone + 'static,
    R: Read,
    W: Write,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(output);

    if write_header {
        let headers = reader.headers().context("Failed to read input header")?;
        let identity: Vec<String> = headers.iter().take(2).map(String::from).collect();
        writer
            .write_record(header_record(&identity, &scorer.check_names()))
            .context("Failed to write output header")?;
        writer.flush().context("Failed to flush output")?;
    }

    let mut summary = BatchSummary::default();
    for (index, record) in reader.records().enumerate() {
        // +1 for the header row, +1 for 1-based line numbers.
        let line = index + 2;
        let record = record.with_context(|| format!("Failed to read input line {line}"))?;

        if record.len() < 2 {
            return Err(AppError::InvalidInput(format!(
                "line {line}: expected at least 2 fields, found {}",
                record.len()
            ))
            .into());
        }

        let identity = vec![record[0].to_string(), record[1].to_string()];
        let repo = RepoRef::parse(&record[1]).with_context(|| format!("line {line}"))?;

        let outcomes = scorer.score(&repo).await;

        writer
            .write_record(score_record(&identity, &outcomes))
            .with_context(|| format!("Failed to write result for {repo}"))?;
        writer.flush().context("Failed to flush output")?;

        println!("{repo}");
        print!("{}", render_table(&outcomes));

        summary.repositories += 1;
    }

    Ok(summary)
}

/// [`run_batch`] over files on disk. The output file is created or truncated.
pub async fn run_batch_files<T>(
    scorer: &Scorer<T>,
    input: &Path,
    output: &Path,
    write_header: bool,
) -> Result<BatchSummary>
where
    T: Transport + Clone + 'static,
{
    let input_file = File::open(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;
    let output_file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;

    run_batch(scorer, input_file, output_file, write_header).await
}
