//! Turning check outcomes into output records.

use std::fmt::Write as _;

use crate::models::CheckOutcome;

/// Sort outcomes by check name (byte-wise ascending) so output order does not
/// depend on which check finished first.
pub fn sort_outcomes(outcomes: &mut [CheckOutcome]) {
    outcomes.sort_by(|a, b| a.name.cmp(&b.name));
}

/// The flat output record for one repository: the identity fields followed
/// by `pass`, `confidence` for every check in name order.
pub fn score_record(identity: &[String], outcomes: &[CheckOutcome]) -> Vec<String> {
    let mut sorted = outcomes.to_vec();
    sort_outcomes(&mut sorted);

    let mut record = Vec::with_capacity(identity.len() + sorted.len() * 2);
    record.extend(identity.iter().cloned());
    for outcome in &sorted {
        record.push(outcome.result.pass.to_string());
        record.push(outcome.result.confidence.to_string());
    }
    record
}

/// Column names matching [`score_record`].
pub fn header_record(identity_headers: &[String], check_names: &[&str]) -> Vec<String> {
    let mut names = check_names.to_vec();
    names.sort_unstable();

    let mut record = Vec::with_capacity(identity_headers.len() + names.len() * 2);
    record.extend(identity_headers.iter().cloned());
    for name in names {
        record.push(format!("{name}_Pass"));
        record.push(format!("{name}_Confidence"));
    }
    record
}

/// Human-readable summary of one repository's results.
pub fn render_table(outcomes: &[CheckOutcome]) -> String {
    let mut sorted = outcomes.to_vec();
    sort_outcomes(&mut sorted);

    let width = sorted
        .iter()
        .map(|o| o.name.len())
        .max()
        .unwrap_or(0)
        .max("CHECK".len());

    let mut out = String::from("RESULTS\n-------\n");
    let _ = writeln!(out, "{:<width$}  {:<5}  CONFIDENCE", "CHECK", "PASS");
    for outcome in &sorted {
        let _ = write!(
            out,
            "{:<width$}  {:<5}  {}",
            outcome.name, outcome.result.pass, outcome.result.confidence
        );
        if let Some(error) = &outcome.result.error {
            let _ = write!(out, "  ({error})");
        }
        out.push('\n');
    }
    out
}
