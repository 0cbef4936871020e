//! Builds the single task payload sent to the language model.

use crate::listings::pipeline::most_common;
use crate::models::listing::Listing;
use crate::summary::prompts::{EXPECTED_OUTPUT, SUMMARY_TASK_TEMPLATE};
use crate::summary::SummaryError;

/// Columns embedded in the prompt, in order.
pub const PROMPT_COLUMNS: [&str; 7] = [
    "Title",
    "Company",
    "Location",
    "Job Type",
    "Experience Level",
    "Via",
    "Posted",
];

/// Renders the listings as CSV (header + one row each), `\n`-terminated.
pub fn render_csv(listings: &[Listing]) -> Result<String, SummaryError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(PROMPT_COLUMNS)?;
    for listing in listings {
        let r = &listing.record;
        writer.write_record([
            &r.title,
            &r.company,
            &r.location,
            &r.job_type,
            &r.experience_level,
            &r.via,
            &r.posted,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.error().to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Fills the task template with the CSV data and the dominant posting source.
pub fn build_prompt(listings: &[Listing]) -> Result<String, SummaryError> {
    let (source, count) = most_common(listings.iter().map(|l| l.record.via.as_str()))
        .ok_or(SummaryError::EmptyDataset)?;
    let csv_data = render_csv(listings)?;

    // Data goes in last so listing text is never treated as a placeholder.
    let task = SUMMARY_TASK_TEMPLATE
        .replace("{most_common_source}", &source)
        .replace("{most_common_count}", &count.to_string())
        .replace("{total_jobs}", &listings.len().to_string())
        .replace("{csv_data}", &csv_data);

    Ok(format!("{task}\n\nExpected output: {EXPECTED_OUTPUT}"))
}
