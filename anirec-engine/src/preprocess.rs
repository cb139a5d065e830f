// ---------------------------------------------------------------------------
// Preprocess — raw catalog export to cleaned dataset
// ---------------------------------------------------------------------------
//
// Offline step that produces the cleaned CSV the engine loads. Fields are
// stripped to ASCII alphanumerics and whitespace, lowercased and collapsed;
// rows whose combined text ends up empty are dropped.
// ---------------------------------------------------------------------------

use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use serde::Deserialize;

use crate::error::RecommendError;
use crate::types::{combine_fields, CleanedRecord};

/// Raw export row. Any field may be missing.
#[derive(Debug, Deserialize)]
struct RawRecord {
	title: Option<String>,
	genres: Option<String>,
	themes: Option<String>,
	demographics: Option<String>,
	synopsis: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessReport {
	pub rows_read: usize,
	pub rows_written: usize,
	pub rows_dropped: usize,
}

/// Strip everything except ASCII letters, digits and whitespace, lowercase,
/// and collapse runs of whitespace. `None` becomes the empty string.
pub fn clean_text(text: Option<&str>) -> String {
	let Some(text) = text else {
		return String::new();
	};
	let stripped: String = text
		.chars()
		.filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
		.collect();
	stripped
		.to_lowercase()
		.split_whitespace()
		.collect::<Vec<_>>()
		.join(" ")
}

/// Clean one raw row; `None` when its combined text is empty.
fn clean_record(raw: RawRecord) -> Option<CleanedRecord> {
	let record = CleanedRecord {
		title: raw.title.unwrap_or_default().trim().to_string(),
		genres: clean_text(raw.genres.as_deref()),
		themes: clean_text(raw.themes.as_deref()),
		demographics: clean_text(raw.demographics.as_deref()),
		synopsis: clean_text(raw.synopsis.as_deref()),
	};
	let combined = combine_fields(&[
		&record.genres,
		&record.themes,
		&record.demographics,
		&record.synopsis,
	]);
	if combined.is_empty() {
		None
	} else {
		Some(record)
	}
}

/// Stream a raw CSV into a cleaned CSV.
pub fn preprocess<R: Read, W: Write>(input: R, output: W) -> Result<PreprocessReport, RecommendError> {
	let mut rdr = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(input);
	let mut wtr = WriterBuilder::new().has_headers(true).from_writer(output);
	let mut report = PreprocessReport::default();

	for result in rdr.deserialize() {
		let raw: RawRecord = result?;
		report.rows_read += 1;
		match clean_record(raw) {
			Some(record) => {
				wtr.serialize(&record)?;
				report.rows_written += 1;
			}
			None => report.rows_dropped += 1,
		}
	}
	wtr.flush()?;

	Ok(report)
}

pub fn preprocess_file(
	input: impl AsRef<Path>,
	output: impl AsRef<Path>,
) -> Result<PreprocessReport, RecommendError> {
	let input = input.as_ref();
	let output = output.as_ref();
	let reader = std::fs::File::open(input)?;
	let writer = std::fs::File::create(output)?;
	let report = preprocess(reader, writer)?;
	tracing::info!(
		input = %input.display(),
		output = %output.display(),
		read = report.rows_read,
		written = report.rows_written,
		dropped = report.rows_dropped,
		"Dataset preprocessed"
	);
	Ok(report)
}
