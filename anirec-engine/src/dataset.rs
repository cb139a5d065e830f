use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::RecommendError;
use crate::types::CleanedRecord;

/// Read the cleaned dataset CSV. Columns are matched by header name; extra
/// columns are ignored and missing optional ones default to empty strings.
/// Comma-separated tag lists (`"action, adventure"`) are flattened to
/// space-separated tokens.
pub fn load_cleaned(path: impl AsRef<Path>) -> Result<Vec<CleanedRecord>, RecommendError> {
	let path = path.as_ref();
	let file = std::fs::File::open(path)?;
	let records = read_cleaned(file)?;
	tracing::info!(path = %path.display(), rows = records.len(), "Dataset read");
	Ok(records)
}

pub fn read_cleaned<R: Read>(reader: R) -> Result<Vec<CleanedRecord>, RecommendError> {
	let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
	let mut records = Vec::new();
	for result in rdr.deserialize() {
		let mut record: CleanedRecord = result?;
		for field in [
			&mut record.genres,
			&mut record.themes,
			&mut record.demographics,
			&mut record.synopsis,
		] {
			if field.contains(',') {
				*field = split_separators(field);
			}
		}
		records.push(record);
	}
	Ok(records)
}

/// Treat commas as token breaks and collapse the surrounding whitespace.
fn split_separators(field: &str) -> String {
	field
		.split(|c: char| c == ',' || c.is_whitespace())
		.filter(|t| !t.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::recommender::{EngineConfig, Recommender};

	#[test]
	fn reads_processed_columns_and_ignores_extras() {
		let data = "\
title,genres,themes,demographics,rating,synopsis,combined_features
Cowboy Bebop,action award winning scifi,adult cast space,,r,bounty hunters in space,ignored
Naruto,action adventure,martial arts,shounen,pg13,a ninja,ignored
";
		let records = read_cleaned(data.as_bytes()).unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].title, "Cowboy Bebop");
		assert_eq!(records[0].demographics, "");
		assert_eq!(records[1].demographics, "shounen");
		assert_eq!(records[1].synopsis, "a ninja");
	}

	#[test]
	fn comma_separated_tags_become_tokens() {
		let data = "\
title,genres,themes,demographics,rating,synopsis,combined_features
Naruto,\"action, adventure\",martial arts,shounen,pg13,\"a ninja, a dream\",x
Monster,\"drama,mystery , suspense\",,seinen,r,a surgeon,x
";
		let records = read_cleaned(data.as_bytes()).unwrap();
		assert_eq!(records[0].genres, "action adventure");
		assert_eq!(records[0].synopsis, "a ninja a dream");
		assert_eq!(records[1].genres, "drama mystery suspense");
		assert_eq!(records[1].themes, "");

		let engine = Recommender::initialize(records, EngineConfig::default()).unwrap();
		assert_eq!(engine.catalog().len(), 2);
		assert_eq!(engine.catalog().rejected(), 0);
	}

	#[test]
	fn missing_optional_columns_default_to_empty() {
		let data = "title,genres\nMonster,mystery\n";
		let records = read_cleaned(data.as_bytes()).unwrap();
		assert_eq!(records[0].genres, "mystery");
		assert_eq!(records[0].synopsis, "");
	}

	#[test]
	fn missing_title_column_is_a_dataset_error() {
		let data = "genres\naction\n";
		let err = read_cleaned(data.as_bytes()).unwrap_err();
		assert!(matches!(err, RecommendError::Dataset(_)));
	}

	#[test]
	fn missing_file_is_io_error() {
		let err = load_cleaned("/definitely/not/here.csv").unwrap_err();
		assert!(matches!(err, RecommendError::Io(_)));
	}
}
