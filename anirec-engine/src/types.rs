use serde::{Deserialize, Serialize};

/// One row of the cleaned dataset. Tag and synopsis fields are lowercase
/// alphanumeric-plus-space token strings, empty when the source was missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
	pub title: String,
	#[serde(default)]
	pub genres: String,
	#[serde(default)]
	pub themes: String,
	#[serde(default)]
	pub demographics: String,
	#[serde(default)]
	pub synopsis: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
	pub title: String,
	pub genres: String,
	pub themes: String,
	pub demographics: String,
	pub synopsis: String,
	pub combined_text: String,
}

impl CatalogItem {
	pub fn from_record(record: CleanedRecord) -> Self {
		let combined_text = combine_fields(&[
			&record.genres,
			&record.themes,
			&record.demographics,
			&record.synopsis,
		]);
		Self {
			title: record.title,
			genres: record.genres,
			themes: record.themes,
			demographics: record.demographics,
			synopsis: record.synopsis,
			combined_text,
		}
	}
}

/// Join non-empty parts with a single space.
pub fn combine_fields(parts: &[&str]) -> String {
	parts
		.iter()
		.map(|p| p.trim())
		.filter(|p| !p.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
	pub title: String,
	pub genres: String,
	pub themes: String,
	pub demographics: String,
	pub score: f64,
}

/// Tag sets for a feature-based query. Each list may be empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureQuery {
	#[serde(default)]
	pub genres: Vec<String>,
	#[serde(default)]
	pub themes: Vec<String>,
	#[serde(default)]
	pub demographics: Vec<String>,
}

impl FeatureQuery {
	pub fn is_empty(&self) -> bool {
		[&self.genres, &self.themes, &self.demographics]
			.iter()
			.all(|tags| tags.iter().all(|t| t.trim().is_empty()))
	}

	/// Genre terms, then theme terms, then demographic terms.
	pub fn pseudo_document(&self) -> String {
		self.genres
			.iter()
			.chain(&self.themes)
			.chain(&self.demographics)
			.map(|t| t.trim())
			.filter(|t| !t.is_empty())
			.collect::<Vec<_>>()
			.join(" ")
	}
}
