// ---------------------------------------------------------------------------
// Catalog — position-indexed item store with title lookup
// ---------------------------------------------------------------------------
//
// Positions are assigned once at load and never change. The title index maps
// each title to its FIRST occurrence; later duplicates stay in the catalog but
// cannot be reached by exact title lookup.
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use crate::error::RecommendError;
use crate::types::{CatalogItem, CleanedRecord};

pub struct Catalog {
	items: Vec<CatalogItem>,
	title_index: HashMap<String, usize>,
	rejected: usize,
}

impl Catalog {
	/// Build the catalog from cleaned rows, in order.
	///
	/// Rows whose tag or synopsis fields break the cleaned-text contract are
	/// rejected, and rows with empty combined text are ignored. Fails with
	/// [`RecommendError::EmptyCatalog`] when nothing usable remains.
	pub fn load<I>(rows: I) -> Result<Self, RecommendError>
	where
		I: IntoIterator<Item = CleanedRecord>,
	{
		let mut items = Vec::new();
		let mut title_index = HashMap::new();
		let mut rejected = 0usize;
		let mut empty = 0usize;

		for record in rows {
			if !is_well_formed(&record) {
				tracing::warn!(title = %record.title, "Rejecting record with uncleaned fields");
				rejected += 1;
				continue;
			}
			let item = CatalogItem::from_record(record);
			if item.combined_text.is_empty() {
				empty += 1;
				continue;
			}
			title_index.entry(item.title.clone()).or_insert(items.len());
			items.push(item);
		}

		if items.is_empty() {
			return Err(RecommendError::EmptyCatalog);
		}

		let duplicates = items.len() - title_index.len();
		tracing::info!(
			items = items.len(),
			rejected,
			empty,
			duplicates,
			"Catalog loaded"
		);

		Ok(Self {
			items,
			title_index,
			rejected,
		})
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Number of input rows rejected for violating the cleaned-text contract.
	pub fn rejected(&self) -> usize {
		self.rejected
	}

	pub fn by_position(&self, position: usize) -> Option<&CatalogItem> {
		self.items.get(position)
	}

	/// Exact, case-sensitive lookup.
	pub fn position_of_title(&self, title: &str) -> Option<usize> {
		self.title_index.get(title).copied()
	}

	/// Case-insensitive substring scan over every title, in catalog order.
	pub fn titles_containing(&self, needle: &str) -> Vec<&str> {
		let needle = needle.to_lowercase();
		self.items
			.iter()
			.filter(|item| item.title.to_lowercase().contains(&needle))
			.map(|item| item.title.as_str())
			.collect()
	}

	pub fn titles(&self) -> Vec<&str> {
		self.items.iter().map(|item| item.title.as_str()).collect()
	}

	pub fn combined_texts(&self) -> Vec<&str> {
		self.items
			.iter()
			.map(|item| item.combined_text.as_str())
			.collect()
	}
}

fn is_well_formed(record: &CleanedRecord) -> bool {
	[
		&record.genres,
		&record.themes,
		&record.demographics,
		&record.synopsis,
	]
	.iter()
	.all(|field| {
		field
			.chars()
			.all(|c| c == ' ' || c.is_ascii_lowercase() || c.is_ascii_digit())
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn row(title: &str, genres: &str) -> CleanedRecord {
		CleanedRecord {
			title: title.into(),
			genres: genres.into(),
			..Default::default()
		}
	}

	#[test]
	fn empty_input_fails() {
		let err = Catalog::load(Vec::<CleanedRecord>::new()).err().unwrap();
		assert!(matches!(err, RecommendError::EmptyCatalog));
	}

	#[test]
	fn all_blank_rows_fail() {
		let err = Catalog::load(vec![row("A", ""), row("B", "")]).err().unwrap();
		assert!(matches!(err, RecommendError::EmptyCatalog));
	}

	#[test]
	fn blank_rows_are_skipped_and_positions_stay_dense() {
		let catalog = Catalog::load(vec![row("A", "action"), row("B", ""), row("C", "drama")]).unwrap();
		assert_eq!(catalog.len(), 2);
		assert_eq!(catalog.position_of_title("C"), Some(1));
		assert_eq!(catalog.position_of_title("B"), None);
	}

	#[test]
	fn duplicate_title_resolves_to_first() {
		let catalog =
			Catalog::load(vec![row("Dup", "action"), row("Other", "drama"), row("Dup", "comedy")]).unwrap();
		assert_eq!(catalog.position_of_title("Dup"), Some(0));
		assert_eq!(catalog.titles(), vec!["Dup", "Other", "Dup"]);
		assert_eq!(catalog.by_position(2).unwrap().genres, "comedy");
	}

	#[test]
	fn lookup_is_case_sensitive() {
		let catalog = Catalog::load(vec![row("Cowboy Bebop", "action")]).unwrap();
		assert_eq!(catalog.position_of_title("cowboy bebop"), None);
		assert_eq!(catalog.position_of_title("Cowboy Bebop"), Some(0));
	}

	#[test]
	fn substring_scan_ignores_case() {
		let catalog = Catalog::load(vec![
			row("Naruto", "action"),
			row("Bleach", "action"),
			row("Boruto: Naruto Next Generations", "action"),
		])
		.unwrap();
		assert_eq!(
			catalog.titles_containing("NARUTO"),
			vec!["Naruto", "Boruto: Naruto Next Generations"]
		);
		assert!(catalog.titles_containing("zzz").is_empty());
	}

	#[test]
	fn uncleaned_rows_are_rejected() {
		let catalog = Catalog::load(vec![row("A", "Action, Drama"), row("B", "drama")]).unwrap();
		assert_eq!(catalog.len(), 1);
		assert_eq!(catalog.rejected(), 1);
		assert_eq!(catalog.position_of_title("B"), Some(0));
	}

	#[test]
	fn out_of_range_position_is_none() {
		let catalog = Catalog::load(vec![row("A", "action")]).unwrap();
		assert!(catalog.by_position(1).is_none());
	}
}
