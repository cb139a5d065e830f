// ---------------------------------------------------------------------------
// Vectorizer — tf-idf model over the catalog's combined text
// ---------------------------------------------------------------------------
//
// `fit` builds a bounded vocabulary from document frequencies, freezes smoothed
// idf weights, and emits one L2-normalized sparse vector per document.
// `TfidfModel::transform` maps arbitrary text into the same space without
// touching the frozen state.
// ---------------------------------------------------------------------------

use std::collections::{HashMap, HashSet};

use crate::stopwords::StopWords;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 10_000;

// ---------------------------------------------------------------------------
// SparseVector
// ---------------------------------------------------------------------------

/// Non-negative sparse vector over a model vocabulary. Entries are sorted by
/// term index and contain no zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
	dim: usize,
	entries: Vec<(usize, f64)>,
}

impl SparseVector {
	pub fn zero(dim: usize) -> Self {
		Self {
			dim,
			entries: Vec::new(),
		}
	}

	/// Build from unsorted `(index, weight)` pairs. Zero weights are dropped.
	pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
		entries.retain(|&(_, w)| w != 0.0);
		entries.sort_by_key(|&(i, _)| i);
		Self { dim, entries }
	}

	pub fn dim(&self) -> usize {
		self.dim
	}

	pub fn entries(&self) -> &[(usize, f64)] {
		&self.entries
	}

	pub fn is_zero(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn norm(&self) -> f64 {
		self.entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt()
	}

	/// Merge-join dot product over the sorted entries.
	pub fn dot(&self, other: &SparseVector) -> f64 {
		let (mut i, mut j) = (0, 0);
		let mut sum = 0.0;
		while i < self.entries.len() && j < other.entries.len() {
			let (ai, aw) = self.entries[i];
			let (bj, bw) = other.entries[j];
			if ai == bj {
				sum += aw * bw;
				i += 1;
				j += 1;
			} else if ai < bj {
				i += 1;
			} else {
				j += 1;
			}
		}
		sum
	}

	fn normalize(&mut self) {
		let norm = self.norm();
		if norm > 0.0 {
			for (_, w) in &mut self.entries {
				*w /= norm;
			}
		}
	}
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct VectorizerConfig {
	pub max_features: usize,
	pub stop_words: StopWords,
}

impl Default for VectorizerConfig {
	fn default() -> Self {
		Self {
			max_features: DEFAULT_MAX_FEATURES,
			stop_words: StopWords::english(),
		}
	}
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Frozen vocabulary and idf weights. Never mutated after `fit`.
#[derive(Debug, Clone)]
pub struct TfidfModel {
	vocabulary: HashMap<String, usize>,
	terms: Vec<String>,
	idf: Vec<f64>,
	stop_words: StopWords,
	n_documents: usize,
}

impl TfidfModel {
	pub fn vocabulary_size(&self) -> usize {
		self.terms.len()
	}

	pub fn n_documents(&self) -> usize {
		self.n_documents
	}

	pub fn term_index(&self, term: &str) -> Option<usize> {
		self.vocabulary.get(term).copied()
	}

	pub fn terms(&self) -> &[String] {
		&self.terms
	}

	pub fn idf(&self, term: &str) -> Option<f64> {
		self.term_index(term).map(|i| self.idf[i])
	}

	pub fn idf_weights(&self) -> &[f64] {
		&self.idf
	}

	/// Map `text` into the model's space. Unknown terms are dropped; the zero
	/// vector is returned when nothing is recognised.
	pub fn transform(&self, text: &str) -> SparseVector {
		let mut counts: HashMap<usize, f64> = HashMap::new();
		for token in tokenize(text, &self.stop_words) {
			if let Some(&idx) = self.vocabulary.get(&token) {
				*counts.entry(idx).or_insert(0.0) += 1.0;
			}
		}
		let entries = counts
			.into_iter()
			.map(|(idx, tf)| (idx, tf * self.idf[idx]))
			.collect();
		let mut vector = SparseVector::from_entries(self.terms.len(), entries);
		vector.normalize();
		vector
	}
}

/// Whitespace tokenization with stop-word removal. Input is expected to be
/// cleaned already; lowercasing only guards query text.
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
	text.split_whitespace()
		.map(|t| t.to_lowercase())
		.filter(|t| !stop_words.contains(t))
		.collect()
}

/// Fit a model over `corpus` and return it with one vector per document, in
/// input order.
///
/// Vocabulary keeps the `max_features` terms with the highest document
/// frequency, ties broken by first appearance. idf is
/// `ln((1 + n) / (1 + df)) + 1`, which is always positive.
pub fn fit<S: AsRef<str>>(corpus: &[S], config: &VectorizerConfig) -> (TfidfModel, Vec<SparseVector>) {
	let tokenized: Vec<Vec<String>> = corpus
		.iter()
		.map(|doc| tokenize(doc.as_ref(), &config.stop_words))
		.collect();

	// term -> (document frequency, first-seen order)
	let mut stats: HashMap<&str, (usize, usize)> = HashMap::new();
	for tokens in &tokenized {
		let mut seen: HashSet<&str> = HashSet::new();
		for token in tokens {
			if seen.insert(token.as_str()) {
				let next = stats.len();
				stats.entry(token.as_str()).or_insert((0, next)).0 += 1;
			}
		}
	}

	let mut ranked: Vec<(&str, usize, usize)> = stats
		.into_iter()
		.map(|(term, (df, order))| (term, df, order))
		.collect();
	ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
	ranked.truncate(config.max_features);

	let n = corpus.len() as f64;
	let mut vocabulary = HashMap::with_capacity(ranked.len());
	let mut terms = Vec::with_capacity(ranked.len());
	let mut idf = Vec::with_capacity(ranked.len());
	for (idx, (term, df, _)) in ranked.into_iter().enumerate() {
		vocabulary.insert(term.to_string(), idx);
		terms.push(term.to_string());
		idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
	}

	let model = TfidfModel {
		vocabulary,
		terms,
		idf,
		stop_words: config.stop_words.clone(),
		n_documents: corpus.len(),
	};

	let vectors = corpus.iter().map(|doc| model.transform(doc.as_ref())).collect();

	tracing::info!(
		documents = model.n_documents,
		vocabulary = model.vocabulary_size(),
		max_features = config.max_features,
		"Vector model fitted"
	);

	(model, vectors)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn corpus() -> Vec<&'static str> {
		vec![
			"action space adventure",
			"action space drama",
			"romance comedy school",
			"action adventure fantasy",
		]
	}

	#[test]
	fn idf_is_smoothed_and_positive() {
		let (model, _) = fit(&corpus(), &VectorizerConfig::default());
		let action = model.idf("action").unwrap();
		assert!((action - ((5.0f64 / 4.0).ln() + 1.0)).abs() < 1e-12);
		assert!(model.idf_weights().iter().all(|&w| w > 0.0));
	}

	#[test]
	fn vocabulary_ordered_by_document_frequency_then_first_seen() {
		let (model, _) = fit(&corpus(), &VectorizerConfig::default());
		assert_eq!(
			model.terms(),
			&["action", "space", "adventure", "drama", "romance", "comedy", "school", "fantasy"]
		);
	}

	#[test]
	fn vocabulary_respects_cap() {
		let config = VectorizerConfig {
			max_features: 3,
			..Default::default()
		};
		let (model, vectors) = fit(&corpus(), &config);
		assert_eq!(model.vocabulary_size(), 3);
		// "romance comedy school" has no surviving terms
		assert!(vectors[2].is_zero());
		assert!(vectors.iter().all(|v| v.dim() == 3));
	}

	#[test]
	fn stop_words_are_excluded() {
		let (model, _) = fit(&["the action of the hero"], &VectorizerConfig::default());
		assert!(model.term_index("the").is_none());
		assert!(model.term_index("of").is_none());
		assert!(model.term_index("hero").is_some());
	}

	#[test]
	fn stop_words_can_be_disabled() {
		let config = VectorizerConfig {
			stop_words: StopWords::none(),
			..Default::default()
		};
		let (model, _) = fit(&["the action"], &config);
		assert!(model.term_index("the").is_some());
	}

	#[test]
	fn document_vectors_are_unit_length() {
		let (_, vectors) = fit(&corpus(), &VectorizerConfig::default());
		for v in &vectors {
			assert!((v.norm() - 1.0).abs() < 1e-12);
		}
	}

	#[test]
	fn term_frequency_counts_repeats() {
		let (model, _) = fit(&["action action drama", "drama"], &VectorizerConfig::default());
		let v = model.transform("action action drama");
		let action = v.entries().iter().find(|e| e.0 == model.term_index("action").unwrap()).unwrap().1;
		let drama = v.entries().iter().find(|e| e.0 == model.term_index("drama").unwrap()).unwrap().1;
		let expected = 2.0 * model.idf("action").unwrap() / model.idf("drama").unwrap();
		assert!((action / drama - expected).abs() < 1e-12);
	}

	#[test]
	fn transform_drops_unknown_terms() {
		let (model, _) = fit(&corpus(), &VectorizerConfig::default());
		let v = model.transform("mecha action");
		assert_eq!(v.entries().len(), 1);
		assert!(model.transform("mecha isekai").is_zero());
		assert!(model.transform("").is_zero());
	}

	#[test]
	fn transform_matches_fitted_vectors() {
		let (model, vectors) = fit(&corpus(), &VectorizerConfig::default());
		assert_eq!(model.transform(corpus()[1]), vectors[1]);
	}

	#[test]
	fn sparse_dot_product() {
		let a = SparseVector::from_entries(4, vec![(3, 2.0), (0, 1.0)]);
		let b = SparseVector::from_entries(4, vec![(0, 3.0), (1, 5.0), (3, 0.5)]);
		assert!((a.dot(&b) - 4.0).abs() < 1e-12);
		assert_eq!(a.entries()[0].0, 0);
	}
}
