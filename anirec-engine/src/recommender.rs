// ---------------------------------------------------------------------------
// Recommender — the service handle presentation layers hold
// ---------------------------------------------------------------------------
//
// Built once from cleaned rows: catalog, frozen tf-idf model, per-document
// vectors and (optionally) the eager pairwise matrix. Every query is a pure
// computation over that read-only state, so the handle is shared freely.
// Picking up new data means calling `rebuild`, which returns a new handle.
// ---------------------------------------------------------------------------

use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::error::RecommendError;
use crate::similarity::{pairwise_matrix, score_against_corpus, SimilarityMatrix};
use crate::types::{CatalogItem, CleanedRecord, FeatureQuery, Recommendation};
use crate::vectorizer::{self, SparseVector, TfidfModel, VectorizerConfig};

/// Default number of "did you mean" suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How title queries obtain their scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoringStrategy {
	/// Score query-vs-corpus per request: linear CPU, no quadratic memory.
	#[default]
	OnDemand,
	/// Precompute the full pairwise matrix at build time.
	Eager,
}

impl ScoringStrategy {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::OnDemand => "on-demand",
			Self::Eager => "eager",
		}
	}
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
	pub vectorizer: VectorizerConfig,
	pub scoring: ScoringStrategy,
	pub suggestion_limit: usize,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			vectorizer: VectorizerConfig::default(),
			scoring: ScoringStrategy::default(),
			suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
		}
	}
}

/// Negative limits are treated as zero rather than rejected.
pub fn normalize_limit(k: i64) -> usize {
	usize::try_from(k.max(0)).unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Recommender
// ---------------------------------------------------------------------------

pub struct Recommender {
	catalog: Catalog,
	model: TfidfModel,
	vectors: Vec<SparseVector>,
	matrix: Option<SimilarityMatrix>,
	config: EngineConfig,
}

impl Recommender {
	/// Build the catalog, fit the model and prepare scoring state.
	pub fn initialize<I>(rows: I, config: EngineConfig) -> Result<Self, RecommendError>
	where
		I: IntoIterator<Item = CleanedRecord>,
	{
		let catalog = Catalog::load(rows)?;
		let (model, vectors) = vectorizer::fit(&catalog.combined_texts(), &config.vectorizer);

		let matrix = match config.scoring {
			ScoringStrategy::Eager => Some(pairwise_matrix(&vectors)?),
			ScoringStrategy::OnDemand => None,
		};

		tracing::info!(
			items = catalog.len(),
			vocabulary = model.vocabulary_size(),
			scoring = config.scoring.as_str(),
			"Recommender ready"
		);

		Ok(Self {
			catalog,
			model,
			vectors,
			matrix,
			config,
		})
	}

	/// Build a brand-new handle from fresh rows with the same configuration.
	/// `self` is left untouched; callers swap handles once this succeeds.
	pub fn rebuild<I>(&self, rows: I) -> Result<Self, RecommendError>
	where
		I: IntoIterator<Item = CleanedRecord>,
	{
		Self::initialize(rows, self.config.clone())
	}

	pub fn catalog(&self) -> &Catalog {
		&self.catalog
	}

	pub fn model(&self) -> &TfidfModel {
		&self.model
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn list_titles(&self) -> Vec<&str> {
		self.catalog.titles()
	}

	/// Items most similar to the item titled exactly `title`, excluding itself.
	/// The title is resolved before `k` is looked at, so an unknown title
	/// fails even when `k == 0`.
	pub fn recommend_by_title(
		&self,
		title: &str,
		k: usize,
	) -> Result<Vec<Recommendation>, RecommendError> {
		let Some(position) = self.catalog.position_of_title(title) else {
			let suggestions: Vec<String> = self
				.catalog
				.titles_containing(title)
				.into_iter()
				.take(self.config.suggestion_limit)
				.map(str::to_string)
				.collect();
			tracing::debug!(title, suggestions = suggestions.len(), "Title not found");
			return Err(RecommendError::TitleNotFound {
				title: title.to_string(),
				suggestions,
			});
		};

		if k == 0 {
			return Ok(Vec::new());
		}

		let scores = match &self.matrix {
			Some(matrix) => matrix.row(position).iter().copied().enumerate().collect(),
			None => score_against_corpus(&self.vectors[position], &self.vectors)?,
		};

		let results = self.rank(scores, Some(position), k);
		tracing::debug!(title, position, returned = results.len(), "Title query");
		Ok(results)
	}

	/// Items most similar to a pseudo-document built from the given tags.
	pub fn recommend_by_features(
		&self,
		query: &FeatureQuery,
		k: usize,
	) -> Result<Vec<Recommendation>, RecommendError> {
		if query.is_empty() {
			return Err(RecommendError::NoFeaturesProvided);
		}
		if k == 0 {
			return Ok(Vec::new());
		}

		let pseudo_document = query.pseudo_document();
		let vector = self.model.transform(&pseudo_document);
		let scores = score_against_corpus(&vector, &self.vectors)?;

		let results = self.rank(scores, None, k);
		tracing::debug!(
			query = %pseudo_document,
			recognised = vector.entries().len(),
			returned = results.len(),
			"Feature query"
		);
		Ok(results)
	}

	/// Sort by score descending, ties by ascending position, drop `exclude`,
	/// keep the first `k`.
	fn rank(
		&self,
		mut scores: Vec<(usize, f64)>,
		exclude: Option<usize>,
		k: usize,
	) -> Vec<Recommendation> {
		scores.sort_by(|a, b| {
			b.1.partial_cmp(&a.1)
				.unwrap_or(Ordering::Equal)
				.then(a.0.cmp(&b.0))
		});

		scores
			.into_iter()
			.filter(|&(position, _)| Some(position) != exclude)
			.take(k)
			.filter_map(|(position, score)| {
				self.catalog
					.by_position(position)
					.map(|item| to_recommendation(item, score))
			})
			.collect()
	}
}

fn to_recommendation(item: &CatalogItem, score: f64) -> Recommendation {
	Recommendation {
		title: item.title.clone(),
		genres: item.genres.clone(),
		themes: item.themes.clone(),
		demographics: item.demographics.clone(),
		score,
	}
}
