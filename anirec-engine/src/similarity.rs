use crate::error::RecommendError;
use crate::vectorizer::SparseVector;

/// Cosine similarity between two non-negative sparse vectors.
/// Returns 0.0 when either vector has zero magnitude. Result clamped to [0.0, 1.0].
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
	let denom = a.norm() * b.norm();
	if denom == 0.0 {
		return 0.0;
	}

	let result = a.dot(b) / denom;
	if !result.is_finite() {
		return 0.0;
	}
	result.clamp(0.0, 1.0)
}

/// Full symmetric cosine matrix over a corpus, stored row-major.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
	n: usize,
	values: Vec<f64>,
}

impl SimilarityMatrix {
	pub fn size(&self) -> usize {
		self.n
	}

	pub fn row(&self, i: usize) -> &[f64] {
		&self.values[i * self.n..(i + 1) * self.n]
	}
}

/// Compute every pairwise similarity. Only the upper triangle is evaluated.
pub fn pairwise_matrix(vectors: &[SparseVector]) -> Result<SimilarityMatrix, RecommendError> {
	let dim = check_dimensions(vectors)?;
	let n = vectors.len();
	let mut values = vec![0.0; n * n];

	for i in 0..n {
		for j in i..n {
			let score = cosine_similarity(&vectors[i], &vectors[j]);
			values[i * n + j] = score;
			values[j * n + i] = score;
		}
	}

	tracing::debug!(n, dim = ?dim, "Pairwise similarity matrix computed");
	Ok(SimilarityMatrix { n, values })
}

/// Score one query against every corpus vector, in corpus position order.
pub fn score_against_corpus(
	query: &SparseVector,
	corpus: &[SparseVector],
) -> Result<Vec<(usize, f64)>, RecommendError> {
	if let Some(dim) = check_dimensions(corpus)? {
		if query.dim() != dim {
			return Err(RecommendError::ModelInvariant(format!(
				"query dimension {} does not match corpus dimension {}",
				query.dim(),
				dim
			)));
		}
	}

	Ok(corpus
		.iter()
		.enumerate()
		.map(|(position, doc)| (position, cosine_similarity(query, doc)))
		.collect())
}

fn check_dimensions(vectors: &[SparseVector]) -> Result<Option<usize>, RecommendError> {
	let Some(first) = vectors.first() else {
		return Ok(None);
	};
	let dim = first.dim();
	for (position, v) in vectors.iter().enumerate() {
		if v.dim() != dim {
			return Err(RecommendError::ModelInvariant(format!(
				"vector at position {} has dimension {}, expected {}",
				position,
				v.dim(),
				dim
			)));
		}
		if v.entries().iter().any(|&(idx, w)| idx >= dim || w < 0.0 || !w.is_finite()) {
			return Err(RecommendError::ModelInvariant(format!(
				"vector at position {} has malformed entries",
				position
			)));
		}
	}
	Ok(Some(dim))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn v(dim: usize, entries: &[(usize, f64)]) -> SparseVector {
		SparseVector::from_entries(dim, entries.to_vec())
	}

	#[test]
	fn identical_vectors() {
		let a = v(3, &[(0, 1.0), (1, 2.0), (2, 3.0)]);
		assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-10);
	}

	#[test]
	fn disjoint_vectors() {
		let a = v(2, &[(0, 1.0)]);
		let b = v(2, &[(1, 1.0)]);
		assert_eq!(cosine_similarity(&a, &b), 0.0);
	}

	#[test]
	fn zero_magnitude() {
		let a = SparseVector::zero(2);
		let b = v(2, &[(0, 1.0), (1, 2.0)]);
		assert_eq!(cosine_similarity(&a, &b), 0.0);
		assert_eq!(cosine_similarity(&a, &a), 0.0);
	}

	#[test]
	fn matrix_is_symmetric_with_unit_diagonal() {
		let vectors = vec![
			v(3, &[(0, 1.0), (1, 1.0)]),
			v(3, &[(1, 1.0), (2, 1.0)]),
			SparseVector::zero(3),
		];
		let m = pairwise_matrix(&vectors).unwrap();
		assert_eq!(m.size(), 3);
		assert!((m.row(0)[0] - 1.0).abs() < 1e-10);
		assert!((m.row(1)[1] - 1.0).abs() < 1e-10);
		assert_eq!(m.row(0)[1], m.row(1)[0]);
		assert!((m.row(0)[1] - 0.5).abs() < 1e-10);
		assert_eq!(m.row(2), &[0.0, 0.0, 0.0]);
	}

	#[test]
	fn scores_follow_corpus_order() {
		let corpus = vec![v(2, &[(1, 1.0)]), v(2, &[(0, 1.0)])];
		let scores = score_against_corpus(&v(2, &[(0, 1.0)]), &corpus).unwrap();
		assert_eq!(scores, vec![(0, 0.0), (1, 1.0)]);
	}

	#[test]
	fn dimension_mismatch_is_invariant_violation() {
		let corpus = vec![v(2, &[(0, 1.0)])];
		let err = score_against_corpus(&v(3, &[(0, 1.0)]), &corpus).unwrap_err();
		assert!(matches!(err, RecommendError::ModelInvariant(_)));

		let ragged = vec![v(2, &[(0, 1.0)]), v(4, &[(0, 1.0)])];
		assert!(matches!(
			pairwise_matrix(&ragged).unwrap_err(),
			RecommendError::ModelInvariant(_)
		));
	}

	#[test]
	fn out_of_range_index_is_invariant_violation() {
		let corpus = vec![v(2, &[(5, 1.0)])];
		assert!(matches!(
			score_against_corpus(&SparseVector::zero(2), &corpus).unwrap_err(),
			RecommendError::ModelInvariant(_)
		));
	}

	#[test]
	fn empty_corpus_scores_nothing() {
		assert!(score_against_corpus(&SparseVector::zero(2), &[]).unwrap().is_empty());
	}
}
