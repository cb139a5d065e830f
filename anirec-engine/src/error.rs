use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
	#[error("Empty catalog: no usable entries after load")]
	EmptyCatalog,
	#[error("Title not found: {title}")]
	TitleNotFound {
		title: String,
		suggestions: Vec<String>,
	},
	#[error("No features provided: supply at least one genre, theme, or demographic")]
	NoFeaturesProvided,
	#[error("Model invariant violated: {0}")]
	ModelInvariant(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Dataset error: {0}")]
	Dataset(#[from] csv::Error),
	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl RecommendError {
	pub fn code(&self) -> &str {
		match self {
			Self::EmptyCatalog => "RECOMMEND_EMPTY_CATALOG",
			Self::TitleNotFound { .. } => "RECOMMEND_TITLE_NOT_FOUND",
			Self::NoFeaturesProvided => "RECOMMEND_NO_FEATURES",
			Self::ModelInvariant(_) => "RECOMMEND_MODEL_INVARIANT",
			Self::Io(_) => "RECOMMEND_IO",
			Self::Dataset(_) => "RECOMMEND_DATASET",
			Self::Serialization(_) => "RECOMMEND_SERIALIZATION",
		}
	}

	/// Whether the caller can act on this error (re-prompt, fix input) as
	/// opposed to a broken model or corrupted state.
	pub fn is_recoverable(&self) -> bool {
		!matches!(self, Self::ModelInvariant(_))
	}

	pub fn to_json_rpc_error(&self) -> serde_json::Value {
		let mut data = serde_json::json!({
			"recommendCode": self.code(),
			"message": self.to_string(),
		});
		if let Self::TitleNotFound { suggestions, .. } = self {
			data["suggestions"] = serde_json::json!(suggestions);
		}
		data
	}
}
