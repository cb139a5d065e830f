// ---------------------------------------------------------------------------
// RecommendServer — JSON-RPC dispatcher
// ---------------------------------------------------------------------------
//
// Routes JSON-RPC 2.0 requests (NDJSON over stdin) to a `Recommender` handle.
// A `run()` loop, a `dispatch()` match and free-standing handler functions
// per method. `engine/rebuild` builds a fresh handle and only replaces the
// live one once the build succeeds.
// ---------------------------------------------------------------------------

use std::io::{self, BufRead};
use std::path::PathBuf;

use serde::Deserialize;

use crate::dataset;
use crate::error::RecommendError;
use crate::protocol::*;
use crate::recommender::{normalize_limit, Recommender};
use crate::transport::NdjsonTransport;
use crate::types::FeatureQuery;

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

pub struct RecommendServer {
	transport: NdjsonTransport,
	engine: Recommender,
	default_limit: i64,
}

impl RecommendServer {
	pub fn new(transport: NdjsonTransport, engine: Recommender, default_limit: i64) -> Self {
		Self {
			transport,
			engine,
			default_limit,
		}
	}

	/// Main loop: read JSON-RPC messages from stdin until EOF.
	pub fn run(&mut self) -> Result<(), RecommendError> {
		let stdin = io::stdin();
		let reader = stdin.lock();

		for line_result in reader.lines() {
			let line = line_result?;
			if line.trim().is_empty() {
				continue;
			}

			let value: serde_json::Value = match serde_json::from_str(&line) {
				Ok(v) => v,
				Err(e) => {
					tracing::error!("Failed to parse request: {}", e);
					self.transport
						.write_error(None, PARSE_ERROR, format!("Parse error: {}", e), None);
					continue;
				}
			};

			let id = value.get("id").and_then(serde_json::Value::as_u64);
			let request: JsonRpcRequest = match serde_json::from_value(value) {
				Ok(r) => r,
				Err(e) => {
					tracing::warn!("Invalid request: {}", e);
					self.transport
						.write_error(id, INVALID_REQUEST, format!("Invalid request: {}", e), None);
					continue;
				}
			};

			self.dispatch(request);
		}

		Ok(())
	}

	// ── Dispatch ──────────────────────────────────────────────────────────

	fn dispatch(&mut self, req: JsonRpcRequest) {
		let id = req.id;
		let result = match req.method.as_str() {
			// -- Catalog -------------------------------------------------
			"catalog/titles" => Ok(serde_json::json!({ "titles": self.engine.list_titles() })),
			"catalog/size" => Ok(serde_json::json!({ "count": self.engine.catalog().len() })),

			// -- Recommendation ------------------------------------------
			"recommend/byTitle" => handle_by_title(&self.engine, self.default_limit, req.params),
			"recommend/byFeatures" => {
				handle_by_features(&self.engine, self.default_limit, req.params)
			}

			// -- Engine --------------------------------------------------
			"engine/info" => Ok(handle_info(&self.engine)),
			"engine/rebuild" => self.handle_rebuild(req.params),

			// -- Unknown -------------------------------------------------
			_ => {
				tracing::warn!(method = %req.method, "Unknown method");
				self.transport.write_error(
					Some(id),
					METHOD_NOT_FOUND,
					format!("Unknown method: {}", req.method),
					None,
				);
				return;
			}
		};

		match result {
			Ok(value) => self.transport.write_response(id, value),
			Err(e) => {
				if !e.is_recoverable() {
					tracing::error!(error = %e, "Request failed");
				}
				self.transport.write_error(
					Some(id),
					error_code(&e),
					e.to_string(),
					Some(e.to_json_rpc_error()),
				)
			}
		}
	}

	// ── Rebuild ───────────────────────────────────────────────────────────

	fn handle_rebuild(&mut self, params: serde_json::Value) -> Result<serde_json::Value, RecommendError> {
		let p: RebuildParams = parse_params(params)?;
		let rows = dataset::load_cleaned(&p.data_path)?;
		let engine = self.engine.rebuild(rows)?;
		tracing::info!(
			path = %p.data_path.display(),
			items = engine.catalog().len(),
			"Recommender rebuilt"
		);
		self.engine = engine;
		Ok(handle_info(&self.engine))
	}
}

/// Caller mistakes map to invalid-params, broken state to internal error,
/// everything else to the domain error code.
fn error_code(e: &RecommendError) -> i32 {
	match e {
		RecommendError::Serialization(_) => INVALID_PARAMS,
		RecommendError::ModelInvariant(_) => INTERNAL_ERROR,
		_ => RECOMMEND_ERROR,
	}
}

// ---------------------------------------------------------------------------
// Param types
// ---------------------------------------------------------------------------

/// Absent params read as an empty object.
fn parse_params<T: serde::de::DeserializeOwned>(
	params: serde_json::Value,
) -> Result<T, RecommendError> {
	let params = if params.is_null() {
		serde_json::json!({})
	} else {
		params
	};
	serde_json::from_value(params)
		.map_err(|e| RecommendError::Serialization(format!("Invalid params: {}", e)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByTitleParams {
	title: String,
	max_results: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ByFeaturesParams {
	#[serde(default)]
	genres: Vec<String>,
	#[serde(default)]
	themes: Vec<String>,
	#[serde(default)]
	demographics: Vec<String>,
	max_results: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RebuildParams {
	data_path: PathBuf,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn handle_by_title(
	engine: &Recommender,
	default_limit: i64,
	params: serde_json::Value,
) -> Result<serde_json::Value, RecommendError> {
	let p: ByTitleParams = parse_params(params)?;
	if p.title.trim().is_empty() {
		return Err(RecommendError::Serialization(
			"Invalid params: title must not be blank".into(),
		));
	}
	let k = normalize_limit(p.max_results.unwrap_or(default_limit));
	let recommendations = engine.recommend_by_title(&p.title, k)?;
	Ok(serde_json::json!({ "recommendations": recommendations }))
}

fn handle_by_features(
	engine: &Recommender,
	default_limit: i64,
	params: serde_json::Value,
) -> Result<serde_json::Value, RecommendError> {
	let p: ByFeaturesParams = parse_params(params)?;
	let k = normalize_limit(p.max_results.unwrap_or(default_limit));
	let query = FeatureQuery {
		genres: p.genres,
		themes: p.themes,
		demographics: p.demographics,
	};
	let recommendations = engine.recommend_by_features(&query, k)?;
	Ok(serde_json::json!({ "recommendations": recommendations }))
}

fn handle_info(engine: &Recommender) -> serde_json::Value {
	let config = engine.config();
	serde_json::json!({
		"itemCount": engine.catalog().len(),
		"rejectedCount": engine.catalog().rejected(),
		"documentCount": engine.model().n_documents(),
		"vocabularySize": engine.model().vocabulary_size(),
		"maxFeatures": config.vectorizer.max_features,
		"scoring": config.scoring.as_str(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::recommender::EngineConfig;
	use crate::types::CleanedRecord;

	fn engine() -> Recommender {
		let rows = vec![
			CleanedRecord {
				title: "A".into(),
				genres: "action space adventure".into(),
				..Default::default()
			},
			CleanedRecord {
				title: "B".into(),
				genres: "action space drama".into(),
				..Default::default()
			},
			CleanedRecord {
				title: "C".into(),
				genres: "romance comedy school".into(),
				..Default::default()
			},
		];
		Recommender::initialize(rows, EngineConfig::default()).unwrap()
	}

	#[test]
	fn by_title_uses_default_limit() {
		let engine = engine();
		let value = handle_by_title(&engine, 1, serde_json::json!({ "title": "A" })).unwrap();
		let recs = value["recommendations"].as_array().unwrap();
		assert_eq!(recs.len(), 1);
		assert_eq!(recs[0]["title"], "B");
	}

	#[test]
	fn negative_max_results_yields_empty_list() {
		let engine = engine();
		let value =
			handle_by_title(&engine, 10, serde_json::json!({ "title": "A", "maxResults": -4 })).unwrap();
		assert_eq!(value["recommendations"], serde_json::json!([]));
	}

	#[test]
	fn blank_or_missing_title_is_invalid_params() {
		let engine = engine();
		let blank = handle_by_title(&engine, 10, serde_json::json!({ "title": "  " })).unwrap_err();
		assert_eq!(error_code(&blank), INVALID_PARAMS);
		let missing = handle_by_title(&engine, 10, serde_json::json!({})).unwrap_err();
		assert_eq!(error_code(&missing), INVALID_PARAMS);
	}

	#[test]
	fn empty_feature_params_are_a_domain_error() {
		let engine = engine();
		let err = handle_by_features(&engine, 10, serde_json::json!({})).unwrap_err();
		assert!(matches!(err, RecommendError::NoFeaturesProvided));
		assert_eq!(error_code(&err), RECOMMEND_ERROR);
	}

	#[test]
	fn null_feature_params_are_a_domain_error() {
		let engine = engine();
		let err = handle_by_features(&engine, 10, serde_json::Value::Null).unwrap_err();
		assert!(matches!(err, RecommendError::NoFeaturesProvided));
		assert_eq!(error_code(&err), RECOMMEND_ERROR);
	}

	#[test]
	fn null_title_params_still_need_a_title() {
		let engine = engine();
		let err = handle_by_title(&engine, 10, serde_json::Value::Null).unwrap_err();
		assert_eq!(error_code(&err), INVALID_PARAMS);
	}

	#[test]
	fn invariant_violations_map_to_internal_error() {
		assert_eq!(
			error_code(&RecommendError::ModelInvariant("dim".into())),
			INTERNAL_ERROR
		);
	}

	#[test]
	fn info_reports_model_shape() {
		let info = handle_info(&engine());
		assert_eq!(info["itemCount"], 3);
		assert_eq!(info["documentCount"], 3);
		assert_eq!(info["vocabularySize"], 7);
		assert_eq!(info["scoring"], "on-demand");
	}
}
