use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::recommender::{EngineConfig, ScoringStrategy, DEFAULT_SUGGESTION_LIMIT};
use crate::stopwords::StopWords;
use crate::vectorizer::{VectorizerConfig, DEFAULT_MAX_FEATURES};

#[derive(Parser, Debug)]
#[command(name = "anirec-engine", about = "Content-based anime recommender over JSON-RPC stdio", version)]
pub struct CliArgs {
	/// Cleaned dataset CSV (title, genres, themes, demographics, synopsis)
	#[arg(long, default_value = "processed_anime_data.csv", env = "ANIREC_DATA")]
	pub data: PathBuf,

	/// Vocabulary cap: keep the most frequent terms by document frequency
	#[arg(long, default_value_t = DEFAULT_MAX_FEATURES, env = "ANIREC_MAX_FEATURES")]
	pub max_features: usize,

	/// Keep English stop words in the vocabulary
	#[arg(long, env = "ANIREC_NO_STOP_WORDS")]
	pub no_stop_words: bool,

	/// Precompute the pairwise matrix ("eager") or score per query ("on-demand")
	#[arg(long, value_enum, default_value_t = ScoringArg::OnDemand, env = "ANIREC_SCORING")]
	pub scoring: ScoringArg,

	/// Result count when a request omits maxResults
	#[arg(long, default_value = "10", env = "ANIREC_DEFAULT_LIMIT")]
	pub default_limit: i64,

	/// Log level when RUST_LOG is unset
	#[arg(long, default_value = "info", env = "ANIREC_LOG_LEVEL")]
	pub log_level: String,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
	/// Serve JSON-RPC 2.0 over stdin/stdout (default)
	Serve,
	/// Interactive text menu on the terminal
	Menu,
	/// Clean a raw catalog export into the dataset format the engine loads
	Preprocess {
		#[arg(long)]
		input: PathBuf,
		#[arg(long)]
		output: PathBuf,
	},
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringArg {
	OnDemand,
	Eager,
}

impl From<ScoringArg> for ScoringStrategy {
	fn from(arg: ScoringArg) -> Self {
		match arg {
			ScoringArg::OnDemand => ScoringStrategy::OnDemand,
			ScoringArg::Eager => ScoringStrategy::Eager,
		}
	}
}

impl CliArgs {
	pub fn command(&self) -> Command {
		self.command.clone().unwrap_or(Command::Serve)
	}

	pub fn engine_config(&self) -> EngineConfig {
		let stop_words = if self.no_stop_words {
			StopWords::none()
		} else {
			StopWords::english()
		};
		EngineConfig {
			vectorizer: VectorizerConfig {
				max_features: self.max_features,
				stop_words,
			},
			scoring: self.scoring.into(),
			suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
		}
	}
}
