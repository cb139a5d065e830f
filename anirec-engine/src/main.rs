use clap::Parser;

use anirec_engine::config::{CliArgs, Command};
use anirec_engine::dataset;
use anirec_engine::error::RecommendError;
use anirec_engine::menu::Menu;
use anirec_engine::preprocess;
use anirec_engine::recommender::Recommender;
use anirec_engine::server::RecommendServer;
use anirec_engine::transport::NdjsonTransport;

fn main() {
	let args = CliArgs::parse();

	tracing_subscriber::fmt()
		.with_writer(std::io::stderr)
		.with_env_filter(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
		)
		.init();

	if let Err(e) = run(&args) {
		tracing::error!("anirec-engine failed: {}", e);
		std::process::exit(1);
	}
}

fn run(args: &CliArgs) -> Result<(), RecommendError> {
	match args.command() {
		Command::Preprocess { input, output } => {
			preprocess::preprocess_file(&input, &output)?;
			Ok(())
		}
		Command::Serve => {
			let engine = load_engine(args)?;
			let mut server = RecommendServer::new(NdjsonTransport::new(), engine, args.default_limit);
			tracing::info!("anirec-engine ready");
			server.run()
		}
		Command::Menu => {
			let engine = load_engine(args)?;
			let stdin = std::io::stdin();
			let mut menu = Menu::new(&engine, stdin.lock(), std::io::stdout(), args.default_limit);
			menu.run()?;
			Ok(())
		}
	}
}

fn load_engine(args: &CliArgs) -> Result<Recommender, RecommendError> {
	let rows = dataset::load_cleaned(&args.data)?;
	Recommender::initialize(rows, args.engine_config())
}
