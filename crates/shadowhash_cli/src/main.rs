#![allow(missing_docs)]

use std::path::PathBuf;

use clap::Parser;
use shadowhash::plist::{DecodeOptions, MAX_DEPTH_CEILING};

mod cmd;

#[derive(Parser)]
#[command(name = "shadowhash", about = "Extract PBKDF2-SHA512 hashes from macOS account plists")]
struct Cli {
	/// Account plist files, e.g. /var/db/dslocal/nodes/Default/users/<user>.plist
	#[arg(required = true, value_name = "FILES")]
	paths: Vec<PathBuf>,
	/// Print one JSON record per file instead of hash lines.
	#[arg(long, conflicts_with = "dump")]
	json: bool,
	/// Print each decoded plist as JSON without extracting hashes.
	#[arg(long)]
	dump: bool,
	/// Maximum container nesting accepted while decoding.
	#[arg(long, default_value_t = DecodeOptions::default().max_depth, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DEPTH_CEILING)))]
	max_depth: u32,
}

fn main() {
	init_tracing();
	let cli = Cli::parse();

	let mode = if cli.dump {
		cmd::Mode::Dump
	} else if cli.json {
		cmd::Mode::Json
	} else {
		cmd::Mode::Line
	};
	let opt = DecodeOptions {
		max_depth: cli.max_depth,
		..DecodeOptions::default()
	};

	let failed = cmd::run(&cli.paths, mode, &opt);
	if failed > 0 {
		tracing::debug!(failed, total = cli.paths.len(), "some files failed");
		std::process::exit(1);
	}
}

// RUST_LOG controls the filter; warnings only by default.
fn init_tracing() {
	use tracing_subscriber::{EnvFilter, fmt};

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	fmt()
		.compact()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.without_time()
		.init();
}
