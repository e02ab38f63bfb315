//! This module contains the main entrypoint to the ecg_predict cli.

use anyhow::{format_err, Result};
use clap::Parser;
use colored::Colorize;
use ecg_core::{artifacts_dir, predict, read_input, Artifacts, PredictOutput};
use std::{io::Write, path::PathBuf};

#[derive(Parser, Debug)]
#[clap(
	about = "Classify an ECG sample read as JSON from standard input.",
	long_about = "Classify an ECG sample read as JSON from standard input. The input must have the form {\"ecg\": [<number>, ...]}. The predicted class label is printed to standard output.",
	version
)]
struct Options {
	/// the directory containing ecg_logistic_model.pkl and ecg_scaler.pkl, which defaults to the directory containing this executable
	#[clap(long, env = "ECG_ARTIFACTS_DIR")]
	artifacts_dir: Option<PathBuf>,
	/// the output format, either "text" for the bare class label or "json"
	#[clap(long, env = "ECG_OUTPUT_FORMAT", default_value = "text")]
	format: OutputFormat,
	/// reject inputs whose ecg array does not have exactly this many values
	#[clap(long)]
	expected_length: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum OutputFormat {
	Text,
	Json,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;
	fn from_str(value: &str) -> Result<OutputFormat, String> {
		match value {
			"text" => Ok(OutputFormat::Text),
			"json" => Ok(OutputFormat::Json),
			_ => Err(format!("unknown format {:?}, expected \"text\" or \"json\"", value)),
		}
	}
}

fn main() {
	let env = env_logger::Env::new().filter_or("ECG_LOG", "warn");
	env_logger::Builder::from_env(env)
		.format_module_path(false)
		.format_timestamp(None)
		.init();
	let options = Options::parse();
	if let Err(error) = cli_predict(options) {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn cli_predict(options: Options) -> Result<()> {
	// Artifacts are loaded before stdin is read.
	let dir = match options.artifacts_dir {
		Some(dir) => dir,
		None => artifacts_dir()?,
	};
	log::info!("loading artifacts from {}", dir.display());
	let artifacts = Artifacts::load(&dir)?;

	let stdin = std::io::stdin();
	let input = read_input(stdin.lock())?;
	if let Some(expected_length) = options.expected_length {
		if input.ecg.len() != expected_length {
			return Err(format_err!(
				"expected exactly {} ecg values but received {}",
				expected_length,
				input.ecg.len(),
			));
		}
	}

	let output = predict(&artifacts, &input)?;
	write_output(&output, options.format)
}

fn write_output(output: &PredictOutput, format: OutputFormat) -> Result<()> {
	let stdout = std::io::stdout();
	let mut stdout = stdout.lock();
	match format {
		OutputFormat::Text => writeln!(stdout, "{}", output.prediction)?,
		OutputFormat::Json => {
			serde_json::to_writer(&mut stdout, output)?;
			writeln!(stdout)?;
		}
	}
	stdout.flush()?;
	Ok(())
}

#[test]
fn test_output_format() {
	assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
	assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
	assert!("yaml".parse::<OutputFormat>().is_err());
}

#[test]
fn test_options() {
	let options = Options::try_parse_from(vec!["ecg_predict"]).unwrap();
	assert_eq!(options.format, OutputFormat::Text);
	let options = Options::try_parse_from(vec![
		"ecg_predict",
		"--artifacts-dir",
		"/opt/ecg",
		"--format",
		"json",
		"--expected-length",
		"200",
	])
	.unwrap();
	assert_eq!(options.artifacts_dir, Some(PathBuf::from("/opt/ecg")));
	assert_eq!(options.format, OutputFormat::Json);
	assert_eq!(options.expected_length, Some(200));
	assert!(Options::try_parse_from(vec!["ecg_predict", "--format", "xml"]).is_err());
}
