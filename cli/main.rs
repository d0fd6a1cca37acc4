//! This module contains the main entrypoint to the arbor cli.

use self::config::load_config;
use anyhow::{Context, Result};
use arbor_dataframe::{read_records_from_path, Dataset, Record};
use arbor_metrics::{Accuracy, StreamingMetric};
use arbor_tree::Tree;
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser)]
#[command(
	name = "arbor",
	about = "Train decision trees on categorical data and make predictions with them.",
	disable_help_subcommand = true
)]
enum Options {
	#[command(name = "train")]
	Train(TrainOptions),
	#[command(name = "predict")]
	Predict(PredictOptions),
}

#[derive(clap::Args, Debug)]
#[command(about = "train a tree")]
#[command(long_about = "train a decision tree from a csv file")]
struct TrainOptions {
	#[arg(short, long, help = "the path to your .csv file")]
	file: PathBuf,
	#[arg(short, long, help = "the name of the column to predict")]
	target: String,
	#[arg(short, long, help = "the path to a config file")]
	config: Option<PathBuf>,
	#[arg(short, long, help = "the path to write the .json tree to")]
	output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
#[command(about = "make predictions")]
#[command(long_about = "predict a label for each row of a csv file with a trained tree")]
struct PredictOptions {
	#[arg(short, long, help = "the path to a tree written by `arbor train`")]
	model: PathBuf,
	#[arg(short, long, help = "the path to your .csv file")]
	file: PathBuf,
	#[arg(
		short,
		long,
		help = "the name of the column holding the true labels, used to report accuracy"
	)]
	target: Option<String>,
}

fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arbor=info")),
		)
		.with_writer(std::io::stderr)
		.init();
	let options = Options::parse();
	let result = match options {
		Options::Train(options) => cli_train(options),
		Options::Predict(options) => cli_predict(options),
	};
	if let Err(error) = result {
		eprintln!("{}: {:#}", "error".red().bold(), error);
		std::process::exit(1);
	}
}

fn cli_train(options: TrainOptions) -> Result<()> {
	let config = load_config(options.config.as_deref())?;
	let train_options = config
		.map(|config| config.train_options())
		.unwrap_or_default();

	// Load the dataset and make sure every example has the same features.
	let dataset = Dataset::from_path(&options.file, &options.target)?;
	dataset
		.validate_schema()
		.with_context(|| format!("invalid dataset {}", options.file.display()))?;
	info!(
		path = %options.file.display(),
		n_examples = dataset.len(),
		n_features = dataset.feature_names().len(),
		"loaded dataset"
	);

	// Train the tree.
	let tree = Tree::train(&dataset, &train_options).context("failed to train tree")?;
	info!(
		depth = tree.depth(),
		n_leaves = tree.n_leaves(),
		"trained tree"
	);

	// Compute the accuracy on the training data.
	let mut accuracy = Accuracy::new();
	for example in dataset.examples.iter() {
		let prediction = tree.predict(&example.features)?;
		accuracy.update((prediction, example.label.as_str()));
	}
	if let Some(accuracy) = accuracy.finalize() {
		info!(accuracy, "training accuracy");
	}

	print!("{}", tree);
	println!();
	println!("feature importances");
	for (feature, importance) in tree.ranked_feature_importances() {
		println!("{}: {:.4}", feature, importance);
	}

	// Retrieve the output path from the command line arguments or generate a default.
	let output_path = match options.output {
		Some(output) => output,
		None => {
			let dir = std::env::current_dir()?;
			let csv_file_name = options
				.file
				.file_stem()
				.and_then(|file_stem| file_stem.to_str())
				.unwrap_or("tree");
			available_path(&dir, csv_file_name, "json")?
		}
	};
	write_tree(&tree, &output_path)?;
	eprintln!("Your tree was written to {}.", output_path.display());

	Ok(())
}

fn cli_predict(options: PredictOptions) -> Result<()> {
	let tree = read_tree(&options.model)?;
	let records = read_records_from_path(&options.file)?;
	info!(
		path = %options.file.display(),
		n_examples = records.len(),
		"loaded examples"
	);
	let (predictions, accuracy) = predict_records(&tree, &records, options.target.as_deref())?;
	for prediction in predictions {
		println!("{}", prediction);
	}
	if let Some(accuracy) = accuracy {
		info!(accuracy, "accuracy");
	}
	Ok(())
}

/// Predict a label for each record. If `target` is given, the accuracy is computed over the records that have a value for it.
fn predict_records<'a>(
	tree: &'a Tree,
	records: &[Record],
	target: Option<&str>,
) -> Result<(Vec<&'a str>, Option<f64>)> {
	let mut predictions = Vec::with_capacity(records.len());
	let mut accuracy = Accuracy::new();
	for (row_index, record) in records.iter().enumerate() {
		let prediction = tree
			.predict(record)
			.with_context(|| format!("failed to make a prediction for row {}", row_index))?;
		if let Some(label) = target.and_then(|target| record.get(target)) {
			accuracy.update((prediction, label.as_str()));
		}
		predictions.push(prediction);
	}
	Ok((predictions, accuracy.finalize()))
}

fn write_tree(tree: &Tree, path: &Path) -> Result<()> {
	let file = std::fs::File::create(path)
		.with_context(|| format!("failed to create {}", path.display()))?;
	serde_json::to_writer_pretty(std::io::BufWriter::new(file), tree)
		.with_context(|| format!("failed to write tree to {}", path.display()))?;
	Ok(())
}

fn read_tree(path: &Path) -> Result<Tree> {
	let file =
		std::fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	let tree = serde_json::from_reader(std::io::BufReader::new(file))
		.with_context(|| format!("failed to read tree from {}", path.display()))?;
	Ok(tree)
}

/// This function checks if a file with the given name and extension already exists in `dir`, and if it does, it appends " 1", " 2", etc. to it until it finds a name that will not overwrite an existing file.
fn available_path(dir: &Path, name: &str, extension: &str) -> Result<PathBuf> {
	let mut i = 0;
	loop {
		let file_name = if i > 0 {
			format!("{} {}.{}", name, i, extension)
		} else {
			format!("{}.{}", name, extension)
		};
		let path = dir.join(file_name);
		match std::fs::metadata(&path) {
			// If a file at the path does not exist, return the path.
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				return Ok(path);
			}
			Err(error) => return Err(error.into()),
			// If a file at the path exists, try the next number.
			Ok(_) => {
				i += 1;
			}
		}
	}
}

#[test]
fn test_available_path() {
	let dir = std::env::temp_dir().join(format!("arbor_available_path_{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	assert_eq!(
		available_path(&dir, "weather", "json").unwrap(),
		dir.join("weather.json")
	);
	std::fs::write(dir.join("weather.json"), "{}").unwrap();
	assert_eq!(
		available_path(&dir, "weather", "json").unwrap(),
		dir.join("weather 1.json")
	);
	std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_tree_file_round_trip() {
	let dir = std::env::temp_dir().join(format!("arbor_tree_file_{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	let csv_path = dir.join("weather.csv");
	std::fs::write(
		&csv_path,
		"outlook,windy,play\nsunny,false,no\novercast,true,yes\nrainy,true,no\nrainy,false,yes\n",
	)
	.unwrap();
	let dataset = Dataset::from_path(&csv_path, "play").unwrap();
	let tree = Tree::train(&dataset, &Default::default()).unwrap();
	let tree_path = dir.join("weather.json");
	write_tree(&tree, &tree_path).unwrap();
	assert_eq!(read_tree(&tree_path).unwrap(), tree);
	std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_predict_records() {
	let dir = std::env::temp_dir().join(format!("arbor_predict_records_{}", std::process::id()));
	std::fs::create_dir_all(&dir).unwrap();
	let train_path = dir.join("train.csv");
	std::fs::write(
		&train_path,
		"outlook,windy,play\nsunny,false,no\novercast,true,yes\nrainy,true,no\nrainy,false,yes\n",
	)
	.unwrap();
	let dataset = Dataset::from_path(&train_path, "play").unwrap();
	let tree = Tree::train(&dataset, &Default::default()).unwrap();

	// With the target column, the accuracy is reported. "snowy" was never seen, so it gets the root's majority label.
	let test_path = dir.join("test.csv");
	std::fs::write(
		&test_path,
		"outlook,windy,play\nsunny,true,no\nrainy,true,yes\nsnowy,false,no\n",
	)
	.unwrap();
	let records = read_records_from_path(&test_path).unwrap();
	let (predictions, accuracy) = predict_records(&tree, &records, Some("play")).unwrap();
	assert_eq!(predictions, vec!["no", "no", "no"]);
	assert!((accuracy.unwrap() - 2.0 / 3.0).abs() < 1e-12);

	// Without a target, there is one prediction per row and no accuracy.
	let (predictions, accuracy) = predict_records(&tree, &records, None).unwrap();
	assert_eq!(predictions.len(), 3);
	assert_eq!(accuracy, None);

	// A row missing a split feature is reported with its row index.
	let missing_path = dir.join("missing.csv");
	std::fs::write(&missing_path, "windy\ntrue\n").unwrap();
	let records = read_records_from_path(&missing_path).unwrap();
	let error = predict_records(&tree, &records, None).unwrap_err();
	assert_eq!(
		format!("{:#}", error),
		"failed to make a prediction for row 0: example is missing feature \"outlook\""
	);
	std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_parse_options() {
	let options = Options::try_parse_from(&[
		"arbor", "train", "--file", "weather.csv", "--target", "play",
	])
	.unwrap();
	match options {
		Options::Train(options) => {
			assert_eq!(options.file, PathBuf::from("weather.csv"));
			assert_eq!(options.target, "play");
			assert!(options.config.is_none());
		}
		Options::Predict(_) => panic!("expected the train subcommand"),
	}
	assert!(Options::try_parse_from(&["arbor", "predict", "--file", "weather.csv"]).is_err());
}
