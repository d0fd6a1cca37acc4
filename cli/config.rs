/*!
This module defines the `Config` struct, which is used to configure training a tree with `arbor train`.
*/

use anyhow::{Context, Result};
use arbor_tree::TrainOptions;
use std::path::Path;

#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub max_depth: Option<usize>,
	pub min_gain_to_split: Option<f64>,
}

impl Config {
	/// Options left out of the config keep their default values.
	pub fn train_options(&self) -> TrainOptions {
		let default = TrainOptions::default();
		TrainOptions {
			max_depth: self.max_depth.or(default.max_depth),
			min_gain_to_split: self
				.min_gain_to_split
				.unwrap_or(default.min_gain_to_split),
		}
	}
}

pub fn load_config(config_path: Option<&Path>) -> Result<Option<Config>> {
	if let Some(config_path) = config_path {
		let config = std::fs::read_to_string(config_path)
			.with_context(|| format!("failed to read config file {}", config_path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", config_path.display()))?;
		Ok(Some(config))
	} else {
		Ok(None)
	}
}

#[test]
fn test_parse_config() {
	let config: Config = serde_yaml::from_str("max_depth: 3\n").unwrap();
	assert_eq!(
		config,
		Config {
			max_depth: Some(3),
			min_gain_to_split: None,
		}
	);
	assert_eq!(
		config.train_options(),
		TrainOptions {
			max_depth: Some(3),
			min_gain_to_split: 0.0,
		}
	);
	let config: Config = serde_yaml::from_str("min_gain_to_split: 0.25\n").unwrap();
	assert_eq!(
		config.train_options(),
		TrainOptions {
			max_depth: None,
			min_gain_to_split: 0.25,
		}
	);
}

#[test]
fn test_unknown_config_field() {
	let result: Result<Config, _> = serde_yaml::from_str("max_rounds: 100\n");
	assert!(result.is_err());
}

#[test]
fn test_no_config() {
	assert_eq!(load_config(None).unwrap(), None);
}
