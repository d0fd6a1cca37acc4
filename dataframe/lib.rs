/*!
This crate provides a basic implementation of categorical datasets, which are ordered sequences of labeled examples where every feature takes one of a finite set of string values. The set of features and the set of values each feature takes are not declared up front, they are derived by scanning the examples.
*/

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub mod load;

pub use self::load::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
	pub examples: Vec<Example>,
}

/// An `Example` maps each feature name to the example's value for that feature, and holds the example's label.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
	pub features: BTreeMap<String, String>,
	pub label: String,
}

/// A `SchemaError` is returned by [`Dataset::validate_schema`] when the examples in a dataset do not all share the same features.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
	#[error("example {example_index} is missing feature \"{feature}\"")]
	MissingFeature {
		example_index: usize,
		feature: String,
	},
	#[error("example {example_index} has unexpected feature \"{feature}\"")]
	UnexpectedFeature {
		example_index: usize,
		feature: String,
	},
}

impl Example {
	pub fn new(features: BTreeMap<String, String>, label: impl Into<String>) -> Self {
		Self {
			features,
			label: label.into(),
		}
	}

	/// Get this example's value for `feature`, if it has one.
	pub fn get(&self, feature: &str) -> Option<&str> {
		self.features.get(feature).map(|value| value.as_str())
	}
}

impl Dataset {
	pub fn new(examples: Vec<Example>) -> Self {
		Self { examples }
	}

	pub fn len(&self) -> usize {
		self.examples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.examples.is_empty()
	}

	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.examples.iter().map(|example| example.label.as_str())
	}

	/// Retrieve the names of all features that appear in at least one example, in sorted order.
	pub fn feature_names(&self) -> Vec<&str> {
		let feature_names: BTreeSet<&str> = self
			.examples
			.iter()
			.flat_map(|example| example.features.keys().map(|name| name.as_str()))
			.collect();
		feature_names.into_iter().collect()
	}

	/// Retrieve the distinct values `feature` takes across the dataset.
	pub fn feature_values(&self, feature: &str) -> BTreeSet<&str> {
		self.examples
			.iter()
			.filter_map(|example| example.get(feature))
			.collect()
	}

	/// Retrieve the distinct labels in the dataset.
	pub fn classes(&self) -> BTreeSet<&str> {
		self.labels().collect()
	}

	/// Check that every example has exactly the features of the first example. The first offending example is reported.
	pub fn validate_schema(&self) -> Result<(), SchemaError> {
		let schema = match self.examples.first() {
			Some(example) => &example.features,
			None => return Ok(()),
		};
		for (example_index, example) in self.examples.iter().enumerate().skip(1) {
			if let Some(feature) = schema
				.keys()
				.find(|feature| !example.features.contains_key(*feature))
			{
				return Err(SchemaError::MissingFeature {
					example_index,
					feature: feature.clone(),
				});
			}
			if let Some(feature) = example
				.features
				.keys()
				.find(|feature| !schema.contains_key(*feature))
			{
				return Err(SchemaError::UnexpectedFeature {
					example_index,
					feature: feature.clone(),
				});
			}
		}
		Ok(())
	}
}

#[cfg(test)]
fn weather() -> Dataset {
	use maplit::btreemap;
	let example = |outlook: &str, windy: &str, label: &str| {
		Example::new(
			btreemap! {
				"outlook".to_owned() => outlook.to_owned(),
				"windy".to_owned() => windy.to_owned(),
			},
			label,
		)
	};
	Dataset::new(vec![
		example("sunny", "false", "no"),
		example("overcast", "true", "yes"),
		example("rainy", "false", "yes"),
		example("sunny", "true", "no"),
	])
}

#[test]
fn test_feature_scan() {
	let dataset = weather();
	assert_eq!(dataset.feature_names(), vec!["outlook", "windy"]);
	assert_eq!(
		dataset.feature_values("outlook").into_iter().collect::<Vec<_>>(),
		vec!["overcast", "rainy", "sunny"]
	);
	assert!(dataset.feature_values("humidity").is_empty());
	assert_eq!(
		dataset.classes().into_iter().collect::<Vec<_>>(),
		vec!["no", "yes"]
	);
}

#[test]
fn test_validate_schema() {
	let mut dataset = weather();
	assert_eq!(dataset.validate_schema(), Ok(()));
	dataset.examples[2].features.remove("windy");
	assert_eq!(
		dataset.validate_schema(),
		Err(SchemaError::MissingFeature {
			example_index: 2,
			feature: "windy".to_owned(),
		})
	);
	let mut dataset = weather();
	dataset.examples[3]
		.features
		.insert("humidity".to_owned(), "high".to_owned());
	assert_eq!(
		dataset.validate_schema(),
		Err(SchemaError::UnexpectedFeature {
			example_index: 3,
			feature: "humidity".to_owned(),
		})
	);
	assert_eq!(Dataset::default().validate_schema(), Ok(()));
}
