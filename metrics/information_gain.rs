use super::{
	entropy::{entropy_from_counts, EmptyInputError},
	Metric,
};
use num_traits::ToPrimitive;
use std::collections::BTreeMap;

/// The information gain is the reduction in entropy achieved by partitioning a set of examples on the value of a categorical feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct InformationGain;

/// `values[i]` is the feature value of the i-th example and `labels[i]` is its label. Both slices must have the same length.
#[derive(Debug, Clone, Copy)]
pub struct InformationGainInput<'a> {
	pub values: &'a [&'a str],
	pub labels: &'a [&'a str],
}

impl<'a> Metric<'a> for InformationGain {
	type Input = InformationGainInput<'a>;
	type Output = Result<f64, EmptyInputError>;
	fn compute(input: Self::Input) -> Self::Output {
		let InformationGainInput { values, labels } = input;
		debug_assert_eq!(values.len(), labels.len());
		if labels.is_empty() {
			return Err(EmptyInputError);
		}
		// Group the label counts by feature value in a single pass. The label counts for the whole set are accumulated alongside.
		let mut partitions: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
		let mut histogram: BTreeMap<&str, usize> = BTreeMap::new();
		for (value, label) in values.iter().zip(labels.iter()) {
			*partitions
				.entry(*value)
				.or_insert_with(BTreeMap::new)
				.entry(*label)
				.or_insert(0) += 1;
			*histogram.entry(*label).or_insert(0) += 1;
		}
		// A feature with a single value carries no information about the labels.
		if partitions.len() == 1 {
			return Ok(0.0);
		}
		let n_examples = labels.len();
		let entropy = entropy_from_counts(histogram.values().copied(), n_examples);
		let remainder: f64 = partitions
			.values()
			.map(|partition| {
				let partition_len: usize = partition.values().sum();
				let weight = partition_len.to_f64().unwrap() / n_examples.to_f64().unwrap();
				weight * entropy_from_counts(partition.values().copied(), partition_len)
			})
			.sum();
		// Rounding can leave a tiny negative remainder when the partitions are no purer than the whole.
		Ok((entropy - remainder).max(0.0))
	}
}

#[test]
fn test_worked_example() {
	let values = ["v2", "v2", "v3", "v1"];
	let labels = ["survived", "died", "died", "died"];
	let gain = InformationGain::compute(InformationGainInput {
		values: &values,
		labels: &labels,
	})
	.unwrap();
	assert!((gain - 0.3113).abs() < 1e-4);
}

#[test]
fn test_single_value() {
	let values = ["a", "a", "a"];
	let labels = ["yes", "no", "yes"];
	let gain = InformationGain::compute(InformationGainInput {
		values: &values,
		labels: &labels,
	});
	assert_eq!(gain, Ok(0.0));
}

#[test]
fn test_perfect_split() {
	let values = ["a", "b", "a", "b"];
	let labels = ["yes", "no", "yes", "no"];
	let gain = InformationGain::compute(InformationGainInput {
		values: &values,
		labels: &labels,
	});
	assert_eq!(gain, Ok(1.0));
}

#[test]
fn test_uninformative_split() {
	// Each partition has the same label distribution as the whole.
	let values = ["a", "a", "b", "b", "c", "c"];
	let labels = ["yes", "no", "yes", "no", "no", "yes"];
	let gain = InformationGain::compute(InformationGainInput {
		values: &values,
		labels: &labels,
	})
	.unwrap();
	assert!(gain >= 0.0);
	assert!(gain < 1e-12);
}

#[test]
fn test_gain_is_never_negative() {
	let labels = ["a", "b", "b", "c", "a", "a", "c", "b", "a"];
	let columns = [
		["x", "y", "x", "y", "x", "y", "x", "y", "x"],
		["p", "p", "q", "q", "r", "r", "p", "q", "r"],
		["m", "m", "m", "m", "m", "m", "m", "m", "n"],
	];
	for values in columns.iter() {
		let gain = InformationGain::compute(InformationGainInput {
			values,
			labels: &labels,
		})
		.unwrap();
		assert!(gain >= 0.0);
	}
}

#[test]
fn test_empty() {
	let gain = InformationGain::compute(InformationGainInput {
		values: &[],
		labels: &[],
	});
	assert_eq!(gain, Err(EmptyInputError));
}
