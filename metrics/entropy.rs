use super::Metric;
use num_traits::ToPrimitive;
use std::collections::BTreeMap;
use thiserror::Error;

/// The entropy, in bits, of the distribution of labels in a set of examples.
#[derive(Debug, Clone, Copy, Default)]
pub struct Entropy;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error("entropy is undefined for an empty set of labels")]
pub struct EmptyInputError;

impl<'a> Metric<'a> for Entropy {
	type Input = &'a [&'a str];
	type Output = Result<f64, EmptyInputError>;
	fn compute(labels: Self::Input) -> Self::Output {
		if labels.is_empty() {
			return Err(EmptyInputError);
		}
		let mut histogram: BTreeMap<&str, usize> = BTreeMap::new();
		for label in labels.iter() {
			*histogram.entry(*label).or_insert(0) += 1;
		}
		Ok(entropy_from_counts(histogram.values().copied(), labels.len()))
	}
}

/// Compute -Σ p·log2(p) where each p is `count / total`. Zero counts contribute nothing.
pub(crate) fn entropy_from_counts(counts: impl Iterator<Item = usize>, total: usize) -> f64 {
	let total = total.to_f64().unwrap();
	counts
		.filter(|count| *count > 0)
		.map(|count| {
			let probability = count.to_f64().unwrap() / total;
			-probability * probability.log2()
		})
		.sum::<f64>()
		.max(0.0)
}

#[test]
fn test_single_class() {
	assert_eq!(Entropy::compute(&["died"]), Ok(0.0));
	assert_eq!(Entropy::compute(&["died", "died", "died"]), Ok(0.0));
}

#[test]
fn test_uniform_binary() {
	assert_eq!(Entropy::compute(&["died", "survived"]), Ok(1.0));
	assert_eq!(
		Entropy::compute(&["died", "survived", "survived", "died"]),
		Ok(1.0)
	);
}

#[test]
fn test_skewed() {
	let entropy = Entropy::compute(&["survived", "died", "died", "died"]).unwrap();
	assert!((entropy - 0.8113).abs() < 1e-4);
	// Four equally likely classes carry two bits.
	let entropy = Entropy::compute(&["a", "b", "c", "d"]).unwrap();
	assert!((entropy - 2.0).abs() < 1e-12);
}

#[test]
fn test_empty() {
	assert_eq!(Entropy::compute(&[]), Err(EmptyInputError));
}
