use super::{mean::Mean, StreamingMetric};

/// The accuracy is the proportion of examples where prediction == label.
#[derive(Debug, Clone, Default)]
pub struct Accuracy(Mean);

impl Accuracy {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<'a> StreamingMetric<'a> for Accuracy {
	/// A `(prediction, label)` pair.
	type Input = (&'a str, &'a str);
	type Output = Option<f64>;

	fn update(&mut self, value: Self::Input) {
		self.0.update(if value.0 == value.1 { 1.0 } else { 0.0 })
	}

	fn merge(&mut self, other: Self) {
		self.0.merge(other.0)
	}

	fn finalize(self) -> Self::Output {
		self.0.finalize()
	}
}

#[test]
fn test_accuracy() {
	let mut accuracy = Accuracy::new();
	accuracy.update(("yes", "yes"));
	accuracy.update(("no", "yes"));
	accuracy.update(("no", "no"));
	accuracy.update(("yes", "yes"));
	let accuracy = accuracy.finalize().unwrap();
	assert!((accuracy - 0.75).abs() < 1e-12);
	assert_eq!(Accuracy::new().finalize(), None);
}
