use super::StreamingMetric;
use num_traits::ToPrimitive;

/// The arithmetic mean, computed incrementally.
#[derive(Debug, Clone, Default)]
pub struct Mean {
	n: u64,
	mean: f64,
}

impl Mean {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StreamingMetric<'_> for Mean {
	type Input = f64;
	type Output = Option<f64>;

	fn update(&mut self, value: Self::Input) {
		self.n += 1;
		self.mean += (value - self.mean) / self.n.to_f64().unwrap();
	}

	fn merge(&mut self, other: Self) {
		let n = self.n + other.n;
		if n == 0 {
			return;
		}
		let n_a = self.n.to_f64().unwrap();
		let n_b = other.n.to_f64().unwrap();
		self.mean = (n_a * self.mean + n_b * other.mean) / (n_a + n_b);
		self.n = n;
	}

	fn finalize(self) -> Self::Output {
		if self.n == 0 {
			None
		} else {
			Some(self.mean)
		}
	}
}

#[test]
fn test_mean() {
	let mut a = Mean::new();
	a.update(1.0);
	a.update(2.0);
	let mut b = Mean::new();
	b.update(6.0);
	a.merge(b);
	a.merge(Mean::new());
	assert_eq!(a.finalize(), Some(3.0));
	assert_eq!(Mean::new().finalize(), None);
}
