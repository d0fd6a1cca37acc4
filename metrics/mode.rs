use super::Metric;
use std::collections::BTreeMap;

/// The mode is the most frequent label. When several labels are tied for the highest count, the lexicographically smallest one is chosen.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mode;

impl<'a> Metric<'a> for Mode {
	type Input = &'a [&'a str];
	type Output = Option<&'a str>;
	fn compute(input: Self::Input) -> Self::Output {
		let mut histogram = BTreeMap::new();
		for value in input.iter() {
			*histogram.entry(*value).or_insert(0usize) += 1;
		}
		// The histogram iterates in ascending order, so only a strictly greater count replaces the current best.
		histogram
			.into_iter()
			.fold(None::<(&str, usize)>, |best, (value, count)| match best {
				Some((_, best_count)) if best_count >= count => best,
				_ => Some((value, count)),
			})
			.map(|(value, _)| value)
	}
}

#[test]
fn test_mode() {
	assert_eq!(Mode::compute(&["no", "yes", "yes"]), Some("yes"));
	assert_eq!(Mode::compute(&["b", "a", "c", "c", "a"]), Some("a"));
	assert_eq!(Mode::compute(&["yes", "no"]), Some("no"));
	assert_eq!(Mode::compute(&[]), None);
}
