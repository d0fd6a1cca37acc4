use crate::{BranchNode, LeafNode, Node, TrainOptions, Tree};
use arbor_dataframe::Dataset;
use arbor_metrics::{EmptyInputError, InformationGain, InformationGainInput, Metric, Mode};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainError {
	#[error("cannot train a tree on an empty set of examples")]
	EmptyInput(#[from] EmptyInputError),
	#[error("example {example_index} is missing feature \"{feature}\"")]
	InconsistentSchema {
		example_index: usize,
		feature: String,
	},
	#[error("feature \"{0}\" does not appear in the dataset")]
	UnknownFeature(String),
}

/// This is the shared `train` function called by `Tree::train` and `Tree::train_with_features`.
pub fn train(
	dataset: &Dataset,
	features: &[&str],
	options: &TrainOptions,
) -> Result<Tree, TrainError> {
	if dataset.is_empty() {
		return Err(TrainError::EmptyInput(EmptyInputError));
	}
	// Sort the candidate features so that ties in information gain are broken the same way regardless of the order the caller passed them in.
	let mut features = features.to_vec();
	features.sort_unstable();
	features.dedup();
	let known_features = dataset.feature_names();
	if let Some(feature) = features
		.iter()
		.find(|feature| known_features.binary_search(*feature).is_err())
	{
		return Err(TrainError::UnknownFeature((*feature).to_owned()));
	}
	let builder = TreeBuilder { dataset, options };
	let examples_index: Vec<usize> = (0..dataset.len()).collect();
	let root = builder.build_node(examples_index, &features, 0)?;
	let tree = Tree {
		feature_names: features.iter().map(|feature| (*feature).to_owned()).collect(),
		classes: dataset.classes().into_iter().map(ToOwned::to_owned).collect(),
		root,
	};
	debug!(
		depth = tree.depth(),
		n_leaves = tree.n_leaves(),
		examples_count = tree.root.examples_count(),
		"finished training tree"
	);
	Ok(tree)
}

struct TreeBuilder<'a> {
	dataset: &'a Dataset,
	options: &'a TrainOptions,
}

/// The best split found for a node.
struct Split<'a> {
	feature: &'a str,
	gain: f64,
	/// `values[i]` is the value of `feature` for the i-th example in the node's examples index.
	values: Vec<&'a str>,
}

impl<'a> TreeBuilder<'a> {
	/// Build the node for the examples in `examples_index`, which may split on any feature in `features`. `features` is sorted and every index in `examples_index` is valid.
	fn build_node(
		&self,
		examples_index: Vec<usize>,
		features: &[&'a str],
		depth: usize,
	) -> Result<Node, TrainError> {
		let dataset = self.dataset;
		let labels: Vec<&str> = examples_index
			.iter()
			.map(|example_index| dataset.examples[*example_index].label.as_str())
			.collect();
		let examples_count = labels.len();
		let majority_label = Mode::compute(&labels).ok_or(EmptyInputError)?;

		// If all the examples share a label, there is nothing left to learn.
		if labels.iter().all(|label| *label == majority_label) {
			return Ok(leaf(majority_label, examples_count, depth));
		}
		// If there are no features left to split on, predict the majority label.
		if features.is_empty() {
			return Ok(leaf(majority_label, examples_count, depth));
		}
		if let Some(max_depth) = self.options.max_depth {
			if depth >= max_depth {
				return Ok(leaf(majority_label, examples_count, depth));
			}
		}

		// Choose the feature with the highest information gain. Since `features` is sorted, the first of several features tied for the highest gain wins.
		let mut best_split: Option<Split> = None;
		for feature in features.iter().copied() {
			let values = self.feature_values(&examples_index, feature)?;
			// A feature with a single value among these examples cannot partition them.
			if values.iter().all(|value| Some(value) == values.first()) {
				continue;
			}
			let gain = InformationGain::compute(InformationGainInput {
				values: &values,
				labels: &labels,
			})?;
			let is_better = match &best_split {
				Some(best_split) => gain > best_split.gain,
				None => true,
			};
			if is_better {
				best_split = Some(Split {
					feature,
					gain,
					values,
				});
			}
		}
		let best_split = match best_split {
			Some(best_split) => best_split,
			None => return Ok(leaf(majority_label, examples_count, depth)),
		};
		if best_split.gain < self.options.min_gain_to_split {
			return Ok(leaf(majority_label, examples_count, depth));
		}
		debug!(
			feature = best_split.feature,
			gain = best_split.gain,
			examples_count,
			depth,
			"split"
		);

		// Partition the examples index by the value of the chosen feature and recurse on each partition without that feature.
		let mut partitions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
		for (example_index, value) in examples_index.iter().zip(best_split.values.iter()) {
			partitions
				.entry(*value)
				.or_insert_with(Vec::new)
				.push(*example_index);
		}
		let remaining_features: Vec<&str> = features
			.iter()
			.copied()
			.filter(|feature| *feature != best_split.feature)
			.collect();
		let children = partitions
			.into_iter()
			.map(|(value, examples_index)| -> Result<(String, Node), TrainError> {
				let child = self.build_node(examples_index, &remaining_features, depth + 1)?;
				Ok((value.to_owned(), child))
			})
			.collect::<Result<BTreeMap<_, _>, TrainError>>()?;
		Ok(Node::Branch(BranchNode {
			feature: best_split.feature.to_owned(),
			children,
			majority_label: majority_label.to_owned(),
			examples_count,
		}))
	}

	/// Retrieve the value of `feature` for each example in `examples_index`.
	fn feature_values(
		&self,
		examples_index: &[usize],
		feature: &str,
	) -> Result<Vec<&'a str>, TrainError> {
		let dataset = self.dataset;
		examples_index
			.iter()
			.map(|example_index| {
				dataset.examples[*example_index]
					.get(feature)
					.ok_or_else(|| TrainError::InconsistentSchema {
						example_index: *example_index,
						feature: feature.to_owned(),
					})
			})
			.collect()
	}
}

fn leaf(label: &str, examples_count: usize, depth: usize) -> Node {
	debug!(label, examples_count, depth, "leaf");
	Node::Leaf(LeafNode {
		label: label.to_owned(),
		examples_count,
	})
}

#[cfg(test)]
use crate::fixtures::{example, weather};

#[test]
fn test_weather() {
	let dataset = weather();
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	let root = match &tree.root {
		Node::Branch(root) => root,
		Node::Leaf(_) => panic!("expected the root to be a branch"),
	};
	assert_eq!(root.feature, "outlook");
	assert_eq!(tree.root.examples_count(), 14);
	assert_eq!(root.children["sunny"].examples_count(), 5);
	assert_eq!(root.majority_label, "yes");
	assert_eq!(
		root.children.keys().collect::<Vec<_>>(),
		vec!["overcast", "rainy", "sunny"]
	);
	assert_eq!(
		root.children["overcast"],
		Node::Leaf(LeafNode {
			label: "yes".to_owned(),
			examples_count: 4,
		})
	);
	match &root.children["sunny"] {
		Node::Branch(branch) => assert_eq!(branch.feature, "humidity"),
		Node::Leaf(_) => panic!("expected a branch on humidity"),
	}
	match &root.children["rainy"] {
		Node::Branch(branch) => assert_eq!(branch.feature, "windy"),
		Node::Leaf(_) => panic!("expected a branch on windy"),
	}
	assert_eq!(tree.depth(), 2);
	assert_eq!(tree.n_leaves(), 5);
	assert_eq!(
		tree.feature_names,
		vec!["humidity", "outlook", "temperature", "windy"]
	);
	assert_eq!(tree.classes, vec!["no", "yes"]);
}

#[test]
fn test_pure_labels() {
	let dataset = Dataset::new(vec![
		example(&[("a", "1"), ("b", "x")], "yes"),
		example(&[("a", "2"), ("b", "y")], "yes"),
		example(&[("a", "3"), ("b", "z")], "yes"),
	]);
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	assert_eq!(
		tree.root,
		Node::Leaf(LeafNode {
			label: "yes".to_owned(),
			examples_count: 3,
		})
	);
}

#[test]
fn test_no_features_left() {
	// Once "a" is used, the "a" = "1" partition has mixed labels and no features left.
	let dataset = Dataset::new(vec![
		example(&[("a", "1")], "yes"),
		example(&[("a", "1")], "no"),
		example(&[("a", "1")], "no"),
		example(&[("a", "2")], "yes"),
	]);
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	let root = match &tree.root {
		Node::Branch(root) => root,
		Node::Leaf(_) => panic!("expected the root to be a branch"),
	};
	assert_eq!(
		root.children["1"],
		Node::Leaf(LeafNode {
			label: "no".to_owned(),
			examples_count: 3,
		})
	);
}

#[test]
fn test_majority_tie_is_deterministic() {
	let dataset = Dataset::new(vec![
		example(&[("a", "1")], "yes"),
		example(&[("a", "1")], "no"),
	]);
	for _ in 0..4 {
		let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
		assert_eq!(
			tree.root,
			Node::Leaf(LeafNode {
				label: "no".to_owned(),
				examples_count: 2,
			})
		);
	}
}

#[test]
fn test_single_valued_feature_makes_a_leaf() {
	let dataset = Dataset::new(vec![
		example(&[("a", "1")], "yes"),
		example(&[("a", "1")], "no"),
		example(&[("a", "1")], "no"),
	]);
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	assert_eq!(
		tree.root,
		Node::Leaf(LeafNode {
			label: "no".to_owned(),
			examples_count: 3,
		})
	);
	assert_eq!(tree.depth(), 0);
	assert_eq!(tree.n_leaves(), 1);
}

#[test]
fn test_single_valued_feature_is_never_chosen() {
	// "a" sorts first and ties "b" at zero gain, but only "b" separates the examples.
	let dataset = Dataset::new(vec![
		example(&[("a", "1"), ("b", "x")], "yes"),
		example(&[("a", "1"), ("b", "x")], "no"),
		example(&[("a", "1"), ("b", "y")], "yes"),
		example(&[("a", "1"), ("b", "y")], "no"),
	]);
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	let root = match &tree.root {
		Node::Branch(root) => root,
		Node::Leaf(_) => panic!("expected the root to be a branch"),
	};
	assert_eq!(root.feature, "b");
	assert_eq!(root.children.len(), 2);
	assert!(root.children.values().all(|child| child.is_leaf()));
}

#[test]
fn test_gain_tie_picks_first_feature() {
	// "b" and "c" separate the labels equally well.
	let dataset = Dataset::new(vec![
		example(&[("c", "p"), ("b", "x"), ("a", "m")], "yes"),
		example(&[("c", "q"), ("b", "y"), ("a", "m")], "no"),
	]);
	let tree = Tree::train_with_features(&dataset, &["c", "b"], &TrainOptions::default()).unwrap();
	match &tree.root {
		Node::Branch(root) => assert_eq!(root.feature, "b"),
		Node::Leaf(_) => panic!("expected the root to be a branch"),
	}
	assert_eq!(tree.feature_names, vec!["b", "c"]);
}

#[test]
fn test_max_depth() {
	let dataset = weather();
	let options = TrainOptions {
		max_depth: Some(0),
		..Default::default()
	};
	let tree = Tree::train(&dataset, &options).unwrap();
	assert_eq!(
		tree.root,
		Node::Leaf(LeafNode {
			label: "yes".to_owned(),
			examples_count: 14,
		})
	);
	let options = TrainOptions {
		max_depth: Some(1),
		..Default::default()
	};
	let tree = Tree::train(&dataset, &options).unwrap();
	assert_eq!(tree.depth(), 1);
	assert_eq!(tree.n_leaves(), 3);
}

#[test]
fn test_min_gain_to_split() {
	let dataset = weather();
	// The best split at the root, on outlook, gains about 0.247 bits.
	let options = TrainOptions {
		min_gain_to_split: 0.3,
		..Default::default()
	};
	let tree = Tree::train(&dataset, &options).unwrap();
	assert!(tree.root.is_leaf());
}

#[test]
fn test_inconsistent_schema() {
	let dataset = Dataset::new(vec![
		example(&[("a", "1"), ("b", "x")], "yes"),
		example(&[("a", "2")], "no"),
	]);
	let error = Tree::train(&dataset, &TrainOptions::default()).unwrap_err();
	assert_eq!(
		error,
		TrainError::InconsistentSchema {
			example_index: 1,
			feature: "b".to_owned(),
		}
	);
}

#[test]
fn test_empty_dataset() {
	let error = Tree::train(&Dataset::default(), &TrainOptions::default()).unwrap_err();
	assert_eq!(error, TrainError::EmptyInput(EmptyInputError));
}

#[test]
fn test_unknown_feature() {
	let dataset = weather();
	let error =
		Tree::train_with_features(&dataset, &["outlook", "color"], &TrainOptions::default())
			.unwrap_err();
	assert_eq!(error, TrainError::UnknownFeature("color".to_owned()));
}

#[test]
fn test_training_examples_reach_their_leaf() {
	let dataset = weather();
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	// The weather dataset is consistent, so a fully grown tree classifies every training example correctly.
	for example in dataset.examples.iter() {
		assert_eq!(tree.predict(&example.features).unwrap(), example.label);
	}
}

#[test]
fn test_predictions_match_leaf_majority() {
	// The "a" = "1", "b" = "x" examples cannot be separated, so their leaf predicts their majority label.
	let dataset = Dataset::new(vec![
		example(&[("a", "1"), ("b", "x")], "yes"),
		example(&[("a", "1"), ("b", "x")], "no"),
		example(&[("a", "1"), ("b", "x")], "no"),
		example(&[("a", "1"), ("b", "y")], "yes"),
		example(&[("a", "2"), ("b", "x")], "yes"),
	]);
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	let predictions: Vec<&str> = dataset
		.examples
		.iter()
		.map(|example| tree.predict(&example.features).unwrap())
		.collect();
	assert_eq!(predictions, vec!["no", "no", "no", "yes", "yes"]);
}
