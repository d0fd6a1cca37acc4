/*!
This crate implements decision trees over categorical features, built with the greedy, top-down ID3 algorithm. At each node the feature with the highest information gain is chosen, the examples are partitioned by that feature's values, and the builder recurses on each partition with the feature removed.

For an example, see `arbor_cli`, which trains a tree from a csv file.
*/

#![allow(clippy::tabs_in_doc_comments)]

use std::collections::BTreeMap;

mod feature_importances;
#[cfg(test)]
mod fixtures;
mod predict;
mod render;
mod train;

pub use self::predict::PredictError;
pub use self::train::TrainError;

/// These are the options passed to `Tree::train`.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainOptions {
	/// The depth of the tree will never exceed this value. The root is at depth 0, so `Some(0)` produces a tree with a single leaf. If it is `None`, the tree is grown until its leaves are pure or no features remain.
	pub max_depth: Option<usize>,
	/// A node will only be split if the best split achieves at least this information gain, in bits.
	pub min_gain_to_split: f64,
}

impl Default for TrainOptions {
	fn default() -> Self {
		Self {
			max_depth: None,
			min_gain_to_split: 0.0,
		}
	}
}

/// A trained decision tree. Once built, a tree is never modified.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tree {
	/// The names of the features the tree was allowed to split on, in sorted order.
	pub feature_names: Vec<String>,
	/// The distinct labels seen in training, in sorted order.
	pub classes: Vec<String>,
	pub root: Node,
}

/// A node is either a branch or a leaf.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
	Branch(BranchNode),
	Leaf(LeafNode),
}

/// A `BranchNode` sends each example to one of its children based on the example's value for a single feature.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BranchNode {
	/// This is the name of the feature this node splits on.
	pub feature: String,
	/// This maps each value of `feature` observed in training to the child that examples with that value are sent to.
	pub children: BTreeMap<String, Node>,
	/// This is the most frequent label among the training examples that reached this node. It is predicted for examples whose value for `feature` was never observed in training.
	pub majority_label: String,
	/// This is the number of training examples that reached this node.
	pub examples_count: usize,
}

/// The leaves in a tree hold the label to predict for examples that get sent to them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LeafNode {
	pub label: String,
	/// This is the number of training examples that reached this leaf.
	pub examples_count: usize,
}

impl Node {
	pub fn examples_count(&self) -> usize {
		match self {
			Self::Branch(BranchNode { examples_count, .. }) => *examples_count,
			Self::Leaf(LeafNode { examples_count, .. }) => *examples_count,
		}
	}

	pub fn is_leaf(&self) -> bool {
		matches!(self, Self::Leaf(_))
	}
}

impl Tree {
	/// Train a tree that may split on every feature in the dataset.
	pub fn train(
		dataset: &arbor_dataframe::Dataset,
		options: &TrainOptions,
	) -> Result<Self, TrainError> {
		let feature_names = dataset.feature_names();
		train::train(dataset, &feature_names, options)
	}

	/// Train a tree that may only split on `features`.
	pub fn train_with_features(
		dataset: &arbor_dataframe::Dataset,
		features: &[&str],
		options: &TrainOptions,
	) -> Result<Self, TrainError> {
		train::train(dataset, features, options)
	}

	/// The depth of the deepest leaf. A tree with a single leaf has depth 0.
	pub fn depth(&self) -> usize {
		let mut depth = 0;
		let mut stack = vec![(&self.root, 0)];
		while let Some((node, node_depth)) = stack.pop() {
			depth = depth.max(node_depth);
			if let Node::Branch(BranchNode { children, .. }) = node {
				stack.extend(children.values().map(|child| (child, node_depth + 1)));
			}
		}
		depth
	}

	pub fn n_leaves(&self) -> usize {
		let mut n_leaves = 0;
		let mut stack = vec![&self.root];
		while let Some(node) = stack.pop() {
			match node {
				Node::Branch(BranchNode { children, .. }) => stack.extend(children.values()),
				Node::Leaf(_) => n_leaves += 1,
			}
		}
		n_leaves
	}
}
