use crate::{BranchNode, Node, Tree};

impl Tree {
	/// This function computes feature importances using the "split" method, where a feature's importance is proportional to the number of nodes that use it to split. The returned importances are in the order of `feature_names`. A tree without branches has an importance of zero for every feature.
	pub fn feature_importances(&self) -> Vec<f64> {
		let mut feature_importances = vec![0.0; self.feature_names.len()];
		let mut stack = vec![&self.root];
		while let Some(node) = stack.pop() {
			if let Node::Branch(BranchNode {
				feature, children, ..
			}) = node
			{
				if let Ok(feature_index) = self.feature_names.binary_search(feature) {
					feature_importances[feature_index] += 1.0;
				}
				stack.extend(children.values());
			}
		}
		// Normalize the feature_importances.
		let total: f64 = feature_importances.iter().sum();
		if total > 0.0 {
			for feature_importance in feature_importances.iter_mut() {
				*feature_importance /= total;
			}
		}
		feature_importances
	}

	/// Pair each feature name with its importance, most important first. Features with equal importance keep their sorted order.
	pub fn ranked_feature_importances(&self) -> Vec<(&str, f64)> {
		let mut ranked: Vec<(&str, f64)> = self
			.feature_names
			.iter()
			.map(|feature| feature.as_str())
			.zip(self.feature_importances())
			.collect();
		ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
		ranked
	}

	/// The number of branches that split on `feature`.
	pub fn split_count(&self, feature: &str) -> usize {
		let mut count = 0;
		let mut stack = vec![&self.root];
		while let Some(node) = stack.pop() {
			if let Node::Branch(branch) = node {
				if branch.feature == feature {
					count += 1;
				}
				stack.extend(branch.children.values());
			}
		}
		count
	}
}

#[cfg(test)]
use crate::{fixtures::weather, TrainOptions};

#[test]
fn test_feature_importances() {
	let tree = Tree::train(&weather(), &TrainOptions::default()).unwrap();
	let third = 1.0 / 3.0;
	assert_eq!(
		tree.feature_importances(),
		vec![third, third, 0.0, third]
	);
	let ranked = tree.ranked_feature_importances();
	assert_eq!(
		ranked.iter().map(|(feature, _)| *feature).collect::<Vec<_>>(),
		vec!["humidity", "outlook", "windy", "temperature"]
	);
	assert_eq!(tree.split_count("outlook"), 1);
	assert_eq!(tree.split_count("temperature"), 0);
	let sum: f64 = tree.feature_importances().iter().sum();
	assert!((sum - 1.0).abs() < 1e-12);
}

#[test]
fn test_single_leaf_importances() {
	let options = TrainOptions {
		max_depth: Some(0),
		..Default::default()
	};
	let tree = Tree::train(&weather(), &options).unwrap();
	assert_eq!(tree.feature_importances(), vec![0.0; 4]);
}
