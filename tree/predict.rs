use crate::{BranchNode, LeafNode, Node, Tree};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
	#[error("example is missing feature \"{0}\"")]
	MissingFeature(String),
}

impl Tree {
	/// Make a prediction for a given example. An example whose value for a branch's feature was never seen in training receives that branch's majority label.
	pub fn predict(&self, features: &BTreeMap<String, String>) -> Result<&str, PredictError> {
		// Start at the root node.
		let mut node = &self.root;
		// Traverse the tree until we get to a leaf.
		loop {
			match node {
				Node::Branch(BranchNode {
					feature,
					children,
					majority_label,
					..
				}) => {
					let value = features
						.get(feature)
						.ok_or_else(|| PredictError::MissingFeature(feature.clone()))?;
					node = match children.get(value) {
						Some(child) => child,
						None => return Ok(majority_label.as_str()),
					};
				}
				// We made it to a leaf! The prediction is the leaf's label.
				Node::Leaf(LeafNode { label, .. }) => return Ok(label.as_str()),
			}
		}
	}
}

#[cfg(test)]
use crate::{fixtures::weather, TrainOptions};
#[cfg(test)]
use maplit::btreemap;

#[test]
fn test_predict() {
	let tree = Tree::train(&weather(), &TrainOptions::default()).unwrap();
	let features = btreemap! {
		"outlook".to_owned() => "rainy".to_owned(),
		"temperature".to_owned() => "hot".to_owned(),
		"humidity".to_owned() => "high".to_owned(),
		"windy".to_owned() => "true".to_owned(),
	};
	assert_eq!(tree.predict(&features), Ok("no"));
	// Features the tree never splits on do not need to be present.
	let features = btreemap! {
		"outlook".to_owned() => "overcast".to_owned(),
	};
	assert_eq!(tree.predict(&features), Ok("yes"));
}

#[test]
fn test_unseen_value() {
	let tree = Tree::train(&weather(), &TrainOptions::default()).unwrap();
	let features = btreemap! {
		"outlook".to_owned() => "foggy".to_owned(),
	};
	assert_eq!(tree.predict(&features), Ok("yes"));
	// Three of the five sunny days are "no".
	let features = btreemap! {
		"outlook".to_owned() => "sunny".to_owned(),
		"humidity".to_owned() => "extreme".to_owned(),
	};
	assert_eq!(tree.predict(&features), Ok("no"));
}

#[test]
fn test_missing_feature() {
	let tree = Tree::train(&weather(), &TrainOptions::default()).unwrap();
	let features = btreemap! {
		"outlook".to_owned() => "sunny".to_owned(),
	};
	assert_eq!(
		tree.predict(&features),
		Err(PredictError::MissingFeature("humidity".to_owned()))
	);
}

#[test]
fn test_json_round_trip() {
	let dataset = weather();
	let tree = Tree::train(&dataset, &TrainOptions::default()).unwrap();
	let json = serde_json::to_string(&tree).unwrap();
	let deserialized: Tree = serde_json::from_str(&json).unwrap();
	assert_eq!(deserialized, tree);
	for example in dataset.examples.iter() {
		assert_eq!(
			deserialized.predict(&example.features),
			tree.predict(&example.features)
		);
	}
}
