use crate::{BranchNode, LeafNode, Node, Tree};
use std::fmt;

/// Trees render as one line per edge, with nested branches indented beneath the edge that leads to them.
///
/// ```text
/// outlook = overcast: yes
/// outlook = rainy
/// |   windy = false: yes
/// |   windy = true: no
/// ```
impl fmt::Display for Tree {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.root {
			Node::Leaf(LeafNode { label, .. }) => writeln!(f, "-> {}", label),
			Node::Branch(branch) => write_branch(f, branch, 0),
		}
	}
}

fn write_branch(f: &mut fmt::Formatter<'_>, branch: &BranchNode, depth: usize) -> fmt::Result {
	for (value, child) in branch.children.iter() {
		for _ in 0..depth {
			write!(f, "|   ")?;
		}
		write!(f, "{} = {}", branch.feature, value)?;
		match child {
			Node::Leaf(LeafNode { label, .. }) => writeln!(f, ": {}", label)?,
			Node::Branch(child) => {
				writeln!(f)?;
				write_branch(f, child, depth + 1)?;
			}
		}
	}
	Ok(())
}

#[cfg(test)]
use crate::{fixtures::weather, TrainOptions};

#[test]
fn test_render() {
	let tree = Tree::train(&weather(), &TrainOptions::default()).unwrap();
	insta::assert_snapshot!(tree.to_string().trim_end(), @r###"
 outlook = overcast: yes
 outlook = rainy
 |   windy = false: yes
 |   windy = true: no
 outlook = sunny
 |   humidity = high: no
 |   humidity = normal: yes
 "###);
}

#[test]
fn test_render_leaf() {
	let options = TrainOptions {
		max_depth: Some(0),
		..Default::default()
	};
	let tree = Tree::train(&weather(), &options).unwrap();
	assert_eq!(tree.to_string(), "-> yes\n");
}
