//! Binary decision trees stored as flat node arrays.
//!
//! Node `i` is a leaf when both children are `-1`; otherwise a row goes to
//! `children_left[i]` when `x[feature[i]] <= threshold[i]` and to
//! `children_right[i]` otherwise. Children always come after their parent,
//! which rules out cycles.

use ndarray::ArrayView1;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TreeArrays {
    children_left: Vec<i64>,
    children_right: Vec<i64>,
    feature: Vec<i64>,
    threshold: Vec<f64>,
    value: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(Vec<f64>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TreeArrays")]
pub struct Tree {
    nodes: Vec<Node>,
    width: usize,
    max_feature: Option<usize>,
}

impl TryFrom<TreeArrays> for Tree {
    type Error = String;

    fn try_from(arrays: TreeArrays) -> Result<Self, Self::Error> {
        let n = arrays.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            arrays.children_right.len(),
            arrays.feature.len(),
            arrays.threshold.len(),
            arrays.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err("tree node arrays have different lengths".to_string());
        }

        let mut nodes = Vec::with_capacity(n);
        let mut width = None;
        let mut max_feature = None;
        let child = |index: i64, parent: usize| -> Option<usize> {
            usize::try_from(index)
                .ok()
                .filter(|child| *child > parent && *child < n)
        };

        for i in 0..n {
            let (left, right) = (arrays.children_left[i], arrays.children_right[i]);
            if left == -1 && right == -1 {
                let value = arrays.value[i].clone();
                match width {
                    None if value.is_empty() => return Err(format!("leaf {i} has no value")),
                    None => width = Some(value.len()),
                    Some(w) if w != value.len() => {
                        return Err(format!(
                            "leaf {i} has {} values, expected {w}",
                            value.len()
                        ))
                    }
                    Some(_) => {}
                }
                nodes.push(Node::Leaf(value));
                continue;
            }

            let (Some(left), Some(right)) = (child(left, i), child(right, i)) else {
                return Err(format!("node {i} has invalid children ({left}, {right})"));
            };
            let feature = usize::try_from(arrays.feature[i])
                .map_err(|_| format!("split node {i} has negative feature index"))?;
            let threshold = arrays.threshold[i];
            if !threshold.is_finite() {
                return Err(format!("split node {i} has a non-finite threshold"));
            }
            max_feature = max_feature.max(Some(feature));
            nodes.push(Node::Split {
                feature,
                threshold,
                left,
                right,
            });
        }

        let width = width.ok_or_else(|| "tree has no leaves".to_string())?;
        Ok(Tree {
            nodes,
            width,
            max_feature,
        })
    }
}

impl Tree {
    /// Checks the tree against the model it belongs to.
    pub fn check(&self, n_features: usize, width: usize) -> Result<(), String> {
        if self.width != width {
            return Err(format!(
                "tree leaves hold {} values, expected {width}",
                self.width
            ));
        }
        match self.max_feature {
            Some(feature) if feature >= n_features => Err(format!(
                "tree splits on feature {feature} but the model has {n_features} features"
            )),
            _ => Ok(()),
        }
    }

    /// Walks `row` down to its leaf and returns the leaf values.
    pub fn leaf(&self, row: ArrayView1<f64>) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}
