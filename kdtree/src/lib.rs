//! Median-balanced 3D KD-tree over any coordinate source.
//!
//! The tree stores point ids only; coordinates stay in the backing
//! [`Vec3Accessor`]. Queries take `&self` and allocate a scratch stack sized
//! by the depth recorded at construction, so concurrent readers need no
//! shared state. Deletion rewires nodes without touching the source.

mod node;

use nalgebra::Vector3;
use pcr_common::{Error, Neighbor, Search, Vec3Accessor};

use crate::node::Node;

pub struct KdTree<A> {
    accessor: A,
    root: Option<Box<Node>>,
    max_depth: usize,
    min_dist_sq: Option<f32>,
}

impl<A: Vec3Accessor> KdTree<A> {
    pub fn new(accessor: A) -> Self {
        let mut ids: Vec<usize> = (0..accessor.len()).collect();
        let root = node::build(&accessor, &mut ids, 0);
        let max_depth = node::max_depth(root.as_deref(), 0);
        KdTree {
            accessor,
            root,
            max_depth,
            min_dist_sq: None,
        }
    }

    /// Makes `nearest` approximate: searching stops as soon as a candidate
    /// closer than `min_dist_sq` is seen.
    pub fn with_min_dist_sq(mut self, min_dist_sq: f32) -> Self {
        self.min_dist_sq = Some(min_dist_sq);
        self
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Id of the point with the lowest coordinate on `dim`.
    pub fn find_minimum(&self, dim: usize) -> Result<usize, Error> {
        if dim > 2 {
            return Err(Error::InvalidDim(dim));
        }
        match self.root.as_deref() {
            Some(root) => Ok(node::find_minimum(&self.accessor, root, dim)),
            None => Err(Error::EmptyRange),
        }
    }

    /// Removes a point id from the index. The backing accessor is left
    /// untouched; deleting an id that is no longer present is a no-op.
    pub fn delete_point(&mut self, pid: usize) -> Result<(), Error> {
        if pid >= self.accessor.len() {
            return Err(Error::InvalidPointId(pid));
        }
        if let Some(root) = self.root.take() {
            let (root, _) = node::delete(&self.accessor, root, pid);
            self.root = root;
        }
        Ok(())
    }

    fn new_stack<'t>(&'t self, first: &'t Node) -> Vec<&'t Node> {
        let mut stack = Vec::with_capacity(self.max_depth + 1);
        stack.push(first);
        stack
    }

    /// Extends the node path down to a leaf, at each branch entering the
    /// child whose half-space contains `p`. A tie on the split value follows
    /// the right child.
    fn search_leaf<'t>(&'t self, p: &Vector3<f32>, stack: &mut Vec<&'t Node>) {
        loop {
            let parent = *stack.last().unwrap();
            let pivot_val = self.accessor.vec3_at(parent.id)[parent.dim];
            let val = p[parent.dim];
            let next = match (parent.children[0].as_deref(), parent.children[1].as_deref()) {
                (None, None) => break,
                (None, Some(c1)) => c1,
                (Some(c0), None) => c0,
                (Some(c0), Some(c1)) => {
                    if pivot_val > val {
                        c0
                    } else {
                        c1
                    }
                }
            };
            stack.push(next);
        }
    }

    /// Unwinds a root-to-leaf path, checking pivots and descending into
    /// siblings whose half-plane is closer than the best hit so far.
    fn nearest_impl(&self, p: &Vector3<f32>, nodes: &[&Node], max_range_sq: f32) -> (i32, f32) {
        let leaf = nodes[nodes.len() - 1];
        let mut id = leaf.id as i32;
        let mut dsq = (self.accessor.vec3_at(leaf.id) - p).norm_squared();
        if dsq > max_range_sq {
            id = -1;
            dsq = max_range_sq;
        }
        if let Some(min_dist_sq) = self.min_dist_sq {
            if id >= 0 && dsq < min_dist_sq {
                return (id, dsq);
            }
        }
        for j in (0..nodes.len() - 1).rev() {
            let pivot = self.accessor.vec3_at(nodes[j].id);
            let dim = nodes[j].dim;
            let from_pivot = p[dim] - pivot[dim];
            if from_pivot * from_pivot > dsq {
                continue;
            }
            let dsq_pivot = (pivot - p).norm_squared();
            if dsq_pivot < dsq {
                id = nodes[j].id as i32;
                dsq = dsq_pivot;
            }
            if let Some(min_dist_sq) = self.min_dist_sq {
                if dsq < min_dist_sq {
                    return (id, dsq);
                }
            }
            let taken_left = { nodes[j].children[0].as_deref() }
                .is_some_and(|c| std::ptr::eq(c, nodes[j + 1]));
            let sibling = if taken_left {
                nodes[j].children[1].as_deref()
            } else {
                nodes[j].children[0].as_deref()
            };
            if let Some(sibling) = sibling {
                let mut stack = self.new_stack(sibling);
                self.search_leaf(p, &mut stack);
                let (id2, dsq2) = self.nearest_impl(p, &stack, dsq);
                if id2 >= 0 {
                    id = id2;
                    dsq = dsq2;
                }
            }
        }
        (id, dsq)
    }

    fn range_impl(&self, node: &Node, p: &Vector3<f32>, max_range_sq: f32, out: &mut Vec<Neighbor>) {
        let pivot = self.accessor.vec3_at(node.id);
        let dsq = (pivot - p).norm_squared();
        if dsq < max_range_sq {
            out.push(Neighbor {
                id: node.id as i32,
                dist_sq: dsq,
            });
        }
        let from_pivot = p[node.dim] - pivot[node.dim];
        let near = usize::from(p[node.dim] > pivot[node.dim]);
        if let Some(child) = node.children[near].as_deref() {
            self.range_impl(child, p, max_range_sq, out);
        }
        if from_pivot * from_pivot < max_range_sq {
            if let Some(child) = node.children[1 - near].as_deref() {
                self.range_impl(child, p, max_range_sq, out);
            }
        }
    }
}

impl<A: Vec3Accessor> Search for KdTree<A> {
    fn nearest(&self, p: &Vector3<f32>, max_range: f32) -> Neighbor {
        let root = match self.root.as_deref() {
            Some(root) => root,
            None => return Neighbor::none(max_range),
        };
        let mut stack = self.new_stack(root);
        self.search_leaf(p, &mut stack);
        let (id, dist_sq) = self.nearest_impl(p, &stack, max_range * max_range);
        Neighbor { id, dist_sq }
    }

    fn range(&self, p: &Vector3<f32>, max_range: f32) -> Vec<Neighbor> {
        let mut out = Vec::new();
        if let Some(root) = self.root.as_deref() {
            self.range_impl(root, p, max_range * max_range, &mut out);
        }
        out.sort_by(|a, b| a.dist_sq.total_cmp(&b.dist_sq));
        out
    }
}

impl<A: Vec3Accessor> Vec3Accessor for KdTree<A> {
    fn len(&self) -> usize {
        self.accessor.len()
    }

    fn vec3_at(&self, i: usize) -> Vector3<f32> {
        self.accessor.vec3_at(i)
    }
}
