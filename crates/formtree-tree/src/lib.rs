#![forbid(unsafe_code)]

//! Ordered multi-way tree with positional addressing.
//!
//! Every node owns a payload and an ordered list of child trees. Nodes are
//! addressed by a *path*: the sequence of zero-based child indices walked
//! from the root. The empty path is the root itself.
//!
//! All path-addressed operations are total. A path that does not resolve
//! leaves the tree untouched and is reported through the return value
//! (`None` / `false`), never through a panic.
//!
//! # Example
//!
//! ```
//! use formtree_tree::Tree;
//!
//! let mut tree = Tree::leaf("root")
//!     .child(Tree::leaf("a").child(Tree::leaf("a1")))
//!     .child(Tree::leaf("b"));
//!
//! assert_eq!(tree.get_value(&[0, 0]), Some(&"a1"));
//! assert_eq!(tree.get_value(&[5]), None);
//!
//! tree.insert_after(&[0], Tree::leaf("c"));
//! let labels: Vec<_> = tree.iter().copied().collect();
//! assert_eq!(labels, ["root", "a", "a1", "c", "b"]);
//! ```

/// A node address: child indices from the root.
pub type Path = [usize];

/// A rooted, ordered, finite tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree<A> {
    value: A,
    children: Vec<Tree<A>>,
}

impl<A> Tree<A> {
    /// Create a node without children.
    #[must_use]
    pub fn leaf(value: A) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }

    /// Create a node with the given children.
    #[must_use]
    pub fn branch(value: A, children: Vec<Tree<A>>) -> Self {
        Self { value, children }
    }

    /// Append a child (builder style).
    #[must_use]
    pub fn child(mut self, node: Tree<A>) -> Self {
        self.children.push(node);
        self
    }

    /// The node's own payload.
    #[must_use]
    pub fn value(&self) -> &A {
        &self.value
    }

    /// Mutable access to the node's own payload.
    pub fn value_mut(&mut self) -> &mut A {
        &mut self.value
    }

    /// Replace the node's payload, leaving children untouched.
    pub fn set_value(&mut self, value: A) {
        self.value = value;
    }

    /// Transform the node's payload in place.
    pub fn update_value(&mut self, f: impl FnOnce(&mut A)) {
        f(&mut self.value);
    }

    /// Consume the node, returning its payload.
    #[must_use]
    pub fn into_value(self) -> A {
        self.value
    }

    /// Consume the node, returning payload and children.
    #[must_use]
    pub fn into_parts(self) -> (A, Vec<Tree<A>>) {
        (self.value, self.children)
    }

    /// The ordered children.
    #[must_use]
    pub fn children(&self) -> &[Tree<A>] {
        &self.children
    }

    /// Mutable access to the child list.
    pub fn children_mut(&mut self) -> &mut Vec<Tree<A>> {
        &mut self.children
    }

    /// Whether this node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes, including this one.
    #[must_use]
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Tree::size).sum::<usize>()
    }

    // -------------------------------------------------------------------------
    // Path addressing
    // -------------------------------------------------------------------------

    /// Resolve a path to a subtree.
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<&Tree<A>> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    /// Resolve a path to a mutable subtree.
    pub fn get_mut(&mut self, path: &Path) -> Option<&mut Tree<A>> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// Resolve a path to a payload.
    #[must_use]
    pub fn get_value(&self, path: &Path) -> Option<&A> {
        self.get(path).map(Tree::value)
    }

    /// Apply `f` to the subtree at `path`. Returns `false` if the path
    /// does not resolve.
    pub fn update(&mut self, path: &Path, f: impl FnOnce(&mut Tree<A>)) -> bool {
        match self.get_mut(path) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }

    /// Replace the subtree at `path`. The empty path replaces the root.
    pub fn set(&mut self, path: &Path, subtree: Tree<A>) -> bool {
        self.update(path, |node| *node = subtree)
    }

    /// Detach and return the subtree at `path`. The root cannot be removed.
    pub fn remove(&mut self, path: &Path) -> Option<Tree<A>> {
        let (&index, parent_path) = path.split_last()?;
        let parent = self.get_mut(parent_path)?;
        (index < parent.children.len()).then(|| parent.children.remove(index))
    }

    /// Insert `subtree` as the sibling immediately before the node at `path`.
    pub fn insert_before(&mut self, path: &Path, subtree: Tree<A>) -> bool {
        self.insert_at(path, 0, subtree)
    }

    /// Insert `subtree` as the sibling immediately after the node at `path`.
    pub fn insert_after(&mut self, path: &Path, subtree: Tree<A>) -> bool {
        self.insert_at(path, 1, subtree)
    }

    fn insert_at(&mut self, path: &Path, offset: usize, subtree: Tree<A>) -> bool {
        let Some((&index, parent_path)) = path.split_last() else {
            return false;
        };
        let Some(parent) = self.get_mut(parent_path) else {
            return false;
        };
        if index >= parent.children.len() {
            return false;
        }
        parent.children.insert(index + offset, subtree);
        true
    }

    // -------------------------------------------------------------------------
    // Whole-tree transforms
    // -------------------------------------------------------------------------

    /// Rewrite every subtree top-down.
    ///
    /// `f` sees each subtree before its children are visited, so it may
    /// restructure them; the children of the *returned* tree are then
    /// rewritten in turn.
    #[must_use]
    pub fn map<F>(self, mut f: F) -> Tree<A>
    where
        F: FnMut(Tree<A>) -> Tree<A>,
    {
        self.map_with(&mut f)
    }

    fn map_with<F>(self, f: &mut F) -> Tree<A>
    where
        F: FnMut(Tree<A>) -> Tree<A>,
    {
        let Tree { value, children } = f(self);
        Tree {
            value,
            children: children.into_iter().map(|c| c.map_with(f)).collect(),
        }
    }

    /// Transform every payload, preserving shape.
    #[must_use]
    pub fn map_values<B, F>(self, mut f: F) -> Tree<B>
    where
        F: FnMut(A) -> B,
    {
        self.map_values_with(&mut f)
    }

    fn map_values_with<B, F>(self, f: &mut F) -> Tree<B>
    where
        F: FnMut(A) -> B,
    {
        Tree {
            value: f(self.value),
            children: self
                .children
                .into_iter()
                .map(|c| c.map_values_with(f))
                .collect(),
        }
    }

    /// Visit every payload mutably in pre-order.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut A),
    {
        self.for_each_mut_with(&mut f);
    }

    fn for_each_mut_with<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut A),
    {
        f(&mut self.value);
        for child in &mut self.children {
            child.for_each_mut_with(f);
        }
    }

    /// Transform payloads, dropping every subtree whose root maps to `None`.
    #[must_use]
    pub fn filter_map<B, F>(self, mut f: F) -> Option<Tree<B>>
    where
        F: FnMut(A) -> Option<B>,
    {
        self.filter_map_with(&mut f)
    }

    fn filter_map_with<B, F>(self, f: &mut F) -> Option<Tree<B>>
    where
        F: FnMut(A) -> Option<B>,
    {
        let value = f(self.value)?;
        Some(Tree {
            value,
            children: self
                .children
                .into_iter()
                .filter_map(|c| c.filter_map_with(f))
                .collect(),
        })
    }

    // -------------------------------------------------------------------------
    // Folds and queries
    // -------------------------------------------------------------------------

    /// Pre-order fold: a node is visited before its children.
    pub fn foldl<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, &A) -> B,
    {
        self.iter().fold(init, |acc, value| f(acc, value))
    }

    /// Post-order fold: a node is visited after all of its children.
    pub fn foldr<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, &A) -> B,
    {
        self.foldr_with(init, &mut f)
    }

    fn foldr_with<B, F>(&self, init: B, f: &mut F) -> B
    where
        F: FnMut(B, &A) -> B,
    {
        let acc = self
            .children
            .iter()
            .fold(init, |acc, child| child.foldr_with(acc, f));
        f(acc, &self.value)
    }

    /// Pre-order fold that also receives each node's path.
    pub fn fold_with_path<B, F>(&self, init: B, mut f: F) -> B
    where
        F: FnMut(B, &Path, &A) -> B,
    {
        let mut path = Vec::new();
        self.fold_with_path_help(init, &mut path, &mut f)
    }

    fn fold_with_path_help<B, F>(&self, init: B, path: &mut Vec<usize>, f: &mut F) -> B
    where
        F: FnMut(B, &Path, &A) -> B,
    {
        let mut acc = f(init, path, &self.value);
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            acc = child.fold_with_path_help(acc, path, f);
            path.pop();
        }
        acc
    }

    /// First payload in pre-order satisfying `pred`.
    pub fn find<F>(&self, mut pred: F) -> Option<&A>
    where
        F: FnMut(&A) -> bool,
    {
        self.iter().find(|&value| pred(value))
    }

    /// Path of the first node in pre-order whose payload satisfies `pred`.
    pub fn find_path<F>(&self, mut pred: F) -> Option<Vec<usize>>
    where
        F: FnMut(&A) -> bool,
    {
        let mut path = Vec::new();
        self.find_path_help(&mut path, &mut pred).then_some(path)
    }

    fn find_path_help<F>(&self, path: &mut Vec<usize>, pred: &mut F) -> bool
    where
        F: FnMut(&A) -> bool,
    {
        if pred(&self.value) {
            return true;
        }
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            if child.find_path_help(path, pred) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Whether any payload satisfies `pred`.
    pub fn any<F>(&self, mut pred: F) -> bool
    where
        F: FnMut(&A) -> bool,
    {
        self.iter().any(|value| pred(value))
    }

    /// Pre-order iterator over payloads.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, A> {
        Iter { stack: vec![self] }
    }
}

/// Pre-order payload iterator returned by [`Tree::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a, A> {
    stack: Vec<&'a Tree<A>>,
}

impl<'a, A> Iterator for Iter<'a, A> {
    type Item = &'a A;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(&node.value)
    }
}

impl<'a, A> IntoIterator for &'a Tree<A> {
    type Item = &'a A;
    type IntoIter = Iter<'a, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree<&'static str> {
        Tree::leaf("root")
            .child(Tree::leaf("a").child(Tree::leaf("a1")).child(Tree::leaf("a2")))
            .child(Tree::leaf("b"))
    }

    fn labels(tree: &Tree<&'static str>) -> Vec<&'static str> {
        tree.iter().copied().collect()
    }

    #[test]
    fn leaf_and_branch() {
        let leaf = Tree::leaf(1);
        assert!(leaf.is_leaf());
        let branch = Tree::branch(0, vec![Tree::leaf(1), Tree::leaf(2)]);
        assert_eq!(branch.children().len(), 2);
        assert_eq!(branch.size(), 3);
    }

    #[test]
    fn get_resolves_nested_paths() {
        let tree = sample();
        assert_eq!(tree.get_value(&[]), Some(&"root"));
        assert_eq!(tree.get_value(&[0, 1]), Some(&"a2"));
        assert_eq!(tree.get_value(&[1]), Some(&"b"));
    }

    #[test]
    fn get_out_of_bounds_at_any_depth() {
        let tree = sample();
        assert!(tree.get(&[2]).is_none());
        assert!(tree.get(&[0, 2]).is_none());
        assert!(tree.get(&[1, 0]).is_none());
    }

    #[test]
    fn update_applies_or_reports_miss() {
        let mut tree = sample();
        assert!(tree.update(&[1], |n| n.set_value("B")));
        assert_eq!(tree.get_value(&[1]), Some(&"B"));
        let before = tree.clone();
        assert!(!tree.update(&[9], |n| n.set_value("x")));
        assert_eq!(tree, before);
    }

    #[test]
    fn set_replaces_subtree() {
        let mut tree = sample();
        assert!(tree.set(&[0], Tree::leaf("z")));
        assert_eq!(labels(&tree), ["root", "z", "b"]);
        assert!(tree.set(&[], Tree::leaf("new")));
        assert_eq!(labels(&tree), ["new"]);
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut tree = sample();
        let removed = tree.remove(&[0]).map(Tree::into_value);
        assert_eq!(removed, Some("a"));
        assert_eq!(labels(&tree), ["root", "b"]);
    }

    #[test]
    fn remove_invalid_is_noop() {
        let mut tree = sample();
        assert!(tree.remove(&[]).is_none());
        assert!(tree.remove(&[4]).is_none());
        assert!(tree.remove(&[1, 0]).is_none());
        assert_eq!(tree, sample());
    }

    #[test]
    fn insert_before_and_after() {
        let mut tree = sample();
        assert!(tree.insert_before(&[0, 0], Tree::leaf("a0")));
        assert!(tree.insert_after(&[1], Tree::leaf("c")));
        assert_eq!(labels(&tree), ["root", "a", "a0", "a1", "a2", "b", "c"]);
    }

    #[test]
    fn insert_requires_existing_sibling() {
        let mut tree = sample();
        assert!(!tree.insert_before(&[], Tree::leaf("x")));
        assert!(!tree.insert_after(&[2], Tree::leaf("x")));
        assert!(!tree.insert_before(&[1, 0], Tree::leaf("x")));
        assert_eq!(tree, sample());
    }

    #[test]
    fn map_can_restructure() {
        let tree = sample().map(|node| {
            if *node.value() == "a" {
                Tree::leaf("pruned")
            } else {
                node
            }
        });
        assert_eq!(labels(&tree), ["root", "pruned", "b"]);
    }

    #[test]
    fn map_values_preserves_shape() {
        let tree = sample().map_values(str::len);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [4, 1, 2, 2, 1]);
        assert_eq!(tree.children()[0].children().len(), 2);
    }

    #[test]
    fn filter_map_drops_subtrees() {
        let tree = sample()
            .filter_map(|v| (v != "a").then_some(v))
            .map(|t| labels(&t));
        assert_eq!(tree, Some(vec!["root", "b"]));
        assert!(sample().filter_map(|_| None::<()>).is_none());
    }

    #[test]
    fn folds_visit_in_order() {
        let tree = sample();
        let pre = tree.foldl(Vec::new(), |mut acc, v| {
            acc.push(*v);
            acc
        });
        assert_eq!(pre, ["root", "a", "a1", "a2", "b"]);
        let post = tree.foldr(Vec::new(), |mut acc, v| {
            acc.push(*v);
            acc
        });
        assert_eq!(post, ["a1", "a2", "a", "b", "root"]);
    }

    #[test]
    fn fold_with_path_threads_paths() {
        let paths = sample().fold_with_path(Vec::new(), |mut acc, path, v| {
            acc.push((path.to_vec(), *v));
            acc
        });
        assert_eq!(paths[0], (vec![], "root"));
        assert_eq!(paths[2], (vec![0, 0], "a1"));
        assert_eq!(paths[4], (vec![1], "b"));
    }

    #[test]
    fn find_and_find_path() {
        let tree = sample();
        assert_eq!(tree.find(|v| v.starts_with('a')), Some(&"a"));
        assert_eq!(tree.find_path(|v| *v == "a2"), Some(vec![0, 1]));
        assert_eq!(tree.find_path(|v| *v == "root"), Some(vec![]));
        assert_eq!(tree.find_path(|v| *v == "zzz"), None);
        assert!(tree.any(|v| *v == "b"));
        assert!(!tree.any(|v| v.is_empty()));
    }

    #[test]
    fn for_each_mut_touches_every_node() {
        let mut tree = Tree::leaf(1).child(Tree::leaf(2).child(Tree::leaf(3)));
        tree.for_each_mut(|v| *v *= 10);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [10, 20, 30]);
    }
}
