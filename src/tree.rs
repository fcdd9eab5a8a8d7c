use std::cmp::{self, Ordering};
use std::fmt;
use std::iter::FromIterator;
use std::mem;

/// An ordered set of unique keys implemented with an AVL tree.
///
/// ```
/// use ordered_avl::{AvlTree, Neighbor};
/// let mut tree = AvlTree::new();
/// for key in [10, 20, 30, 40, 50, 25] {
///     tree.insert(key);
/// }
/// assert!(tree.search(&25));
/// assert_eq!(tree.find(&20, &40), vec![&20, &25, &30, &40]);
/// assert_eq!(tree.find_neighbor(&30, Neighbor::Predecessor), Some(&25));
/// tree.remove(&20);
/// assert!(!tree.search(&20));
/// ```
#[derive(Clone)]
pub struct AvlTree<K> {
    root: Link<K>,
    num_nodes: usize,
}

/// Selects which neighbor [`AvlTree::find_neighbor`] looks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Neighbor {
    /// The greatest key strictly less than the query key.
    Predecessor,
    /// The least key strictly greater than the query key.
    Successor,
}

/// An ascending iterator over the keys of a tree.
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

#[derive(Clone)]
struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    height: usize,
}

type NodePtr<K> = Box<Node<K>>;
type Link<K> = Option<NodePtr<K>>;

impl<K> AvlTree<K> {
    /// Returns true if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree. A single leaf has height 1, an empty tree 0.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Clears the tree, deallocating all memory.
    pub fn clear(&mut self) {
        // Unlink iteratively so dropping a deep tree never recurses.
        let mut stack: Vec<NodePtr<K>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        self.num_nodes = 0;
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.num_nodes,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }
}

impl<K: Ord> AvlTree<K> {
    /// Creates an empty tree.
    /// No memory is allocated until the first key is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains the key.
    pub fn search(&self, key: &K) -> bool {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return true,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        false
    }

    /// Returns the smallest key in the tree.
    pub fn first(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.key)
    }

    /// Returns the largest key in the tree.
    pub fn last(&self) -> Option<&K> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.key)
    }

    /// Inserts a key into the tree.
    /// Returns whether the key was newly inserted; an existing key leaves the tree untouched.
    pub fn insert(&mut self, key: K) -> bool {
        let (root, inserted) = insert_node(self.root.take(), key);
        self.root = Some(root);
        if inserted {
            self.num_nodes += 1;
        }
        inserted
    }

    /// Removes a key from the tree.
    /// Returns whether the key was previously in the tree.
    pub fn remove(&mut self, key: &K) -> bool {
        let (root, removed) = remove_node(self.root.take(), key);
        self.root = root;
        if removed {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
        }
        removed
    }

    /// Replaces the contents of this tree with all keys of `left`, `pivot` and all
    /// keys of `right`. Both source trees are left empty.
    ///
    /// Every key in `left` must be less than `pivot`, and every key in `right`
    /// greater. This is not checked: violating it produces a tree that is balanced
    /// but no longer ordered, so later lookups give meaningless answers.
    ///
    /// If one side is empty the pivot is inserted into the other side as by
    /// [`insert`](Self::insert). Otherwise the pivot is attached where the spine of
    /// the taller tree meets the shorter one and the path back to the root is
    /// rebalanced, which takes time proportional to the height difference.
    pub fn join(&mut self, left: &mut Self, pivot: K, right: &mut Self) {
        let mut left = mem::take(left);
        let mut right = mem::take(right);
        *self = if left.is_empty() {
            right.insert(pivot);
            right
        } else if right.is_empty() {
            left.insert(pivot);
            left
        } else {
            debug_assert!(left.last().map_or(true, |max| *max < pivot));
            debug_assert!(right.first().map_or(true, |min| pivot < *min));
            let num_nodes = left.num_nodes + right.num_nodes + 1;
            let root = join_nodes(left.root.take(), Node::create(pivot), right.root.take());
            Self {
                root: Some(root),
                num_nodes,
            }
        };
    }

    /// Moves all keys less than `pivot` into `out_left` and all keys greater than
    /// or equal to `pivot` into `out_right`, leaving this tree empty.
    /// Whatever the output trees held before is dropped.
    pub fn split(&mut self, pivot: &K, out_left: &mut Self, out_right: &mut Self) {
        let num_nodes = mem::take(&mut self.num_nodes);
        let (less, greater) = split_node(self.root.take(), pivot);
        let num_less = count_nodes(&less);
        debug_assert!(num_less <= num_nodes);
        *out_left = Self {
            root: less,
            num_nodes: num_less,
        };
        *out_right = Self {
            root: greater,
            num_nodes: num_nodes - num_less,
        };
    }

    /// Returns all keys in the inclusive range `[lo, hi]` in ascending order.
    pub fn find(&self, lo: &K, hi: &K) -> Vec<&K> {
        let mut keys = Vec::new();
        collect_range(self.root.as_deref(), lo, hi, &mut keys);
        keys
    }

    /// Returns the nearest key strictly before or after `key`.
    /// `key` itself does not need to be in the tree.
    pub fn find_neighbor(&self, key: &K, direction: Neighbor) -> Option<&K> {
        let mut best = None;
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match direction {
                Neighbor::Predecessor if node.key < *key => {
                    best = Some(&node.key);
                    node.right.as_deref()
                }
                Neighbor::Predecessor => node.left.as_deref(),
                Neighbor::Successor if node.key > *key => {
                    best = Some(&node.key);
                    node.left.as_deref()
                }
                Neighbor::Successor => node.right.as_deref(),
            };
        }
        best
    }

    /// Returns keys paired with their cached heights in preorder, which pins down the shape.
    #[cfg(test)]
    pub(crate) fn preorder(&self) -> Vec<(&K, usize)> {
        let mut nodes = Vec::with_capacity(self.num_nodes);
        let mut stack: Vec<&Node<K>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            nodes.push((&node.key, node.height));
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        nodes
    }

    /// Panics if the tree violates ordering, cached heights, AVL balance or its node count.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let mut num_nodes = 0;
        check_node(self.root.as_deref(), None, None, &mut num_nodes);
        assert_eq!(num_nodes, self.num_nodes);
    }
}

impl<K> Drop for AvlTree<K> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Ord> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> FromIterator<K> for AvlTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Ord> Extend<K> for AvlTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K> Iter<'a, K> {
    fn push_left_spine(&mut self, mut link: Option<&'a Node<K>>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K> ExactSizeIterator for Iter<'a, K> {}

impl<K> Node<K> {
    fn create(key: K) -> NodePtr<K> {
        Box::new(Node {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));
    }

    /// Height of the left subtree minus height of the right subtree.
    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn height<K>(link: &Link<K>) -> usize {
    match link {
        None => 0,
        Some(node) => node.height,
    }
}

fn balance_factor<K>(link: &Link<K>) -> isize {
    match link {
        None => 0,
        Some(node) => node.balance_factor(),
    }
}

fn rotate_left<K>(mut node: NodePtr<K>) -> NodePtr<K> {
    match node.right.take() {
        None => node,
        Some(mut right) => {
            node.right = right.left.take();
            node.adjust_height();
            right.left = Some(node);
            right.adjust_height();
            right
        }
    }
}

fn rotate_right<K>(mut node: NodePtr<K>) -> NodePtr<K> {
    match node.left.take() {
        None => node,
        Some(mut left) => {
            node.left = left.right.take();
            node.adjust_height();
            left.right = Some(node);
            left.adjust_height();
            left
        }
    }
}

/// Restores the AVL condition at the given node and adjusts its height.
/// The subtrees must be balanced and their heights may differ by at most 2.
/// The heavier child's own balance factor decides between a single and a double rotation.
fn rebalance<K>(mut node: NodePtr<K>) -> NodePtr<K> {
    node.adjust_height();
    let balance = node.balance_factor();
    debug_assert!((-2..=2).contains(&balance));
    if balance > 1 {
        // Rebalance right
        if balance_factor(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if balance < -1 {
        // Rebalance left
        if balance_factor(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    }
}

/// Inserts `key` below `link` and returns the new subtree root and whether the key was new.
///
/// On the way back up, the side of the child the key went to picks the rotation:
/// a key on the outer side needs a single rotation, one on the inner side a double rotation.
fn insert_node<K: Ord>(link: Link<K>, key: K) -> (NodePtr<K>, bool) {
    let mut node = match link {
        None => return (Node::create(key), true),
        Some(node) => node,
    };
    match key.cmp(&node.key) {
        Ordering::Equal => (node, false),
        Ordering::Less => {
            let side = node.left.as_ref().map(|left| key.cmp(&left.key));
            let (left, inserted) = insert_node(node.left.take(), key);
            node.left = Some(left);
            if !inserted {
                return (node, false);
            }
            node.adjust_height();
            if node.balance_factor() > 1 {
                if side == Some(Ordering::Greater) {
                    node.left = node.left.take().map(rotate_left);
                }
                return (rotate_right(node), true);
            }
            (node, true)
        }
        Ordering::Greater => {
            let side = node.right.as_ref().map(|right| key.cmp(&right.key));
            let (right, inserted) = insert_node(node.right.take(), key);
            node.right = Some(right);
            if !inserted {
                return (node, false);
            }
            node.adjust_height();
            if node.balance_factor() < -1 {
                if side == Some(Ordering::Less) {
                    node.right = node.right.take().map(rotate_right);
                }
                return (rotate_left(node), true);
            }
            (node, true)
        }
    }
}

/// Removes `key` below `link` and returns the new subtree root and whether the key was found.
fn remove_node<K: Ord>(link: Link<K>, key: &K) -> (Link<K>, bool) {
    let mut node = match link {
        None => return (None, false),
        Some(node) => node,
    };
    match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, removed) = remove_node(node.left.take(), key);
            node.left = left;
            if !removed {
                return (Some(node), false);
            }
        }
        Ordering::Greater => {
            let (right, removed) = remove_node(node.right.take(), key);
            node.right = right;
            if !removed {
                return (Some(node), false);
            }
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => return (None, true),
            (Some(child), None) | (None, Some(child)) => return (Some(child), true),
            (Some(left), Some(right)) => {
                // Overwrite with the in-order successor and drop it from the right subtree
                let (right, successor) = remove_min(right);
                node.key = successor;
                node.left = Some(left);
                node.right = right;
            }
        },
    }
    (Some(rebalance(node)), true)
}

/// Unlinks the smallest node of a subtree.
/// Returns the rebalanced remainder and the removed key.
fn remove_min<K>(mut node: NodePtr<K>) -> (Link<K>, K) {
    match node.left.take() {
        None => {
            let Node { key, right, .. } = *node;
            (right, key)
        }
        Some(left) => {
            let (left, min) = remove_min(left);
            node.left = left;
            (Some(rebalance(node)), min)
        }
    }
}

/// Joins two trees with a pivot node whose children are ignored.
/// All keys of `left` must be less than the pivot key and all keys of `right` greater.
fn join_nodes<K>(left: Link<K>, mut pivot: NodePtr<K>, right: Link<K>) -> NodePtr<K> {
    match (left, right) {
        (Some(left), right) if left.height > height(&right) + 1 => join_right(left, pivot, right),
        (left, Some(right)) if right.height > height(&left) + 1 => join_left(left, pivot, right),
        (left, right) => {
            pivot.left = left;
            pivot.right = right;
            pivot.adjust_height();
            pivot
        }
    }
}

/// Descends the right spine of the taller `node` until the subtree there is at
/// most one level taller than `right`, hangs the pivot in, and rebalances upwards.
fn join_right<K>(mut node: NodePtr<K>, mut pivot: NodePtr<K>, right: Link<K>) -> NodePtr<K> {
    let spine = node.right.take();
    if height(&spine) <= height(&right) + 1 {
        pivot.left = spine;
        pivot.right = right;
        pivot.adjust_height();
        node.right = Some(pivot);
    } else if let Some(spine) = spine {
        node.right = Some(join_right(spine, pivot, right));
    }
    rebalance(node)
}

fn join_left<K>(left: Link<K>, mut pivot: NodePtr<K>, mut node: NodePtr<K>) -> NodePtr<K> {
    let spine = node.left.take();
    if height(&spine) <= height(&left) + 1 {
        pivot.left = left;
        pivot.right = spine;
        pivot.adjust_height();
        node.left = Some(pivot);
    } else if let Some(spine) = spine {
        node.left = Some(join_left(left, pivot, spine));
    }
    rebalance(node)
}

/// Splits a subtree into the keys less than `pivot` and the keys greater than or equal to it.
/// Each node on the search path is reused as the pivot that rejoins its untouched subtree.
fn split_node<K: Ord>(link: Link<K>, pivot: &K) -> (Link<K>, Link<K>) {
    let mut node = match link {
        None => return (None, None),
        Some(node) => node,
    };
    let left = node.left.take();
    let right = node.right.take();
    if *pivot <= node.key {
        let (less, greater) = split_node(left, pivot);
        (less, Some(join_nodes(greater, node, right)))
    } else {
        let (less, greater) = split_node(right, pivot);
        (Some(join_nodes(left, node, less)), greater)
    }
}

fn collect_range<'a, K: Ord>(link: Option<&'a Node<K>>, lo: &K, hi: &K, keys: &mut Vec<&'a K>) {
    if let Some(node) = link {
        if *lo < node.key {
            collect_range(node.left.as_deref(), lo, hi, keys);
        }
        if *lo <= node.key && node.key <= *hi {
            keys.push(&node.key);
        }
        if *hi > node.key {
            collect_range(node.right.as_deref(), lo, hi, keys);
        }
    }
}

fn count_nodes<K>(link: &Link<K>) -> usize {
    let mut count = 0;
    let mut stack: Vec<&Node<K>> = link.as_deref().into_iter().collect();
    while let Some(node) = stack.pop() {
        count += 1;
        stack.extend(node.left.as_deref());
        stack.extend(node.right.as_deref());
    }
    count
}

/// Checks the subtree against the exclusive key bounds and returns its height.
#[cfg(any(test, feature = "consistency_check"))]
fn check_node<K: Ord>(
    link: Option<&Node<K>>,
    lower: Option<&K>,
    upper: Option<&K>,
    num_nodes: &mut usize,
) -> usize {
    match link {
        None => 0,
        Some(node) => {
            // Check ordering against all ancestors
            if let Some(lower) = lower {
                assert!(*lower < node.key);
            }
            if let Some(upper) = upper {
                assert!(node.key < *upper);
            }

            let left_height = check_node(node.left.as_deref(), lower, Some(&node.key), num_nodes);
            let right_height = check_node(node.right.as_deref(), Some(&node.key), upper, num_nodes);

            // Check height
            assert_eq!(node.height, 1 + cmp::max(left_height, right_height));

            // Check AVL condition (nearly balance)
            assert!(left_height <= right_height + 1);
            assert!(right_height <= left_height + 1);

            *num_nodes += 1;
            node.height
        }
    }
}
