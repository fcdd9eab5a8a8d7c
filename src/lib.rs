//! An ordered key set implemented with an AVL tree.
//!
//! Besides insertion, removal and lookup, [`AvlTree`] supports joining two trees
//! around a separating pivot key, splitting a tree at a pivot key, inclusive range
//! queries and predecessor/successor lookups. Every operation leaves the tree
//! ordered and AVL-balanced.
//!
//! ```
//! use ordered_avl::{AvlTree, Neighbor};
//!
//! let mut low: AvlTree<i32> = (1..=3).collect();
//! let mut high: AvlTree<i32> = (5..=7).collect();
//! let mut tree = AvlTree::new();
//! tree.join(&mut low, 4, &mut high);
//! assert!(low.is_empty() && high.is_empty());
//! assert_eq!(tree.find(&3, &6), vec![&3, &4, &5, &6]);
//! assert_eq!(tree.find_neighbor(&4, Neighbor::Successor), Some(&5));
//!
//! let (mut less, mut greater) = (AvlTree::new(), AvlTree::new());
//! tree.split(&4, &mut less, &mut greater);
//! assert_eq!(less.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//! assert_eq!(greater.iter().copied().collect::<Vec<_>>(), vec![4, 5, 6, 7]);
//! ```

mod tree;
pub use tree::{AvlTree, Iter, Neighbor};
