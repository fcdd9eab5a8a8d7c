use ordered_avl::{AvlTree, Neighbor};

fn keys(tree: &AvlTree<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

#[test]
fn insert_search_remove() {
    let mut tree = AvlTree::new();
    for key in [10, 20, 30, 40, 50, 25] {
        assert!(tree.insert(key));
    }
    assert!(!tree.search(&100));
    assert!(tree.search(&50));

    assert!(tree.remove(&20));
    assert!(!tree.search(&20));
    assert_eq!(keys(&tree), vec![10, 25, 30, 40, 50]);
}

#[test]
fn join_split_find_neighbors() {
    let mut tree1 = AvlTree::new();
    tree1.insert(1);
    tree1.insert(2);
    tree1.insert(3);

    let mut tree2 = AvlTree::new();
    tree2.insert(5);
    tree2.insert(6);
    tree2.insert(7);

    let mut joined = AvlTree::new();
    joined.join(&mut tree1, 4, &mut tree2);
    assert!(joined.search(&4));
    assert_eq!(keys(&joined), (1..=7).collect::<Vec<_>>());
    assert!(tree1.is_empty());
    assert!(tree2.is_empty());

    assert_eq!(joined.find(&3, &6), vec![&3, &4, &5, &6]);
    assert_eq!(joined.find_neighbor(&4, Neighbor::Predecessor), Some(&3));
    assert_eq!(joined.find_neighbor(&4, Neighbor::Successor), Some(&5));

    let (mut split1, mut split2) = (AvlTree::new(), AvlTree::new());
    joined.split(&4, &mut split1, &mut split2);
    assert!(joined.is_empty());
    assert!(split1.search(&3));
    assert!(split2.search(&5));
    assert!(split2.search(&4));
    assert_eq!(keys(&split1), vec![1, 2, 3]);
    assert_eq!(keys(&split2), vec![4, 5, 6, 7]);
    assert_eq!(split1.len(), 3);
    assert_eq!(split2.len(), 4);
}

#[test]
fn neighbors_of_missing_keys() {
    let tree: AvlTree<i32> = [10, 20, 30].into_iter().collect();
    assert_eq!(tree.find_neighbor(&15, Neighbor::Predecessor), Some(&10));
    assert_eq!(tree.find_neighbor(&15, Neighbor::Successor), Some(&20));
    assert_eq!(tree.find_neighbor(&10, Neighbor::Predecessor), None);
    assert_eq!(tree.find_neighbor(&30, Neighbor::Successor), None);
    assert_eq!(AvlTree::<i32>::new().find_neighbor(&0, Neighbor::Successor), None);
}
