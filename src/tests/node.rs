//! Trie-level behaviour on hand-picked hashes, driving the free functions
//! directly.

use std::sync::Arc;

use super::{constant_zero, no_call};
use crate::node::{BITS_PER_LEVEL, Node, NodeRef, Slot};
use crate::{del, empty, get, has, set};

type StrNode = NodeRef<&'static str, &'static str>;

fn leaf(data_mask: u32, pairs: &[(&'static str, &'static str)]) -> StrNode {
    let slots: Vec<_> = pairs.iter().map(|&(k, v)| Slot::Entry(k, v)).collect();
    Arc::new(Node::bitmap(data_mask, 0, slots.into_boxed_slice()))
}

fn branch(node_mask: u32, children: Vec<StrNode>) -> StrNode {
    let slots: Vec<_> = children.into_iter().map(Slot::Child).collect();
    Arc::new(Node::bitmap(0, node_mask, slots.into_boxed_slice()))
}

fn put(key: &'static str, value: &'static str, hash: i32, node: &StrNode) -> StrNode {
    set(key, value, hash, &no_call::<&str>, 0, node).unwrap()
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

#[test]
fn set_single_into_empty() {
    let node = put("a", "b", 0, &empty());
    assert_eq!(*node, *leaf(1, &[("a", "b")]));
}

#[test]
fn set_single_uses_low_five_bits() {
    for (hash, bit) in [(1, 1), (3, 3), (15, 15), (16, 16), (31, 31), (32, 0), (33, 1)] {
        let node = put("a", "b", hash, &empty());
        assert_eq!(*node, *leaf(1 << bit, &[("a", "b")]), "hash {hash}");
    }
}

#[test]
fn set_second_entry_orders_by_bit() {
    let node = put("c", "d", 3, &put("a", "b", 0, &empty()));
    assert_eq!(*node, *leaf(0b1001, &[("a", "b"), ("c", "d")]));

    let reversed = put("a", "b", 0, &put("c", "d", 3, &empty()));
    assert_eq!(*reversed, *node);
}

#[test]
fn set_same_value_is_identity() {
    let node = put("a", "b", 0, &empty());
    assert!(Arc::ptr_eq(&put("a", "b", 0, &node), &node));

    let replaced = put("a", "c", 0, &node);
    assert!(!Arc::ptr_eq(&replaced, &node));
    assert_eq!(*replaced, *leaf(1, &[("a", "c")]));
}

#[test]
fn set_at_deeper_shift() {
    let node = set("a", "b", 32, &no_call::<&str>, BITS_PER_LEVEL, &empty()).unwrap();
    assert_eq!(*node, *leaf(1 << 1, &[("a", "b")]));
}

#[test]
fn set_splits_on_shared_slot() {
    let rehash = |key: &&str| {
        assert_eq!(*key, "a");
        0
    };
    let node = put("a", "o1", 0, &empty());
    let split = set("b", "o2", 32, &rehash, 0, &node).unwrap();

    let expected = branch(1, vec![leaf(0b11, &[("a", "o1"), ("b", "o2")])]);
    assert_eq!(*split, *expected);
}

#[test]
fn set_identical_hashes_build_full_chain() {
    let rehash = |key: &&str| {
        assert_eq!(*key, "a");
        0
    };
    let node = put("a", "o1", 0, &empty());
    let merged = set("b", "o2", 0, &rehash, 0, &node).unwrap();

    let mut depth = 0;
    let mut current: &Node<_, _> = &merged;
    while let Node::Bitmap(bitmap) = current {
        assert_eq!(bitmap.data_mask(), 0);
        assert_eq!(bitmap.node_mask(), 1);
        current = &**bitmap.child(0);
        depth += 1;
    }
    assert_eq!(depth, 7);
    match current {
        Node::Collision(collision) => {
            assert_eq!(collision.pairs(), &[("a", "o1"), ("b", "o2")]);
        }
        other => panic!("expected collision node, got {other:?}"),
    }
}

#[test]
fn set_into_subnode() {
    let node = branch(1, vec![leaf(0b10, &[("b", "o2")])]);

    let updated = put("a", "o1", 0, &node);
    let expected = branch(1, vec![leaf(0b11, &[("a", "o1"), ("b", "o2")])]);
    assert_eq!(*updated, *expected);

    assert!(Arc::ptr_eq(&put("b", "o2", 32, &node), &node));
    let replaced = put("b", "o1", 32, &node);
    assert_eq!(*replaced, *branch(1, vec![leaf(0b10, &[("b", "o1")])]));
}

#[test]
fn set_keeps_children_in_decreasing_bit_order() {
    let node = put("b", "y", 1, &put("a", "x", 0, &empty()));
    // Push both entries down by colliding each slot with a new key.
    let node = set("c", "z", 32, &constant_zero::<&str>, 0, &node).unwrap();
    let node = set("d", "w", 33, &|_: &&str| 1, 0, &node).unwrap();

    let Node::Bitmap(bitmap) = &*node else {
        panic!("expected bitmap root");
    };
    assert_eq!(bitmap.data_mask(), 0);
    assert_eq!(bitmap.node_mask(), 0b11);
    let children: Vec<Vec<_>> = bitmap
        .children()
        .map(|child| match &**child {
            Node::Bitmap(inner) => inner.entries().map(|(k, v)| (*k, *v)).collect(),
            other => panic!("expected bitmap child, got {other:?}"),
        })
        .collect();
    assert_eq!(children, [vec![("b", "y"), ("d", "w")], vec![("a", "x"), ("c", "z")]]);

    assert_eq!(get(&"d", 33, &node), Some(&"w"));
    assert_eq!(get(&"b", 1, &node), Some(&"y"));
    assert_eq!(get(&"a", 0, &node), Some(&"x"));
    assert_eq!(get(&"c", 32, &node), Some(&"z"));
}

// ---------------------------------------------------------------------------
// del
// ---------------------------------------------------------------------------

#[test]
fn del_from_empty_is_identity() {
    let node: StrNode = empty();
    assert!(Arc::ptr_eq(&del(&"a", 0, 0, &node), &node));
}

#[test]
fn del_last_entry_gives_empty() {
    let node = leaf(1, &[("a", "b")]);
    assert!(del(&"a", 0, 0, &node).is_empty());
}

#[test]
fn del_one_of_two_entries() {
    let node = leaf(0b11, &[("a", "b"), ("c", "d")]);
    let result = del(&"a", 0, 0, &node);
    assert_eq!(*result, *leaf(0b10, &[("c", "d")]));
}

#[test]
fn del_missing_is_identity() {
    let node = leaf(1, &[("a", "b")]);
    // Slot empty.
    assert!(Arc::ptr_eq(&del(&"a", 1, 0, &node), &node));
    // Slot taken by another key.
    assert!(Arc::ptr_eq(&del(&"z", 0, 0, &node), &node));
}

#[test]
fn del_promotes_single_entry_child() {
    let node = branch(1, vec![leaf(0b11, &[("a", "x"), ("b", "y")])]);
    let result = del(&"a", 0, 0, &node);
    assert_eq!(*result, *leaf(1, &[("b", "y")]));
}

#[test]
fn del_absorbs_single_entry_child_next_to_entries() {
    // Root: inline "c" at bit 2, child at bit 0 holding "a" and "b".
    let child = leaf(0b11, &[("a", "x"), ("b", "y")]);
    let node = Arc::new(Node::bitmap(
        0b100,
        0b001,
        Box::new([Slot::Entry("c", "z"), Slot::Child(child)]),
    ));
    let result = del(&"a", 0, 0, &node);
    assert_eq!(*result, *leaf(0b101, &[("b", "y"), ("c", "z")]));
}

#[test]
fn del_collapses_collision_chain() {
    let zero = constant_zero::<&str>;
    let one = set("a", "o1", 0, &zero, 0, &empty()).unwrap();
    let two = set("b", "o2", 0, &zero, 0, &one).unwrap();

    let back = del(&"b", 0, 0, &two);
    assert_eq!(*back, *one);

    let other = del(&"a", 0, 0, &two);
    assert_eq!(*other, *leaf(1, &[("b", "o2")]));
}

#[test]
fn del_missing_from_collision_is_identity() {
    let zero = constant_zero::<&str>;
    let node = set("a", "o1", 0, &zero, 0, &empty()).unwrap();
    let node = set("b", "o2", 0, &zero, 0, &node).unwrap();
    assert!(Arc::ptr_eq(&del(&"c", 0, 0, &node), &node));
}

// ---------------------------------------------------------------------------
// get / has
// ---------------------------------------------------------------------------

#[test]
fn get_from_empty() {
    let node: StrNode = empty();
    assert_eq!(get(&"test", 0, &node), None);
    assert_eq!(get(&"test", 1, &node), None);
    assert!(!has(&"aaaa", 1, &node));
}

#[test]
fn get_nested() {
    let node = branch(1 << 31, vec![leaf(1, &[("a", "o")])]);
    assert_eq!(get(&"a", 31, &node), Some(&"o"));
    assert_eq!(get(&"b", 31, &node), None);

    let node = branch(1, vec![leaf(0b10, &[("a", "o")])]);
    assert_eq!(get(&"a", 32, &node), Some(&"o"));
    assert_eq!(get(&"b", 32, &node), None);

    let node = branch(0b10, vec![leaf(0b10, &[("a", "o")])]);
    assert_eq!(get(&"a", 33, &node), Some(&"o"));
    assert_eq!(get(&"b", 33, &node), None);
}

#[test]
fn get_between_two_children() {
    // Children in decreasing bit order: bit 1 first, then bit 0.
    let node = branch(
        0b11,
        vec![leaf(0b10, &[("b", "o2")]), leaf(0b10, &[("a", "o")])],
    );
    assert_eq!(get(&"a", 32, &node), Some(&"o"));
    assert_eq!(get(&"b", 33, &node), Some(&"o2"));
    assert!(has(&"b", 33, &node));
    assert!(!has(&"b", 32, &node));
}

#[test]
fn get_two_keys_in_same_subtree() {
    let node = branch(1, vec![leaf(0b11, &[("a", "o"), ("b", "o2")])]);
    assert_eq!(get(&"a", 0, &node), Some(&"o"));
    assert_eq!(get(&"b", 32, &node), Some(&"o2"));
}

#[test]
fn get_through_collision() {
    let zero = constant_zero::<&str>;
    let node = set("a", "o1", 0, &zero, 0, &empty()).unwrap();
    let node = set("b", "o2", 0, &zero, 0, &node).unwrap();
    assert_eq!(get(&"a", 0, &node), Some(&"o1"));
    assert_eq!(get(&"b", 0, &node), Some(&"o2"));
    assert_eq!(get(&"c", 0, &node), None);
    assert!(has(&"b", 0, &node));
}
