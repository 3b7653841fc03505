use lazy_ostree::{Config, Duplicates, OSAvlSet, ShiftError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 1_000;

fn collect(set: &OSAvlSet<i32>) -> Vec<i32> {
    set.iter().collect()
}

#[test]
fn scenario_queries_and_shift() {
    let mut set = OSAvlSet::new();
    for key in [10, 20, 5, 15] {
        assert!(set.insert(key));
    }

    assert_eq!(collect(&set), [5, 10, 15, 20]);
    assert_eq!(set.count_less(&15), 2);
    assert_eq!(set.select(3), Some(15));
    assert_eq!(set.predecessor_or_equal(&12), Some(10));
    assert_eq!(set.select(5), None);

    set.shift_from(15, 100).unwrap();
    assert_eq!(collect(&set), [5, 10, 115, 120]);
    assert_eq!(set.count_less(&115), 2);
}

#[test]
fn scenario_remove() {
    let mut set = OSAvlSet::from([5, 10, 15, 20]);
    assert!(set.remove(&10));
    assert_eq!(collect(&set), [5, 15, 20]);
    assert_eq!(set.len(), 3);

    assert!(!set.remove(&10));
    assert_eq!(collect(&set), [5, 15, 20]);
}

#[test]
fn multiset_by_default() {
    let mut set: OSAvlSet<i32> = OSAvlSet::new();
    assert_eq!(set.duplicates(), Duplicates::Keep);
    set.extend([4, 4, 4, 1]);
    set.extend(&[9, 4]);

    assert_eq!(collect(&set), [1, 4, 4, 4, 4, 9]);
    assert_eq!(set.count_less(&4), 1);
    assert_eq!(set.count_less(&5), 5);
    assert_eq!(set.rank_of(&4), Some(1));
    assert_eq!(set.get_by_rank(4), Some(4));

    set.shift_from(4, 2).unwrap();
    assert_eq!(collect(&set), [1, 6, 6, 6, 6, 11]);
    assert_eq!(set.remove_by_rank(3), Some(6));
    assert_eq!(collect(&set), [1, 6, 6, 6, 11]);
}

#[test]
fn unique_set() {
    let mut set = OSAvlSet::with_config(Config::new().capacity(16).duplicates(Duplicates::Replace));
    assert!(set.capacity() >= 16);
    assert!(set.insert(3));
    assert!(!set.insert(3));
    assert!(set.insert(1));
    set.shift_from(2, 1).unwrap();
    assert!(!set.insert(4));
    assert_eq!(collect(&set), [1, 4]);
}

#[test]
fn ends() {
    let mut set: OSAvlSet<i32> = (0..10).collect();
    assert_eq!(set.first(), Some(0));
    assert_eq!(set.last(), Some(9));
    set.shift_from(5, 10).unwrap();
    assert_eq!(set.last(), Some(19));
    assert_eq!(set.pop_last(), Some(19));
    assert_eq!(set.pop_first(), Some(0));
    assert_eq!(set.len(), 8);

    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.first(), None);
    assert_eq!(set.pop_last(), None);
}

#[test]
fn shift_errors_leave_set_unchanged() {
    let mut set = OSAvlSet::from([i32::MAX - 1, 0]);
    assert_eq!(set.shift_from(1, -3), Err(ShiftError::NegativeDelta));
    assert_eq!(set.shift_from(1, 2), Err(ShiftError::Overflow));
    assert_eq!(collect(&set), [0, i32::MAX - 1]);
    set.shift_from(1, 1).unwrap();
    assert_eq!(collect(&set), [0, i32::MAX]);
}

#[test]
fn iteration_and_traits() {
    let set = OSAvlSet::from([30, 10, 20]);
    let mut iter = set.iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(iter.next_back(), Some(30));
    assert_eq!(iter.collect::<Vec<_>>(), [10, 20]);

    let mut copy = set.clone();
    copy.shift_from(20, 1).unwrap();
    assert_ne!(copy, set);
    assert!(set < copy);
    assert_eq!(format!("{copy:?}"), "{10, 21, 31}");

    let owned: Vec<i32> = copy.into_iter().rev().collect();
    assert_eq!(owned, [31, 21, 10]);

    let mut sum = 0;
    for key in &set {
        sum += key;
    }
    assert_eq!(sum, 60);
    assert_eq!(OSAvlSet::<i32>::default(), OSAvlSet::new());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Interleaves inserts, removes and shifts with rank queries, checking
    /// against a sorted vector.
    #[test]
    fn set_ops_match_sorted_vec(
        ops in proptest::collection::vec((0u8..4, -500i32..500, 0i32..50), TEST_SIZE),
    ) {
        let mut set = OSAvlSet::new();
        let mut model: Vec<i32> = Vec::new();

        for &(kind, key, delta) in &ops {
            match kind {
                0 | 1 => {
                    set.insert(key);
                    let at = model.partition_point(|&x| x <= key);
                    model.insert(at, key);
                }
                2 => {
                    let removed = set.remove(&key);
                    match model.binary_search(&key) {
                        Ok(at) => {
                            prop_assert!(removed);
                            model.remove(at);
                        }
                        Err(_) => prop_assert!(!removed),
                    }
                }
                _ => {
                    set.shift_from(key, delta).unwrap();
                    for x in &mut model {
                        if *x >= key {
                            *x += delta;
                        }
                    }
                }
            }

            prop_assert_eq!(set.len(), model.len());
            prop_assert_eq!(set.count_less(&key), model.partition_point(|&x| x < key));
            prop_assert_eq!(set.predecessor_or_equal(&key), model.iter().rev().find(|&&x| x <= key).copied());
            let k = usize::try_from(delta).unwrap();
            prop_assert_eq!(set.select(k), k.checked_sub(1).and_then(|i| model.get(i)).copied());
        }

        prop_assert_eq!(collect(&set), model);
    }
}
