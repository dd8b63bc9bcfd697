//! Split/join/aggregate coverage over chains, cycles, and sieve-shaped
//! fragment patterns.

use std::collections::HashSet;

use rstest::{fixture, rstest};

use crate::aggregate::Sum;
use crate::list::{AugmentedList, NIL};

type List = AugmentedList<Sum<i64>>;

const ELEMENTS: usize = 1000;

#[fixture]
fn list() -> List {
    List::new(ELEMENTS, ELEMENTS, 1, 0x5EED)
}

/// Marks the indices this suite splits at: the primes below `n`.
fn prime_split_points(n: usize) -> Vec<bool> {
    let mut split = vec![false; n];
    split[2] = true;
    for i in (3..n).step_by(2) {
        split[i] = true;
    }
    let mut i = 3;
    while i * i < n {
        if split[i] {
            let mut j = i * i;
            while j < n {
                split[j] = false;
                j += 2 * i;
            }
        }
        i += 2;
    }
    split
}

/// First element of the fragment containing each index once the cycle is
/// severed after every split point.
fn fragment_starts(split: &[bool]) -> Vec<usize> {
    let n = split.len();
    let mut starts = vec![0; n];
    let mut start = 0;
    for i in 0..n {
        starts[i] = start;
        if split[i] {
            start = i + 1;
        }
    }
    starts[0] = start % n;
    starts[1] = start % n;
    starts[2] = start % n;
    starts
}

fn naive_size(list: &List, id: usize) -> i64 {
    let mut size = 1;
    let mut curr = list.prev(id, 0);
    while curr != NIL && curr != id {
        size += 1;
        curr = list.prev(curr, 0);
    }
    if curr == NIL {
        curr = list.next(id, 0);
        while curr != NIL {
            size += 1;
            curr = list.next(curr, 0);
        }
    }
    size
}

fn assert_sizes_match(list: &List) {
    for id in 0..ELEMENTS {
        let expected = naive_size(list, id);
        assert_eq!(
            list.aggregate(id),
            expected,
            "aggregate of element {id} must match its naive list size"
        );
    }
}

fn join_chain(list: &List) {
    let joins: Vec<(usize, usize)> = (0..ELEMENTS - 1).map(|i| (i, i + 1)).collect();
    list.batch_join(&joins);
}

#[rstest]
fn fresh_elements_are_disjoint_singletons(list: List) {
    let representatives: HashSet<usize> =
        (0..ELEMENTS).map(|id| list.find_representative(id)).collect();
    assert_eq!(representatives.len(), ELEMENTS);
    for id in 0..ELEMENTS {
        assert_eq!(list.aggregate(id), 1);
    }
}

#[rstest]
fn chain_then_cycle_share_one_representative(list: List) {
    join_chain(&list);
    let representative = list.find_representative(0);
    for id in 0..ELEMENTS {
        assert_eq!(list.find_representative(id), representative);
    }
    assert_sizes_match(&list);

    list.batch_join(&[(ELEMENTS - 1, 0)]);
    let representative = list.find_representative(0);
    for id in 0..ELEMENTS {
        assert_eq!(list.find_representative(id), representative);
    }
    assert_sizes_match(&list);
}

#[rstest]
fn sieve_splits_and_rejoins_preserve_aggregates(list: List) {
    let split = prime_split_points(ELEMENTS);
    let starts = fragment_starts(&split);
    let split_ids: Vec<usize> = (0..ELEMENTS).filter(|&i| split[i]).collect();

    join_chain(&list);
    list.batch_join(&[(ELEMENTS - 1, 0)]);

    // Sever the cycle after every prime index.
    list.batch_split(&split_ids);
    for id in 0..ELEMENTS {
        let start = starts[id];
        assert_eq!(list.find_representative(id), list.find_representative(start));
        if start > 0 {
            assert_ne!(
                list.find_representative(id),
                list.find_representative(start - 1)
            );
        }
    }
    assert_sizes_match(&list);

    // Close each fragment into its own cycle.
    let closing: Vec<(usize, usize)> = split_ids.iter().map(|&i| (i, starts[i])).collect();
    list.batch_join(&closing);
    for id in 0..ELEMENTS {
        assert_eq!(list.find_representative(id), list.find_representative(starts[id]));
    }
    assert_sizes_match(&list);

    // Break the cycles and stitch everything back into one ring.
    list.batch_split(&split_ids);
    let stitches: Vec<(usize, usize)> = split_ids
        .iter()
        .map(|&i| (i, (i + 1) % ELEMENTS))
        .collect();
    list.batch_join(&stitches);
    let representative = list.find_representative(0);
    for id in 0..ELEMENTS {
        assert_eq!(list.find_representative(id), representative);
    }
    assert_sizes_match(&list);
}

#[rstest]
#[case::full(0, ELEMENTS - 1)]
#[case::singleton(17, 17)]
#[case::adjacent(250, 251)]
#[case::inner(17, 500)]
fn subsequence_matches_span_length(list: List, #[case] left: usize, #[case] right: usize) {
    join_chain(&list);
    assert_eq!(
        list.subsequence_aggregate(left, right),
        (right - left + 1) as i64
    );
}

#[rstest]
fn update_propagates_to_the_list_aggregate(list: List) {
    join_chain(&list);
    list.update(500, 5);
    assert_eq!(list.aggregate(0), ELEMENTS as i64 + 4);
    assert_eq!(*list.value(500, 0), 5);

    list.update(500, 1);
    assert_eq!(list.aggregate(999), ELEMENTS as i64);
}

#[rstest]
fn update_on_a_cycle_reaches_every_anchor(list: List) {
    join_chain(&list);
    list.batch_join(&[(ELEMENTS - 1, 0)]);
    list.update(0, 10);
    for probe in [0, 1, 500, 999] {
        assert_eq!(list.aggregate(probe), ELEMENTS as i64 + 9);
    }
}

#[rstest]
fn batch_update_writes_leaves_and_repairs(list: List) {
    join_chain(&list);
    let targets = [10, 20, 30];
    let values = [2_i64, 3, 4];
    list.batch_update(&targets, Some(&values));
    for (&id, &value) in targets.iter().zip(values.iter()) {
        assert_eq!(*list.value(id, 0), value);
    }
    assert_eq!(list.aggregate(0), ELEMENTS as i64 - 3 + 9);
}

#[rstest]
fn singleton_cycle_aggregate_follows_updates(list: List) {
    list.batch_join(&[(7, 7)]);
    assert_eq!(list.aggregate(7), 1);
    list.update(7, 42);
    assert_eq!(list.aggregate(7), 42);
}
