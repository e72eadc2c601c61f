// Dict property tests against a std HashMap model.
//
// Property 1: op-for-op agreement with the model.
//  - Model: HashMap<Vec<u8>, i32>.
//  - Operations: set, get, del, resize (to a small random capacity).
//  - Invariant after each step: presence and len match the model.
//  - Final check: full traversal agrees with the model entry-for-entry.
//
// Property 2: set-algebra traversals match model set operations.
//  - Two tables with independent seeds and capacities.
//  - difference/intersection key sets equal the model's.
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use bytedict::Dict;

fn key(raw: usize) -> Vec<u8> {
    format!("k{raw}").into_bytes()
}

proptest! {
    #[test]
    fn prop_dict_matches_model(
        seed in any::<u32>(),
        capacity in 1usize..64,
        ops in proptest::collection::vec((0u8..=3u8, 0usize..24usize, any::<i32>()), 1..200),
    ) {
        let mut dict = Dict::new(seed, capacity);
        let mut model: HashMap<Vec<u8>, i32> = HashMap::new();

        for (op, raw, value) in ops {
            let k = key(raw);
            match op {
                0 => {
                    prop_assert_eq!(dict.set(&k, value), model.insert(k.clone(), value));
                }
                1 => {
                    prop_assert_eq!(dict.get(&k), model.get(&k));
                }
                2 => {
                    prop_assert_eq!(dict.del(&k), model.remove(&k));
                }
                3 => {
                    dict.resize(raw % 16 + 1);
                }
                _ => unreachable!(),
            }

            // Invariants after each step.
            prop_assert_eq!(dict.contains(&k), model.contains_key(&k));
            prop_assert_eq!(dict.len(), model.len());
        }

        prop_assert_eq!(dict.iter().count(), model.len());
        for entry in dict.iter() {
            prop_assert_eq!(model.get(entry.key()), Some(entry.value()));
        }
    }

    #[test]
    fn prop_dict_set_algebra_matches_model(
        seed_a in any::<u32>(),
        seed_b in any::<u32>(),
        cap_a in 1usize..16,
        cap_b in 1usize..16,
        keys_a in proptest::collection::hash_set(0usize..24usize, 0..24),
        keys_b in proptest::collection::hash_set(0usize..24usize, 0..24),
    ) {
        let mut a = Dict::new(seed_a, cap_a);
        let mut b = Dict::new(seed_b, cap_b);

        for &raw in &keys_a {
            a.set(&key(raw), 0);
        }
        for &raw in &keys_b {
            b.set(&key(raw), 0);
        }

        let model_a: HashSet<Vec<u8>> = keys_a.iter().map(|&raw| key(raw)).collect();
        let model_b: HashSet<Vec<u8>> = keys_b.iter().map(|&raw| key(raw)).collect();

        let difference: HashSet<Vec<u8>> =
            a.difference(&b).map(|entry| entry.key().to_vec()).collect();
        let expected: HashSet<Vec<u8>> = model_a.difference(&model_b).cloned().collect();
        prop_assert_eq!(difference, expected);

        let intersection: HashSet<Vec<u8>> =
            a.intersection(&b).map(|entry| entry.key().to_vec()).collect();
        let expected: HashSet<Vec<u8>> = model_a.intersection(&model_b).cloned().collect();
        prop_assert_eq!(intersection, expected);
    }

    #[test]
    fn prop_dict_resize_roundtrip_preserves_entries(
        seed in any::<u32>(),
        caps in proptest::collection::vec(1usize..48usize, 1..6),
        pairs in proptest::collection::hash_map(0usize..32usize, any::<i32>(), 0..32),
    ) {
        let mut dict = Dict::new(seed, 8);
        let mut model: HashMap<Vec<u8>, i32> = HashMap::new();

        for (&raw, &value) in &pairs {
            dict.set(&key(raw), value);
            model.insert(key(raw), value);
        }

        for cap in caps {
            dict.resize(cap);
            prop_assert_eq!(dict.capacity(), cap);
            prop_assert_eq!(dict.len(), model.len());

            for (k, value) in &model {
                prop_assert_eq!(dict.get(k), Some(value));
            }
        }
    }

    #[test]
    fn prop_dict_clone_is_detached(
        seed in any::<u32>(),
        pairs in proptest::collection::hash_map(0usize..16usize, any::<i32>(), 0..16),
        extra in 16usize..24usize,
    ) {
        let mut source = Dict::new(seed, 4);
        for (&raw, &value) in &pairs {
            source.set(&key(raw), value);
        }

        let mut clone = source.clone();
        prop_assert_eq!(&clone, &source);

        clone.set(&key(extra), -1);
        prop_assert_eq!(source.len(), pairs.len());
        prop_assert!(!source.contains(&key(extra)));
    }
}
