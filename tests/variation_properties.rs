//! Property-based tests for variation operators using proptest

use proptest::prelude::*;
use u_moea::config::Properties;
use u_moea::random::create_rng;
use u_moea::solution::{Solution, Variable};
use u_moea::variation::{AdaptiveMultimethodVariation, OperatorRegistry, Variation};

const OPERATORS: &[&str] = &[
    "sbx", "pm", "um", "hux", "bf", "pmx", "swap", "insertion", "ssx", "replace", "1x", "2x", "ux",
];

const MULTI_PARENT: &[&str] = &["pcx", "undx", "spx", "de"];

/// A solution mixing every encoding the built-in operators handle.
fn mixed_solution(seed: u64) -> Solution {
    let mut rng = create_rng(seed);
    let mut solution = Solution::new(
        vec![
            Variable::real(0.0, -5.0, 5.0),
            Variable::real(0.0, 0.0, 1.0),
            Variable::integer(0, -3, 3),
            Variable::binary(12),
            Variable::permutation(8),
            Variable::subset(4, 10),
        ],
        2,
        1,
    );
    for v in solution.variables_mut() {
        v.randomize(&mut rng);
    }
    solution
}

fn is_permutation(perm: &[usize]) -> bool {
    let mut sorted = perm.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, &v)| i == v)
}

fn is_subset_of_size(members: &[usize], size: usize, universe: usize) -> bool {
    let mut sorted = members.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len() == size && sorted.iter().all(|&m| m < universe)
}

fn all_rate_one() -> Properties {
    OPERATORS.iter().map(|name| (format!("{name}.rate"), "1.0")).collect()
}

proptest! {
    #[test]
    fn test_parents_never_modified(
        op in prop::sample::select(OPERATORS),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        seed in any::<u64>(),
    ) {
        let registry = OperatorRegistry::default();
        let variation = registry.build(op, &all_rate_one(), 5).unwrap();
        let parents: Vec<Solution> = [seed_a, seed_b]
            .iter()
            .take(variation.arity())
            .map(|&s| mixed_solution(s))
            .collect();
        let snapshot = parents.clone();

        let children = variation.evolve(&parents, &mut create_rng(seed)).unwrap();
        prop_assert_eq!(&parents, &snapshot);
        prop_assert_eq!(children.len(), parents.len());
    }

    #[test]
    fn test_children_keep_encodings_valid(
        name in prop::sample::select(vec!["sbx+pm", "hux+bf", "pmx+insertion+swap", "ux+um", "2x+swap", "ssx+replace"]),
        seed_a in any::<u64>(),
        seed_b in any::<u64>(),
        seed in any::<u64>(),
    ) {
        let variation = OperatorRegistry::default().build(name, &all_rate_one(), 5).unwrap();
        let parents = vec![mixed_solution(seed_a), mixed_solution(seed_b)];
        let children = variation.evolve(&parents, &mut create_rng(seed)).unwrap();

        prop_assert_eq!(children.len(), 2);
        for child in &children {
            prop_assert_eq!(child.number_of_variables(), 6);
            for v in child.variables() {
                match v {
                    Variable::Real { value, lower_bound, upper_bound } => {
                        prop_assert!(lower_bound <= value && value <= upper_bound);
                    }
                    Variable::Integer { value, lower_bound, upper_bound } => {
                        prop_assert!(lower_bound <= value && value <= upper_bound);
                    }
                    Variable::Binary(bits) => prop_assert_eq!(bits.len(), 12),
                    Variable::Permutation(perm) => prop_assert!(is_permutation(perm)),
                    Variable::Subset { members, universe } => {
                        prop_assert!(is_subset_of_size(members, 4, *universe));
                    }
                }
            }
        }
    }

    #[test]
    fn test_multi_parent_children_stay_in_bounds(
        op in prop::sample::select(MULTI_PARENT),
        seed in any::<u64>(),
    ) {
        let variation = OperatorRegistry::default().build(op, &Properties::new(), 6).unwrap();
        let parents: Vec<Solution> = (0..variation.arity() as u64)
            .map(|i| mixed_solution(seed.wrapping_add(i)))
            .collect();
        let snapshot = parents.clone();

        let children = variation.evolve(&parents, &mut create_rng(seed)).unwrap();
        prop_assert_eq!(&parents, &snapshot);
        prop_assert_eq!(children.len(), if op == "de" { 1 } else { 2 });
        for child in &children {
            for (i, v) in child.variables().iter().enumerate() {
                match v {
                    Variable::Real { value, lower_bound, upper_bound } => {
                        prop_assert!(lower_bound <= value && value <= upper_bound);
                    }
                    // non-real loci are copied from one of the parents
                    other => prop_assert!(parents.iter().any(|p| p.variable(i) == other)),
                }
            }
        }
    }

    #[test]
    fn test_zero_rate_yields_copies(op in prop::sample::select(OPERATORS), seed in any::<u64>()) {
        let props = Properties::new().with(format!("{op}.rate"), 0.0);
        let variation = OperatorRegistry::default().build(op, &props, 5).unwrap();
        let parents: Vec<Solution> = (0..variation.arity() as u64).map(|i| mixed_solution(seed ^ i)).collect();
        let children = variation.evolve(&parents, &mut create_rng(seed)).unwrap();
        prop_assert_eq!(children, parents);
    }

    #[test]
    fn test_pipeline_batch_divisibility(pairs in 1usize..6, extra in 0usize..2, seed in any::<u64>()) {
        let variation = OperatorRegistry::default().build("sbx+pm", &Properties::new(), 5).unwrap();
        let parents: Vec<Solution> = (0..2 * pairs + extra).map(|i| mixed_solution(seed.wrapping_add(i as u64))).collect();
        let result = variation.evolve(&parents, &mut create_rng(seed));
        if extra == 0 {
            prop_assert_eq!(result.unwrap().len(), 2 * pairs);
        } else {
            prop_assert!(result.is_err());
        }
    }

    #[test]
    fn test_adaptive_probabilities_normalized(
        tags in prop::collection::vec(prop::option::of(0usize..4), 0..200),
    ) {
        let registry = OperatorRegistry::default();
        let mut amv = AdaptiveMultimethodVariation::new();
        for name in ["sbx+pm", "ux+um", "pm", "um"] {
            amv.add_operator(registry.build(name, &Properties::new(), 5).unwrap());
        }
        let archive: Vec<Solution> = tags
            .iter()
            .map(|&tag| {
                let mut s = Solution::from_objectives(vec![0.0, 0.0]);
                s.set_operator(tag);
                s
            })
            .collect();

        let p = amv.compute_probabilities(&archive);
        prop_assert_eq!(p.len(), 4);
        prop_assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        prop_assert!(p.iter().all(|&x| x > 0.0));

        let tagged_with = |i: usize| tags.iter().filter(|&&t| t == Some(i)).count() as f64;
        let total = 4.0 + tagged_with(0) + tagged_with(1) + tagged_with(2) + tagged_with(3);
        for (i, &pi) in p.iter().enumerate() {
            prop_assert!((pi - (1.0 + tagged_with(i)) / total).abs() < 1e-12);
        }
    }
}
