use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use super::generators::PoolDemand;
use crate::error::{GenerationError, Result};
use crate::models::{CandidatePools, PoolName};

pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];

/// Shuffled options and the ascending indices of the correct ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub options: Vec<String>,
    pub correct_indexes: Vec<usize>,
}

/// Random permutation of `0..n`.
fn permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// Up to `n` distinct positions of `pool`, taken from a truncated permutation.
pub fn sample_unique<R: Rng + ?Sized>(pool: &[String], n: usize, rng: &mut R) -> Vec<String> {
    if n == 0 || pool.is_empty() {
        return Vec::new();
    }
    permutation(pool.len(), rng)
        .into_iter()
        .take(n)
        .map(|i| pool[i].clone())
        .collect()
}

/// Shuffle correct options and distractors together, tracking where the
/// correct values end up. Duplicate values are counted, so a value drawn
/// once as correct marks only one position.
pub fn combine_and_shuffle<R: Rng + ?Sized>(
    correct: Vec<String>,
    distractors: Vec<String>,
    rng: &mut R,
) -> Choice {
    let mut targets: HashMap<String, usize> = HashMap::new();
    for c in &correct {
        *targets.entry(c.clone()).or_insert(0) += 1;
    }

    let combined: Vec<String> = correct.into_iter().chain(distractors).collect();
    let perm = permutation(combined.len(), rng);

    let mut options = Vec::with_capacity(combined.len());
    let mut correct_indexes = Vec::new();
    for (position, idx) in perm.into_iter().enumerate() {
        let value = &combined[idx];
        if let Some(remaining) = targets.get_mut(value) {
            correct_indexes.push(position);
            *remaining -= 1;
            if *remaining == 0 {
                targets.remove(value);
            }
        }
        options.push(value.clone());
    }

    correct_indexes.sort_unstable();
    Choice { options, correct_indexes }
}

fn lookup(pools: &CandidatePools, name: PoolName) -> Result<&[String]> {
    pools.pool(name).ok_or_else(|| {
        GenerationError::Precondition(format!("pool {} requested from {} pools", name.name(), pools.category()))
    })
}

/// Options for one question. `tf_answer` is only read for true/false.
pub fn build_choice<R: Rng + ?Sized>(
    demand: &PoolDemand,
    pools: &CandidatePools,
    tf_answer: bool,
    rng: &mut R,
) -> Result<Choice> {
    match *demand {
        PoolDemand::Options { correct, distractor, correct_count, distractor_count } => {
            let correct_pool = lookup(pools, correct)?;
            let distractor_pool = lookup(pools, distractor)?;
            let correct = sample_unique(correct_pool, correct_count, rng);
            let distractors = sample_unique(distractor_pool, distractor_count, rng);
            Ok(combine_and_shuffle(correct, distractors, rng))
        }
        PoolDemand::TrueFalse { positive, negative } => {
            lookup(pools, positive)?;
            lookup(pools, negative)?;
            Ok(Choice {
                options: TRUE_FALSE_OPTIONS.iter().map(|s| s.to_string()).collect(),
                correct_indexes: vec![if tf_answer { 0 } else { 1 }],
            })
        }
    }
}
