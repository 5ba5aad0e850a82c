/// Metropolis-Hastings random walk over parent sets of the disease node.
use rand::Rng;

use crate::scorer::Scorer;

/// Once the parent set reaches this size, proposals only remove edges.
/// Keeps the contingency tables scored per step tractably small. The removal
/// move has no matching add move at the cap, so the walk is not exactly in
/// detailed balance there; the stationary distribution is slightly biased
/// against size-four sets. Accepted approximation.
pub const PARENT_CAP: usize = 4;

/// Visitation statistics of one chain's sampling phase.
#[derive(Debug, Clone)]
pub struct ChainResult {
    /// counts[i] = number of sampling steps in which SNP i was a parent
    pub counts: Vec<u64>,
    pub average_parent_size: f64,
    pub max_parent_size: usize,
}

/// Propose a parent set one move away from `parents`.
///
/// Below the cap the move toggles a uniformly chosen SNP: removal if it is
/// already a parent, addition otherwise. Two sets are neighbors iff they
/// differ by exactly one element. At the cap the move removes a uniformly
/// chosen member of the first `PARENT_CAP` elements instead.
pub fn propose(parents: &[usize], num_snps: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut neighbor = parents.to_vec();
    if neighbor.len() < PARENT_CAP {
        let snp = rng.gen_range(0..num_snps);
        if let Some(position) = neighbor.iter().position(|&p| p == snp) {
            neighbor.remove(position);
        } else {
            neighbor.push(snp);
        }
    } else {
        let position = rng.gen_range(0..PARENT_CAP);
        neighbor.remove(position);
    }
    neighbor
}

/// One Metropolis-Hastings transition.
///
/// Accepts the proposed set with probability min(1, R) where
/// R = P(data | proposal) / P(data | current); a draw u in [0,1) is compared
/// against the unclamped ratio, which is equivalent. When the current state
/// has zero probability of the data the ratio is undefined and the candidate
/// is accepted unconditionally.
///
/// Returns the next (parent set, score) pair; the two always move together.
pub fn step(
    parents: Vec<usize>,
    current_score: f64,
    scorer: &dyn Scorer,
    num_snps: usize,
    rng: &mut impl Rng,
) -> (Vec<usize>, f64) {
    let candidate = propose(&parents, num_snps, rng);
    let candidate_score = scorer.score(&candidate);
    let current_probability = scorer.probability_of_data(current_score);
    if current_probability == 0.0 {
        return (candidate, candidate_score);
    }
    let ratio = scorer.probability_of_data(candidate_score) / current_probability;
    let draw: f64 = rng.gen();
    if draw <= ratio {
        (candidate, candidate_score)
    } else {
        (parents, current_score)
    }
}

/// Run one chain: `mixing_steps` unrecorded burn-in steps from the empty
/// parent set, then `running_steps` recorded steps. Each recorded step
/// increments the count of every SNP currently in the parent set.
pub fn run_chain(
    mixing_steps: u64,
    running_steps: u64,
    scorer: &dyn Scorer,
    num_snps: usize,
    rng: &mut impl Rng,
) -> ChainResult {
    let mut parents: Vec<usize> = Vec::new();
    let mut current_score = scorer.score(&parents);

    for _ in 0..mixing_steps {
        let (next_parents, next_score) = step(parents, current_score, scorer, num_snps, rng);
        parents = next_parents;
        current_score = next_score;
    }

    let mut counts = vec![0u64; num_snps];
    let mut size_sum: u64 = 0;
    let mut max_parent_size = 0;
    for _ in 0..running_steps {
        let (next_parents, next_score) = step(parents, current_score, scorer, num_snps, rng);
        parents = next_parents;
        current_score = next_score;
        size_sum += parents.len() as u64;
        if parents.len() > max_parent_size {
            max_parent_size = parents.len();
        }
        for &snp in &parents {
            counts[snp] += 1;
        }
    }

    ChainResult {
        counts,
        average_parent_size: size_sum as f64 / running_steps as f64,
        max_parent_size,
    }
}
