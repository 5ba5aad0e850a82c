use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::error::Error;
use std::hash::{Hash, Hasher};

use statrs::function::gamma::ln_gamma;

use crate::data::GenotypeData;

/// Network scoring capability consumed by the sampler.
///
/// `score` must be a pure function of the parent set and the fixed dataset;
/// the sampler pairs the returned value with the parent set it scored and the
/// two travel together through every accepted transition.
///
/// `probability_of_data` converts a score into a nonnegative quantity
/// proportional to P(data | structure). Scorers that already work on the
/// linear scale override the default `exp`.
pub trait Scorer: Send + Sync {
    fn score(&self, parents: &[usize]) -> f64;

    fn probability_of_data(&self, score: f64) -> f64 {
        score.exp()
    }
}

/// Observation counts for one parent set: for every observed parent
/// configuration, the per-disease-state counts and the row total.
struct ConfigurationCounts {
    state_counts: HashMap<u64, Vec<u64>>,
}

fn count_configurations(
    data: &GenotypeData,
    parents: &[usize],
    allele_states: u8,
    disease_states: u8,
) -> ConfigurationCounts {
    let mut state_counts: HashMap<u64, Vec<u64>> = HashMap::new();
    for row in 0..data.num_observations() {
        // Mixed-radix index over the parent alleles.
        let mut config: u64 = 0;
        for &snp in parents {
            config = config * allele_states as u64 + data.allele(row, snp) as u64;
        }
        let counts = state_counts
            .entry(config)
            .or_insert_with(|| vec![0; disease_states as usize]);
        counts[data.disease_state(row) as usize] += 1;
    }
    ConfigurationCounts { state_counts }
}

/// Multinomial log-likelihood of the disease column given the parent
/// configuration of each observation, at the maximum-likelihood parameters.
fn log_likelihood(counts: &ConfigurationCounts) -> f64 {
    let mut logl = 0.0;
    for per_state in counts.state_counts.values() {
        let total: u64 = per_state.iter().sum();
        for &n in per_state {
            if n > 0 {
                logl += n as f64 * (n as f64 / total as f64).ln();
            }
        }
    }
    logl
}

/// Number of free parameters in the conditional distribution of the disease
/// node given `num_parents` parents.
fn free_parameters(num_parents: usize, allele_states: u8, disease_states: u8) -> f64 {
    let configurations = (allele_states as f64).powi(num_parents as i32);
    configurations * (disease_states as f64 - 1.0)
}

pub struct Aic {
    data: GenotypeData,
    allele_states: u8,
    disease_states: u8,
}

impl Scorer for Aic {
    fn score(&self, parents: &[usize]) -> f64 {
        let counts = count_configurations(&self.data, parents, self.allele_states, self.disease_states);
        log_likelihood(&counts)
            - free_parameters(parents.len(), self.allele_states, self.disease_states)
    }
}

pub struct Bic {
    data: GenotypeData,
    allele_states: u8,
    disease_states: u8,
}

impl Scorer for Bic {
    fn score(&self, parents: &[usize]) -> f64 {
        let counts = count_configurations(&self.data, parents, self.allele_states, self.disease_states);
        let n = self.data.num_observations() as f64;
        log_likelihood(&counts)
            - 0.5 * free_parameters(parents.len(), self.allele_states, self.disease_states) * n.ln()
    }
}

/// BDeu log marginal likelihood with equivalent sample size `alpha`.
///
/// Parent configurations with no observations contribute nothing, so only the
/// observed configurations are visited; the Dirichlet hyperparameters still
/// divide `alpha` across all `allele_states^|parents|` configurations.
fn log_bdeu_score(
    data: &GenotypeData,
    parents: &[usize],
    allele_states: u8,
    disease_states: u8,
    alpha: f64,
) -> f64 {
    let counts = count_configurations(data, parents, allele_states, disease_states);
    let configurations = (allele_states as f64).powi(parents.len() as i32);
    let alpha_config = alpha / configurations;
    let alpha_cell = alpha_config / disease_states as f64;

    let mut score = 0.0;
    for per_state in counts.state_counts.values() {
        let total: u64 = per_state.iter().sum();
        score += ln_gamma(alpha_config) - ln_gamma(alpha_config + total as f64);
        for &n in per_state {
            if n > 0 {
                score += ln_gamma(alpha_cell + n as f64) - ln_gamma(alpha_cell);
            }
        }
    }
    score
}

pub struct LogBdeu {
    data: GenotypeData,
    allele_states: u8,
    disease_states: u8,
    alpha: f64,
}

impl Scorer for LogBdeu {
    fn score(&self, parents: &[usize]) -> f64 {
        log_bdeu_score(
            &self.data,
            parents,
            self.allele_states,
            self.disease_states,
            self.alpha,
        )
    }
}

/// Same quantity as `LogBdeu` but on the linear scale: the score is the
/// marginal likelihood itself, so the ratio needs no transform. Underflows to
/// zero for large datasets; the sampler treats a zero current probability as
/// an unconditional accept.
pub struct Bdeu {
    data: GenotypeData,
    allele_states: u8,
    disease_states: u8,
    alpha: f64,
}

impl Scorer for Bdeu {
    fn score(&self, parents: &[usize]) -> f64 {
        log_bdeu_score(
            &self.data,
            parents,
            self.allele_states,
            self.disease_states,
            self.alpha,
        )
        .exp()
    }

    fn probability_of_data(&self, score: f64) -> f64 {
        score
    }
}

/// Baseline scorer: a value in [0,1) derived from a hash of the parent set.
/// Hashing keeps the scorer pure, which a stateful random draw would not be;
/// the sampler re-scores the same set repeatedly and relies on agreement.
pub struct RandomBaseline;

impl Scorer for RandomBaseline {
    fn score(&self, parents: &[usize]) -> f64 {
        let mut sorted: Vec<usize> = parents.to_vec();
        sorted.sort_unstable();
        let mut hasher = DefaultHasher::new();
        sorted.hash(&mut hasher);
        hasher.finish() as f64 / (u64::MAX as f64 + 1.0)
    }

    fn probability_of_data(&self, score: f64) -> f64 {
        score
    }
}

/// Build the scorer selected by name. An unrecognized name is a
/// configuration error and no sampling starts.
pub fn from_name(
    scoring_method: &str,
    data: GenotypeData,
    allele_states: u8,
    disease_states: u8,
    alpha: f64,
) -> Result<Box<dyn Scorer>, Box<dyn Error>> {
    match scoring_method {
        "AIC" => Ok(Box::new(Aic {
            data,
            allele_states,
            disease_states,
        })),
        "BIC" => Ok(Box::new(Bic {
            data,
            allele_states,
            disease_states,
        })),
        "BDeu" => Ok(Box::new(Bdeu {
            data,
            allele_states,
            disease_states,
            alpha,
        })),
        "LogBDeu" => Ok(Box::new(LogBdeu {
            data,
            allele_states,
            disease_states,
            alpha,
        })),
        "Random" => Ok(Box::new(RandomBaseline)),
        _ => Err("Scoring method does not exist.".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_data() -> GenotypeData {
        // Three observations over one SNP, disease state last.
        GenotypeData {
            rows: vec![vec![0, 0], vec![0, 1], vec![1, 1]],
            num_snps: 1,
        }
    }

    #[test]
    fn log_likelihood_empty_parent_set() {
        let data = tiny_data();
        let counts = count_configurations(&data, &[], 3, 2);
        // One configuration with states (1, 2) over 3 observations.
        let expected = 1.0 * (1.0_f64 / 3.0).ln() + 2.0 * (2.0_f64 / 3.0).ln();
        assert!((log_likelihood(&counts) - expected).abs() < 1e-12);
    }

    #[test]
    fn log_likelihood_single_parent() {
        let data = tiny_data();
        let counts = count_configurations(&data, &[0], 3, 2);
        // Allele 0 splits 1/1 over two states, allele 1 is deterministic.
        let expected = 2.0 * 0.5_f64.ln();
        assert!((log_likelihood(&counts) - expected).abs() < 1e-12);
    }

    #[test]
    fn aic_subtracts_parameter_count() {
        let data = tiny_data();
        let scorer = Aic {
            data: data.clone(),
            allele_states: 3,
            disease_states: 2,
        };
        let counts = count_configurations(&data, &[0], 3, 2);
        // One parent, 3 allele states, 2 disease states: 3 free parameters.
        let expected = log_likelihood(&counts) - 3.0;
        assert!((scorer.score(&[0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn bic_scales_penalty_with_sample_size() {
        let data = tiny_data();
        let scorer = Bic {
            data: data.clone(),
            allele_states: 3,
            disease_states: 2,
        };
        let counts = count_configurations(&data, &[0], 3, 2);
        let expected = log_likelihood(&counts) - 0.5 * 3.0 * 3.0_f64.ln();
        assert!((scorer.score(&[0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn log_bdeu_empty_parent_set_matches_closed_form() {
        let data = tiny_data();
        // alpha = 2 with one configuration: alpha_config = 2, alpha_cell = 1.
        let score = log_bdeu_score(&data, &[], 3, 2, 2.0);
        let expected = ln_gamma(2.0) - ln_gamma(2.0 + 3.0) + ln_gamma(1.0 + 1.0)
            - ln_gamma(1.0)
            + ln_gamma(1.0 + 2.0)
            - ln_gamma(1.0);
        assert!((score - expected).abs() < 1e-12);
    }

    #[test]
    fn bdeu_is_exp_of_log_bdeu() {
        let data = tiny_data();
        let linear = Bdeu {
            data: data.clone(),
            allele_states: 3,
            disease_states: 2,
            alpha: 1.0,
        };
        let log = LogBdeu {
            data,
            allele_states: 3,
            disease_states: 2,
            alpha: 1.0,
        };
        let parents = vec![0];
        assert!((linear.score(&parents) - log.score(&parents).exp()).abs() < 1e-12);
        // Linear scorer uses the identity transform, log scorer exponentiates.
        assert!((linear.probability_of_data(0.25) - 0.25).abs() < 1e-12);
        assert!((log.probability_of_data(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn random_baseline_is_pure_and_order_insensitive() {
        let scorer = RandomBaseline;
        let a = scorer.score(&[3, 1, 7]);
        let b = scorer.score(&[7, 3, 1]);
        assert_eq!(a, b);
        assert!(a >= 0.0 && a < 1.0);
        assert_ne!(scorer.score(&[3, 1]), a);
    }

    #[test]
    fn unknown_scoring_method_is_rejected() {
        let result = from_name("SupMax", tiny_data(), 3, 2, 1.0);
        assert!(result.is_err());
    }

    #[test]
    fn known_scoring_methods_are_constructed() {
        for name in ["AIC", "BIC", "BDeu", "LogBDeu", "Random"] {
            assert!(from_name(name, tiny_data(), 3, 2, 1.0).is_ok(), "{}", name);
        }
    }
}
