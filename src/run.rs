use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::data;
use crate::report;
use crate::sampler::{self, ChainResult};
use crate::scorer;

#[derive(Debug)]
pub struct RunConfig {
    pub scoring_method: String,
    pub mixing_steps: u64,
    pub running_steps: u64,
    pub disease_states: u8,
    pub allele_states: u8,
    pub data_file: PathBuf,
    pub output: PathBuf,
    pub alpha: f64,
    pub header: bool,
    pub delimiter: char,
    pub chains: u64,
    pub seed: Option<u64>,
    pub json: bool,
}

fn validate(config: &RunConfig) -> Result<(), Box<dyn Error>> {
    if config.running_steps == 0 {
        return Err("Running steps must be greater than zero.".into());
    }
    if config.disease_states < 2 {
        return Err("Number of disease states must be greater than one.".into());
    }
    if config.allele_states == 0 {
        return Err("Number of allele codes must be greater than zero.".into());
    }
    if config.chains == 0 {
        return Err("Number of chains must be greater than zero.".into());
    }
    if !(config.alpha > 0.0) {
        return Err("Alpha must be a positive number.".into());
    }
    Ok(())
}

/// Merge visitation statistics from independent chains.
fn merge_results(results: Vec<ChainResult>, num_snps: usize) -> ChainResult {
    let chains = results.len() as f64;
    let mut counts = vec![0u64; num_snps];
    let mut average_parent_size = 0.0;
    let mut max_parent_size = 0;
    for result in results {
        for (total, count) in counts.iter_mut().zip(result.counts.iter()) {
            *total += count;
        }
        average_parent_size += result.average_parent_size / chains;
        if result.max_parent_size > max_parent_size {
            max_parent_size = result.max_parent_size;
        }
    }
    ChainResult {
        counts,
        average_parent_size,
        max_parent_size,
    }
}

pub fn start(config: &RunConfig) -> Result<(), Box<dyn Error>> {
    validate(config)?;

    let data = data::load_genotype_file(
        &config.data_file,
        config.allele_states,
        config.disease_states,
        config.header,
        config.delimiter,
    )?;
    let num_snps = data.num_snps;
    let scorer = scorer::from_name(
        &config.scoring_method,
        data,
        config.allele_states,
        config.disease_states,
        config.alpha,
    )?;

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    println!("Running MCMC over parent sets of the disease node");
    println!("  SNPs: {}", num_snps);
    println!("  Scoring method: {}", config.scoring_method);
    println!("  Mixing steps: {}", config.mixing_steps);
    println!("  Running steps: {}", config.running_steps);
    println!("  Chains: {}", config.chains);
    println!("  Seed: {}", seed);

    let progress_bar = Arc::new(ProgressBar::new(config.chains));
    let results: Vec<ChainResult> = (0..config.chains)
        .into_par_iter()
        .map(|chain| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(chain));
            let result = sampler::run_chain(
                config.mixing_steps,
                config.running_steps,
                scorer.as_ref(),
                num_snps,
                &mut rng,
            );
            progress_bar.inc(1);
            result
        })
        .collect();
    progress_bar.finish();

    let merged = merge_results(results, num_snps);
    println!("Average parent size: {}", merged.average_parent_size);
    println!("Max parent size: {}", merged.max_parent_size);

    let total_running_steps = config.running_steps * config.chains;
    report::write_report(&merged.counts, total_running_steps, &config.output, config.json)?;
    println!("Report written to {}", config.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(path: &str) -> RunConfig {
        RunConfig {
            scoring_method: "BIC".to_string(),
            mixing_steps: 10,
            running_steps: 100,
            disease_states: 2,
            allele_states: 3,
            data_file: PathBuf::from(path),
            output: PathBuf::from("/dev/null"),
            alpha: 1.0,
            header: false,
            delimiter: ',',
            chains: 1,
            seed: Some(7),
            json: false,
        }
    }

    #[test]
    fn rejects_zero_running_steps() {
        let mut config = config_for("unused");
        config.running_steps = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_single_disease_state() {
        let mut config = config_for("unused");
        config.disease_states = 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_nonpositive_alpha() {
        let mut config = config_for("unused");
        config.alpha = 0.0;
        assert!(validate(&config).is_err());
        config.alpha = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn missing_data_file_aborts_before_sampling() {
        let config = config_for("/nonexistent/snpmc_test.csv");
        assert!(start(&config).is_err());
    }

    #[test]
    fn merging_sums_counts_and_averages_sizes() {
        let results = vec![
            ChainResult {
                counts: vec![1, 0, 3],
                average_parent_size: 1.0,
                max_parent_size: 2,
            },
            ChainResult {
                counts: vec![0, 2, 1],
                average_parent_size: 2.0,
                max_parent_size: 3,
            },
        ];
        let merged = merge_results(results, 3);
        assert_eq!(merged.counts, vec![1, 2, 4]);
        assert!((merged.average_parent_size - 1.5).abs() < 1e-12);
        assert_eq!(merged.max_parent_size, 3);
    }
}
