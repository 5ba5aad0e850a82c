use std::error::Error;
use std::path::PathBuf;

use crate::data;
use crate::scorer;

/// Parse a comma separated list of SNP indices; an empty string is the
/// empty parent set.
fn parse_parent_set(parents: &str) -> Result<Vec<usize>, Box<dyn Error>> {
    let trimmed = parents.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let mut parsed = Vec::new();
    for field in trimmed.split(',') {
        let snp = field
            .trim()
            .parse::<usize>()
            .map_err(|_| format!("Can not parse SNP index '{}'.", field.trim()))?;
        if parsed.contains(&snp) {
            return Err(format!("Duplicate SNP index {} in parent set.", snp).into());
        }
        parsed.push(snp);
    }
    Ok(parsed)
}

pub fn start(
    scoring_method: &str,
    parents: &str,
    disease_states: u8,
    allele_states: u8,
    data_file: &PathBuf,
    alpha: f64,
    header: bool,
    delimiter: char,
) -> Result<(), Box<dyn Error>> {
    if disease_states < 2 {
        return Err("Number of disease states must be greater than one.".into());
    }
    if allele_states == 0 {
        return Err("Number of allele codes must be greater than zero.".into());
    }
    let parent_set = parse_parent_set(parents)?;

    let data = data::load_genotype_file(data_file, allele_states, disease_states, header, delimiter)?;
    for &snp in &parent_set {
        if snp >= data.num_snps {
            return Err(format!(
                "SNP index {} is out of range, data file has {} SNPs.",
                snp, data.num_snps
            )
            .into());
        }
    }

    let scorer = scorer::from_name(scoring_method, data, allele_states, disease_states, alpha)?;
    let score = scorer.score(&parent_set);
    println!("Parent set: {:?}", parent_set);
    println!("Score: {}", score);
    println!("Probability of data: {}", scorer.probability_of_data(score));
    Ok(())
}
