use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
pub struct PosteriorEntry {
    pub snp: usize,
    pub posterior: f64,
}

/// Per-SNP posterior inclusion estimates: visitation count divided by the
/// number of recorded steps. SNPs never visited are omitted, so every
/// reported probability lies in (0, 1].
pub fn posteriors(counts: &[u64], total_running_steps: u64) -> Vec<PosteriorEntry> {
    counts
        .iter()
        .enumerate()
        .filter(|(_, &count)| count > 0)
        .map(|(snp, &count)| PosteriorEntry {
            snp,
            posterior: count as f64 / total_running_steps as f64,
        })
        .collect()
}

pub fn write_report(
    counts: &[u64],
    total_running_steps: u64,
    output: &PathBuf,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let entries = posteriors(counts, total_running_steps);
    let file = File::create(output).map_err(|_| "Can not write to file.")?;
    let mut writer = BufWriter::new(file);
    if json {
        serde_json::to_writer_pretty(&mut writer, &entries)?;
        writeln!(writer)?;
    } else {
        for entry in &entries {
            writeln!(writer, "{}: {}", entry.snp, entry.posterior)?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_count_snps_are_omitted() {
        let entries = posteriors(&[0, 3, 0, 10, 1], 10);
        let snps: Vec<usize> = entries.iter().map(|e| e.snp).collect();
        assert_eq!(snps, vec![1, 3, 4]);
    }

    #[test]
    fn probabilities_are_in_unit_interval() {
        let entries = posteriors(&[0, 3, 0, 10, 1], 10);
        for entry in &entries {
            assert!(entry.posterior > 0.0 && entry.posterior <= 1.0);
        }
        assert_eq!(entries[1].posterior, 1.0);
    }

    #[test]
    fn indices_are_ascending() {
        let entries = posteriors(&[5, 0, 2, 2, 0, 9], 20);
        let snps: Vec<usize> = entries.iter().map(|e| e.snp).collect();
        let mut sorted = snps.clone();
        sorted.sort_unstable();
        assert_eq!(snps, sorted);
    }

    #[test]
    fn text_report_matches_expected_lines() {
        let mut path = std::env::temp_dir();
        path.push(format!("snpmc_report_test_{}.txt", std::process::id()));
        write_report(&[0, 5, 0, 10], 10, &path, false).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(contents, "1: 0.5\n3: 1\n");
    }

    #[test]
    fn json_report_round_trips() {
        let mut path = std::env::temp_dir();
        path.push(format!("snpmc_report_json_test_{}.json", std::process::id()));
        write_report(&[2, 0, 4], 4, &path, true).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed[0]["snp"], 0);
        assert_eq!(parsed[1]["posterior"], 1.0);
    }
}
