use std::error::Error;
use std::path::PathBuf;

use csv::ReaderBuilder;

/// Genotype observations: one row per individual, one column per SNP,
/// disease state in the last column.
#[derive(Debug, Clone)]
pub struct GenotypeData {
    pub rows: Vec<Vec<u8>>,
    pub num_snps: usize,
}

impl GenotypeData {
    pub fn num_observations(&self) -> usize {
        self.rows.len()
    }

    /// Disease state of observation `row` (last column).
    pub fn disease_state(&self, row: usize) -> u8 {
        self.rows[row][self.num_snps]
    }

    /// Allele code of SNP `snp` in observation `row`.
    pub fn allele(&self, row: usize, snp: usize) -> u8 {
        self.rows[row][snp]
    }
}

pub fn load_genotype_file(
    data_file: &PathBuf,
    allele_states: u8,
    disease_states: u8,
    header: bool,
    delimiter: char,
) -> Result<GenotypeData, Box<dyn Error>> {
    if !delimiter.is_ascii() {
        return Err(format!("Delimiter '{}' is not an ASCII character.", delimiter).into());
    }
    let mut reader = ReaderBuilder::new()
        .has_headers(header)
        .delimiter(delimiter as u8)
        .trim(csv::Trim::All)
        .from_path(data_file)?;

    let mut rows: Vec<Vec<u8>> = Vec::new();
    let mut num_columns = 0;
    for (row_index, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value = field
                .parse::<u8>()
                .map_err(|_| format!("Can not parse '{}' in record {}.", field, row_index))?;
            row.push(value);
        }
        if rows.is_empty() {
            num_columns = row.len();
            if num_columns < 2 {
                return Err("Data file needs at least one SNP column and a disease column.".into());
            }
        } else if row.len() != num_columns {
            return Err(format!(
                "Record {} has {} fields, expected {}.",
                row_index,
                row.len(),
                num_columns
            )
            .into());
        }
        rows.push(row);
    }
    if rows.is_empty() {
        return Err("Data file contains no observations.".into());
    }

    let num_snps = num_columns - 1;
    for (row_index, row) in rows.iter().enumerate() {
        for (column, &value) in row.iter().enumerate() {
            if column < num_snps && value >= allele_states {
                return Err(format!(
                    "Allele code {} in record {} exceeds allele states {}.",
                    value, row_index, allele_states
                )
                .into());
            }
            if column == num_snps && value >= disease_states {
                return Err(format!(
                    "Disease state {} in record {} exceeds disease states {}.",
                    value, row_index, disease_states
                )
                .into());
            }
        }
    }

    Ok(GenotypeData { rows, num_snps })
}
