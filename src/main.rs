use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod data;
mod report;
mod run;
mod sampler;
mod score;
mod scorer;

#[derive(Debug, Parser)]
#[clap(name = "snpmc")]
#[clap(about = "Posterior probabilities of SNP-disease edges via MCMC over Bayesian network structures.", long_about = None)]

struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

const DEFAULT_MIXING_STEPS: u64 = 1000;
const DEFAULT_RUNNING_STEPS: u64 = 10000;

#[derive(Debug, Subcommand)]

enum Commands {
    /// Run the MCMC chain and report per-SNP posterior edge probabilities
    #[clap(arg_required_else_help = true)]
    Run {
        /// scoring method: AIC, BIC, BDeu, LogBDeu or Random
        #[clap(short, long, value_parser, required = true)]
        scoring_method: String,

        /// number of burn-in steps before visitation is recorded
        #[clap(short, long, value_parser, default_value_t = DEFAULT_MIXING_STEPS)]
        mixing_steps: u64,

        /// number of recorded sampling steps
        #[clap(short, long, value_parser, default_value_t = DEFAULT_RUNNING_STEPS)]
        running_steps: u64,

        /// number of disease states in the last data column
        #[clap(short, long, value_parser, default_value_t = 2)]
        disease_states: u8,

        /// number of allele codes per SNP column
        #[clap(short, long, value_parser, default_value_t = 3)]
        allele_states: u8,

        /// input genotype file, one observation per row, disease state last
        #[clap(short = 'f', long, value_parser, required = true)]
        data_file: PathBuf,

        /// output path for the posterior report
        #[clap(short, long, value_parser, required = true)]
        output: PathBuf,

        /// equivalent sample size for the Bayesian-Dirichlet scorers
        #[clap(long, value_parser, default_value_t = 1.0)]
        alpha: f64,

        /// treat the first record as a header and skip it
        #[clap(long, value_parser, default_value_t = false)]
        header: bool,

        /// field delimiter in the genotype file
        #[clap(long, value_parser, default_value_t = ',')]
        delimiter: char,

        /// number of independent chains to run in parallel
        #[clap(short, long, value_parser, default_value_t = 1)]
        chains: u64,

        /// seed for the random number generator, entropy if omitted
        #[clap(long, value_parser)]
        seed: Option<u64>,

        /// write the report as JSON instead of text lines
        #[clap(long, value_parser, default_value_t = false)]
        json: bool,
    },

    /// Score a single explicit parent set and print the result
    #[clap(arg_required_else_help = true)]
    Score {
        /// scoring method: AIC, BIC, BDeu, LogBDeu or Random
        #[clap(short, long, value_parser, required = true)]
        scoring_method: String,

        /// comma separated SNP indices forming the parent set, e.g. 1,5,9
        #[clap(short, long, value_parser, required = true)]
        parents: String,

        /// number of disease states in the last data column
        #[clap(short, long, value_parser, default_value_t = 2)]
        disease_states: u8,

        /// number of allele codes per SNP column
        #[clap(short, long, value_parser, default_value_t = 3)]
        allele_states: u8,

        /// input genotype file, one observation per row, disease state last
        #[clap(short = 'f', long, value_parser, required = true)]
        data_file: PathBuf,

        /// equivalent sample size for the Bayesian-Dirichlet scorers
        #[clap(long, value_parser, default_value_t = 1.0)]
        alpha: f64,

        /// treat the first record as a header and skip it
        #[clap(long, value_parser, default_value_t = false)]
        header: bool,

        /// field delimiter in the genotype file
        #[clap(long, value_parser, default_value_t = ',')]
        delimiter: char,
    },
}

fn main() {
    let args = Cli::parse();
    let outcome = match args.command {
        Commands::Run {
            scoring_method,
            mixing_steps,
            running_steps,
            disease_states,
            allele_states,
            data_file,
            output,
            alpha,
            header,
            delimiter,
            chains,
            seed,
            json,
        } => run::start(&run::RunConfig {
            scoring_method,
            mixing_steps,
            running_steps,
            disease_states,
            allele_states,
            data_file,
            output,
            alpha,
            header,
            delimiter,
            chains,
            seed,
            json,
        }),

        Commands::Score {
            scoring_method,
            parents,
            disease_states,
            allele_states,
            data_file,
            alpha,
            header,
            delimiter,
        } => score::start(
            &scoring_method,
            &parents,
            disease_states,
            allele_states,
            &data_file,
            alpha,
            header,
            delimiter,
        ),
    };

    if let Err(e) = outcome {
        println!("{}", e);
        std::process::exit(1);
    }
}
