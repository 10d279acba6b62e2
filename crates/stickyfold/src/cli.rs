use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use sf_energy::ModelDetails;

#[derive(Debug, Parser)]
#[command(name = "stickyfold", version, about = "Bind RNA strands into multi-strand complexes.")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Bind consecutive strands pairwise, then grow one complex from all of them.
    Bind(BindArguments),
    /// List the suboptimal structures of a single strand.
    Subopt(SuboptArguments),
}

/// Free energy evaluation parameters.
#[derive(Debug, Args)]
pub struct EnergyModelArguments {
    /// Temperature in Celsius
    #[arg(short, long, default_value = "37.0")]
    pub temperature: f64,
}

impl EnergyModelArguments {
    pub fn model(&self) -> ModelDetails {
        ModelDetails::with_temperature(self.temperature)
    }
}

#[derive(Debug, Args)]
pub struct BindArguments {
    /// RNA sequences, 5' to 3'. Without sequences a demo set of three is used.
    #[arg(value_name = "SEQ")]
    pub sequences: Vec<String>,

    /// Use random sequences of this length instead.
    #[arg(long, value_name = "LEN", conflicts_with = "sequences")]
    pub random: Option<usize>,

    /// Number of random sequences.
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub count: usize,

    /// Seed for the random sequences.
    #[arg(long, value_name = "S")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub energy: EnergyModelArguments,

    /// Do not enforce the pairs of a complex when binding the next strand.
    #[arg(long)]
    pub soft_extend: bool,

    /// Also make the outer tails of the first and last strand sticky.
    #[arg(long)]
    pub outward_faces: bool,

    /// Give up once a suboptimal ensemble exceeds N structures.
    #[arg(long, value_name = "N", default_value_t = 10_000)]
    pub subopt_limit: usize,

    /// Print the suboptimal ensemble of every complex.
    #[arg(long)]
    pub show_ensemble: bool,

    /// Print the results as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SuboptArguments {
    /// RNA sequence, 5' to 3'.
    #[arg(value_name = "SEQ")]
    pub sequence: String,

    #[command(flatten)]
    pub energy: EnergyModelArguments,

    /// Give up once the ensemble exceeds N structures.
    #[arg(long, value_name = "N")]
    pub subopt_limit: Option<usize>,
}
