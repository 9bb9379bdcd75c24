use clap::{Args, Parser, Subcommand};
use resmut::core::models::atom::Element;
use resmut::core::models::residue::ResidueState;
use resmut::engine::config::OptimizationMethod;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "resmut CLI - inspect the tables and settings behind residue mutation and clash-avoiding side-chain search.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the rotatable dihedral groups of a residue type.
    Dihedrals(DihedralsArgs),
    /// Show the van der Waals parameters an atom type resolves to.
    Params(ParamsArgs),
    /// Classify the bond order of an element pair at a given distance.
    Classify(ClassifyArgs),
    /// Resolve a scan configuration file and CLI overrides into the final settings.
    CheckConfig(CheckConfigArgs),
}

#[derive(Args, Debug)]
pub struct DihedralsArgs {
    /// Residue name, e.g. LYS.
    #[arg(required = true)]
    pub residue: String,

    /// Residue state (standard, n-terminal, c-terminal, ...).
    #[arg(long, default_value = "standard", value_parser = parse_state)]
    pub state: ResidueState,

    /// Topology TOML whose entries extend or replace the built-in table.
    #[arg(short, long, value_name = "PATH")]
    pub topology: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Force field type labels to look up.
    #[arg(required = true, num_args(1..))]
    pub types: Vec<String>,

    /// Element used as a fallback type when the label is missing.
    #[arg(short, long, value_parser = parse_element)]
    pub element: Option<Element>,

    /// Parameter TOML used instead of the built-in table.
    #[arg(short, long, value_name = "PATH")]
    pub params: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    #[arg(value_parser = parse_element)]
    pub first: Element,

    #[arg(value_parser = parse_element)]
    pub second: Element,

    /// Interatomic distance in Angstroms.
    pub distance: f64,

    /// Bond length TOML used instead of the built-in table.
    #[arg(short, long, value_name = "PATH")]
    pub bonds: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Scan configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the rotation step between sweep positions, in degrees.
    #[arg(long, value_name = "DEGREES")]
    pub step: Option<f64>,

    /// Override the angle swept per torsion, in degrees.
    #[arg(long, value_name = "DEGREES")]
    pub range: Option<f64>,

    /// Override the non-bonded cutoff, in Angstroms.
    #[arg(long, value_name = "ANGSTROMS")]
    pub cutoff: Option<f64>,

    /// Override the context radius, in Angstroms.
    #[arg(long, value_name = "ANGSTROMS")]
    pub context_radius: Option<f64>,

    /// Override the search method (none, tree, brute-force, tree-then-brute-force).
    #[arg(short, long, value_parser = parse_method)]
    pub method: Option<OptimizationMethod>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S scan.step-degrees=10
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

fn parse_state(s: &str) -> Result<ResidueState, String> {
    s.parse().map_err(|_| format!("unknown residue state '{s}'"))
}

fn parse_element(s: &str) -> Result<Element, String> {
    s.parse().map_err(|e: resmut::core::models::atom::ParseElementError| e.to_string())
}

fn parse_method(s: &str) -> Result<OptimizationMethod, String> {
    s.parse()
        .map_err(|e: resmut::engine::config::ConfigError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["resmut", "dihedrals", "LYS", "-vv", "--log-file", "run.log"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
        let Commands::Dihedrals(args) = cli.command else {
            panic!("expected the dihedrals command");
        };
        assert_eq!(args.residue, "LYS");
        assert_eq!(args.state, ResidueState::Standard);
    }

    #[test]
    fn classify_parses_elements_and_distance() {
        let cli = Cli::parse_from(["resmut", "classify", "C", "N", "1.33"]);
        let Commands::Classify(args) = cli.command else {
            panic!("expected the classify command");
        };
        assert_eq!((args.first, args.second), (Element::C, Element::N));
        assert_eq!(args.distance, 1.33);
    }

    #[test]
    fn invalid_values_are_rejected_by_the_parser() {
        assert!(Cli::try_parse_from(["resmut", "classify", "Xx", "N", "1.0"]).is_err());
        assert!(Cli::try_parse_from(["resmut", "dihedrals", "SER", "--state", "odd"]).is_err());
        assert!(Cli::try_parse_from(["resmut", "check-config", "-m", "annealing"]).is_err());
        assert!(Cli::try_parse_from(["resmut", "-q", "-v", "dihedrals", "SER"]).is_err());
    }
}
