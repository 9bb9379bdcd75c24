use crate::cli::ClassifyArgs;
use crate::error::{CliError, Result};
use resmut::core::topology::bonding::{BondClassifier, BondDistanceTable};

pub fn run(args: ClassifyArgs) -> Result<()> {
    if !(args.distance >= 0.0) {
        return Err(CliError::Argument(format!(
            "distance must be non-negative, got {}",
            args.distance
        )));
    }
    let loaded;
    let table = match &args.bonds {
        Some(path) => {
            loaded = BondDistanceTable::load(path)?;
            &loaded
        }
        None => BondDistanceTable::builtin(),
    };
    println!("{}", verdict(table, &args));
    Ok(())
}

fn verdict(table: &BondDistanceTable, args: &ClassifyArgs) -> String {
    let pair = format!("{}-{} at {:.3} A", args.first, args.second, args.distance);
    match table.classify(args.first, args.second, args.distance * args.distance) {
        Some(order) => format!("{pair}: {order} bond (clash when non-bonded)"),
        None => match table.thresholds(args.first, args.second) {
            Some(t) => format!("{pair}: not bonded (cutoff {:.3} A)", t.bonded_cutoff()),
            None => format!("{pair}: not bonded (pair absent from table)"),
        },
    }
}
