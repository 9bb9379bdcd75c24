use crate::cli::CheckConfigArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use resmut::engine::config::MutationConfig;
use tracing::info;

pub fn run(args: CheckConfigArgs) -> Result<()> {
    let partial = match &args.config {
        Some(path) => PartialConfig::from_file(path)?,
        None => PartialConfig::default(),
    };
    let config = partial.merge_with_cli(&args)?;
    info!("Configuration resolved.");
    println!("{}", summary(&config));
    Ok(())
}

fn summary(config: &MutationConfig) -> String {
    format!(
        "step {}°, range {}° ({} positions per torsion)\nnon-bonded cutoff {} A\ncontext radius {} A\nmethod {}",
        config.scan.step_degrees,
        config.scan.range_degrees,
        config.scan.steps(),
        config.scan.nonbonded_cutoff,
        config.context_radius,
        config.method
    )
}
