use crate::cli::DihedralsArgs;
use crate::error::Result;
use resmut::core::topology::registry::{DihedralGroup, TopologyRegistry};
use std::borrow::Cow;
use tracing::info;

pub fn run(args: DihedralsArgs) -> Result<()> {
    let registry = load_registry(&args)?;
    let groups = registry.dihedral_groups(&args.residue, args.state)?;
    println!("{}", render(&args.residue, groups));
    Ok(())
}

fn load_registry(args: &DihedralsArgs) -> Result<Cow<'static, TopologyRegistry>> {
    let Some(path) = &args.topology else {
        return Ok(Cow::Borrowed(TopologyRegistry::builtin()));
    };
    info!("Extending built-in topology with {:?}.", path);
    let mut registry = TopologyRegistry::builtin().clone();
    registry.extend_from(&TopologyRegistry::load(path)?);
    Ok(Cow::Owned(registry))
}

fn render(residue: &str, groups: &[DihedralGroup]) -> String {
    if groups.is_empty() {
        return format!("{residue}: no rotatable side-chain dihedrals");
    }
    let mut out = format!("{residue}: {} dihedral group(s)", groups.len());
    for (i, group) in groups.iter().enumerate() {
        out.push_str(&format!("\n  chi{}  {}", i + 1, group.join(" - ")));
    }
    out
}
