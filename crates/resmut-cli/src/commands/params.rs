use crate::cli::ParamsArgs;
use crate::error::Result;
use resmut::core::forcefield::params::{Forcefield, ParamSource, VdwResolution};
use resmut::core::models::atom::Element;

pub fn run(args: ParamsArgs) -> Result<()> {
    let loaded;
    let forcefield = match &args.params {
        Some(path) => {
            loaded = Forcefield::load(path)?;
            &loaded
        }
        None => Forcefield::builtin(),
    };

    let element = args.element.unwrap_or_default();
    println!("dielectric constant: {}", forcefield.dielectric_constant());
    for force_field_type in &args.types {
        let resolved = forcefield.resolve_vdw(force_field_type, element);
        println!("{}", describe(force_field_type, element, &resolved));
    }
    Ok(())
}

fn describe(force_field_type: &str, element: Element, resolved: &VdwResolution) -> String {
    let source = match resolved.source {
        ParamSource::Type => "type".to_string(),
        ParamSource::Element => format!("element {element}"),
        ParamSource::Default => "default".to_string(),
    };
    format!(
        "{:<6} radius {:>7.4} A  well depth {:>8.5} kcal/mol  ({source})",
        force_field_type, resolved.param.radius, resolved.param.well_depth
    )
}
