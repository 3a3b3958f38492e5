//! Classifies a few relations and the inclusion order of a topology.
//!
//! Run with:
//! ```bash
//! cargo run --example relations
//! ```

use clap::Parser;

use finite_topology::element::Atom;
use finite_topology::endo::EndoRelation;
use finite_topology::family::Family;
use finite_topology::format::{Format, Render};
use finite_topology::property::Property;
use finite_topology::set::FiniteSet;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Atom format: `n` (numeric), `s` (named) or anything else (generic).
    #[arg(long, value_name = "SPEC", default_value = "s")]
    format: String,

    /// Only report this property (e.g. `well-founded`).
    #[arg(long, value_name = "NAME")]
    property: Option<Property>,
}

fn report(name: &str, relation: &EndoRelation<impl Ord + Clone + Render>, args: &Cli) {
    let format = Format::from_specifier(&args.format);
    println!("{} = {}", name, relation.display(format));
    match args.property {
        Some(property) => {
            let holds = finite_topology::property::Classify::check(relation, property);
            println!("  {}: {:?}", property, holds);
        }
        None => {
            let properties = finite_topology::classify_relation(relation);
            let names: Vec<_> = properties.iter().map(|p| p.name()).collect();
            println!("  {}", names.join(", "));
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let chain = EndoRelation::from_pairs([
        (Atom::One, Atom::Two),
        (Atom::Two, Atom::Three),
        (Atom::Three, Atom::Four),
        (Atom::Four, Atom::Five),
        (Atom::Five, Atom::Five),
    ]);
    report("chain", &chain, &args);
    report("chain⁻¹", &chain.converse(), &args);
    report("chain complement", &chain.complement(), &args);

    let atoms: std::collections::BTreeSet<Atom> = [Atom::One, Atom::Two, Atom::Three].into_iter().collect();
    report("identity", &EndoRelation::identity(&atoms), &args);
    report("square", &EndoRelation::cartesian_square(&atoms), &args);

    let u: FiniteSet<Atom> = atoms.iter().copied().collect();
    let one = FiniteSet::singleton(Atom::One);
    let one_two: FiniteSet<Atom> = [Atom::One, Atom::Two].into_iter().collect();
    let topology: Family<Atom> = [FiniteSet::empty(), one, one_two, u].into_iter().collect();
    println!(
        "topology = {} ({:?})",
        topology.display(Format::from_specifier(&args.format)), topology.classify(&u)?
    );
    report("inclusion", &topology.subset_relation(&u)?, &args);

    Ok(())
}
