use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bim_query::export::{export_csv, export_json};
use bim_query::model::{placement::translation_of, EntityId, Model, PsetFilter};
use bim_query::query::{self, Query};
use bim_query::snapshot::load_model;

#[derive(Parser, Debug)]
#[command(name = "bim-query")]
#[command(about = "Query elements, containers, placements and properties of a BIM model snapshot")]
#[command(version)]
struct Args {
    /// Path to a model snapshot (JSON)
    #[arg(required = true)]
    file: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select elements, e.g. "IfcDoor, IfcWindow, material=Holz"
    Select {
        expression: String,

        /// Fall back to the type object for missing attributes and properties
        #[arg(long)]
        inherit: bool,

        /// Export to CSV (optional output path)
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Export to JSON (optional output path)
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Show the spatial container chain of an element
    Container { id: u64 },
    /// List the direct children of a container
    Decomposition { id: u64 },
    /// Print the world placement matrix of an element
    Placement { id: u64 },
    /// Print property and quantity sets
    Psets {
        id: u64,

        /// Include sets inherited from the type object
        #[arg(long)]
        inherit: bool,

        #[arg(long, conflicts_with = "quantities_only")]
        properties_only: bool,

        #[arg(long)]
        quantities_only: bool,
    },
    /// Print classification references
    Classification { id: u64 },
    /// List entity classes used in the model
    Types,
    /// Resolve an attribute path such as "type.Name"
    Value {
        id: u64,
        path: String,

        #[arg(long)]
        inherit: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.verbose);

    let model = load_model(&args.file)?;
    tracing::info!(
        schema = model.schema(),
        entities = model.len(),
        "loaded {}",
        args.file.display()
    );

    run(&model, args.command)
}

fn run(model: &Model, command: Command) -> Result<()> {
    match command {
        Command::Select {
            expression,
            inherit,
            csv,
            json,
        } => {
            let selector = Query::parse(&expression)?.with_type_fallback(inherit);
            let found = query::select(model, &selector)?.into_entities()?;

            if let Some(csv_path) = &csv {
                export_csv(model, &found, csv_path)?;
                println!("Exported to CSV: {}", csv_path.display());
            }
            if let Some(json_path) = &json {
                export_json(model, &found, json_path)?;
                println!("Exported to JSON: {}", json_path.display());
            }
            if csv.is_some() || json.is_some() {
                return Ok(());
            }

            for entity in &found {
                println!("{entity}");
            }
            println!("{} matching element(s)", found.len());
        }
        Command::Container { id } => {
            let id = EntityId(id);
            let chain = query::container_chain(model, id)?;
            match query::get_container(model, id)? {
                Some(container) => println!("{} is located on {}", id, container.label()),
                None => println!("{id} has no spatial container"),
            }
            for parent in chain {
                println!("  {parent}");
            }
        }
        Command::Decomposition { id } => {
            let children = query::get_decomposition(model, EntityId(id))?;
            println!("There are {} element(s) in #{id}:", children.len());
            for child in children {
                println!("  {child}");
            }
        }
        Command::Placement { id } => {
            let matrix = query::resolve_world_placement(model, EntityId(id))?;
            for row in matrix.row_iter() {
                let cells: Vec<String> = row.iter().map(|v| format!("{v:>10.4}")).collect();
                println!("[{}]", cells.join(", "));
            }
            let xyz = translation_of(&matrix);
            println!("XYZ: ({}, {}, {})", xyz.x, xyz.y, xyz.z);
        }
        Command::Psets {
            id,
            inherit,
            properties_only,
            quantities_only,
        } => {
            let filter = if properties_only {
                PsetFilter::PropertiesOnly
            } else if quantities_only {
                PsetFilter::QuantitiesOnly
            } else {
                PsetFilter::All
            };
            let psets = query::get_property_sets_filtered(model, EntityId(id), inherit, filter)?;
            for (pset, properties) in &psets {
                println!("{pset}");
                for (name, value) in properties {
                    println!("  {name}: {value}");
                }
            }
        }
        Command::Classification { id } => {
            for reference in query::get_references(model, EntityId(id))? {
                println!(
                    "The element has a classification reference of {}",
                    reference.identification
                );
                if let Some(system) = query::get_classification(model, &reference) {
                    println!("This reference is part of the system {}", system.name);
                }
            }
        }
        Command::Types => {
            for class in query::entity_types(model) {
                println!("{class}");
            }
        }
        Command::Value { id, path, inherit } => {
            match query::get_element_value(model, EntityId(id), &path, inherit)? {
                Some(value) => println!("{path}: {value}"),
                None => println!("{path}: -"),
            }
        }
    }
    Ok(())
}
