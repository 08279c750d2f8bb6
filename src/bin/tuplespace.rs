use std::{error::Error, time::Duration};

use clap::{Parser, Subcommand};
use log::info;
use tuplespace::{
    ClientConfig, Match, PointToPoint, RemoteSpace, Tuple,
    cli::{parse_template, parse_tuple},
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Node address, as host:port
    #[arg(short, long)]
    node: String,
    /// Give up dialing the node after this many milliseconds
    #[arg(long)]
    connect_timeout: Option<u64>,
    #[command(subcommand)]
    op: Op,
}

#[derive(Debug, Subcommand)]
enum Op {
    /// Insert a tuple and wait for the acknowledgement
    Put { fields: Vec<String> },
    /// Insert a tuple without waiting
    PutAsync { fields: Vec<String> },
    /// Remove a matching tuple, blocking until one exists
    Get { fields: Vec<String> },
    /// Read a matching tuple, blocking until one exists
    Query { fields: Vec<String> },
    /// Remove a matching tuple if there is one
    GetP { fields: Vec<String> },
    /// Read a matching tuple if there is one
    QueryP { fields: Vec<String> },
    /// Remove every tuple
    GetAll,
    /// Read every tuple
    QueryAll,
}

fn print_tuples(tuples: &[Tuple]) {
    for tuple in tuples {
        println!("{tuple}");
    }
}

fn print_match(found: &Match) {
    println!("{}", found.tuple);
    for (slot, (position, value)) in found.bindings.iter().enumerate() {
        println!("  ?{slot} (field {position}) = {value}");
    }
}

fn print_attempt(found: Option<Match>) {
    match found {
        Some(found) => print_match(&found),
        None => {
            eprintln!("no matching tuple");
            std::process::exit(1);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize env_logger; For logging to STDOUT/STDERR
    env_logger::init();

    let cli = Cli::parse();
    let mut config = ClientConfig::new();
    if let Some(ms) = cli.connect_timeout {
        config = config.with_connect_timeout(Duration::from_millis(ms));
    }
    let space = RemoteSpace::with_config(PointToPoint::from_address(cli.node), config);
    info!("using node {}", space.node().name());

    match cli.op {
        Op::Put { fields } => println!("{}", space.insert(parse_tuple(&fields)?)?),
        Op::PutAsync { fields } => space.insert_async(parse_tuple(&fields)?)?,
        Op::Get { fields } => print_match(&space.get(parse_template(&fields)?)?),
        Op::Query { fields } => print_match(&space.query(parse_template(&fields)?)?),
        Op::GetP { fields } => print_attempt(space.try_get(parse_template(&fields)?)?),
        Op::QueryP { fields } => print_attempt(space.try_query(parse_template(&fields)?)?),
        Op::GetAll => print_tuples(&space.get_all()?),
        Op::QueryAll => print_tuples(&space.query_all()?),
    }

    Ok(())
}
