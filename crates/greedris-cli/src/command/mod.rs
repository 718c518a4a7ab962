use std::path::PathBuf;

use clap::{Parser, Subcommand};
use greedris_evaluator::{
    placement_evaluator::{CostWeights, HeuristicEvaluator},
    placement_search::PlacementSearch,
};

use crate::{logging, util};

use self::{autoplay::AutoplayArg, suggest::SuggestArg};

mod autoplay;
mod suggest;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play headless games with the greedy search and print a summary
    Autoplay(#[clap(flatten)] AutoplayArg),
    /// Print the best placement of a piece on a board read from a file or stdin
    Suggest(#[clap(flatten)] SuggestArg),
}

/// Options shared by every command that runs the search.
#[derive(Default, Debug, Clone, clap::Args)]
struct SearchArg {
    /// JSON file overriding the cost weights, e.g. `{"height": 1, "bumpiness": 2, "holes": 20}`
    #[arg(long)]
    weights: Option<PathBuf>,
}

impl SearchArg {
    fn load_weights(&self) -> anyhow::Result<CostWeights> {
        let Some(path) = &self.weights else {
            return Ok(CostWeights::DEFAULT);
        };
        let weights = util::read_json_file("weights", path)?;
        tracing::info!(?weights, path = %path.display(), "loaded cost weights");
        Ok(weights)
    }
}

fn placement_search(weights: CostWeights) -> PlacementSearch<'static> {
    PlacementSearch::new(Box::new(HeuristicEvaluator::new(weights)))
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    logging::init(args.verbose);
    match args.mode {
        Mode::Autoplay(arg) => autoplay::run(&arg)?,
        Mode::Suggest(arg) => suggest::run(&arg)?,
    }
    Ok(())
}
