use std::path::PathBuf;

use anyhow::Context as _;
use greedris_engine::{Board, MovePlan, Piece, ShapeKind};
use greedris_evaluator::placement_search::SearchResult;
use serde::Serialize;

use crate::util::{self, Output};

use super::SearchArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SuggestArg {
    /// Board as ASCII art, bottom-aligned: '.' empty, '#' or a shape letter filled.
    /// Read from stdin when omitted
    board: Option<PathBuf>,
    /// Shape of the falling piece (T, L, J, O, S, Z or I)
    #[arg(long)]
    shape: ShapeKind,
    #[clap(flatten)]
    search: SearchArg,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Suggestion {
    #[serde(flatten)]
    result: SearchResult,
    plan: MovePlan,
}

pub(crate) fn run(arg: &SuggestArg) -> anyhow::Result<()> {
    let SuggestArg {
        board,
        shape,
        search,
        output,
    } = arg;

    let text = util::read_text_input("board", board.as_deref())?;
    let board = Board::from_ascii(&text).context("Failed to parse board")?;
    tracing::debug!("board:\n{board}");

    let search = super::placement_search(search.load_weights()?);
    let piece = Piece::spawn(*shape);
    let result = search
        .try_best_placement(&board, &piece)
        .context("No placement available")?;
    let plan = MovePlan::from_placement(piece.x(), result.placement);

    Output::save_json(&Suggestion { result, plan }, output.clone())?;
    Ok(())
}
