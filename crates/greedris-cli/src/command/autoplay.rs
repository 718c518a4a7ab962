use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use greedris_engine::{GameSession, PieceSeed, ShapeBag};
use greedris_evaluator::{
    autoplay::{self, AutoplayLimits, AutoplayReport},
    placement_evaluator::CostWeights,
};
use rand::Rng as _;
use serde::Serialize;

use crate::util::Output;

use super::SearchArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoplayArg {
    /// Number of pieces to play
    #[arg(long, default_value_t = 1000)]
    pieces: usize,
    /// Stop once this many games have ended
    #[arg(long)]
    rounds: Option<usize>,
    /// Seed of the piece sequence (32 hex characters); random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    #[clap(flatten)]
    search: SearchArg,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct AutoplaySummary {
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    seed: PieceSeed,
    weights: CostWeights,
    #[serde(flatten)]
    report: AutoplayReport,
}

pub(crate) fn run(arg: &AutoplayArg) -> anyhow::Result<()> {
    let AutoplayArg {
        pieces,
        rounds,
        seed,
        search,
        output,
    } = arg;

    let weights = search.load_weights()?;
    let search = super::placement_search(weights);
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut session = GameSession::with_bag(ShapeBag::with_seed(seed));
    let limits = AutoplayLimits {
        max_pieces: *pieces,
        max_rounds: *rounds,
    };

    tracing::info!(%seed, pieces, ?rounds, "starting autoplay");
    let started_at = Utc::now();
    let report =
        autoplay::play_session(&search, &mut session, limits).context("Autoplay stopped")?;
    let finished_at = Utc::now();
    tracing::info!(
        pieces = report.pieces,
        lines = report.total_cleared_lines,
        rounds = report.records.rounds,
        best_score = report.records.score,
        elapsed_ms = (finished_at - started_at).num_milliseconds(),
        "autoplay finished"
    );

    let summary = AutoplaySummary {
        started_at,
        finished_at,
        seed,
        weights,
        report,
    };
    Output::save_json(&summary, output.clone())?;
    Ok(())
}
