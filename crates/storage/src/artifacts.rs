//! Output artifacts at session, tournament, campaign and domain level.

use std::path::Path;

use aggregate::{CampaignAggregate, MatchupTable};
use tracing::debug;
use types::{DomainId, DomainReference, Ordinal, Seat, SessionAnalysis, SessionMetrics};

use crate::error::Result;
use crate::rows::{
    DansRow, DomainDansRow, DomainEvaluationRow, DomainSummaryRow, EvaluationRow, MoveRow,
    OrdinalDansRow, OrdinalEvaluationRow, Tagged,
};
use crate::writer::{append_rows, remove_table, write_table};

pub const EVALUATION_FILE: &str = "evaluation.csv";
pub const DANS_FILE: &str = "dans.csv";
pub const TOURNAMENT_EVALUATION_FILE: &str = "tournament_evaluation.csv";
pub const TOURNAMENT_DANS_FILE: &str = "tournament_dans.csv";
pub const AGGREGATE_EVALUATION_FILE: &str = "aggregate_evaluation.csv";
pub const AGGREGATE_DANS_FILE: &str = "dans_evaluation.csv";
pub const DOMAIN_EVALUATION_FILE: &str = "domain_evaluation.csv";
pub const DOMAIN_DANS_FILE: &str = "domain_dans.csv";
pub const DOMAINS_SUMMARY_FILE: &str = "domains_summary.csv";

/// Move-log file name for one seat, e.g. `moves_A_7_A.csv`.
///
/// The seat comes first so two parties sharing a display name never write to
/// the same file.
pub fn moves_file(seat: Seat, agent: &str) -> String {
    format!("moves_{seat}_{agent}.csv")
}

/// Write `evaluation.csv`, `dans.csv` and, optionally, one move log per seat.
pub fn write_session_artifacts(
    dir: &Path,
    analysis: &SessionAnalysis,
    write_move_logs: bool,
) -> Result<()> {
    let metrics = &analysis.metrics;
    write_table(&dir.join(EVALUATION_FILE), [EvaluationRow(metrics)])?;
    write_table(&dir.join(DANS_FILE), DansRow::for_session(metrics))?;

    if write_move_logs {
        for (seat, seat_metrics) in metrics.seats.iter() {
            let path = dir.join(moves_file(seat, &seat_metrics.name));
            write_table(&path, analysis.moves_for(seat).map(MoveRow))?;
        }
    }
    debug!(dir = %dir.display(), "wrote session artifacts");
    Ok(())
}

/// Delete a tournament's appended tables before it is re-evaluated.
pub fn reset_tournament_tables(dir: &Path) -> Result<()> {
    remove_table(&dir.join(TOURNAMENT_EVALUATION_FILE))?;
    remove_table(&dir.join(TOURNAMENT_DANS_FILE))
}

/// Append one session's rows to the tournament tables.
pub fn append_tournament_rows(dir: &Path, ordinal: Ordinal, metrics: &SessionMetrics) -> Result<()> {
    append_rows(
        &dir.join(TOURNAMENT_EVALUATION_FILE),
        [Tagged {
            session_id: ordinal,
            row: EvaluationRow(metrics),
        }],
    )?;
    append_rows(
        &dir.join(TOURNAMENT_DANS_FILE),
        DansRow::for_session(metrics).map(|row| Tagged {
            session_id: ordinal,
            row,
        }),
    )?;
    Ok(())
}

/// Write the four campaign tables: per ordinal and per domain, outcome and
/// behaviour.
pub fn write_campaign_tables(
    dir: &Path,
    aggregate: &CampaignAggregate,
    matchups: &MatchupTable,
) -> Result<()> {
    let by_ordinal = aggregate.by_ordinal.summaries_with(matchups);
    write_table(
        &dir.join(AGGREGATE_EVALUATION_FILE),
        by_ordinal.iter().map(OrdinalEvaluationRow),
    )?;
    write_table(
        &dir.join(AGGREGATE_DANS_FILE),
        by_ordinal.iter().flat_map(OrdinalDansRow::for_group),
    )?;

    let by_domain = aggregate.by_domain.summaries();
    write_table(
        &dir.join(DOMAIN_EVALUATION_FILE),
        by_domain.iter().map(DomainEvaluationRow),
    )?;
    write_table(
        &dir.join(DOMAIN_DANS_FILE),
        by_domain.iter().flat_map(DomainDansRow::for_group),
    )?;

    debug!(
        dir = %dir.display(),
        ordinals = by_ordinal.len(),
        domains = by_domain.len(),
        "wrote campaign tables"
    );
    Ok(())
}

/// Write `domains_summary.csv` for the given (ordered) domains.
pub fn write_domains_summary(
    dir: &Path,
    domains: &[(DomainId, DomainReference)],
) -> Result<usize> {
    write_table(
        &dir.join(DOMAINS_SUMMARY_FILE),
        domains
            .iter()
            .enumerate()
            .map(|(domain_id, (domain, reference))| DomainSummaryRow {
                domain_id,
                domain,
                reference,
            }),
    )
}
