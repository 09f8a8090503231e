//! Command orchestration.
//!
//! Each unit of work (one session, one domain, one tournament directory) is
//! isolated: its failure is logged, recorded in the [`RunReport`] and never
//! aborts its siblings. Only problems with the command's own inputs or
//! outputs are returned as errors.
//!
//! Within a tournament, traces are read and analysed in parallel, while
//! domain references are loaded sequentially into a shared cache between the
//! two phases. Output is written in ordinal order afterwards, so the tables
//! are identical with or without the `parallel` feature.

use std::path::{Path, PathBuf};

use aggregate::{CampaignAggregate, MatchupTable, SessionRecord};
use analytics::{SeatMap, compute_session_metrics, resolve_seats};
use anyhow::Context;
use storage::layout::NESTED_TRACE_FILE;
use storage::{
    ReferenceCache, SessionFile, append_tournament_rows, discover_domains, discover_sessions,
    discover_tournaments, find_matchups, load_domain_reference, load_matchups, load_trace,
    reset_tournament_tables, write_campaign_tables, write_domains_summary,
    write_session_artifacts,
};
use tracing::{debug, info, warn};
use types::{DomainId, NegotiationTrace, SessionAnalysis};

use crate::config::AnalysisConfig;
use crate::report::RunReport;

/// Directory that receives a session's own tables.
///
/// Nested traces write beside themselves; a flat `session_<n>.json` gets a
/// sibling `session_<n>/` directory.
pub fn session_output_dir(trace_path: &Path) -> PathBuf {
    let nested = trace_path
        .file_name()
        .is_some_and(|name| name == NESTED_TRACE_FILE);
    match trace_path.parent() {
        Some(parent) if nested => parent.to_path_buf(),
        _ => trace_path.with_extension(""),
    }
}

fn record_missing_domains(report: &mut RunReport, cache: &ReferenceCache) {
    for (domain, reason) in cache.failures() {
        report.missing_domain(domain.clone(), reason);
    }
}

// ============================================================================
// evaluate
// ============================================================================

/// Analyse one trace and write its session tables.
pub fn evaluate_session(
    config: &AnalysisConfig,
    trace_path: &Path,
    out_dir: Option<&Path>,
) -> anyhow::Result<(SessionAnalysis, RunReport)> {
    let trace = load_trace(trace_path)
        .with_context(|| format!("failed to load trace {}", trace_path.display()))?;
    let seats = resolve_seats(&trace)
        .with_context(|| format!("cannot analyse {}", trace_path.display()))?;

    let mut cache = ReferenceCache::new(&config.domains_dir);
    let reference = cache.ensure(seats.domain());
    let analysis = compute_session_metrics(&trace, reference, &seats, config.tolerances());

    let out_dir = out_dir.map_or_else(|| session_output_dir(trace_path), Path::to_path_buf);
    write_session_artifacts(&out_dir, &analysis, config.write_move_logs)
        .with_context(|| format!("failed to write session tables to {}", out_dir.display()))?;
    info!(
        domain = %analysis.metrics.domain,
        agreement = analysis.metrics.agreement_reached,
        out = %out_dir.display(),
        "session evaluated"
    );

    let mut report = RunReport::new();
    report.sessions_analysed = 1;
    record_missing_domains(&mut report, &cache);
    Ok((analysis, report))
}

// ============================================================================
// tournament
// ============================================================================

/// Outcome of evaluating one tournament directory.
#[derive(Debug, Clone)]
pub struct TournamentRun {
    /// Partial aggregate over this tournament's sessions.
    pub aggregate: CampaignAggregate,
    /// Matchups declared by the tournament, if it has a configuration file.
    pub matchups: Option<MatchupTable>,
    pub report: RunReport,
}

/// A session whose trace parsed and whose seats resolved.
struct Pending<'a> {
    session: &'a SessionFile,
    trace: NegotiationTrace,
    seats: SeatMap,
}

/// Best-effort domain of a trace whose seats could not be resolved.
fn declared_domain(trace: &NegotiationTrace) -> Option<DomainId> {
    trace
        .party_profiles
        .first()
        .and_then(|(_, profile)| DomainId::from_profile_path(&profile.profile))
}

/// The tournament's own `tournament_steps.json`; an unreadable file is
/// warned about and treated as absent.
fn tournament_matchups(dir: &Path) -> Option<MatchupTable> {
    match find_matchups(dir) {
        Ok(matchups) => matchups,
        Err(err) => {
            warn!(dir = %dir.display(), error = %err, "ignoring unreadable matchup configuration");
            None
        }
    }
}

/// Evaluate every session in `dir`, rewriting its tournament tables.
///
/// Sessions are aggregated in the role order of `declared`, or of the
/// tournament's own configuration when none is given. Session and tournament
/// tables keep the trace's own order.
///
/// The caller's cache is reused so a campaign loads each domain once.
pub fn run_tournament(
    config: &AnalysisConfig,
    cache: &mut ReferenceCache,
    dir: &Path,
    declared: Option<&MatchupTable>,
) -> anyhow::Result<TournamentRun> {
    let sessions = discover_sessions(dir)
        .with_context(|| format!("cannot list sessions in {}", dir.display()))?;
    reset_tournament_tables(dir)
        .with_context(|| format!("cannot reset tournament tables in {}", dir.display()))?;
    info!(dir = %dir.display(), sessions = sessions.len(), "evaluating tournament");

    let matchups = tournament_matchups(dir);
    let roles = declared.or(matchups.as_ref());

    let mut report = RunReport::new();
    let mut aggregate = CampaignAggregate::new();

    // Phase 1: read traces in parallel.
    let loaded = parallel::map_slice(
        &sessions,
        |session| load_trace(&session.path),
        config.force_sequential,
    );

    // Phase 2: resolve seats and load references, sequentially.
    let mut pending = Vec::with_capacity(sessions.len());
    for (session, trace) in sessions.iter().zip(loaded) {
        let trace = match trace {
            Ok(trace) => trace,
            Err(err) => {
                report.exclude(&session.path, Some(session.ordinal), &err);
                aggregate.record_exclusion(session.ordinal, None);
                continue;
            }
        };
        let seats = match resolve_seats(&trace) {
            Ok(seats) => seats,
            Err(err) => {
                report.exclude(&session.path, Some(session.ordinal), &err);
                aggregate.record_exclusion(session.ordinal, declared_domain(&trace).as_ref());
                continue;
            }
        };
        cache.ensure(seats.domain());
        pending.push(Pending {
            session,
            trace,
            seats,
        });
    }

    // Phase 3: analyse in parallel against the now read-only cache.
    let cache: &ReferenceCache = cache;
    let tolerances = config.tolerances();
    let analyses = parallel::map_slice(
        &pending,
        |item| {
            let reference = cache.get(item.seats.domain());
            compute_session_metrics(&item.trace, reference, &item.seats, tolerances)
        },
        config.force_sequential,
    );

    // Phase 4: write in ordinal order.
    for (item, analysis) in pending.iter().zip(analyses) {
        let ordinal = item.session.ordinal;
        let session_dir = session_output_dir(&item.session.path);
        write_session_artifacts(&session_dir, &analysis, config.write_move_logs).with_context(
            || format!("failed to write session tables to {}", session_dir.display()),
        )?;
        append_tournament_rows(dir, ordinal, &analysis.metrics)
            .with_context(|| format!("failed to append tournament tables in {}", dir.display()))?;

        debug!(%ordinal, domain = %analysis.metrics.domain, "session analysed");
        let metrics = match roles {
            Some(roles) => roles.orient(ordinal, analysis.metrics),
            None => analysis.metrics,
        };
        aggregate.record(&SessionRecord::new(ordinal, metrics));
        report.sessions_analysed += 1;
    }

    Ok(TournamentRun {
        aggregate,
        matchups,
        report,
    })
}

/// `tournament` command: one directory, plus its aggregate tables.
pub fn evaluate_tournament(
    config: &AnalysisConfig,
    dir: &Path,
    matchups_file: Option<&Path>,
) -> anyhow::Result<TournamentRun> {
    let declared = matchups_file
        .map(|path| {
            load_matchups(path)
                .with_context(|| format!("failed to load matchups from {}", path.display()))
        })
        .transpose()?;

    let mut cache = ReferenceCache::new(&config.domains_dir);
    let mut run = run_tournament(config, &mut cache, dir, declared.as_ref())?;
    if declared.is_some() {
        run.matchups = declared;
    }

    let out_dir = config.output_dir.as_deref().unwrap_or(dir);
    let matchups = run.matchups.clone().unwrap_or_default();
    write_campaign_tables(out_dir, &run.aggregate, &matchups)
        .with_context(|| format!("failed to write aggregate tables to {}", out_dir.display()))?;

    record_missing_domains(&mut run.report, &cache);
    Ok(run)
}

// ============================================================================
// campaign
// ============================================================================

/// Outcome of evaluating every tournament under the results directory.
#[derive(Debug, Clone)]
pub struct CampaignRun {
    pub aggregate: CampaignAggregate,
    pub tournaments: usize,
    pub report: RunReport,
}

/// Evaluate every tournament, then merge their partial aggregates.
pub fn run_campaign(config: &AnalysisConfig) -> anyhow::Result<CampaignRun> {
    let results_dir = &config.results_dir;
    let tournaments = discover_tournaments(results_dir, &config.tournament_marker)
        .with_context(|| format!("cannot scan results directory {}", results_dir.display()))?;
    if tournaments.is_empty() {
        warn!(
            dir = %results_dir.display(),
            marker = %config.tournament_marker,
            "no tournament directories found"
        );
    }

    let mut report = RunReport::new();
    let mut cache = ReferenceCache::new(&config.domains_dir);
    let mut runs = Vec::with_capacity(tournaments.len());
    for dir in &tournaments {
        match run_tournament(config, &mut cache, dir, None) {
            Ok(run) => runs.push(run),
            Err(err) => report.skip_tournament(dir, format!("{err:#}")),
        }
    }

    let aggregate = parallel::map_reduce_slice(
        &runs,
        |run| run.aggregate.clone(),
        CampaignAggregate::new,
        |mut merged, partial| {
            merged.merge(&partial);
            merged
        },
        config.force_sequential,
    );

    // The first tournament with a configuration decides the roles.
    let matchups = runs
        .iter()
        .find_map(|run| run.matchups.clone())
        .unwrap_or_default();

    let out_dir = config.campaign_output_dir();
    write_campaign_tables(out_dir, &aggregate, &matchups)
        .with_context(|| format!("failed to write campaign tables to {}", out_dir.display()))?;
    info!(
        tournaments = runs.len(),
        ordinals = aggregate.by_ordinal.len(),
        domains = aggregate.by_domain.len(),
        out = %out_dir.display(),
        "campaign aggregated"
    );

    let tournaments = runs.len();
    for run in runs {
        report.absorb(run.report);
    }
    record_missing_domains(&mut report, &cache);
    Ok(CampaignRun {
        aggregate,
        tournaments,
        report,
    })
}

// ============================================================================
// domains
// ============================================================================

/// Load every domain reference and write `domains_summary.csv`.
///
/// Returns the number of domains summarised.
pub fn summarize_domains(config: &AnalysisConfig) -> anyhow::Result<(usize, RunReport)> {
    let domains_dir = &config.domains_dir;
    let discovered = discover_domains(domains_dir)
        .with_context(|| format!("cannot scan domains directory {}", domains_dir.display()))?;

    let mut report = RunReport::new();
    let mut loaded = Vec::with_capacity(discovered.len());
    for (domain, _) in discovered {
        match load_domain_reference(domains_dir, &domain) {
            Ok(reference) => loaded.push((domain, reference)),
            Err(err) => {
                warn!(%domain, error = %err, "skipping domain");
                report.missing_domain(domain, err.to_string());
            }
        }
    }

    let out_dir = config.output_dir.as_deref().unwrap_or(domains_dir);
    let written = write_domains_summary(out_dir, &loaded)
        .with_context(|| format!("failed to write domain summary to {}", out_dir.display()))?;
    info!(domains = written, out = %out_dir.display(), "domain summary written");
    Ok((written, report))
}
