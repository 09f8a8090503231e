//! Integration tests over a fixture results tree built in a temp directory.

use std::fs;
use std::path::Path;

use aggregate::{CampaignAggregate, MatchupTable, SessionRecord};
use analytics::{Tolerances, analyze_trace};
use storage::artifacts::{
    AGGREGATE_DANS_FILE, AGGREGATE_EVALUATION_FILE, DANS_FILE, DOMAINS_SUMMARY_FILE,
    EVALUATION_FILE, TOURNAMENT_DANS_FILE, TOURNAMENT_EVALUATION_FILE, moves_file,
};
use storage::{
    ReferenceCache, StorageError, append_tournament_rows, discover_domains, discover_sessions,
    discover_tournaments, find_matchups, load_domain_reference, load_trace,
    reset_tournament_tables, write_campaign_tables, write_domains_summary,
    write_session_artifacts,
};
use tempfile::TempDir;
use types::{DomainId, Ordinal, Seat};

const SPECIALS: &str = r#"{
    "size": 12,
    "pareto_front": [{"utility": [1.0, 0.2]}, {"utility": [0.7, 0.5]}, {"utility": [0.2, 1.0]}],
    "nash": {"utility": [0.7, 0.5]},
    "kalai": {"utility": [0.7, 0.5]}
}"#;

fn trace_json(domain: &str, suffix: u32, agree: bool) -> String {
    let a = format!("party_linear_{suffix}_A");
    let b = format!("party_hardliner_{}_B", suffix + 1);
    let accept = if agree {
        format!(
            r#",{{"Accept": {{"actor": "{b}", "bid": {{"issuevalues": {{}}}}, "utilities": {{"{a}": 0.6, "{b}": 0.4}}}}}}"#
        )
    } else {
        String::new()
    };
    format!(
        r#"{{
            "actions": [
                {{"Offer": {{"actor": "{a}", "bid": {{"issuevalues": {{}}}}, "utilities": {{"{a}": 0.5, "{b}": 0.5}}}}}},
                {{"Offer": {{"actor": "{a}", "bid": {{"issuevalues": {{}}}}, "utilities": {{"{a}": 0.6, "{b}": 0.4}}}}}}
                {accept}
            ],
            "partyprofiles": {{
                "{a}": {{"profile": "file:domains/{domain}/profileA.json"}},
                "{b}": {{"profile": "file:domains/{domain}/profileB.json"}}
            }},
            "error": null
        }}"#
    )
}

fn write(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_discovery_orders_sessions_and_filters_tournaments() {
    let tmp = TempDir::new().unwrap();
    let results = tmp.path().join("results");
    let tournament = results.join("Tournament_2024-01-01-000000");

    write(&tournament.join("session_10.json"), &trace_json("domain00", 1, true));
    write(&tournament.join("session_2.json"), &trace_json("domain00", 3, true));
    write(
        &tournament.join("session_3").join("session_results_trace.json"),
        &trace_json("domain01", 5, false),
    );
    fs::create_dir_all(tournament.join("session_4")).unwrap();
    write(&tournament.join("notes.txt"), "ignored");
    fs::create_dir_all(results.join("scratch")).unwrap();

    let tournaments = discover_tournaments(&results, "Tournament").unwrap();
    assert_eq!(tournaments, vec![tournament.clone()]);

    let sessions = discover_sessions(&tournament).unwrap();
    let ordinals: Vec<_> = sessions.iter().map(|s| s.ordinal).collect();
    assert_eq!(ordinals, vec![Ordinal(2), Ordinal(3), Ordinal(10)]);
    assert!(sessions[1].path.ends_with("session_3/session_results_trace.json"));
}

#[test]
fn test_duplicate_ordinal_is_invalid_layout() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("session_1.json"), &trace_json("domain00", 1, true));
    write(
        &tmp.path().join("session_1").join("session_results_trace.json"),
        &trace_json("domain00", 1, true),
    );
    assert!(matches!(
        discover_sessions(tmp.path()),
        Err(StorageError::InvalidLayout(_))
    ));
}

#[test]
fn test_missing_reference_is_reported_once() {
    let tmp = TempDir::new().unwrap();
    let domains = tmp.path().join("domains");
    write(&domains.join("domain00").join("specials.json"), SPECIALS);

    let err = load_domain_reference(&domains, &DomainId::from("domain99")).unwrap_err();
    assert!(matches!(err, StorageError::MissingReference { .. }));

    let mut cache = ReferenceCache::new(&domains);
    assert!(cache.ensure(&DomainId::from("domain00")).is_some());
    assert!(cache.ensure(&DomainId::from("domain99")).is_none());
    assert!(cache.ensure(&DomainId::from("domain99")).is_none());
    assert_eq!(cache.failures().count(), 1);
    assert!(cache.get(&DomainId::from("domain00")).is_some());
}

#[test]
fn test_malformed_reference_is_json_error() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("domain00").join("specials.json"), "{\"size\": ");
    let err = load_domain_reference(tmp.path(), &DomainId::from("domain00")).unwrap_err();
    assert!(matches!(err, StorageError::Json { .. }));
}

#[test]
fn test_session_artifacts() {
    let tmp = TempDir::new().unwrap();
    let trace_path = tmp.path().join("session_1.json");
    write(&trace_path, &trace_json("domain00", 7, true));
    write(&tmp.path().join("domains/domain00/specials.json"), SPECIALS);

    let trace = load_trace(&trace_path).unwrap();
    let reference = load_domain_reference(&tmp.path().join("domains"), &DomainId::from("domain00"))
        .unwrap();
    let analysis = analyze_trace(&trace, Some(&reference), Tolerances::default()).unwrap();

    let out = tmp.path().join("out");
    write_session_artifacts(&out, &analysis, true).unwrap();

    let evaluation = read_lines(&out.join(EVALUATION_FILE));
    assert_eq!(
        evaluation[0],
        "domain,agent_A,agent_B,agreement,agreed_by,utility_a,utility_b,distance_nash,distance_kalai"
    );
    assert!(evaluation[1].starts_with("domain00,7_A,8_B,True,8_B,0.6,0.4,"));

    let dans = read_lines(&out.join(DANS_FILE));
    assert_eq!(dans.len(), 3);
    // fortunate then selfish: ratio 1/1
    assert_eq!(dans[1], format!("domain00,7_A,2,50,50,0,0,0,0,1,{}", analysis.metrics.seats.a.preference_sensitivity));
    assert_eq!(dans[2], "domain00,8_B,0,0,0,0,0,0,0,0,0");

    let moves = read_lines(&out.join(moves_file(Seat::A, "7_A")));
    assert_eq!(moves[0], "delta_a,delta_b,move_class,distance");
    assert_eq!(moves.len(), 3);
    assert!(moves[1].contains(",fortunate,"));
    assert!(out.join(moves_file(Seat::B, "8_B")).exists());
}

#[test]
fn test_tournament_rows_append_with_single_header() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();

    for (ordinal, agree) in [(1, true), (2, false)] {
        write(
            &dir.join(format!("session_{ordinal}.json")),
            &trace_json("domain00", ordinal * 10, agree),
        );
    }

    for _ in 0..2 {
        reset_tournament_tables(dir).unwrap();
        for session in discover_sessions(dir).unwrap() {
            let trace = load_trace(&session.path).unwrap();
            let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
            append_tournament_rows(dir, session.ordinal, &analysis.metrics).unwrap();
        }
    }

    let evaluation = read_lines(&dir.join(TOURNAMENT_EVALUATION_FILE));
    assert_eq!(evaluation.len(), 3);
    assert!(evaluation[0].starts_with("session_id,domain,"));
    assert!(evaluation[1].starts_with("1,domain00,"));
    assert!(evaluation[2].starts_with("2,domain00,"));
    assert!(evaluation[2].contains(",False,,"));

    let dans = read_lines(&dir.join(TOURNAMENT_DANS_FILE));
    assert_eq!(dans.len(), 5);
    assert!(dans[0].starts_with("session_id,domain,agent,num_offers"));
}

#[test]
fn test_campaign_tables_use_declared_roles() {
    let tmp = TempDir::new().unwrap();
    let tournament = tmp.path().join("Tournament_A");
    write(
        &tournament.join("tournament_steps.json"),
        r#"[{"agents": [{"class": "agents.linear.Linear"}, {"class": "agents.hardliner.Hardliner"}],
             "profiles": ["domains/domain00/profileA.json", "domains/domain00/profileB.json"]}]"#,
    );
    let matchups = find_matchups(&tournament).unwrap().unwrap_or_else(MatchupTable::new);
    assert_eq!(matchups.len(), 1);
    assert!(find_matchups(tmp.path()).unwrap().is_none());

    let sessions: Vec<SessionRecord> = [(1, true), (2, false)]
        .into_iter()
        .map(|(suffix, agree)| {
            let trace = serde_json::from_str(&trace_json("domain00", suffix, agree)).unwrap();
            let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
            SessionRecord::new(Ordinal(1), analysis.metrics)
        })
        .collect();
    let aggregate = CampaignAggregate::from_sessions(&sessions);

    write_campaign_tables(tmp.path(), &aggregate, &matchups).unwrap();

    let evaluation = read_lines(&tmp.path().join(AGGREGATE_EVALUATION_FILE));
    assert_eq!(evaluation.len(), 2);
    assert_eq!(evaluation[1], "1,domain00,Linear,Hardliner,1,2,0,0.6,0.4,0,0");

    let dans = read_lines(&tmp.path().join(AGGREGATE_DANS_FILE));
    assert_eq!(dans.len(), 3);
    assert!(dans[1].starts_with("1,domain00,Agent_A,Linear,2,"));
    assert!(dans[2].starts_with("1,domain00,Agent_B,Hardliner,2,"));
}

#[test]
fn test_domains_summary() {
    let tmp = TempDir::new().unwrap();
    let domains_dir = tmp.path().join("domains");
    write(&domains_dir.join("domain01/specials.json"), SPECIALS);
    write(&domains_dir.join("domain00/specials.json"), SPECIALS);

    let domains: Vec<_> = discover_domains(&domains_dir)
        .unwrap()
        .into_iter()
        .map(|(domain, _)| {
            let reference = load_domain_reference(&domains_dir, &domain).unwrap();
            (domain, reference)
        })
        .collect();
    assert_eq!(write_domains_summary(&domains_dir, &domains).unwrap(), 2);

    let lines = read_lines(&domains_dir.join(DOMAINS_SUMMARY_FILE));
    assert_eq!(
        lines[0],
        "domain_id,domain,size,pareto_points,nash_a,nash_b,kalai_a,kalai_b"
    );
    assert_eq!(lines[1], "0,domain00,12,3,0.7,0.5,0.7,0.5");
    assert_eq!(lines[2], "1,domain01,12,3,0.7,0.5,0.7,0.5");
}

#[test]
fn test_move_logs_are_per_seat_when_names_collide() {
    let tmp = TempDir::new().unwrap();
    // Both ids shorten to "3_A".
    let json = r#"{
        "actions": [
            {"Offer": {"actor": "party_linear_3_A", "bid": {"issuevalues": {}},
                       "utilities": {"party_linear_3_A": 0.5, "party_boulware_3_A": 0.5}}},
            {"Offer": {"actor": "party_boulware_3_A", "bid": {"issuevalues": {}},
                       "utilities": {"party_linear_3_A": 0.2, "party_boulware_3_A": 0.9}}},
            {"Offer": {"actor": "party_boulware_3_A", "bid": {"issuevalues": {}},
                       "utilities": {"party_linear_3_A": 0.3, "party_boulware_3_A": 0.8}}}
        ],
        "partyprofiles": {
            "party_linear_3_A": {"profile": "file:domains/domain00/profileA.json"},
            "party_boulware_3_A": {"profile": "file:domains/domain00/profileB.json"}
        }
    }"#;
    let trace = serde_json::from_str(json).unwrap();
    let analysis = analyze_trace(&trace, None, Tolerances::default()).unwrap();
    assert_eq!(analysis.metrics.seats.a.name, analysis.metrics.seats.b.name);

    let out = tmp.path().join("out");
    write_session_artifacts(&out, &analysis, true).unwrap();

    assert_eq!(read_lines(&out.join(moves_file(Seat::A, "3_A"))).len(), 2);
    assert_eq!(read_lines(&out.join(moves_file(Seat::B, "3_A"))).len(), 3);
}
