use std::collections::BTreeMap;

use seat_core::ids::{ConstituencyId, GroupLabel, PartyId};
use seat_core::inputs::InputSnapshot;
use seat_core::values::{Fraction, VoterCount};
use seat_core::variables::{ConstituencyPolicy, Method, PolicyTable};
use seat_io::presets::{group_styles_preset, FALLBACK_COLOR};
use seat_pipeline::{run, RunOptions};
use seat_report::{build_model, render_json, render_text, ReportError};

fn c(s: &str) -> ConstituencyId {
    ConstituencyId::new(s).unwrap()
}
fn p(s: &str) -> PartyId {
    PartyId::new(s).unwrap()
}

fn snapshot(voters: f64) -> InputSnapshot {
    let mut s = InputSnapshot::default();
    for (party, share) in [("PN", 0.42), ("PL", 0.45), ("ADPD", 0.03), ("Indep", 0.10)] {
        s.shares
            .insert((p(party), c("Malta")), Some(Fraction::new(share).unwrap()));
    }
    s.turnout.insert(c("Malta"), Some(Fraction::new(0.727).unwrap()));
    s.voters.insert(c("Malta"), Some(VoterCount::new(voters).unwrap()));
    s
}

fn table() -> PolicyTable {
    PolicyTable::from_rules([ConstituencyPolicy {
        constituency: c("Malta"),
        method: Method::SainteLague,
        seats: 6,
        threshold: Fraction::ZERO,
    }])
    .unwrap()
}

fn mapping() -> BTreeMap<PartyId, GroupLabel> {
    [("PN", "EPP"), ("PL", "S&D"), ("ADPD", "G/EFA")]
        .into_iter()
        .map(|(a, g)| (p(a), GroupLabel::new(g).unwrap()))
        .collect()
}

#[test]
fn groups_sorted_by_category_with_unstyled_last() {
    let result = run(&snapshot(370_000.0), &table(), &mapping(), &RunOptions::default()).unwrap();
    let styles = group_styles_preset("eu2024").unwrap();
    let model = build_model(&result, &styles).unwrap();

    assert_eq!(model.total_seats, 6);
    let order: Vec<&str> = model.groups.iter().map(|g| g.group.as_str()).collect();
    // Categories: EPP 8, G/EFA 5, S&D 3, unstyled 0. ADPD qualifies with zero seats.
    assert_eq!(order, ["EPP", "G/EFA", "S&D", "Unknown"]);

    let unknown = model.groups.last().unwrap();
    assert_eq!(unknown.category, 0);
    assert_eq!(unknown.color, FALLBACK_COLOR);

    let filler = model.chart.last().unwrap();
    assert!(filler.filler);
    assert_eq!(filler.seats, 6);
    let visible: u64 = model.chart.iter().filter(|s| !s.filler).map(|s| s.seats).sum();
    assert_eq!(visible, 6);

    assert!(model
        .diagnostics
        .iter()
        .any(|d| d.contains("Indep") && d.contains("Unknown")));
}

#[test]
fn renderers_carry_the_result_id() {
    let result = run(&snapshot(370_000.0), &table(), &mapping(), &RunOptions::default()).unwrap();
    let model = build_model(&result, &group_styles_preset("eu2024").unwrap()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&render_json(&model).unwrap()).unwrap();
    assert_eq!(json["result_id"], serde_json::Value::String(result.id.clone()));
    assert_eq!(json["chart"].as_array().map(Vec::len), Some(model.chart.len()));

    let text = render_text(&model);
    assert!(text.contains(&result.id));
    assert!(text.contains("Seats by political group"));
    assert!(text.contains("Total seats by constituency"));
    assert!(text.contains("sainte_lague"));
}

#[test]
fn text_report_lists_projected_votes_and_gaps() {
    let mut snap = snapshot(370_000.0);
    snap.shares.insert((p("Volt"), c("Malta")), None);
    let result = run(&snap, &table(), &mapping(), &RunOptions::default()).unwrap();
    let model = build_model(&result, &group_styles_preset("eu2024").unwrap()).unwrap();
    let text = render_text(&model);

    let votes = text
        .split("Total votes by party and constituency")
        .nth(1)
        .and_then(|rest| rest.split("Seats by political group").next())
        .unwrap();
    let pn = votes.lines().find(|l| l.contains("PN")).unwrap();
    assert!(pn.trim_end().ends_with("112976"), "{pn}");
    let volt = votes.lines().find(|l| l.contains("Volt")).unwrap();
    assert!(volt.trim_end().ends_with('-'), "{volt}");
}

#[test]
fn zero_total_seats_is_an_error() {
    let result = run(&snapshot(0.0), &table(), &mapping(), &RunOptions::default()).unwrap();
    assert_eq!(result.total_seats(), 0);
    let err = build_model(&result, &group_styles_preset("eu2024").unwrap()).unwrap_err();
    assert!(matches!(err, ReportError::ZeroTotalSeats));
}
