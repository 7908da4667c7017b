//! crates/seat_report/src/structure.rs
//! Report model + mapper from a run result. No I/O, no recomputation of
//! seats; only presentation ordering and formatting happen here.

use serde::Serialize;

use seat_core::ids::GroupLabel;
use seat_io::presets::{GroupStyles, FALLBACK_COLOR};
use seat_pipeline::{ConstituencyOutcome, RunResult};

use crate::ReportError;

// -------------------- model --------------------

#[derive(Clone, Debug, Serialize)]
pub struct ReportModel {
    pub title: String,
    pub result_id: String,
    pub tie_policy: String,
    pub total_seats: u64,
    pub votes: Vec<VoteLine>,
    pub seats: Vec<SeatLine>,
    pub constituencies: Vec<ConstituencyLine>,
    pub groups: Vec<GroupLine>,
    pub chart: Vec<ChartSlice>,
    pub diagnostics: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct VoteLine {
    pub constituency: String,
    pub party: String,
    /// Rounded for display; `None` is a data gap.
    pub votes: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SeatLine {
    pub constituency: String,
    pub party: String,
    pub group: String,
    pub seats: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConstituencyLine {
    pub constituency: String,
    pub method: String,
    pub seats: u64,
    pub last_seat_tie: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupLine {
    pub group: String,
    pub seats: u64,
    /// Share of all allocated seats, one decimal ("25.3%").
    pub share: String,
    pub category: u8,
    pub color: String,
}

/// One arc of the half-circle chart. The closing filler slice is as large as
/// every visible slice together, so the visible arc spans half the circle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub seats: u64,
    pub color: String,
    pub filler: bool,
}

// -------------------- builder --------------------

pub fn build_model(result: &RunResult, styles: &GroupStyles) -> Result<ReportModel, ReportError> {
    let body = &result.body;
    if result.groups().is_empty() {
        return Err(ReportError::ZeroTotalSeats);
    }
    let total = body.total_seats;

    let votes = body
        .votes
        .iter()
        .map(|v| VoteLine {
            constituency: v.constituency.to_string(),
            party: v.party.to_string(),
            votes: v.votes.map(|x| x.round() as u64),
        })
        .collect();

    let seats = body
        .seats
        .iter()
        .map(|r| SeatLine {
            constituency: r.constituency.to_string(),
            party: r.party.to_string(),
            group: r.group.to_string(),
            seats: r.seats,
        })
        .collect();

    let constituencies = body
        .constituencies
        .iter()
        .map(|o| ConstituencyLine {
            constituency: o.constituency.to_string(),
            method: method_label(o),
            seats: body
                .seats_by_constituency
                .get(&o.constituency)
                .copied()
                .unwrap_or(0),
            last_seat_tie: o.last_seat_tie,
        })
        .collect();

    let groups = group_lines(result, styles, total);
    let chart = chart_slices(&groups, total);

    Ok(ReportModel {
        title: "Seat allocation".to_string(),
        result_id: result.id.clone(),
        tie_policy: tie_policy_label(result),
        total_seats: total,
        votes,
        seats,
        constituencies,
        groups,
        chart,
        diagnostics: body.diagnostics.iter().map(ToString::to_string).collect(),
    })
}

/// Groups sorted by display category (descending), then label.
fn group_lines(result: &RunResult, styles: &GroupStyles, total: u64) -> Vec<GroupLine> {
    let mut lines: Vec<(GroupLabel, GroupLine)> = result
        .groups()
        .iter()
        .map(|(g, seats)| {
            let style = styles.style(g);
            (
                g.clone(),
                GroupLine {
                    group: g.to_string(),
                    seats,
                    share: percent_1dp(seats, total),
                    category: style.category,
                    color: style.color,
                },
            )
        })
        .collect();
    lines.sort_by(|(ga, a), (gb, b)| b.category.cmp(&a.category).then_with(|| ga.cmp(gb)));
    lines.into_iter().map(|(_, l)| l).collect()
}

fn chart_slices(groups: &[GroupLine], total: u64) -> Vec<ChartSlice> {
    let mut out: Vec<ChartSlice> = groups
        .iter()
        .filter(|g| g.seats > 0)
        .map(|g| ChartSlice {
            label: g.group.clone(),
            seats: g.seats,
            color: g.color.clone(),
            filler: false,
        })
        .collect();
    out.push(ChartSlice {
        label: String::new(),
        seats: total,
        color: FALLBACK_COLOR.to_string(),
        filler: true,
    });
    out
}

fn method_label(o: &ConstituencyOutcome) -> String {
    match o.quota {
        Some(q) => format!("{} ({q})", o.method),
        None => o.method.to_string(),
    }
}

fn tie_policy_label(result: &RunResult) -> String {
    use seat_core::variables::TiePolicy;
    match result.body.tie_policy {
        TiePolicy::Lexicographic => "lexicographic".to_string(),
        TiePolicy::Random { seed } => format!("random (seed {seed})"),
    }
}

/// `part / whole` as a one-decimal percent, rounded half up in integer tenths.
fn percent_1dp(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    let tenths = (part * 1000 + whole / 2) / whole;
    format!("{}.{}%", tenths / 10, tenths % 10)
}
