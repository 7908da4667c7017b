//! Plain-text renderer: fixed-width tables, one section per table.

use std::fmt::Write as _;

use crate::structure::ReportModel;

/// Cell shown for an undefined projection.
const GAP: &str = "-";

pub fn render_text(model: &ReportModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", model.title);
    let _ = writeln!(out, "result: {}", model.result_id);
    let _ = writeln!(out, "ties:   {}", model.tie_policy);
    let _ = writeln!(out, "seats:  {}", model.total_seats);

    section(&mut out, "Total votes by party and constituency");
    table(
        &mut out,
        &["Constituency", "Party", "Votes"],
        model.votes.iter().map(|v| {
            vec![
                v.constituency.clone(),
                v.party.clone(),
                v.votes.map_or_else(|| GAP.to_string(), |n| n.to_string()),
            ]
        }),
    );

    section(&mut out, "Seats by political group");
    table(
        &mut out,
        &["Group", "Seats", "Share", "Category", "Color"],
        model.groups.iter().map(|g| {
            vec![
                g.group.clone(),
                g.seats.to_string(),
                g.share.clone(),
                g.category.to_string(),
                g.color.clone(),
            ]
        }),
    );

    section(&mut out, "Total seats by constituency");
    table(
        &mut out,
        &["Constituency", "Method", "Seats", "Tie"],
        model.constituencies.iter().map(|c| {
            vec![
                c.constituency.clone(),
                c.method.clone(),
                c.seats.to_string(),
                if c.last_seat_tie { "yes".into() } else { String::new() },
            ]
        }),
    );

    section(&mut out, "Seats by party");
    table(
        &mut out,
        &["Constituency", "Party", "Group", "Seats"],
        model.seats.iter().map(|s| {
            vec![
                s.constituency.clone(),
                s.party.clone(),
                s.group.clone(),
                s.seats.to_string(),
            ]
        }),
    );

    if !model.diagnostics.is_empty() {
        section(&mut out, "Diagnostics");
        for d in &model.diagnostics {
            let _ = writeln!(out, "- {d}");
        }
    }
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}\n{}", "=".repeat(title.chars().count()));
}

/// Left-aligned text columns, right-aligned numeric ones.
fn table<I>(out: &mut String, header: &[&str], rows: I)
where
    I: Iterator<Item = Vec<String>>,
{
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for r in &rows {
        for (w, cell) in widths.iter_mut().zip(r) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let numeric: Vec<bool> = (0..header.len())
        .map(|i| {
            !rows.is_empty()
                && rows
                    .iter()
                    .all(|r| r[i] == GAP || r[i].bytes().all(|b| b.is_ascii_digit()))
        })
        .collect();

    let line = |cells: Vec<&str>, out: &mut String| {
        let mut s = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                s.push_str("  ");
            }
            let pad = widths[i].saturating_sub(cell.chars().count());
            if numeric[i] {
                s.push_str(&" ".repeat(pad));
                s.push_str(cell);
            } else {
                s.push_str(cell);
                s.push_str(&" ".repeat(pad));
            }
        }
        let _ = writeln!(out, "{}", s.trim_end());
    };

    line(header.to_vec(), out);
    for r in &rows {
        line(r.iter().map(String::as_str).collect(), out);
    }
}
