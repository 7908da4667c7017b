//! AGGREGATE stage: party seats → political-group totals.
//!
//! Left join on party → group. Unmapped parties land in the explicit
//! `Unknown` group. The source label `Other parties` is renamed to the
//! catch-all `Others` after the join. Duplicate `(party, constituency)` rows
//! keep the first occurrence.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use seat_core::ids::{ConstituencyId, GroupLabel, PartyId};

use crate::allocate::SeatRow;
use crate::diagnostics::{Diagnostic, Diagnostics};

/// Seat row annotated with its political group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupedRow {
    pub party: PartyId,
    pub constituency: ConstituencyId,
    pub group: GroupLabel,
    pub seats: u32,
}

/// Group → seats.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregatedSeats {
    by_group: BTreeMap<GroupLabel, u64>,
}

impl AggregatedSeats {
    pub fn get(&self, g: &GroupLabel) -> u64 {
        self.by_group.get(g).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupLabel, u64)> {
        self.by_group.iter().map(|(g, s)| (g, *s))
    }

    pub fn len(&self) -> usize {
        self.by_group.len()
    }

    pub fn total_seats(&self) -> u64 {
        self.by_group.values().sum()
    }

    /// No seats anywhere (nothing to chart).
    pub fn is_empty(&self) -> bool {
        self.total_seats() == 0
    }
}

#[derive(Clone, Debug, Default)]
pub struct Aggregation {
    pub rows: Vec<GroupedRow>,
    pub groups: AggregatedSeats,
    pub by_constituency: BTreeMap<ConstituencyId, u64>,
    pub diagnostics: Diagnostics,
}

/// Group label for `party`, after the catch-all rename.
pub fn group_of(party: &PartyId, mapping: &BTreeMap<PartyId, GroupLabel>) -> Option<GroupLabel> {
    mapping.get(party).map(|g| {
        if g.is_minor_parties() {
            GroupLabel::catch_all()
        } else {
            g.clone()
        }
    })
}

pub fn aggregate(rows: &[SeatRow], mapping: &BTreeMap<PartyId, GroupLabel>) -> Aggregation {
    let mut seen = BTreeSet::new();
    let mut unmapped = BTreeSet::new();
    let mut out = Aggregation::default();

    for row in rows {
        if !seen.insert((&row.party, &row.constituency)) {
            continue;
        }
        let group = match group_of(&row.party, mapping) {
            Some(g) => g,
            None => {
                if unmapped.insert(&row.party) {
                    out.diagnostics
                        .push(Diagnostic::UnmappedParty { party: row.party.clone() });
                }
                GroupLabel::unknown()
            }
        };
        *out.groups.by_group.entry(group.clone()).or_insert(0) += u64::from(row.seats);
        out.rows.push(GroupedRow {
            party: row.party.clone(),
            constituency: row.constituency.clone(),
            group,
            seats: row.seats,
        });
    }
    out.by_constituency = seats_by_constituency(&out.rows);
    out
}

/// Seats per constituency (the "total seats by constituency" table).
pub fn seats_by_constituency(rows: &[GroupedRow]) -> BTreeMap<ConstituencyId, u64> {
    let mut out = BTreeMap::new();
    for r in rows {
        *out.entry(r.constituency.clone()).or_insert(0) += u64::from(r.seats);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(party: &str, constituency: &str, seats: u32) -> SeatRow {
        SeatRow {
            party: PartyId::new(party).unwrap(),
            constituency: ConstituencyId::new(constituency).unwrap(),
            seats,
        }
    }

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<PartyId, GroupLabel> {
        pairs
            .iter()
            .map(|(p, g)| (PartyId::new(*p).unwrap(), GroupLabel::new(*g).unwrap()))
            .collect()
    }

    fn g(s: &str) -> GroupLabel {
        GroupLabel::new(s).unwrap()
    }

    #[test]
    fn sums_per_group_and_conserves_seats() {
        let rows = [row("CDU", "Germany", 23), row("SPD", "Germany", 14), row("ÖVP", "Austria", 5)];
        let m = mapping(&[("CDU", "EPP"), ("ÖVP", "EPP"), ("SPD", "S&D")]);
        let agg = aggregate(&rows, &m);
        assert_eq!(agg.groups.get(&g("EPP")), 28);
        assert_eq!(agg.groups.get(&g("S&D")), 14);
        assert_eq!(agg.groups.total_seats(), 42);
        assert_eq!(agg.by_constituency[&ConstituencyId::new("Germany").unwrap()], 37);
        assert!(agg.diagnostics.is_empty());
    }

    #[test]
    fn other_parties_become_others() {
        let rows = [row("Misc", "Malta", 1)];
        let m = mapping(&[("Misc", "Other parties")]);
        let agg = aggregate(&rows, &m);
        assert_eq!(agg.groups.get(&GroupLabel::catch_all()), 1);
        assert_eq!(agg.groups.get(&g("Other parties")), 0);
        assert_eq!(agg.rows[0].group, GroupLabel::catch_all());
    }

    #[test]
    fn unmapped_party_goes_to_unknown_once() {
        let rows = [row("Indep", "Malta", 1), row("Indep", "Cyprus", 1)];
        let agg = aggregate(&rows, &BTreeMap::new());
        assert_eq!(agg.groups.get(&GroupLabel::unknown()), 2);
        assert_eq!(agg.diagnostics.len(), 1);
    }

    #[test]
    fn duplicate_rows_keep_the_first() {
        let rows = [row("PL", "Malta", 3), row("PL", "Malta", 5)];
        let m = mapping(&[("PL", "S&D")]);
        let agg = aggregate(&rows, &m);
        assert_eq!(agg.groups.get(&g("S&D")), 3);
        assert_eq!(agg.rows.len(), 1);
    }

    #[test]
    fn zero_seats_is_empty() {
        let rows = [row("PL", "Malta", 0)];
        let agg = aggregate(&rows, &mapping(&[("PL", "S&D")]));
        assert!(agg.groups.is_empty());
        assert_eq!(agg.groups.len(), 1);
    }

    #[test]
    fn by_constituency_table_ignores_duplicate_rows() {
        let rows = [
            row("A", "X", 2),
            row("B", "X", 1),
            row("A", "Y", 4),
            row("A", "X", 9),
        ];
        let agg = aggregate(&rows, &mapping(&[("A", "EPP"), ("B", "S&D")]));
        let pairs: Vec<(&str, u64)> =
            agg.by_constituency.iter().map(|(c, s)| (c.as_str(), *s)).collect();
        assert_eq!(pairs, [("X", 3), ("Y", 4)]);
        assert_eq!(seats_by_constituency(&agg.rows), agg.by_constituency);
    }
}
