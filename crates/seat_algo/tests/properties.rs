//! Property tests for the apportionment methods.

use proptest::prelude::*;

use seat_algo::allocation::{
    allocate_dhondt, allocate_largest_remainder, allocate_modified_sainte_lague,
    allocate_sainte_lague,
};
use seat_algo::threshold::SHARE_TOLERANCE;
use seat_algo::{filter_by_threshold, PartyVotes};
use seat_core::ids::PartyId;
use seat_core::values::Fraction;
use seat_core::variables::QuotaKind;

fn party_votes() -> impl Strategy<Value = PartyVotes> {
    prop::collection::vec((1u32..2_000_000, 0u32..100), 1..10).prop_map(|cells| {
        cells
            .into_iter()
            .enumerate()
            .map(|(i, (whole, cents))| {
                let id = PartyId::new(format!("P{i:02}")).unwrap();
                (id, f64::from(whole) + f64::from(cents) / 100.0)
            })
            .collect()
    })
}

fn quota() -> impl Strategy<Value = QuotaKind> {
    prop_oneof![
        Just(QuotaKind::Hare),
        Just(QuotaKind::Droop),
        Just(QuotaKind::Imperiali)
    ]
}

proptest! {
    #[test]
    fn every_method_conserves_seats(v in party_votes(), seats in 1u32..120, q in quota()) {
        let want = u64::from(seats);
        prop_assert_eq!(allocate_dhondt(seats, &v, None).unwrap().total(), want);
        prop_assert_eq!(allocate_sainte_lague(seats, &v, None).unwrap().total(), want);
        prop_assert_eq!(allocate_modified_sainte_lague(seats, &v, None).unwrap().total(), want);
        prop_assert_eq!(allocate_largest_remainder(seats, &v, q, None).unwrap().total(), want);
    }

    #[test]
    fn every_party_gets_a_row(v in party_votes(), seats in 1u32..60, q in quota()) {
        let out = allocate_largest_remainder(seats, &v, q, None).unwrap();
        prop_assert!(out.seats.keys().eq(v.keys()));
        let out = allocate_dhondt(seats, &v, None).unwrap();
        prop_assert!(out.seats.keys().eq(v.keys()));
    }

    #[test]
    fn divisor_methods_are_house_monotone(v in party_votes(), seats in 1u32..80) {
        let a = allocate_dhondt(seats, &v, None).unwrap();
        let b = allocate_dhondt(seats + 1, &v, None).unwrap();
        for (p, s) in &a.seats {
            prop_assert!(b.seats[p] >= *s);
        }
        let a = allocate_sainte_lague(seats, &v, None).unwrap();
        let b = allocate_sainte_lague(seats + 1, &v, None).unwrap();
        for (p, s) in &a.seats {
            prop_assert!(b.seats[p] >= *s);
        }
    }

    #[test]
    fn more_votes_never_cost_a_seat(
        v in party_votes(),
        seats in 1u32..80,
        pick in any::<prop::sample::Index>(),
        bump in 1u32..100_000,
    ) {
        let party = pick.get(&v.keys().cloned().collect::<Vec<_>>()).clone();
        let mut more = v.clone();
        if let Some(x) = more.get_mut(&party) {
            *x += f64::from(bump);
        }

        let before = allocate_dhondt(seats, &v, None).unwrap();
        let after = allocate_dhondt(seats, &more, None).unwrap();
        prop_assert!(after.seats[&party] >= before.seats[&party]);

        let before = allocate_sainte_lague(seats, &v, None).unwrap();
        let after = allocate_sainte_lague(seats, &more, None).unwrap();
        prop_assert!(after.seats[&party] >= before.seats[&party]);
    }

    #[test]
    fn threshold_drops_exactly_the_small_parties(v in party_votes(), pct in 0u32..30) {
        let t = Fraction::from_percent(f64::from(pct)).unwrap();
        let total: f64 = v.values().sum();
        let kept = filter_by_threshold(&v, t).unwrap();
        for (p, votes) in &v {
            prop_assert_eq!(kept.contains_key(p), votes / total >= t.get() - SHARE_TOLERANCE);
        }
    }
}
