//! Sainte-Laguë (divisors 1, 3, 5, …) and the modified variant whose first
//! divisor is 1.4.

use seat_core::rng::TieRng;

use super::highest_averages::{allocate_highest_averages, Divisors};
use super::AllocError;
use crate::{Allocation, PartyVotes};

/// Standard Sainte-Laguë (Webster).
pub fn allocate_sainte_lague(
    seats: u32,
    votes: &PartyVotes,
    rng: Option<&mut TieRng>,
) -> Result<Allocation, AllocError> {
    allocate_highest_averages(Divisors::SainteLague, seats, votes, rng)
}

/// Modified Sainte-Laguë (first divisor 1.4), as used in Sweden.
pub fn allocate_modified_sainte_lague(
    seats: u32,
    votes: &PartyVotes,
    rng: Option<&mut TieRng>,
) -> Result<Allocation, AllocError> {
    allocate_highest_averages(Divisors::ModifiedSainteLague, seats, votes, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seat_core::ids::PartyId;

    fn votes(pairs: &[(&str, f64)]) -> PartyVotes {
        pairs
            .iter()
            .map(|(p, v)| (PartyId::new(*p).unwrap(), *v))
            .collect()
    }

    fn seats_of(a: &Allocation) -> Vec<(&str, u32)> {
        a.seats.iter().map(|(p, s)| (p.as_str(), *s)).collect()
    }

    #[test]
    fn standard_divisors() {
        // Quotients: A 53, 17.67, 10.6, 7.57; B 24, 8; C 23, 7.67.
        let v = votes(&[("A", 53.0), ("B", 24.0), ("C", 23.0)]);
        let out = allocate_sainte_lague(7, &v, None).unwrap();
        assert_eq!(seats_of(&out), [("A", 3), ("B", 2), ("C", 2)]);
    }

    #[test]
    fn modified_first_divisor_holds_back_small_parties() {
        // Standard: A 100, 33.3, 20, 14.29; B 15 takes the fourth seat.
        let v = votes(&[("A", 100.0), ("B", 15.0)]);
        let std4 = allocate_sainte_lague(4, &v, None).unwrap();
        assert_eq!(seats_of(&std4), [("A", 3), ("B", 1)]);

        // Modified: B's first quotient is 15 / 1.4 = 10.7 < 14.29, so A takes it.
        let mod4 = allocate_modified_sainte_lague(4, &v, None).unwrap();
        assert_eq!(seats_of(&mod4), [("A", 4), ("B", 0)]);
    }

    #[test]
    fn conservation_on_uneven_votes() {
        let v = votes(&[("A", 1234.5), ("B", 987.25), ("C", 13.0), ("D", 0.5)]);
        for seats in 1..=25 {
            assert_eq!(allocate_sainte_lague(seats, &v, None).unwrap().total(), u64::from(seats));
            assert_eq!(
                allocate_modified_sainte_lague(seats, &v, None).unwrap().total(),
                u64::from(seats)
            );
        }
    }
}
