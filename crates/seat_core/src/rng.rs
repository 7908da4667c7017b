//! Seeded tie draws.
//!
//! The stream is consulted only under `TiePolicy::Random { seed }` and only
//! when an exact tie occurs. One `TieRng` serves a whole run, so the draw for a
//! given tie depends on every tie resolved before it.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

/// Audit entry for one draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieCrumb {
    /// Where the tie happened, e.g. `"seat-20"` or `"leftover-3"`.
    pub ctx: String,
    /// Winning position among the tied contenders (0-based).
    pub pick: usize,
    /// 1-based position of the accepted word in the stream.
    pub word_index: u64,
}

/// ChaCha20 keyed by `seed.to_le_bytes()` padded with zeros to 32 bytes.
#[derive(Debug, Clone)]
pub struct TieRng {
    stream: ChaCha20Rng,
    drawn: u64,
}

impl TieRng {
    pub fn seeded(seed: u64) -> Self {
        let mut key = [0u8; 32];
        key[..8].copy_from_slice(&seed.to_le_bytes());
        Self {
            stream: ChaCha20Rng::from_seed(key),
            drawn: 0,
        }
    }

    /// Words taken from the stream so far, rejected ones included.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    /// Uniform pick among `contenders` tied entries. `None` when there is
    /// nothing to pick from.
    pub fn draw(&mut self, ctx: &str, contenders: usize) -> Option<(usize, TieCrumb)> {
        let n = u64::try_from(contenders).ok().filter(|&n| n > 0)?;
        // Words below 2^64 mod n would bias the low residues.
        let floor = n.wrapping_neg() % n;
        let word = loop {
            let w = self.stream.next_u64();
            self.drawn = self.drawn.saturating_add(1);
            if w >= floor {
                break w;
            }
        };
        let pick = (word % n) as usize;
        Some((
            pick,
            TieCrumb {
                ctx: ctx.to_owned(),
                pick,
                word_index: self.drawn,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tie_draws_nothing() {
        let mut rng = TieRng::seeded(11);
        assert!(rng.draw("seat-1", 0).is_none());
        assert_eq!(rng.drawn(), 0);
    }

    #[test]
    fn a_seed_replays_the_same_picks() {
        let picks = |seed| {
            let mut rng = TieRng::seeded(seed);
            (0..24)
                .map(|i| rng.draw(&format!("seat-{i}"), 5).unwrap().0)
                .collect::<Vec<_>>()
        };
        let a = picks(2024);
        assert_eq!(a, picks(2024));
        assert!(a.iter().all(|&p| p < 5));
    }

    #[test]
    fn crumbs_track_stream_position() {
        let mut rng = TieRng::seeded(0x5EA7);
        let (p, first) = rng.draw("Malta/seat-3", 3).unwrap();
        let (_, second) = rng.draw("Malta/seat-6", 2).unwrap();
        assert_eq!(first.pick, p);
        assert_eq!(first.ctx, "Malta/seat-3");
        assert_eq!(first.word_index, 1);
        assert!(second.word_index > first.word_index);
        assert_eq!(rng.drawn(), second.word_index);
    }
}
