//! Policies picking one thread among overlapping hit-test candidates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::Candidate;
use crate::config::TieBreakMode;

/// Chooses which candidate a selection lands on.
pub trait TieBreak<T> {
    /// Index into `candidates`, or `None` when there is nothing to choose.
    fn choose(&mut self, candidates: &[Candidate<T>]) -> Option<usize>;
}

/// Uniformly random choice.
///
/// Overlapping drawings cannot be told apart without a rasterized hit map, so
/// repeated clicks on the same spot may land on different threads.
#[derive(Debug)]
pub struct RandomTieBreak {
    rng: StdRng,
}

impl RandomTieBreak {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of choices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomTieBreak {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TieBreak<T> for RandomTieBreak {
    fn choose(&mut self, candidates: &[Candidate<T>]) -> Option<usize> {
        if candidates.is_empty() {
            None
        } else {
            Some(self.rng.gen_range(0..candidates.len()))
        }
    }
}

/// First candidate returned by the index.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCandidate;

impl<T> TieBreak<T> for FirstCandidate {
    fn choose(&mut self, candidates: &[Candidate<T>]) -> Option<usize> {
        (!candidates.is_empty()).then_some(0)
    }
}

/// Most recently indexed candidate, i.e. the topmost drawing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NewestFirst;

impl<T> TieBreak<T> for NewestFirst {
    fn choose(&mut self, candidates: &[Candidate<T>]) -> Option<usize> {
        candidates
            .iter()
            .enumerate()
            .max_by_key(|(_, c)| c.seq)
            .map(|(index, _)| index)
    }
}

/// Policy for a configured mode.
pub fn tie_break_for<T>(mode: TieBreakMode) -> Box<dyn TieBreak<T>> {
    match mode {
        TieBreakMode::Random => Box::new(RandomTieBreak::new()),
        TieBreakMode::First => Box::new(FirstCandidate),
        TieBreakMode::Newest => Box::new(NewestFirst),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bounds, ThreadId};

    fn candidates(seqs: &[u64]) -> Vec<Candidate<()>> {
        seqs.iter()
            .enumerate()
            .map(|(i, seq)| Candidate {
                id: ThreadId(i as u64),
                bounds: Bounds::default(),
                seq: *seq,
                value: (),
            })
            .collect()
    }

    #[test]
    fn test_empty_candidates_choose_nothing() {
        let none = candidates(&[]);
        assert_eq!(RandomTieBreak::seeded(1).choose(&none), None);
        assert_eq!(FirstCandidate.choose(&none), None);
        assert_eq!(NewestFirst.choose(&none), None);
    }

    #[test]
    fn test_random_stays_in_range() {
        let list = candidates(&[4, 9, 2]);
        let mut policy = RandomTieBreak::seeded(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let index = policy.choose(&list).expect("non-empty");
            seen[index] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_newest_first_picks_highest_sequence() {
        let list = candidates(&[4, 9, 2]);
        assert_eq!(NewestFirst.choose(&list), Some(1));
        assert_eq!(FirstCandidate.choose(&list), Some(0));
    }
}
