//! Question order shuffling

use rand::{seq::SliceRandom, Rng};

/// Shuffled copy of `items`; the input is left untouched
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rand::thread_rng())
}

/// Shuffled copy of `items` drawn from the given generator
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_shuffle_keeps_elements() {
        let questions: Vec<u32> = (1..=50).collect();
        let mut shuffled = shuffle(&questions);
        assert_eq!(shuffled.len(), questions.len());
        shuffled.sort_unstable();
        assert_eq!(shuffled, questions);
    }

    #[test]
    fn test_shuffle_is_deterministic_for_seed() {
        let questions: Vec<u32> = (1..=20).collect();
        let a = shuffle_with(&questions, &mut StdRng::seed_from_u64(7));
        let b = shuffle_with(&questions, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_ne!(a, questions);
    }

    #[test]
    fn test_shuffle_empty_and_single() {
        assert!(shuffle::<u8>(&[]).is_empty());
        assert_eq!(shuffle(&["only"]), vec!["only"]);
    }
}
