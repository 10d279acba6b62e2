//! Random test sequences. The generator is always passed in, so runs are
//! reproducible from a seed.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

const ALPHABET: [char; 4] = ['A', 'C', 'G', 'U'];

/// A sequence of `length` nucleotides drawn uniformly from {A,C,G,U}.
pub fn random_sequence<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
