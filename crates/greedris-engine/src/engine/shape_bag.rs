use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ShapeKind;

/// Shape source using the 7-bag randomization algorithm.
///
/// # 7-Bag System
///
/// 1. A "bag" holds each of the 7 shapes exactly once
/// 2. The bag is shuffled
/// 3. Shapes are drawn from the bag in order
/// 4. A freshly shuffled bag is appended when 7 or fewer shapes remain
///
/// Bags are always appended whole, so every 7 draws starting at a bag boundary
/// form a permutation of all shapes, and no shape waits more than 12 draws.
///
/// The bag is owned by whoever draws from it; there is no process-wide state.
///
/// # Example
///
/// ```
/// use greedris_engine::{PieceSeed, ShapeBag};
///
/// let seed: PieceSeed = "0123456789abcdeffedcba9876543210".parse().unwrap();
/// let mut bag = ShapeBag::with_seed(seed);
///
/// let first = bag.pop_next();
/// let upcoming: Vec<_> = bag.next_shapes().take(5).collect();
/// assert_eq!(upcoming.len(), 5);
/// # let _ = first;
/// ```
#[derive(Debug, Clone)]
pub struct ShapeBag {
    rng: Pcg32,
    bag: VecDeque<ShapeKind>,
}

impl Default for ShapeBag {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic shape generation.
///
/// A 128-bit seed, written as 32 hex characters. The same seed always produces
/// the same shape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct PieceSeedParseError {
    input: String,
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for PieceSeed {
    type Err = PieceSeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || PieceSeedParseError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl ShapeBag {
    /// Creates a bag seeded from the thread-local RNG.
    ///
    /// For deterministic sequences, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let rng = Pcg32::from_seed(seed.0);
        let bag = VecDeque::with_capacity(ShapeKind::LEN * 2);
        let mut this = Self { rng, bag };
        this.fill_bag();
        this
    }

    fn fill_bag(&mut self) {
        while self.bag.len() <= ShapeKind::LEN {
            let mut new_bag = ShapeKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draws the next shape.
    pub fn pop_next(&mut self) -> ShapeKind {
        self.fill_bag();
        self.bag
            .pop_front()
            .expect("shape bag is refilled before every draw")
    }

    /// Upcoming shapes in draw order. Always yields at least 8 shapes.
    pub fn next_shapes(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        self.bag.iter().copied()
    }
}
