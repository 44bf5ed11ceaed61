use crate::error::{FoldError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative move of the chain on the square lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Left,
    Right,
    Straight,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Left, Move::Right, Move::Straight];

    /// Wire character of this move
    pub fn to_char(self) -> char {
        match self {
            Move::Left => 'l',
            Move::Right => 'r',
            Move::Straight => 's',
        }
    }

    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'l' => Ok(Move::Left),
            'r' => Ok(Move::Right),
            's' => Ok(Move::Straight),
            other => Err(FoldError::Decode(other)),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl TryFrom<char> for Move {
    type Error = FoldError;

    fn try_from(c: char) -> Result<Self> {
        Move::from_char(c)
    }
}

impl From<Move> for char {
    fn from(m: Move) -> char {
        m.to_char()
    }
}

/// One candidate fold: `sequence length - 1` relative moves.
///
/// Individuals are never edited in place by the engine. Genetic operators
/// clone their parents and hand back new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Individual {
    moves: Vec<Move>,
}

impl Individual {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn random<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Self {
        Self {
            moves: (0..length).map(|_| Move::random(rng)).collect(),
        }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub(crate) fn moves_mut(&mut self) -> &mut [Move] {
        &mut self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Number of positions at which two individuals differ
    pub fn hamming_distance(&self, other: &Individual) -> usize {
        let differing = self
            .moves
            .iter()
            .zip(other.moves.iter())
            .filter(|(a, b)| a != b)
            .count();
        differing + self.moves.len().abs_diff(other.moves.len())
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.moves {
            write!(f, "{}", m.to_char())?;
        }
        Ok(())
    }
}

/// The unordered set of individuals held by one rank
pub type Genepool = Vec<Individual>;

/// An individual together with its evaluated fold metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    individual: Individual,
    valid_neighbor_count: usize, // Higher is better
    overlap_count: usize,        // Penalty
    fitness: f64,
}

impl Structure {
    pub fn new(
        individual: Individual,
        valid_neighbor_count: usize,
        overlap_count: usize,
        fitness: f64,
    ) -> Self {
        Self {
            individual,
            valid_neighbor_count,
            overlap_count,
            fitness,
        }
    }

    pub fn individual(&self) -> &Individual {
        &self.individual
    }

    pub fn valid_neighbor_count(&self) -> usize {
        self.valid_neighbor_count
    }

    pub fn overlap_count(&self) -> usize {
        self.overlap_count
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// Per-generation record appended to a population's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistic {
    pub generation: u64,
    pub best_fitness: f64,
    pub average_fitness: f64,
    pub best_valid_neighbors: usize,
    pub best_overlaps: usize,
    pub hamming_distance: Option<f64>,
}
