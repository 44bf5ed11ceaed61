use super::FitnessEvaluator;
use crate::error::{FoldError, Result};
use crate::types::{Individual, Move, Structure};
use std::collections::HashMap;

/// Residue class in the HP model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residue {
    Hydrophobic,
    Polar,
}

/// Standard 2-D HP benchmark sequences
const BENCHMARKS: &[(&str, &str)] = &[
    ("SEQ20", "HPHPPHHPHPPHPHHPPHPH"),
    ("SEQ24", "HHPPHPPHPPHPPHPPHPPHPPHH"),
    ("SEQ25", "PPHPPHHPPPPHHPPPPHHPPPPHH"),
    ("SEQ36", "PPPHHPPHHPPPPPHHHHHHHPPHHPPPPHHPPHPP"),
    ("SEQ48", "PPHPPHHPPHHPPPPPHHHHHHHHHHPPPPPPHHPPHHPPHPPHHHHH"),
    ("SEQ50", "HHPHPHPHPHHHHPHPPPHPPPHPPPPHPPPHPPPHPHHHHPHPHPHPHH"),
];

/// Parse a primary sequence, accepting benchmark names such as `SEQ48`
pub fn resolve_sequence(name_or_sequence: &str) -> Result<Vec<Residue>> {
    let trimmed = name_or_sequence.trim();
    let raw = BENCHMARKS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
        .map(|(_, seq)| *seq)
        .unwrap_or(trimmed);

    let residues = raw
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'H' => Ok(Residue::Hydrophobic),
            'P' => Ok(Residue::Polar),
            other => Err(FoldError::Configuration(format!(
                "Primary sequence contains '{}', expected 'H' or 'P'",
                other
            ))),
        })
        .collect::<Result<Vec<_>>>()?;

    if residues.len() < 2 {
        return Err(FoldError::Configuration(
            "Primary sequence needs at least two residues".to_string(),
        ));
    }
    Ok(residues)
}

type Cell = (i32, i32);

/// Folds individuals on the square lattice and rewards H-H contacts.
///
/// The chain starts at the origin heading east; each move turns the heading
/// before stepping to the next residue. A residue that lands on an occupied
/// cell counts as an overlap and takes no part in contacts.
#[derive(Debug, Clone)]
pub struct HpLatticeEvaluator {
    sequence: Vec<Residue>,
}

impl HpLatticeEvaluator {
    pub fn new(primary_sequence: &str) -> Result<Self> {
        Ok(Self {
            sequence: resolve_sequence(primary_sequence)?,
        })
    }

    pub fn sequence(&self) -> &[Residue] {
        &self.sequence
    }

    /// Moves per individual
    pub fn genome_length(&self) -> usize {
        self.sequence.len() - 1
    }

    /// Lattice coordinates of every residue
    pub fn fold(&self, individual: &Individual) -> Vec<Cell> {
        let mut positions = Vec::with_capacity(individual.len() + 1);
        let mut current = (0, 0);
        let mut heading = (1, 0);
        positions.push(current);

        for m in individual.moves() {
            heading = match m {
                Move::Left => (-heading.1, heading.0),
                Move::Right => (heading.1, -heading.0),
                Move::Straight => heading,
            };
            current = (current.0 + heading.0, current.1 + heading.1);
            positions.push(current);
        }
        positions
    }
}

impl FitnessEvaluator for HpLatticeEvaluator {
    fn evaluate(&self, individual: &Individual) -> Result<Structure> {
        if individual.len() != self.genome_length() {
            return Err(FoldError::Evaluation(format!(
                "Individual has {} moves, sequence needs {}",
                individual.len(),
                self.genome_length()
            )));
        }

        let positions = self.fold(individual);
        let mut occupants: HashMap<Cell, usize> = HashMap::with_capacity(positions.len());
        let mut overlaps = 0;
        for (i, cell) in positions.iter().enumerate() {
            if occupants.contains_key(cell) {
                overlaps += 1;
            } else {
                occupants.insert(*cell, i);
            }
        }

        let mut valid_neighbors = 0;
        for (&(x, y), &i) in &occupants {
            if self.sequence[i] != Residue::Hydrophobic {
                continue;
            }
            for neighbor in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                if let Some(&j) = occupants.get(&neighbor) {
                    // Count each pair once and skip chain bonds
                    if j > i + 1 && self.sequence[j] == Residue::Hydrophobic {
                        valid_neighbors += 1;
                    }
                }
            }
        }

        let fitness = valid_neighbors as f64 / (overlaps as f64 + 1.0);
        Ok(Structure::new(
            individual.clone(),
            valid_neighbors,
            overlaps,
            fitness,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn individual(moves: &str) -> Individual {
        Individual::new(moves.chars().map(|c| Move::from_char(c).unwrap()).collect())
    }

    #[test]
    fn test_benchmark_lengths() {
        for (name, seq) in BENCHMARKS {
            let expected: usize = name[3..].parse().unwrap();
            assert_eq!(seq.len(), expected, "{}", name);
        }
        assert_eq!(resolve_sequence("seq20").unwrap().len(), 20);
    }

    #[test]
    fn test_rejects_foreign_residues() {
        assert!(resolve_sequence("HPXH").is_err());
        assert!(resolve_sequence("H").is_err());
    }

    #[test]
    fn test_u_turn_makes_one_contact() {
        let evaluator = HpLatticeEvaluator::new("HPPH").unwrap();
        let structure = evaluator.evaluate(&individual("sll")).unwrap();
        assert_eq!(structure.valid_neighbor_count(), 1);
        assert_eq!(structure.overlap_count(), 0);
        assert_eq!(structure.fitness(), 1.0);
    }

    #[test]
    fn test_straight_chain_has_no_contacts() {
        let evaluator = HpLatticeEvaluator::new("HHHH").unwrap();
        let structure = evaluator.evaluate(&individual("sss")).unwrap();
        assert_eq!(structure.valid_neighbor_count(), 0);
        assert_eq!(structure.fitness(), 0.0);
    }

    #[test]
    fn test_closed_square_overlaps() {
        let evaluator = HpLatticeEvaluator::new("HPPPH").unwrap();
        let structure = evaluator.evaluate(&individual("llll")).unwrap();
        assert_eq!(structure.overlap_count(), 1);
        assert_eq!(structure.valid_neighbor_count(), 0);
    }

    #[test]
    fn test_wrong_length_is_an_error() {
        let evaluator = HpLatticeEvaluator::new("HPPH").unwrap();
        assert!(matches!(
            evaluator.evaluate(&individual("ss")),
            Err(FoldError::Evaluation(_))
        ));
    }
}
