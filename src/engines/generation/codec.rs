//! Wire form of individuals and genepools.
//!
//! A move is one character out of `l`, `r`, `s`. Individuals share one fixed
//! length, so a genepool travels as the plain concatenation of its members and
//! is split back by that width.

use crate::error::{FoldError, Result};
use crate::types::{Individual, Move};

pub fn encode_move(m: Move) -> char {
    m.to_char()
}

pub fn decode_move(c: char) -> Result<Move> {
    Move::from_char(c)
}

pub fn encode_individual(individual: &Individual) -> String {
    individual.moves().iter().map(|m| encode_move(*m)).collect()
}

/// Decode a whole individual; any foreign character fails the message
pub fn decode_individual(payload: &str) -> Result<Individual> {
    payload
        .chars()
        .map(decode_move)
        .collect::<Result<Vec<_>>>()
        .map(Individual::new)
}

pub fn encode_genepool(individuals: &[Individual]) -> String {
    let width = individuals.first().map(Individual::len).unwrap_or(0);
    let mut out = String::with_capacity(width * individuals.len());
    for individual in individuals {
        out.extend(individual.moves().iter().map(|m| encode_move(*m)));
    }
    out
}

/// Split a payload into individuals of `width` moves each
pub fn decode_genepool(payload: &str, width: usize) -> Result<Vec<Individual>> {
    if width == 0 {
        return Err(FoldError::Protocol("Genome width must be positive".to_string()));
    }
    // Characters outside the alphabet may be multi-byte; fail on them before
    // byte-based framing can misalign.
    if let Some(bad) = payload.chars().find(|c| !c.is_ascii()) {
        return Err(FoldError::Decode(bad));
    }
    if payload.len() % width != 0 {
        return Err(FoldError::ProtocolLength {
            length: payload.len(),
            width,
        });
    }

    payload
        .as_bytes()
        .chunks(width)
        .map(|chunk| {
            chunk
                .iter()
                .map(|b| decode_move(*b as char))
                .collect::<Result<Vec<_>>>()
                .map(Individual::new)
        })
        .collect()
}

/// Decode a message that must carry exactly one individual of `width` moves
pub fn decode_single(payload: &str, width: usize) -> Result<Individual> {
    let mut individuals = decode_genepool(payload, width)?;
    if individuals.len() != 1 {
        return Err(FoldError::ProtocolLength {
            length: payload.len(),
            width,
        });
    }
    Ok(individuals.remove(0))
}
