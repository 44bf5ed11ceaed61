use crate::types::{Genepool, Individual, Move};
use rand::Rng;

/// Single-point crossover: swap tails after a random cut
pub fn crossover<R: Rng + ?Sized>(
    parent1: &Individual,
    parent2: &Individual,
    rng: &mut R,
) -> (Individual, Individual) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..len);

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    child1.moves_mut()[point..len].copy_from_slice(&parent2.moves()[point..len]);
    child2.moves_mut()[point..len].copy_from_slice(&parent1.moves()[point..len]);

    (child1, child2)
}

/// Mutation: each move is redrawn with probability `mutation_rate`
pub fn mutate<R: Rng + ?Sized>(individual: &mut Individual, mutation_rate: f64, rng: &mut R) {
    for gene in individual.moves_mut().iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = Move::random(rng);
        }
    }
}

pub fn random_genepool<R: Rng + ?Sized>(size: usize, length: usize, rng: &mut R) -> Genepool {
    (0..size).map(|_| Individual::random(length, rng)).collect()
}

/// Build the next generation from selected parents.
///
/// Consecutive parents are paired and crossed with probability
/// `crossover_rate`, otherwise copied; every child is then mutated. The
/// output always has as many members as `parents`.
pub fn reproduce<R: Rng + ?Sized>(
    parents: &[Individual],
    crossover_rate: f64,
    mutation_rate: f64,
    rng: &mut R,
) -> Genepool {
    let mut next_generation = Vec::with_capacity(parents.len());

    for pair in parents.chunks(2) {
        match pair {
            [a, b] if rng.gen::<f64>() < crossover_rate => {
                let (child1, child2) = crossover(a, b, rng);
                next_generation.push(child1);
                next_generation.push(child2);
            }
            _ => next_generation.extend(pair.iter().cloned()),
        }
    }

    for child in next_generation.iter_mut() {
        mutate(child, mutation_rate, rng);
    }
    next_generation
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_crossover_preserves_length_and_genes() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Individual::new(vec![Move::Left; 8]);
        let b = Individual::new(vec![Move::Right; 8]);
        let (c1, c2) = crossover(&a, &b, &mut rng);
        assert_eq!(c1.len(), 8);
        assert_eq!(c2.len(), 8);
        assert_eq!(c1.moves()[0], Move::Left);
        assert_eq!(c2.moves()[0], Move::Right);
        assert_eq!(c1.moves()[7], Move::Right);
        assert_eq!(c2.moves()[7], Move::Left);
    }

    #[test]
    fn test_zero_rates_copy_parents() {
        let mut rng = StdRng::seed_from_u64(1);
        let parents = random_genepool(11, 9, &mut rng);
        let children = reproduce(&parents, 0.0, 0.0, &mut rng);
        assert_eq!(children, parents);
    }

    #[test]
    fn test_reproduce_keeps_size_for_odd_pools() {
        let mut rng = StdRng::seed_from_u64(3);
        let parents = random_genepool(13, 9, &mut rng);
        let children = reproduce(&parents, 1.0, 0.5, &mut rng);
        assert_eq!(children.len(), 13);
        assert!(children.iter().all(|c| c.len() == 9));
    }
}
