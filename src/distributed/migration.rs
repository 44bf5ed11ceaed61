//! Ring migration between islands.
//!
//! Each round a rank ships a random slice of its genepool to the next rank
//! and replaces the same number of random local members with the slice it
//! gets from the previous rank. Root sends before it receives; every other
//! rank receives before it sends. That asymmetry is what keeps the ring from
//! waiting on itself.

use crate::distributed::topology::RingTopology;
use crate::distributed::transport::Transport;
use crate::engines::generation::codec::{decode_genepool, encode_genepool};
use crate::engines::generation::Population;
use crate::error::{FoldError, Result};
use crate::types::Individual;
use rand::seq::SliceRandom;
use rand::Rng;

/// Send `payload` to the next rank and return what the previous rank sent
pub fn exchange_with_neighbors<T: Transport + ?Sized>(
    transport: &T,
    topology: &RingTopology,
    payload: &[u8],
) -> Result<Vec<u8>> {
    if topology.is_root() {
        transport.send(topology.next(), payload)?;
        transport.receive(topology.previous())
    } else {
        let received = transport.receive(topology.previous())?;
        transport.send(topology.next(), payload)?;
        Ok(received)
    }
}

#[derive(Debug, Clone)]
pub struct MigrationProtocol {
    topology: RingTopology,
    migrants: usize,
    width: usize,
}

impl MigrationProtocol {
    /// `migrants` individuals of `width` moves travel per round
    pub fn new(topology: RingTopology, migrants: usize, width: usize) -> Self {
        Self {
            topology,
            migrants,
            width,
        }
    }

    pub fn migrants(&self) -> usize {
        self.migrants
    }

    /// Shuffle the pool and copy out its first `migrants` members
    pub fn select_migrants<R: Rng + ?Sized>(
        &self,
        population: &mut Population,
        rng: &mut R,
    ) -> Vec<Individual> {
        let genepool = population.genepool_mut();
        genepool.shuffle(rng);
        genepool.iter().take(self.migrants).cloned().collect()
    }

    pub fn encode(&self, migrants: &[Individual]) -> String {
        encode_genepool(migrants)
    }

    pub fn decode(&self, payload: Vec<u8>) -> Result<Vec<Individual>> {
        let text = String::from_utf8(payload)
            .map_err(|e| FoldError::Protocol(format!("migration payload is not text: {}", e)))?;
        let individuals = decode_genepool(&text, self.width)?;
        if individuals.len() != self.migrants {
            return Err(FoldError::Protocol(format!(
                "expected {} migrants, received {}",
                self.migrants,
                individuals.len()
            )));
        }
        Ok(individuals)
    }

    /// Replace `incoming.len()` random members; the pool size never changes
    pub fn merge<R: Rng + ?Sized>(
        population: &mut Population,
        incoming: Vec<Individual>,
        rng: &mut R,
    ) -> Result<()> {
        let genepool = population.genepool_mut();
        if incoming.len() > genepool.len() {
            return Err(FoldError::Protocol(format!(
                "{} migrants cannot replace members of a pool of {}",
                incoming.len(),
                genepool.len()
            )));
        }
        genepool.shuffle(rng);
        genepool.drain(..incoming.len());
        genepool.extend(incoming);
        Ok(())
    }

    /// One full round; returns how many individuals were replaced
    pub fn run_round<T, R>(
        &self,
        transport: &T,
        population: &mut Population,
        rng: &mut R,
    ) -> Result<usize>
    where
        T: Transport + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.topology.has_neighbors() {
            log::debug!("rank {} has no ring neighbours, skipping migration", self.topology.rank());
            return Ok(0);
        }

        let outgoing = self.select_migrants(population, rng);
        let payload = self.encode(&outgoing);
        let received = exchange_with_neighbors(transport, &self.topology, payload.as_bytes())?;
        let incoming = self.decode(received)?;
        let replaced = incoming.len();
        Self::merge(population, incoming, rng)?;

        log::debug!(
            "rank {} replaced {} members with migrants from rank {}",
            self.topology.rank(),
            replaced,
            self.topology.previous()
        );
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Move;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_migrants_are_front_of_shuffled_pool() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut population = Population::random(20, 12, &mut rng);
        let protocol = MigrationProtocol::new(RingTopology::new(0, 2).unwrap(), 5, 12);

        let migrants = protocol.select_migrants(&mut population, &mut rng);
        assert_eq!(migrants.len(), 5);
        assert_eq!(&migrants[..], &population.genepool()[..5]);
    }

    #[test]
    fn test_wrong_migrant_count_is_protocol_error() {
        let protocol = MigrationProtocol::new(RingTopology::new(1, 2).unwrap(), 2, 3);
        assert!(matches!(
            protocol.decode(b"lrs".to_vec()),
            Err(FoldError::Protocol(_))
        ));
        assert!(matches!(
            protocol.decode(b"lrsl".to_vec()),
            Err(FoldError::ProtocolLength { length: 4, width: 3 })
        ));
    }

    #[test]
    fn test_merge_rejects_oversized_batch() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut population = Population::new(vec![Individual::new(vec![Move::Left; 2])]);
        let incoming = vec![Individual::new(vec![Move::Right; 2]); 2];
        assert!(MigrationProtocol::merge(&mut population, incoming, &mut rng).is_err());
    }

    #[test]
    fn test_single_rank_ring_skips() {
        let endpoints = crate::distributed::transport::LocalCluster::endpoints(1, None);
        let mut rng = StdRng::seed_from_u64(4);
        let mut population = Population::random(10, 4, &mut rng);
        let before = population.genepool().to_vec();
        let protocol = MigrationProtocol::new(RingTopology::new(0, 1).unwrap(), 2, 4);

        let replaced = protocol.run_round(&endpoints[0], &mut population, &mut rng).unwrap();
        assert_eq!(replaced, 0);
        assert_eq!(population.genepool(), &before[..]);
    }
}
