use crate::distributed::topology::ROOT;
use crate::distributed::transport::Transport;
use crate::engines::evaluation::FitnessEvaluator;
use crate::engines::generation::codec::{decode_single, encode_individual};
use crate::engines::generation::Population;
use crate::error::{FoldError, Result};

/// Gather every rank's best individual at root and re-score them together.
///
/// Root returns the champion population (its own best first, then ranks
/// `1..size` in order); its best structure is the run's answer. Other ranks
/// send their best and return `None`.
pub fn collect_champion<T, E>(
    transport: &T,
    population: &Population,
    evaluator: &E,
    width: usize,
) -> Result<Option<Population>>
where
    T: Transport + ?Sized,
    E: FitnessEvaluator + ?Sized,
{
    let best = population.best().ok_or_else(|| {
        FoldError::Generation(format!(
            "rank {} has no evaluated best individual",
            transport.rank()
        ))
    })?;

    if transport.rank() != ROOT {
        transport.send(ROOT, encode_individual(best.individual()).as_bytes())?;
        return Ok(None);
    }

    let mut champion = Population::new(vec![best.individual().clone()]);
    for from in 1..transport.size() {
        let payload = String::from_utf8(transport.receive(from)?).map_err(|e| {
            FoldError::Protocol(format!("best individual from rank {} is not text: {}", from, e))
        })?;
        champion.add_individual(decode_single(&payload, width)?);
    }

    champion.evaluate(evaluator)?;
    Ok(Some(champion))
}
