use crate::distributed::topology::ROOT;
use crate::distributed::transport::Transport;
use crate::error::{FoldError, Result};

pub fn encode_count(count: u64) -> [u8; 8] {
    count.to_be_bytes()
}

pub fn decode_count(payload: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = payload.try_into().map_err(|_| {
        FoldError::Protocol(format!(
            "generation count needs 8 bytes, received {}",
            payload.len()
        ))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

/// Fan-in sum of every rank's generation count at root.
///
/// Root receives from ranks `1..size` in ascending order and returns the
/// total; every other rank sends its count and gets `None`.
pub fn reduce_generation_count<T: Transport + ?Sized>(
    transport: &T,
    local_count: u64,
) -> Result<Option<u64>> {
    if transport.rank() != ROOT {
        transport.send(ROOT, &encode_count(local_count))?;
        return Ok(None);
    }

    let mut global_count = local_count;
    for from in 1..transport.size() {
        let count = decode_count(&transport.receive(from)?)?;
        global_count = global_count.checked_add(count).ok_or_else(|| {
            FoldError::Protocol("global generation count overflowed".to_string())
        })?;
    }
    Ok(Some(global_count))
}
