use crate::error::{FoldError, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use std::time::Duration;

/// Blocking point-to-point messaging between ranks.
///
/// `send` returns once the message is delivered (or buffered, for transports
/// that buffer); `receive` waits for the next message from exactly `from`.
/// Messages between one pair of ranks arrive in the order they were sent.
pub trait Transport {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;
    fn send(&self, to: usize, payload: &[u8]) -> Result<()>;
    fn receive(&self, from: usize) -> Result<Vec<u8>>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn send(&self, to: usize, payload: &[u8]) -> Result<()> {
        (**self).send(to, payload)
    }

    fn receive(&self, from: usize) -> Result<Vec<u8>> {
        (**self).receive(from)
    }
}

/// Builds the endpoints of an in-process cluster.
///
/// Every directed rank pair gets a zero-capacity channel, so a send completes
/// only once the peer has taken the message. That is the strictest form of the
/// blocking contract and makes circular waits observable.
pub struct LocalCluster;

impl LocalCluster {
    /// `timeout` bounds every blocking send and receive
    pub fn endpoints(size: usize, timeout: Option<Duration>) -> Vec<LocalEndpoint> {
        let mut outgoing: Vec<Vec<Sender<Vec<u8>>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut incoming: Vec<Vec<Receiver<Vec<u8>>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        for from in 0..size {
            for to in 0..size {
                let (tx, rx) = bounded(0);
                outgoing[from].push(tx);
                incoming[to].push(rx);
            }
        }

        outgoing
            .into_iter()
            .zip(incoming)
            .enumerate()
            .map(|(rank, (outgoing, incoming))| LocalEndpoint {
                rank,
                size,
                outgoing,
                incoming,
                timeout,
            })
            .collect()
    }
}

/// A rank's handle on a [`LocalCluster`]. Dropping it disconnects every
/// channel touching the rank, so peers blocked on it fail instead of waiting
/// forever.
pub struct LocalEndpoint {
    rank: usize,
    size: usize,
    /// Indexed by destination rank
    outgoing: Vec<Sender<Vec<u8>>>,
    /// Indexed by source rank
    incoming: Vec<Receiver<Vec<u8>>>,
    timeout: Option<Duration>,
}

impl LocalEndpoint {
    fn check_rank(&self, peer: usize) -> Result<()> {
        if peer >= self.size {
            return Err(FoldError::Transport(format!(
                "rank {} outside cluster of size {}",
                peer, self.size
            )));
        }
        Ok(())
    }
}

impl Transport for LocalEndpoint {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn send(&self, to: usize, payload: &[u8]) -> Result<()> {
        self.check_rank(to)?;
        let channel = &self.outgoing[to];
        let reason = match self.timeout {
            None => match channel.send(payload.to_vec()) {
                Ok(()) => return Ok(()),
                Err(_) => "channel closed",
            },
            Some(timeout) => match channel.send_timeout(payload.to_vec(), timeout) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(_)) => "timed out",
                Err(SendTimeoutError::Disconnected(_)) => "channel closed",
            },
        };
        Err(FoldError::Transport(format!(
            "send {} -> {} undelivered: {}",
            self.rank, to, reason
        )))
    }

    fn receive(&self, from: usize) -> Result<Vec<u8>> {
        self.check_rank(from)?;
        let channel = &self.incoming[from];
        match self.timeout {
            None => channel.recv().map_err(|_| {
                FoldError::Transport(format!("channel {} -> {} closed", from, self.rank))
            }),
            Some(timeout) => channel.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => {
                    FoldError::Transport(format!("receive {} <- {} timed out", self.rank, from))
                }
                RecvTimeoutError::Disconnected => {
                    FoldError::Transport(format!("channel {} -> {} closed", from, self.rank))
                }
            }),
        }
    }
}
