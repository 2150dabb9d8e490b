//! Deterministic fault injection for channels
//!
//! Wraps any [`ExecutionChannel`] and fails requests according to a
//! [`FaultPlan`]. Faults are applied in plan order and never at random.
//!
//! ## Example
//!
//! ```
//! use sim_host::{ChannelFault, EchoHost, FaultPlan, FaultyChannel};
//!
//! let plan = FaultPlan::new()
//!     .with_fault(ChannelFault::DropNext { count: 1 })
//!     .with_fault(ChannelFault::CloseAfter { count: 3 });
//! let channel = FaultyChannel::new(EchoHost::new(), plan);
//! ```

use bridge_types::RemoteFault;
use exec_channel::{ChannelError, ExecutionChannel};
use std::collections::VecDeque;
use tracing::debug;

/// A failure to inject into the round trip
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelFault {
    /// Fail the next N requests before they reach the host
    DropNext { count: usize },

    /// Answer the next request with a host fault instead of running it
    RaiseNext { kind: String, message: String },

    /// Run the next N requests but replace their responses with garbage
    GarbleNext { count: usize },

    /// Close the channel after N requests have reached the host
    CloseAfter { count: usize },
}

/// The faults to inject, configured per test
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<ChannelFault>,
}

impl FaultPlan {
    pub fn new() -> Self {
        Self { faults: Vec::new() }
    }

    pub fn with_fault(mut self, fault: ChannelFault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn faults(&self) -> &[ChannelFault] {
        &self.faults
    }
}

/// Text returned in place of a garbled response
pub const GARBLED_RESPONSE: &str = "<garbled>";

pub struct FaultyChannel<C> {
    inner: C,
    drop_next: usize,
    garble_next: usize,
    raise_next: VecDeque<RemoteFault>,
    close_after: Option<usize>,
    delivered: usize,
}

impl<C: ExecutionChannel> FaultyChannel<C> {
    pub fn new(inner: C, plan: FaultPlan) -> Self {
        let mut channel = Self {
            inner,
            drop_next: 0,
            garble_next: 0,
            raise_next: VecDeque::new(),
            close_after: None,
            delivered: 0,
        };
        for fault in plan.faults {
            match fault {
                ChannelFault::DropNext { count } => channel.drop_next += count,
                ChannelFault::GarbleNext { count } => channel.garble_next += count,
                ChannelFault::RaiseNext { kind, message } => {
                    channel.raise_next.push_back(RemoteFault::new(kind, message))
                }
                ChannelFault::CloseAfter { count } => channel.close_after = Some(count),
            }
        }
        channel
    }

    /// Requests that actually reached the inner channel
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: ExecutionChannel> ExecutionChannel for FaultyChannel<C> {
    fn execute(&mut self, source: &str) -> Result<String, ChannelError> {
        if self.close_after.map_or(false, |limit| self.delivered >= limit) {
            return Err(ChannelError::Transport("channel closed".to_string()));
        }
        if self.drop_next > 0 {
            self.drop_next -= 1;
            debug!(source, "dropping request");
            return Err(ChannelError::Transport("request dropped".to_string()));
        }
        if let Some(fault) = self.raise_next.pop_front() {
            return Err(ChannelError::Remote(fault.with_request(source)));
        }

        let response = self.inner.execute(source);
        self.delivered += 1;
        if self.garble_next > 0 && response.is_ok() {
            self.garble_next -= 1;
            return Ok(GARBLED_RESPONSE.to_string());
        }
        response
    }
}
