//! Transport side of the pipeline
//!
//! The processors never send bytes themselves. They hand re-authorized requests
//! to a [`Transport`] for re-dispatch; the binary drains those through a
//! [`ChannelTransport`] and sends them with [`HttpClient`].

pub mod http;

pub use http::{HttpClient, USER_AGENT_STRING};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::models::RequestDescriptor;

/// Re-dispatches a request through the pipeline (fire-and-forget)
pub trait Transport: Send + Sync {
    fn redispatch(&self, request: RequestDescriptor);
}

/// Transport that queues re-dispatched requests on an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: UnboundedSender<RequestDescriptor>,
}

impl ChannelTransport {
    /// Create the transport and the receiving end the pipeline driver reads from
    pub fn new() -> (Self, UnboundedReceiver<RequestDescriptor>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn redispatch(&self, request: RequestDescriptor) {
        let id = request.id.clone();
        match self.sender.send(request) {
            Ok(()) => debug!(request_id = %id, "Request queued for re-dispatch"),
            Err(_) => warn!(request_id = %id, "Re-dispatch dropped: pipeline is no longer receiving"),
        }
    }
}
