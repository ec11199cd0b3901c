//! Sample request handlers for posframe's own tests and demo binaries.

use async_trait::async_trait;
use posframe_proto::IsoMessage;
use posframe_server::{Handler, ResponseSender};

use crate::message::PosMessage;

/// Echoes every request back with field 0 set to `0210`, leaving every
/// other field untouched — mirrors a network-management echo handler that
/// just confirms it received a `0200` authorization request.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler;

#[async_trait]
impl Handler<PosMessage> for EchoHandler {
    async fn handle(&self, request: PosMessage, responder: ResponseSender<PosMessage>) {
        let mut response = request;
        response.set_field(0, "0210");
        if let Err(err) = responder.send_response(&response).await {
            tracing::warn!(error = %err, "echo handler failed to send response");
        }
    }
}
