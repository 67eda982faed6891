//! Module `router`
//!
//! Delivery is synchronous and best-effort: one registry lookup, one write
//! to the recipient, no queueing and no retry.

use crate::client::{Registry, UserProfile};
use crate::error::{ChatServerError, DeliveryError, error_to_notice};
use crate::protocol::responses;
use log::{debug, warn};
use std::io;

#[derive(Clone)]
pub struct Router {
    registry: Registry,
}

impl Router {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Sends `body` from `sender` to the session registered as `to`.
    ///
    /// Delivery failures are reported to the sender as a notice line and do
    /// not surface here. The only error returned is a failure to write that
    /// notice to the sender's own connection.
    pub async fn deliver(&self, sender: &UserProfile, to: &str, body: &str) -> io::Result<()> {
        match self.try_deliver(sender, to, body).await {
            Ok(()) => {
                debug!("Delivered message from {} to {}", sender.handle(), to);
                Ok(())
            }
            Err(e) => {
                warn!("Delivery from {} failed: {}", sender.handle(), e);
                match error_to_notice(&ChatServerError::from(e)) {
                    Some(notice) => sender.send_line(&notice).await,
                    None => Ok(()),
                }
            }
        }
    }

    async fn try_deliver(
        &self,
        sender: &UserProfile,
        to: &str,
        body: &str,
    ) -> Result<(), DeliveryError> {
        // The registry lock is released before the write; a recipient that
        // disconnects in between shows up as a write failure.
        let recipient = self
            .registry
            .lookup(to)
            .map_err(|_| DeliveryError::RecipientNotFound(to.to_string()))?;

        recipient
            .send_line(&responses::delivered_message(sender.handle(), body))
            .await
            .map_err(|source| DeliveryError::WriteFailed {
                to: to.to_string(),
                source,
            })
    }
}
