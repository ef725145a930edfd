use crate::{
    github::{Minter, Result},
    webhooks::{Event, EventHandler, IssueComment},
};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

/// The comment body that triggers a reply
const TRIGGER: &str = "ping";
const REPLY: &str = "pong";

/// Replies "pong" to every issue comment that is exactly "ping"
pub struct PingHandler {
    minter: Minter,
}

impl PingHandler {
    pub fn new(minter: Minter) -> PingHandler {
        PingHandler { minter }
    }

    /// Reply to a "ping" comment. Comments delivered without an app installation
    /// cannot be answered and are skipped with a warning instead of failing.
    #[instrument(
        skip_all,
        fields(
            owner = %event.repository.owner.login,
            repository = %event.repository.name,
            issue = event.issue.number,
            comment = event.comment.id,
            action = %event.action,
        )
    )]
    pub async fn on_issue_comment(&self, event: &IssueComment) -> Result<()> {
        if event.comment.body != TRIGGER {
            debug!("not a ping, ignoring");
            return Ok(());
        }

        let installation = match event.installation {
            Some(installation) => installation,
            None => {
                warn!("hook was not delivered to an app installation, cannot reply");
                return Ok(());
            }
        };

        let client = self.minter.mint(installation.id).await?;
        client
            .create_comment(
                &event.repository.owner.login,
                &event.repository.name,
                event.issue.number,
                REPLY,
            )
            .await?;
        info!("replied to ping");

        Ok(())
    }
}

#[async_trait]
impl EventHandler for PingHandler {
    async fn handle(&self, event: &Event) -> Result<()> {
        match event {
            Event::IssueComment(comment) => self.on_issue_comment(comment).await,
            _ => Ok(()),
        }
    }
}
