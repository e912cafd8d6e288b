use tracing::{error, info};

use crate::client::{RtmClient, SendOutcome};
use crate::events::JoinEvent;

/// The fixed welcome template, addressed to the joining user by id.
pub fn welcome_text(user_id: &str) -> String {
    format!("Sup, <@{user_id}> :hand:\nMake sure to add a party hat to your avatar!")
}

/// Send the welcome for one join. Best-effort: a stale session is logged at
/// error level and the read loop carries on, it never fails the process.
pub async fn dispatch(client: &dyn RtmClient, channel: &str, join: &JoinEvent) {
    match client.send(channel, &welcome_text(&join.user_id)).await {
        SendOutcome::Sent => {
            info!(user = %join.display_name(), channel, "welcomed user");
        }
        SendOutcome::StaleSession => {
            error!(channel, "couldn't send welcome message");
        }
    }
}
