use std::{sync::Arc, time::Duration};

use doorman_core::config::BotConfig;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::client::{RtmClient, SendOutcome, TransportError};
use crate::events::{classify, ChannelId, Classification};
use crate::resolver::{self, ResolveError};
use crate::welcome;

const DEFAULT_IDLE_DELAY: Duration = Duration::from_millis(500);

const ANNOUNCE_TEXT: &str = "hello party people :tada:";

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("couldn't connect to the chat service: {0}")]
    Connect(#[source] TransportError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("too many failed reconnect attempts, shutting down")]
    RetriesExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Reconnect attempts tolerated after one loss before giving up.
    pub max_retries: u32,
    /// Base of the reconnect backoff delay.
    pub backoff_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 8, backoff_base: 0.5 }
    }
}

impl RetryPolicy {
    /// Delay before the next reconnect attempt. Quadratic in the base, not
    /// in the attempt count, so it is constant for a fixed base.
    fn backoff_delay(&self) -> Duration {
        Duration::from_secs_f64((self.backoff_base * self.backoff_base) / 4.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconnectDecision {
    RetryAfter(Duration),
    GiveUp,
}

/// Reconnect bookkeeping owned by the supervisor. The counter only resets
/// after a fully successful read pass, never on a successful reconnect.
#[derive(Clone, Debug)]
pub struct RetryState {
    policy: RetryPolicy,
    retry_count: u32,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, retry_count: 0 }
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Any read pass that completes without a loss signal, including an
    /// empty one, is evidence of a healthy connection.
    pub fn record_healthy_pass(&mut self) {
        self.retry_count = 0;
    }

    pub fn on_reconnect_failure(&mut self) -> ReconnectDecision {
        if self.retry_count >= self.policy.max_retries {
            return ReconnectDecision::GiveUp;
        }

        self.retry_count += 1;
        ReconnectDecision::RetryAfter(self.policy.backoff_delay())
    }
}

#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    pub channel: String,
    pub retry: RetryPolicy,
    pub idle_delay: Duration,
    pub announce: bool,
    pub one_shot_message: Option<String>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            channel: "general".to_owned(),
            retry: RetryPolicy::default(),
            idle_delay: DEFAULT_IDLE_DELAY,
            announce: false,
            one_shot_message: None,
        }
    }
}

impl From<&BotConfig> for SupervisorConfig {
    fn from(bot: &BotConfig) -> Self {
        Self {
            channel: bot.channel.clone(),
            retry: RetryPolicy { max_retries: bot.max_retries, ..RetryPolicy::default() },
            announce: bot.announce,
            one_shot_message: bot.message.clone(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Connected,
    Reconnecting,
}

/// Owns the real-time session end to end: initial connect, channel
/// resolution, the read-dispatch loop, loss detection, and the bounded
/// reconnect state machine. Fatal conditions surface as the returned error;
/// the loop is never re-entered after one.
pub struct Supervisor {
    client: Arc<dyn RtmClient>,
    config: SupervisorConfig,
    retry: RetryState,
}

impl Supervisor {
    pub fn new(client: Arc<dyn RtmClient>, config: SupervisorConfig) -> Self {
        let retry = RetryState::new(config.retry);
        Self { client, config, retry }
    }

    pub fn retry_count(&self) -> u32 {
        self.retry.retry_count()
    }

    pub async fn run(&mut self) -> Result<(), SupervisorError> {
        self.client.connect().await.map_err(SupervisorError::Connect)?;
        info!("connected");

        let channel_id = resolver::resolve(&self.config.channel, self.client.as_ref()).await?;
        debug!(channel = %self.config.channel, id = %channel_id, "resolved channel id");

        if let Some(text) = self.config.one_shot_message.clone() {
            // One-shot mode never enters the read loop.
            self.send_once(&text).await;
            return Ok(());
        }

        if self.config.announce {
            self.send_once(ANNOUNCE_TEXT).await;
        }

        info!(channel = %self.config.channel, "listening for joins");

        let mut state = SessionState::Connected;
        loop {
            state = match state {
                SessionState::Connected => self.read_pass(&channel_id).await,
                SessionState::Reconnecting => self.reconnect_once().await?,
            };
        }
    }

    async fn send_once(&self, text: &str) {
        match self.client.send(&self.config.channel, text).await {
            SendOutcome::Sent => info!(channel = %self.config.channel, "message sent"),
            SendOutcome::StaleSession => {
                error!(channel = %self.config.channel, "couldn't send message");
            }
        }
    }

    /// Drain one batch, welcome every join in delivery order, then mark the
    /// pass healthy and idle briefly. A read failure is a connection loss.
    async fn read_pass(&mut self, channel_id: &ChannelId) -> SessionState {
        let batch = match self.client.read().await {
            Ok(batch) => batch,
            Err(transport_error) => {
                error!(error = %transport_error, "lost connection, reconnecting...");
                return SessionState::Reconnecting;
            }
        };

        for event in &batch {
            debug!(?event, "inbound event");
            if let Classification::Join(join) = classify(event, channel_id) {
                welcome::dispatch(self.client.as_ref(), &self.config.channel, &join).await;
            }
        }

        self.retry.record_healthy_pass();

        if !self.config.idle_delay.is_zero() {
            tokio::time::sleep(self.config.idle_delay).await;
        }

        SessionState::Connected
    }

    /// One reconnect attempt. Success resumes the read loop without
    /// re-resolving the channel and without resetting the retry counter.
    async fn reconnect_once(&mut self) -> Result<SessionState, SupervisorError> {
        match self.client.connect().await {
            Ok(()) => {
                info!("reconnected");
                Ok(SessionState::Connected)
            }
            Err(transport_error) => {
                info!(error = %transport_error, "failed to reconnect");
                match self.retry.on_reconnect_failure() {
                    ReconnectDecision::RetryAfter(delay) => {
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                        Ok(SessionState::Reconnecting)
                    }
                    ReconnectDecision::GiveUp => Err(SupervisorError::RetriesExhausted),
                }
            }
        }
    }
}
