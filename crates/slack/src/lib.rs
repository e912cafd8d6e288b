//! Slack integration - real-time greeter plumbing
//!
//! This crate provides the chat-service side of doorman:
//! - **Client boundary** (`client`) - the `RtmClient` trait the bot speaks
//!   through, plus the transport error and send-outcome types
//! - **Events** (`events`) - the inbound event shape and join classification
//! - **Resolver** (`resolver`) - channel name to channel id resolution
//! - **Welcome** (`welcome`) - the welcome message template and dispatch
//! - **Supervisor** (`supervisor`) - connection lifecycle: connect, read
//!   loop, loss detection, bounded reconnect
//!
//! # Key Types
//!
//! - `RtmClient` - trait for the real-time session (connect/read/send/list)
//! - `Supervisor` - owns the session and the reconnect state machine
//! - `Classification` - join-or-ignored verdict for one inbound event
//! - `RetryPolicy` - retry ceiling and backoff base

pub mod client;
pub mod events;
pub mod resolver;
pub mod supervisor;
pub mod welcome;
