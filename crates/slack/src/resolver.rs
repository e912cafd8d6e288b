use thiserror::Error;
use tracing::debug;

use crate::client::{ChannelKind, RtmClient};
use crate::events::ChannelId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("couldn't enumerate channels/groups")]
    Enumeration,
    #[error("couldn't find #{0}")]
    NotFound(String),
}

/// Resolve a channel name to its stable id by searching the public and
/// private listings visible to the authenticated identity. The name must
/// match exactly (case-sensitive); the first match wins. A listing that
/// fails counts as unavailable, and only both listings being empty or
/// unavailable is an enumeration failure.
pub async fn resolve(name: &str, client: &dyn RtmClient) -> Result<ChannelId, ResolveError> {
    let mut entries = client.list_channels(ChannelKind::Public).await.unwrap_or_default();
    let private = client.list_channels(ChannelKind::Private).await.unwrap_or_default();

    if entries.is_empty() && private.is_empty() {
        return Err(ResolveError::Enumeration);
    }

    entries.extend(private);
    debug!(name, candidates = entries.len(), "searching channel listings");

    entries
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| ChannelId::new(entry.id.clone()))
        .ok_or_else(|| ResolveError::NotFound(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::{resolve, ResolveError};
    use crate::client::{ChannelEntry, ChannelKind, RtmClient, SendOutcome, TransportError};
    use crate::events::InboundEvent;

    struct ListingClient {
        public: Result<Vec<ChannelEntry>, TransportError>,
        private: Result<Vec<ChannelEntry>, TransportError>,
    }

    impl ListingClient {
        fn new(public: Vec<ChannelEntry>, private: Vec<ChannelEntry>) -> Self {
            Self { public: Ok(public), private: Ok(private) }
        }
    }

    fn entry(id: &str, name: &str) -> ChannelEntry {
        ChannelEntry { id: id.to_owned(), name: name.to_owned() }
    }

    #[async_trait]
    impl RtmClient for ListingClient {
        async fn connect(&self) -> Result<(), TransportError> {
            Ok(())
        }

        async fn read(&self) -> Result<Vec<InboundEvent>, TransportError> {
            Ok(Vec::new())
        }

        async fn send(&self, _channel: &str, _text: &str) -> SendOutcome {
            SendOutcome::Sent
        }

        async fn list_channels(
            &self,
            kind: ChannelKind,
        ) -> Result<Vec<ChannelEntry>, TransportError> {
            match kind {
                ChannelKind::Public => self.public.clone(),
                ChannelKind::Private => self.private.clone(),
            }
        }
    }

    #[tokio::test]
    async fn resolves_public_channel_by_exact_name() {
        let client = ListingClient::new(vec![entry("C123", "general")], vec![]);

        let id = resolve("general", &client).await.expect("channel should resolve");

        assert_eq!(id.as_str(), "C123");
    }

    #[tokio::test]
    async fn resolves_private_channel_when_public_has_no_match() {
        let client =
            ListingClient::new(vec![entry("C1", "random")], vec![entry("G42", "backstage")]);

        let id = resolve("backstage", &client).await.expect("channel should resolve");

        assert_eq!(id.as_str(), "G42");
    }

    #[tokio::test]
    async fn first_match_wins_across_listings() {
        let client =
            ListingClient::new(vec![entry("C1", "general")], vec![entry("G1", "general")]);

        let id = resolve("general", &client).await.expect("channel should resolve");

        assert_eq!(id.as_str(), "C1");
    }

    #[tokio::test]
    async fn name_match_is_case_sensitive() {
        let client = ListingClient::new(vec![entry("C1", "General")], vec![]);

        let error = resolve("general", &client).await.expect_err("lookup should fail");

        assert_eq!(error, ResolveError::NotFound("general".to_owned()));
    }

    #[tokio::test]
    async fn empty_listings_are_an_enumeration_failure() {
        let client = ListingClient::new(vec![], vec![]);

        let error = resolve("general", &client).await.expect_err("lookup should fail");

        assert_eq!(error, ResolveError::Enumeration);
    }

    #[tokio::test]
    async fn unavailable_listings_are_an_enumeration_failure() {
        let client = ListingClient {
            public: Err(TransportError::List("rate limited".to_owned())),
            private: Err(TransportError::List("rate limited".to_owned())),
        };

        let error = resolve("general", &client).await.expect_err("lookup should fail");

        assert_eq!(error, ResolveError::Enumeration);
    }

    #[tokio::test]
    async fn one_unavailable_listing_still_resolves_from_the_other() {
        let client = ListingClient {
            public: Err(TransportError::List("rate limited".to_owned())),
            private: Ok(vec![entry("G9", "general")]),
        };

        let id = resolve("general", &client).await.expect("channel should resolve");

        assert_eq!(id.as_str(), "G9");
    }
}
