use serde::Deserialize;

/// Stable identifier of a resolved channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One event pulled off the real-time stream. Events arrive as loose JSON;
/// every field beyond the discriminants is optional and absence must never
/// fail classification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
}

impl InboundEvent {
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }
}

/// A user joined the target channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinEvent {
    pub user_id: String,
    pub display_name: Option<String>,
}

impl JoinEvent {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or("unknown")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Join(JoinEvent),
    Ignored,
}

const JOIN_SUBTYPES: [&str; 2] = ["channel_join", "group_join"];

/// Decide whether `event` is a join in the target channel. Pure; only the
/// subtype and channel comparisons gate the event, a missing profile or
/// profile name degrades to an unknown display name.
pub fn classify(event: &InboundEvent, target: &ChannelId) -> Classification {
    let is_join =
        event.subtype.as_deref().is_some_and(|subtype| JOIN_SUBTYPES.contains(&subtype));
    if !is_join {
        return Classification::Ignored;
    }

    let Some(user) = event.user.as_deref() else {
        return Classification::Ignored;
    };

    if event.channel.as_deref() != Some(target.as_str()) {
        return Classification::Ignored;
    }

    let display_name = event.user_profile.as_ref().and_then(|profile| profile.name.clone());
    Classification::Join(JoinEvent { user_id: user.to_owned(), display_name })
}
