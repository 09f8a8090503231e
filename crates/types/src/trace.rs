//! Negotiation trace input.
//!
//! A trace is the ordered action log of one session plus the party-profile
//! table that names each participant. Parsing is lenient per action: one
//! malformed entry is skipped and counted, it never rejects the whole trace.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::ActorId;

/// Mapping from issue name to chosen value. Opaque to analytics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(default)]
    pub issuevalues: BTreeMap<String, Value>,
}

/// Payload shared by offers and accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBody {
    pub actor: ActorId,
    #[serde(default)]
    pub bid: Bid,
    /// Utility of `bid` under each actor's own profile.
    pub utilities: BTreeMap<ActorId, f64>,
}

/// One entry of the action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Offer(ActionBody),
    Accept(ActionBody),
}

impl Action {
    pub fn offer(
        actor: impl Into<ActorId>,
        utilities: impl IntoIterator<Item = (ActorId, f64)>,
    ) -> Self {
        Action::Offer(ActionBody {
            actor: actor.into(),
            bid: Bid::default(),
            utilities: utilities.into_iter().collect(),
        })
    }

    pub fn accept(
        actor: impl Into<ActorId>,
        utilities: impl IntoIterator<Item = (ActorId, f64)>,
    ) -> Self {
        Action::Accept(ActionBody {
            actor: actor.into(),
            bid: Bid::default(),
            utilities: utilities.into_iter().collect(),
        })
    }

    pub fn body(&self) -> &ActionBody {
        match self {
            Action::Offer(body) | Action::Accept(body) => body,
        }
    }

    pub fn actor(&self) -> &ActorId {
        &self.body().actor
    }
}

/// Profile reference for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyProfile {
    /// Profile location, e.g. `file:domains/domain07/profileA.json`.
    pub profile: String,
    /// Party descriptor as recorded by the protocol layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<Value>,
}

impl PartyProfile {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            party: None,
        }
    }
}

/// A parsed negotiation trace. Immutable once loaded.
///
/// Deserialize straight from the JSON text: `party_profiles` keeps document
/// order, which a detour through `serde_json::Value` would lose.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawTrace")]
pub struct NegotiationTrace {
    pub actions: Vec<Action>,
    /// Participants in the order they were declared (first = seat A).
    pub party_profiles: Vec<(ActorId, PartyProfile)>,
    /// Action entries that were not a well-formed `Offer` or `Accept`.
    pub skipped_actions: u32,
    /// Error reported by the protocol layer, if any.
    pub protocol_error: Option<String>,
}

impl NegotiationTrace {
    pub fn new(party_profiles: Vec<(ActorId, PartyProfile)>, actions: Vec<Action>) -> Self {
        Self {
            actions,
            party_profiles,
            skipped_actions: 0,
            protocol_error: None,
        }
    }
}

#[derive(Deserialize)]
struct RawTrace {
    #[serde(default)]
    actions: Value,
    #[serde(default, deserialize_with = "ordered_profiles")]
    partyprofiles: Vec<(ActorId, PartyProfile)>,
    #[serde(default)]
    error: Value,
}

impl From<RawTrace> for NegotiationTrace {
    fn from(raw: RawTrace) -> Self {
        let mut skipped_actions = 0;
        let entries = match raw.actions {
            Value::Array(entries) => entries,
            Value::Null => Vec::new(),
            _ => {
                skipped_actions += 1;
                Vec::new()
            }
        };

        let mut actions = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_value::<Action>(entry) {
                Ok(action) => actions.push(action),
                Err(_) => skipped_actions += 1,
            }
        }

        let protocol_error = match raw.error {
            Value::Null => None,
            Value::String(message) => Some(message),
            other => Some(other.to_string()),
        };

        Self {
            actions,
            party_profiles: raw.partyprofiles,
            skipped_actions,
            protocol_error,
        }
    }
}

/// Deserialize a JSON object into `(key, value)` pairs in document order.
fn ordered_profiles<'de, D>(deserializer: D) -> Result<Vec<(ActorId, PartyProfile)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedProfiles;

    impl<'de> Visitor<'de> for OrderedProfiles {
        type Value = Vec<(ActorId, PartyProfile)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map from actor id to party profile")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(2));
            while let Some((actor, profile)) = map.next_entry::<ActorId, PartyProfile>()? {
                entries.push((actor, profile));
            }
            Ok(entries)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(OrderedProfiles)
}
