// ── Policy domain types ──
//
// Rules and flow scenarios share the same endpoint and traffic shape:
// a `(kind, value)` pair on each side plus service / protocol / port.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::entity_id::EntityId;
use crate::error::CoreError;

/// What an endpoint value names.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EndpointKind {
    #[default]
    Zone,
    Node,
}

/// One side of a rule or scenario: a zone name or a node name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub kind: EndpointKind,
    pub value: String,
}

impl Endpoint {
    pub fn zone(name: impl Into<String>) -> Self {
        Self {
            kind: EndpointKind::Zone,
            value: name.into(),
        }
    }

    pub fn node(name: impl Into<String>) -> Self {
        Self {
            kind: EndpointKind::Node,
            value: name.into(),
        }
    }

    pub fn is_node(&self) -> bool {
        self.kind == EndpointKind::Node
    }

    /// Borrowed `(kind, value)` key used for candidate matching.
    pub fn key(&self) -> (EndpointKind, &str) {
        (self.kind, self.value.as_str())
    }
}

/// Renders as `kind value`, e.g. `zone dmz`.
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.value)
    }
}

/// Parses `kind:value`, e.g. `node:web01`. A bare value is a zone.
impl FromStr for Endpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, value)) = s.split_once(':') else {
            return Ok(Self::zone(s.trim()));
        };
        let kind = kind
            .trim()
            .parse::<EndpointKind>()
            .map_err(|_| CoreError::InvalidInput {
                field: "endpoint".into(),
                reason: format!("expected 'zone' or 'node' before ':', got '{kind}'"),
            })?;
        Ok(Self {
            kind,
            value: value.trim().to_owned(),
        })
    }
}

/// Service / protocol / port selector shared by rules and scenarios.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traffic {
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Any integer is accepted. Values outside the TCP/UDP range are kept
    /// as-is and simply never equal a real port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

impl Traffic {
    /// Protocol as a filter value. Blank strings do not filter.
    pub fn protocol_filter(&self) -> Option<&str> {
        self.protocol
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Port as a filter value. Port 0 does not filter.
    pub fn port_filter(&self) -> Option<i64> {
        self.port.filter(|p| *p != 0)
    }
}

/// Verdict a rule applies to matching traffic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase", try_from = "String")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RuleAction {
    Allow,
    Deny,
}

impl TryFrom<String> for RuleAction {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse()
    }
}

/// Firewall-style policy statement between two endpoints for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: EntityId,
    pub source: Endpoint,
    pub destination: Endpoint,
    #[serde(flatten)]
    pub traffic: Traffic,
    pub action: RuleAction,
    /// Node id of the firewall owning this rule, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firewall_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Rule {
    /// Number of node-level endpoints (0-2). Higher is more specific.
    pub fn specificity(&self) -> u8 {
        u8::from(self.source.is_node()) + u8::from(self.destination.is_node())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validate_selector(&format!("rule #{}", self.id), &self.source, &self.destination, &self.traffic)
    }
}

/// Checks the required fields shared by rules and scenarios.
pub(crate) fn validate_selector(
    owner: &str,
    source: &Endpoint,
    destination: &Endpoint,
    traffic: &Traffic,
) -> Result<(), CoreError> {
    if traffic.service.trim().is_empty() {
        return Err(CoreError::InvalidInput {
            field: format!("{owner}.service"),
            reason: "service is required".into(),
        });
    }
    for (side, endpoint) in [("source", source), ("destination", destination)] {
        if endpoint.value.trim().is_empty() {
            return Err(CoreError::InvalidInput {
                field: format!("{owner}.{side}"),
                reason: format!("{} name is required", endpoint.kind),
            });
        }
    }
    Ok(())
}
