// ── Segmentation findings ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IssueKind {
    UndefinedSubnet,
    UndefinedVlan,
    SubnetSharedAcrossZones,
    VlanSharedAcrossZones,
}

impl IssueKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::UndefinedSubnet | Self::UndefinedVlan => Severity::Medium,
            Self::SubnetSharedAcrossZones | Self::VlanSharedAcrossZones => Severity::High,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

/// A place where VLAN/subnet boundaries do not line up with zone boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationIssue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
}

impl SegmentationIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
        }
    }
}
