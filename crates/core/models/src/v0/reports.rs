#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category of a community report
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReportCategory {
    /// Overflowing public dustbin
    OverflowingBin,
    /// Illegal garbage dumping
    IllegalDump,
    /// Blocked or open drain
    BlockedDrain,
    /// Unclean road or street
    DirtyStreet,
    /// Scheduled garbage collection missed
    GarbageNotCollected,
    /// Unrecognised wire value
    Unknown,
}

/// Status of a community report
///
/// Transitions only move forward (pending, in progress, resolved)
/// and are driven by the municipal backend, never by this client.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReportStatus {
    /// Report is waiting for triage
    Pending,
    /// A crew has been assigned
    InProgress,
    /// Issue has been resolved
    Resolved,
    /// Unrecognised wire value
    Unknown,
}

auto_derived!(
    /// Status filter applied to the community feed
    pub enum ReportFilter {
        All,
        Pending,
        InProgress,
        Resolved,
    }

    /// Ordering applied to the community feed
    pub enum ReportSort {
        Newest,
        Oldest,
        MostUpvoted,
        Nearest,
    }
);

impl ReportCategory {
    /// Lowercase string stored at the collaborator boundary
    pub fn as_wire(&self) -> &'static str {
        match self {
            ReportCategory::OverflowingBin => "overflowing_bin",
            ReportCategory::IllegalDump => "illegal_dump",
            ReportCategory::BlockedDrain => "blocked_drain",
            ReportCategory::DirtyStreet => "dirty_street",
            ReportCategory::GarbageNotCollected => "garbage_not_collected",
            ReportCategory::Unknown => "unknown",
        }
    }

    /// Parse a wire string, falling back to Unknown
    pub fn from_wire(value: &str) -> Self {
        match value {
            "overflowing_bin" => ReportCategory::OverflowingBin,
            "illegal_dump" => ReportCategory::IllegalDump,
            "blocked_drain" => ReportCategory::BlockedDrain,
            "dirty_street" => ReportCategory::DirtyStreet,
            "garbage_not_collected" => ReportCategory::GarbageNotCollected,
            _ => ReportCategory::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportCategory::OverflowingBin => "Overflowing Dustbin",
            ReportCategory::IllegalDump => "Illegal Garbage Dumping",
            ReportCategory::BlockedDrain => "Blocked / Open Drain",
            ReportCategory::DirtyStreet => "Unclean Road or Street",
            ReportCategory::GarbageNotCollected => "Garbage Not Collected",
            ReportCategory::Unknown => "Unknown",
        }
    }
}

impl Default for ReportCategory {
    fn default() -> Self {
        ReportCategory::IllegalDump
    }
}

impl ReportStatus {
    /// Lowercase string stored at the collaborator boundary
    pub fn as_wire(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Unknown => "unknown",
        }
    }

    /// Parse a wire string, falling back to Unknown
    pub fn from_wire(value: &str) -> Self {
        match value {
            "pending" => ReportStatus::Pending,
            "in_progress" => ReportStatus::InProgress,
            "resolved" => ReportStatus::Resolved,
            _ => ReportStatus::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::InProgress => "In Progress",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Unknown => "Unknown",
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for ReportCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ReportCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(ReportCategory::from_wire(&value))
    }
}

#[cfg(feature = "serde")]
impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(ReportStatus::from_wire(&value))
    }
}

impl ReportFilter {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportFilter::All => "All Reports",
            ReportFilter::Pending => "Pending",
            ReportFilter::InProgress => "In Progress",
            ReportFilter::Resolved => "Resolved",
        }
    }

    /// Whether a report with the given status passes this filter
    pub fn matches(&self, status: &ReportStatus) -> bool {
        match self {
            ReportFilter::All => true,
            ReportFilter::Pending => matches!(status, ReportStatus::Pending),
            ReportFilter::InProgress => matches!(status, ReportStatus::InProgress),
            ReportFilter::Resolved => matches!(status, ReportStatus::Resolved),
        }
    }
}

impl ReportSort {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportSort::Newest => "Newest First",
            ReportSort::Oldest => "Oldest First",
            ReportSort::MostUpvoted => "Most Upvoted",
            ReportSort::Nearest => "Nearest to Me",
        }
    }
}
