use std::fmt;

/// Rank of a job that failed before any phase was recorded.
pub const CREATED_RANK: u32 = 0;

/// Rank a freshly created timeline starts at.
pub const INITIAL_RANK: u32 = 1;

/// Terminal marker for completed jobs. Kept well clear of the intermediate
/// ranks so it is never mistaken for a fifth phase.
pub const COMPLETED_RANK: u32 = 99;

/// Timeline step labels, in display order. The index of an intermediate
/// phase's label equals its rank.
pub const TIMELINE_LABELS: [&str; 6] = [
    "Created",
    "In Queue",
    "Uploading",
    "Processing",
    "Parsing",
    "Completed",
];

/// Event codes a job's log entries and status can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PhaseCode {
    InQueue,
    Uploading,
    Processing,
    Parsing,
    Completed,
    Failed,
}

impl PhaseCode {
    pub const INTERMEDIATE: [PhaseCode; 4] = [
        PhaseCode::InQueue,
        PhaseCode::Uploading,
        PhaseCode::Processing,
        PhaseCode::Parsing,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INQ" => Some(Self::InQueue),
            "UPL" => Some(Self::Uploading),
            "PRO" => Some(Self::Processing),
            "PAR" => Some(Self::Parsing),
            "COM" => Some(Self::Completed),
            "FAI" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::InQueue => "INQ",
            Self::Uploading => "UPL",
            Self::Processing => "PRO",
            Self::Parsing => "PAR",
            Self::Completed => "COM",
            Self::Failed => "FAI",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InQueue => "In Queue",
            Self::Uploading => "Uploading",
            Self::Processing => "Processing",
            Self::Parsing => "Parsing",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }

    /// Position on the timeline. `Failed` is not a position and has no rank.
    pub fn rank(self) -> Option<u32> {
        match self {
            Self::InQueue => Some(1),
            Self::Uploading => Some(2),
            Self::Processing => Some(3),
            Self::Parsing => Some(4),
            Self::Completed => Some(COMPLETED_RANK),
            Self::Failed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for PhaseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Timeline rank for a raw status or event code; `None` for `FAI` and
/// unrecognized codes.
pub fn rank_of(code: &str) -> Option<u32> {
    PhaseCode::from_code(code).and_then(PhaseCode::rank)
}

/// True iff `status` is `COM` or `FAI`.
pub fn is_terminal(status: &str) -> bool {
    PhaseCode::from_code(status).is_some_and(PhaseCode::is_terminal)
}
