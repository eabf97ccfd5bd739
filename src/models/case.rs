//! Case model.
//!
//! A case is the unit of work handed to the allocation pipeline. Intake,
//! storage and document handling happen elsewhere; this crate only reads
//! the fields that drive classification and scheduling.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legal category of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseType {
    Criminal,
    Civil,
    Family,
    Commercial,
    Constitutional,
}

impl CaseType {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseType::Criminal => "criminal",
            CaseType::Civil => "civil",
            CaseType::Family => "family",
            CaseType::Commercial => "commercial",
            CaseType::Constitutional => "constitutional",
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling priority.
///
/// Variant order is significant: `Low < Medium < High < Urgent`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    /// Numeric rank (low = 0, urgent = 3).
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }
}

/// Differentiated case management track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Fast,
    Regular,
    Complex,
}

impl Track {
    /// Tie-break order when buckets score equally: the most conservative
    /// (resource-hungry) assumption wins.
    pub const TIE_BREAK_ORDER: [Track; 3] = [Track::Complex, Track::Regular, Track::Fast];

    pub fn as_str(self) -> &'static str {
        match self {
            Track::Fast => "fast",
            Track::Regular => "regular",
            Track::Complex => "complex",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case lifecycle state.
///
/// Variant order follows the lifecycle, so `status >= Scheduled` means the
/// case already holds a hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Filed,
    UnderReview,
    Scheduled,
    Hearing,
    Disposed,
}

/// A case awaiting classification and/or scheduling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Unique case identifier.
    pub id: String,
    /// Court-facing case number (e.g. "CRL/2024/0001").
    #[serde(default)]
    pub case_number: String,
    /// Legal category.
    pub case_type: CaseType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub description: String,
    /// `None` until supplied by the filer or derived by the classifier.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// `None` until classified. A pre-set track is treated as an override.
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub track_score: Option<f64>,
    #[serde(default)]
    pub track_reasons: Vec<String>,
    /// Resource time the hearing will consume.
    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,
    pub filing_date: NaiveDate,
    pub status: CaseStatus,
}

impl Case {
    /// Creates a freshly filed case with no classification.
    pub fn new(id: impl Into<String>, case_type: CaseType, filing_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            case_number: String::new(),
            case_type,
            title: String::new(),
            synopsis: String::new(),
            description: String::new(),
            priority: None,
            track: None,
            track_score: None,
            track_reasons: Vec::new(),
            estimated_duration_minutes: None,
            filing_date,
            status: CaseStatus::Filed,
        }
    }

    /// Sets the case number.
    pub fn with_case_number(mut self, case_number: impl Into<String>) -> Self {
        self.case_number = case_number.into();
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the synopsis.
    pub fn with_synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = synopsis.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the track (treated as authoritative by the pipeline).
    pub fn with_track(mut self, track: Track) -> Self {
        self.track = Some(track);
        self
    }

    /// Sets the estimated hearing duration.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_duration_minutes = Some(minutes);
        self
    }

    /// Sets the lifecycle status.
    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the case may be offered for allocation.
    pub fn is_pending(&self) -> bool {
        matches!(self.status, CaseStatus::Filed | CaseStatus::UnderReview)
    }

    /// Whether the classifier has (or an override has) set a track.
    pub fn is_classified(&self) -> bool {
        self.track.is_some()
    }

    /// Title, synopsis and description joined and lowercased.
    pub fn searchable_text(&self) -> String {
        [
            self.title.as_str(),
            self.synopsis.as_str(),
            self.description.as_str(),
        ]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Whether title and body text are all empty or whitespace.
    pub fn has_no_text(&self) -> bool {
        self.title.trim().is_empty()
            && self.synopsis.trim().is_empty()
            && self.description.trim().is_empty()
    }
}
