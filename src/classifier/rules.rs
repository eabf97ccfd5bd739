//! Declarative classification rule tables.
//!
//! Rules are data, not code: each table maps a track to weighted patterns,
//! so rules can be added, removed or re-weighted from JSON without touching
//! the evaluator.
//!
//! # Tables
//!
//! | Table | Matched against | Contributes to |
//! |-------|-----------------|----------------|
//! | `keywords` | title + synopsis + description | keyed track |
//! | `title_hints` | title only | keyed track |
//! | `case_types` | `case_type` | rule's track |
//! | `duration_bands` | `estimated_duration_minutes` | rule's track |
//! | `baseline` | always | keyed track |
//! | `priority_keywords` | full text | derived priority only |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RulesError;
use crate::models::{CaseType, Priority, Track};

/// How a pattern is matched against lowercased text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Pattern must start and end on word boundaries ("rape" ≠ "grape").
    #[default]
    Token,
    /// Plain substring containment.
    Substring,
}

/// A weighted text pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub pattern: String,
    pub weight: f64,
    #[serde(default)]
    pub mode: MatchMode,
}

impl KeywordRule {
    pub fn new(pattern: impl Into<String>, weight: f64) -> Self {
        Self {
            pattern: pattern.into(),
            weight,
            mode: MatchMode::Token,
        }
    }

    /// Switches to substring matching.
    pub fn substring(mut self) -> Self {
        self.mode = MatchMode::Substring;
        self
    }

    /// Whether the pattern occurs in `text` (already lowercased).
    pub fn matches(&self, text: &str) -> bool {
        pattern_matches(text, &self.pattern, self.mode)
    }
}

/// Bias toward a track for a case type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseTypeRule {
    pub case_type: CaseType,
    pub track: Track,
    pub weight: f64,
}

/// Duration band `[min_minutes, max_minutes]` (inclusive; open-ended when
/// `max_minutes` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationBand {
    pub track: Track,
    pub min_minutes: u32,
    #[serde(default)]
    pub max_minutes: Option<u32>,
    pub weight: f64,
}

impl DurationBand {
    /// Whether `minutes` falls inside the band.
    pub fn contains(&self, minutes: u32) -> bool {
        minutes >= self.min_minutes && self.max_minutes.map_or(true, |max| minutes <= max)
    }
}

/// Pattern that forces a minimum priority when none was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityKeyword {
    pub pattern: String,
    pub priority: Priority,
    #[serde(default)]
    pub mode: MatchMode,
}

impl PriorityKeyword {
    pub fn new(pattern: impl Into<String>, priority: Priority) -> Self {
        Self {
            pattern: pattern.into(),
            priority,
            mode: MatchMode::Token,
        }
    }

    /// Whether the pattern occurs in `text` (already lowercased).
    pub fn matches(&self, text: &str) -> bool {
        pattern_matches(text, &self.pattern, self.mode)
    }
}

/// Complete classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default = "RuleTable::empty")]
pub struct RuleTable {
    pub keywords: BTreeMap<Track, Vec<KeywordRule>>,
    pub title_hints: BTreeMap<Track, Vec<KeywordRule>>,
    pub case_types: Vec<CaseTypeRule>,
    pub duration_bands: Vec<DurationBand>,
    pub baseline: BTreeMap<Track, f64>,
    pub priority_keywords: Vec<PriorityKeyword>,
    /// Priority assigned when no priority keyword fires.
    pub default_priority: BTreeMap<Track, Priority>,
}

impl RuleTable {
    /// A table with no rules; every case falls to the tie-break order.
    pub fn empty() -> Self {
        Self {
            keywords: BTreeMap::new(),
            title_hints: BTreeMap::new(),
            case_types: Vec::new(),
            duration_bands: Vec::new(),
            baseline: BTreeMap::new(),
            priority_keywords: Vec::new(),
            default_priority: BTreeMap::new(),
        }
    }

    /// Parses a rule table from JSON; absent tables are empty.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let mut table: Self = serde_json::from_str(json)?;
        table.validate()?;
        table.normalize();
        Ok(table)
    }

    /// Adds a keyword rule for `track`.
    pub fn with_keyword(mut self, track: Track, rule: KeywordRule) -> Self {
        self.keywords.entry(track).or_default().push(rule);
        self
    }

    /// Adds a title hint for `track`.
    pub fn with_title_hint(mut self, track: Track, rule: KeywordRule) -> Self {
        self.title_hints.entry(track).or_default().push(rule);
        self
    }

    /// Adds a case type bias.
    pub fn with_case_type(mut self, case_type: CaseType, track: Track, weight: f64) -> Self {
        self.case_types.push(CaseTypeRule {
            case_type,
            track,
            weight,
        });
        self
    }

    /// Adds a duration band.
    pub fn with_duration_band(
        mut self,
        track: Track,
        min_minutes: u32,
        max_minutes: Option<u32>,
        weight: f64,
    ) -> Self {
        self.duration_bands.push(DurationBand {
            track,
            min_minutes,
            max_minutes,
            weight,
        });
        self
    }

    /// Sets the baseline prior for a track.
    pub fn with_baseline(mut self, track: Track, weight: f64) -> Self {
        self.baseline.insert(track, weight);
        self
    }

    /// Adds a priority keyword.
    pub fn with_priority_keyword(mut self, rule: PriorityKeyword) -> Self {
        self.priority_keywords.push(rule);
        self
    }

    /// Sets the fallback priority for a track.
    pub fn with_default_priority(mut self, track: Track, priority: Priority) -> Self {
        self.default_priority.insert(track, priority);
        self
    }

    /// Rejects empty patterns, non-finite weights and inverted bands.
    pub fn validate(&self) -> Result<(), RulesError> {
        let keyword_rules = self
            .keywords
            .values()
            .chain(self.title_hints.values())
            .flatten();
        for rule in keyword_rules {
            if rule.pattern.trim().is_empty() {
                return Err(RulesError::Invalid("empty keyword pattern".into()));
            }
            if !rule.weight.is_finite() {
                return Err(RulesError::Invalid(format!(
                    "non-finite weight for '{}'",
                    rule.pattern
                )));
            }
        }
        for rule in &self.priority_keywords {
            if rule.pattern.trim().is_empty() {
                return Err(RulesError::Invalid("empty priority pattern".into()));
            }
        }
        for band in &self.duration_bands {
            if band.max_minutes.is_some_and(|max| max < band.min_minutes) {
                return Err(RulesError::Invalid(format!(
                    "duration band for {} has max < min",
                    band.track
                )));
            }
            if !band.weight.is_finite() {
                return Err(RulesError::Invalid("non-finite duration weight".into()));
            }
        }
        if self.case_types.iter().any(|r| !r.weight.is_finite())
            || self.baseline.values().any(|w| !w.is_finite())
        {
            return Err(RulesError::Invalid("non-finite weight".into()));
        }
        Ok(())
    }

    /// Lowercases and trims every pattern.
    pub fn normalize(&mut self) {
        for rule in self
            .keywords
            .values_mut()
            .chain(self.title_hints.values_mut())
            .flatten()
        {
            rule.pattern = rule.pattern.trim().to_lowercase();
        }
        for rule in &mut self.priority_keywords {
            rule.pattern = rule.pattern.trim().to_lowercase();
        }
    }
}

impl Default for RuleTable {
    /// The curated differentiated-case-management tables.
    fn default() -> Self {
        let fast = [
            "traffic violation",
            "minor dispute",
            "simple contract",
            "cheque bounce",
            "summary proceeding",
            "bail application",
            "interim order",
            "simple divorce",
            "rent dispute",
            "uncontested",
            "mutual consent",
        ];
        let regular = [
            "property dispute",
            "breach of contract",
            "maintenance",
            "custody",
            "theft",
            "recovery suit",
            "partition",
        ];
        let complex = [
            "murder",
            "rape",
            "fraud",
            "corruption",
            "conspiracy",
            "money laundering",
            "constitutional",
            "public interest",
            "class action",
            "corporate dispute",
            "intellectual property",
            "environmental",
            "cyber crime",
        ];

        let mut table = Self::empty();
        for p in fast {
            table = table.with_keyword(Track::Fast, KeywordRule::new(p, 2.0));
        }
        for p in regular {
            table = table.with_keyword(Track::Regular, KeywordRule::new(p, 1.5));
        }
        for p in complex {
            table = table.with_keyword(Track::Complex, KeywordRule::new(p, 3.0));
        }
        for p in ["simple", "minor", "small"] {
            table = table.with_title_hint(Track::Fast, KeywordRule::new(p, 1.0));
        }
        for p in ["complex", "major", "serious", "criminal"] {
            table = table.with_title_hint(Track::Complex, KeywordRule::new(p, 1.5));
        }

        table = table
            .with_case_type(CaseType::Constitutional, Track::Complex, 2.0)
            .with_case_type(CaseType::Commercial, Track::Complex, 1.0)
            .with_case_type(CaseType::Civil, Track::Regular, 0.5)
            .with_case_type(CaseType::Family, Track::Regular, 0.5)
            .with_case_type(CaseType::Criminal, Track::Regular, 0.5)
            .with_duration_band(Track::Fast, 45, Some(120), 1.5)
            .with_duration_band(Track::Regular, 90, Some(240), 1.5)
            .with_duration_band(Track::Complex, 180, None, 2.0)
            .with_baseline(Track::Regular, 0.5);

        for p in ["bail", "urgent", "injunction", "habeas corpus", "stay"] {
            table = table.with_priority_keyword(PriorityKeyword::new(p, Priority::Urgent));
        }
        for p in [
            "custody",
            "detention",
            "senior citizen",
            "minor child",
            "domestic violence",
        ] {
            table = table.with_priority_keyword(PriorityKeyword::new(p, Priority::High));
        }

        table
            .with_default_priority(Track::Fast, Priority::Medium)
            .with_default_priority(Track::Regular, Priority::Medium)
            .with_default_priority(Track::Complex, Priority::High)
    }
}

/// Matches a lowercased pattern against lowercased text.
fn pattern_matches(text: &str, pattern: &str, mode: MatchMode) -> bool {
    if pattern.is_empty() {
        return false;
    }
    match mode {
        MatchMode::Substring => text.contains(pattern),
        MatchMode::Token => text.match_indices(pattern).any(|(start, matched)| {
            let end = start + matched.len();
            let before = text[..start].chars().next_back();
            let after = text[end..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        }),
    }
}
