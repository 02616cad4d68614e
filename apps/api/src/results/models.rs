use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::EventType;

/// Maximum ranked entries per age category.
pub const TOP_POSITIONS_LIMIT: usize = 5;
/// Maximum entries in the aggregate top-100 list.
pub const TOP100_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeCategory {
    Adult,
    Children,
    Preschool,
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 3] = [
        AgeCategory::Adult,
        AgeCategory::Children,
        AgeCategory::Preschool,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeCategory::Adult => "adult",
            AgeCategory::Children => "children",
            AgeCategory::Preschool => "preschool",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgeCategory::Adult => "Adult (16yr-80yr)",
            AgeCategory::Children => "Children (7yr-15yr)",
            AgeCategory::Preschool => "Pre-school (2yr-6yr)",
        }
    }
}

/// Which ranked list of an `EventResult` an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum ResultBucket {
    Age(AgeCategory),
    Top100,
}

impl ResultBucket {
    pub fn display_name(&self) -> &'static str {
        match self {
            ResultBucket::Age(category) => category.display_name(),
            ResultBucket::Top100 => "Top 100",
        }
    }

    pub fn is_top100(&self) -> bool {
        matches!(self, ResultBucket::Top100)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEntry {
    pub participant_id: String,
    pub name: String,
    pub age_category: AgeCategory,
    /// 1-based rank, fixed at import time.
    pub position: u32,
    pub score: f64,
    #[serde(default)]
    pub remarks: String,
}

impl ResultEntry {
    /// Case-insensitive substring match on participant ID or name.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.participant_id.to_lowercase().contains(needle)
            || self.name.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopPositions {
    #[serde(default)]
    pub adult: Vec<ResultEntry>,
    #[serde(default)]
    pub children: Vec<ResultEntry>,
    #[serde(default)]
    pub preschool: Vec<ResultEntry>,
}

impl TopPositions {
    pub fn get(&self, category: AgeCategory) -> &[ResultEntry] {
        match category {
            AgeCategory::Adult => &self.adult,
            AgeCategory::Children => &self.children,
            AgeCategory::Preschool => &self.preschool,
        }
    }

    pub fn get_mut(&mut self, category: AgeCategory) -> &mut Vec<ResultEntry> {
        match category {
            AgeCategory::Adult => &mut self.adult,
            AgeCategory::Children => &mut self.children,
            AgeCategory::Preschool => &mut self.preschool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    pub event_type: EventType,
    pub season: String,
    #[serde(default)]
    pub top_positions: TopPositions,
    #[serde(default)]
    pub top100: Vec<ResultEntry>,
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_published: bool,
}

impl EventResult {
    /// An empty, unpublished result for the given event and season.
    pub fn draft(event_type: EventType, season: impl Into<String>) -> Self {
        Self {
            event_type,
            season: season.into(),
            top_positions: TopPositions::default(),
            top100: Vec::new(),
            published_date: None,
            is_published: false,
        }
    }

    /// Every ranked list in scan order: adult, children, preschool, top100.
    pub fn buckets(&self) -> impl Iterator<Item = (ResultBucket, &[ResultEntry])> {
        AgeCategory::ALL
            .into_iter()
            .map(|c| (ResultBucket::Age(c), self.top_positions.get(c)))
            .chain(std::iter::once((ResultBucket::Top100, self.top100.as_slice())))
    }

    pub fn entry_count(&self) -> usize {
        self.buckets().map(|(_, entries)| entries.len()).sum()
    }
}

/// A denormalized search hit: the entry plus where it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub entry: ResultEntry,
    pub event_type: EventType,
    pub season: String,
    pub event_name: String,
    pub category_name: String,
    pub is_top100: bool,
    pub position_label: String,
}

/// Where a contestant placed, used for certificates and the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub participant_id: String,
    pub name: String,
    pub event_type: EventType,
    pub season: String,
    pub published_date: Option<DateTime<Utc>>,
    pub bucket: ResultBucket,
    pub category_name: String,
    pub position: u32,
    pub score: f64,
}

/// "1st", "2nd", "3rd", "4th", "11th", "22nd", ...
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Display label for a rank: "1st Place" for age categories, "#12" for the top-100 list.
pub fn position_label(position: u32, is_top100: bool) -> String {
    if is_top100 {
        format!("#{position}")
    } else {
        format!("{} Place", ordinal(position))
    }
}
