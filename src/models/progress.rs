//! Per-problem progress: status, saved code, notes and bookmarks.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemStatus {
    #[default]
    Unseen,
    Attempted,
    Solved,
    Mastered,
}

impl ProblemStatus {
    pub const ALL: [ProblemStatus; 4] = [
        ProblemStatus::Unseen,
        ProblemStatus::Attempted,
        ProblemStatus::Solved,
        ProblemStatus::Mastered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProblemStatus::Unseen => "unseen",
            ProblemStatus::Attempted => "attempted",
            ProblemStatus::Solved => "solved",
            ProblemStatus::Mastered => "mastered",
        }
    }

    /// Unknown values read back from storage fall back to `Unseen`.
    pub fn parse(value: &str) -> Self {
        match value {
            "attempted" => ProblemStatus::Attempted,
            "solved" => ProblemStatus::Solved,
            "mastered" => ProblemStatus::Mastered,
            _ => ProblemStatus::Unseen,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::Python => "python",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "python" => Language::Python,
            _ => Language::JavaScript,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProblemProgress {
    pub status: ProblemStatus,
    pub last_attempted: Option<DateTime<Utc>>,
    pub notes: String,
    pub code: Option<String>,
    pub language: Language,
    pub bookmarked: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: usize,
    /// Solved or mastered.
    pub solved: usize,
    pub attempted: usize,
    pub mastered: usize,
}

impl ProgressStats {
    pub fn from_statuses(statuses: impl IntoIterator<Item = ProblemStatus>) -> Self {
        let mut stats = ProgressStats::default();
        for status in statuses {
            stats.total += 1;
            match status {
                ProblemStatus::Attempted => stats.attempted += 1,
                ProblemStatus::Solved => stats.solved += 1,
                ProblemStatus::Mastered => {
                    stats.solved += 1;
                    stats.mastered += 1;
                }
                ProblemStatus::Unseen => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip_and_fallback() {
        for status in ProblemStatus::ALL {
            assert_eq!(ProblemStatus::parse(status.as_str()), status);
        }
        assert_eq!(ProblemStatus::parse("garbage"), ProblemStatus::Unseen);
    }

    #[test]
    fn test_stats_count_mastered_as_solved() {
        let stats = ProgressStats::from_statuses([
            ProblemStatus::Solved,
            ProblemStatus::Mastered,
            ProblemStatus::Attempted,
            ProblemStatus::Unseen,
        ]);
        assert_eq!(
            stats,
            ProgressStats {
                total: 4,
                solved: 2,
                attempted: 1,
                mastered: 1,
            }
        );
    }
}
