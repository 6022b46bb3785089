pub mod registry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use registry::CandidateRegistry;

/// A member up for promotion. Immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub name: String,
    pub rank: u32,
    pub level: u32,
    pub country: String,
    // Human-formatted, displayed as-is ("113,987,059", "92.2M")
    pub power: String,
    pub kills: String,
    pub deaths: String,
    pub likes: u32,
    pub gift_level: u32,
}

impl Candidate {
    pub fn raw_stat(&self, field: StatField) -> RawStat<'_> {
        match field {
            StatField::Power => RawStat::Text(&self.power),
            StatField::Kills => RawStat::Text(&self.kills),
            StatField::Deaths => RawStat::Text(&self.deaths),
            StatField::Likes => RawStat::Number(self.likes as f64),
            StatField::GiftLevel => RawStat::Number(self.gift_level as f64),
            StatField::Level => RawStat::Number(self.level as f64),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatField {
    Power,
    Kills,
    Deaths,
    Likes,
    GiftLevel,
    Level,
}

impl StatField {
    // Fields shown on the comparison charts
    pub const COMPARISON: [StatField; 5] = [
        StatField::Power,
        StatField::Kills,
        StatField::Deaths,
        StatField::Likes,
        StatField::GiftLevel,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatField::Power => "Power",
            StatField::Kills => "Kills",
            StatField::Deaths => "Deaths",
            StatField::Likes => "Likes",
            StatField::GiftLevel => "Gift Level",
            StatField::Level => "Level",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stat as it appears on a candidate: either already numeric or a
/// display string that still needs cleaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawStat<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> From<&'a str> for RawStat<'a> {
    fn from(value: &'a str) -> Self {
        RawStat::Text(value)
    }
}

impl From<f64> for RawStat<'_> {
    fn from(value: f64) -> Self {
        RawStat::Number(value)
    }
}

impl From<i32> for RawStat<'_> {
    fn from(value: i32) -> Self {
        RawStat::Number(value as f64)
    }
}

impl From<u32> for RawStat<'_> {
    fn from(value: u32) -> Self {
        RawStat::Number(value as f64)
    }
}

impl From<i64> for RawStat<'_> {
    fn from(value: i64) -> Self {
        RawStat::Number(value as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub candidate_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
