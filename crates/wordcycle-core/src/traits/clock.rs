//! Source of "today" for the tracker.

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which calendar decides where one practice day ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    #[default]
    Utc,
    Local,
}

impl std::str::FromStr for DayBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utc" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown day boundary '{}', expected utc or local", other)),
        }
    }
}

/// Supplies the current calendar date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the configured calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    boundary: DayBoundary,
}

impl SystemClock {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.boundary {
            DayBoundary::Utc => Utc::now().date_naive(),
            DayBoundary::Local => Local::now().date_naive(),
        }
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
