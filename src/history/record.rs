//! Run record model.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ProblemInstance, Scenario, Timetable};

/// One saved run: who asked, what came out, and under which settings.
///
/// Legacy history files written with Korean keys (`이름`, `시간표`,
/// `과목난이도`, `시나리오`, `생성시간`) still load; records are always
/// written with the English keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run label (user name or nickname).
    #[serde(alias = "이름")]
    pub name: String,
    /// Resulting timetable.
    #[serde(alias = "시간표")]
    pub timetable: Timetable,
    /// Subject ID → difficulty used for the run.
    #[serde(alias = "과목난이도")]
    pub difficulties: BTreeMap<String, u8>,
    /// Scenario used for the run.
    #[serde(alias = "시나리오")]
    pub scenario: Scenario,
    /// Local creation time, stored as `YYYY-MM-DD HH:MM:SS`.
    #[serde(with = "timestamp", alias = "생성시간")]
    pub created_at: NaiveDateTime,
}

impl RunRecord {
    /// Creates a record for a solved instance, stamped with the current local time.
    pub fn new(
        name: impl Into<String>,
        instance: &ProblemInstance,
        timetable: Timetable,
    ) -> Self {
        Self {
            name: name.into(),
            timetable,
            difficulties: instance.difficulty_map(),
            scenario: instance.scenario,
            created_at: Local::now().naive_local(),
        }
    }

    /// Overrides the creation time.
    pub fn with_created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
