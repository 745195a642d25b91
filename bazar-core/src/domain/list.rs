//! List domain model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Item, User};

/// A finalized shopping list owned by one user.
///
/// Lists are built incrementally as a draft inside the creation
/// workflow and only get an identity here, at finalize time. After
/// that they are immutable except for bulk deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: Uuid,
    pub name: String,
    /// Calendar date of the shopping trip. Persisted as an ISO-8601
    /// date-time string (midnight UTC) for compatibility with the
    /// document-store record shape.
    #[serde(with = "iso_date_time")]
    pub date: NaiveDate,
    /// Owner identity, denormalized at creation time
    pub user_name: String,
    pub user_id: String,
    /// Insertion order is display order
    pub items: Vec<Item>,
}

impl List {
    /// Finalize a draft into a saveable list. Assigns the id and
    /// defaults the name from the date when blank.
    pub fn new(name: &str, date: NaiveDate, user: &User, items: Vec<Item>) -> Self {
        let name = if name.trim().is_empty() {
            default_name(date)
        } else {
            name.trim().to_string()
        };

        Self {
            id: Uuid::new_v4(),
            name,
            date,
            user_name: user.name_for_lists(),
            user_id: user.id.clone(),
            items,
        }
    }

    /// Sum of recorded prices over checked items
    pub fn total(&self) -> Decimal {
        total(&self.items)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Sum of recorded prices over checked items.
///
/// Shared between the draft's running total and the history views so
/// both always agree.
pub fn total(items: &[Item]) -> Decimal {
    items
        .iter()
        .filter(|item| item.is_checked)
        .filter_map(|item| item.price)
        .sum()
}

/// Two-decimal currency formatting for totals and prices
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", amount)
}

/// Default list name derived from the trip date, e.g.
/// "Bazar - May 1st, 2024"
pub fn default_name(date: NaiveDate) -> String {
    format!("Bazar - {}", format_long_date(date))
}

/// Format a date as "May 1st, 2024"
pub fn format_long_date(date: NaiveDate) -> String {
    use chrono::Datelike;
    let day = date.day();
    let suffix = match day {
        11..=13 => "th",
        _ => match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        },
    };
    format!("{} {}{}, {}", date.format("%B"), day, suffix, date.year())
}

mod iso_date_time {
    //! Serialize a NaiveDate as an ISO-8601 date-time string at
    //! midnight UTC, accepting either a full date-time or a bare date
    //! when reading.

    use chrono::{DateTime, NaiveDate, NaiveTime};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let midnight = date.and_time(NaiveTime::MIN);
        serializer.serialize_str(&format!("{}Z", midnight.format("%Y-%m-%dT%H:%M:%S%.3f")))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
            .map_err(serde::de::Error::custom)
    }
}
