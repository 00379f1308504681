//! Entry model
//!
//! The single domain entity: a dated sales or delivery record with a
//! category and amount. Type, category and amount are first-class
//! fields; `title` and `content` are free text only.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two tracked activity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Sales,
    Delivery,
}

impl EntryType {
    /// All types, in display order
    pub const ALL: [EntryType; 2] = [EntryType::Sales, EntryType::Delivery];
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Sales => write!(f, "sales"),
            EntryType::Delivery => write!(f, "delivery"),
        }
    }
}

impl FromStr for EntryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sales" => Ok(EntryType::Sales),
            "delivery" => Ok(EntryType::Delivery),
            other => Err(format!("Invalid entry type: {}. Use sales or delivery", other)),
        }
    }
}

/// Fixed category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Training,
    Coaching,
    Speaking,
}

impl Category {
    /// All categories, in display order
    pub const ALL: [Category; 3] = [Category::Training, Category::Coaching, Category::Speaking];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Training => write!(f, "Training"),
            Category::Coaching => write!(f, "Coaching"),
            Category::Speaking => write!(f, "Speaking"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "training" => Ok(Category::Training),
            "coaching" => Ok(Category::Coaching),
            "speaking" => Ok(Category::Speaking),
            other => Err(format!(
                "Invalid category: {}. Use Training, Coaching, or Speaking",
                other
            )),
        }
    }
}

/// A stored entry, owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub user_id: String,
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub category: Category,
    pub amount: f64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating an entry
#[derive(Debug, Clone, Deserialize)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub entry_type: EntryType,
    pub category: Category,
    pub amount: f64,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewEntry {
    /// Validate caller-supplied fields before they hit the database
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title cannot be empty".to_string());
        }
        if self.title.len() > 200 {
            return Err("Title exceeds maximum length of 200 characters".to_string());
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err("Amount must be a non-negative number".to_string());
        }
        Ok(())
    }
}

/// Partial update; `None` fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryPatch {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub entry_type: Option<EntryType>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl EntryPatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("Title cannot be empty".to_string());
            }
            if title.len() > 200 {
                return Err("Title exceeds maximum length of 200 characters".to_string());
            }
        }
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err("Amount must be a non-negative number".to_string());
            }
        }
        Ok(())
    }

    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.entry_type.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.title.is_none()
            && self.content.is_none()
    }
}

/// A signed-in user, as reported by the OAuth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub handle: String,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> NewEntry {
        NewEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            entry_type: EntryType::Sales,
            category: Category::Training,
            amount: 2500.0,
            title: "Workshop deposit".to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn test_entry_type_round_trip() {
        for ty in EntryType::ALL {
            assert_eq!(ty.to_string().parse::<EntryType>(), Ok(ty));
        }
        assert!("invoice".parse::<EntryType>().is_err());
    }

    #[test]
    fn test_category_parse_case_insensitive() {
        assert_eq!("training".parse::<Category>(), Ok(Category::Training));
        assert_eq!("SPEAKING".parse::<Category>(), Ok(Category::Speaking));
        assert!("consulting".parse::<Category>().is_err());
    }

    #[test]
    fn test_new_entry_rejects_empty_title() {
        let mut entry = sample_entry();
        entry.title = "   ".to_string();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_new_entry_rejects_negative_amount() {
        let mut entry = sample_entry();
        entry.amount = -10.0;
        assert!(entry.validate().is_err());

        entry.amount = f64::NAN;
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_patch_empty_detection() {
        assert!(EntryPatch::default().is_empty());

        let patch = EntryPatch {
            amount: Some(100.0),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&EntryType::Delivery).unwrap();
        assert_eq!(json, "\"delivery\"");

        let json = serde_json::to_string(&Category::Coaching).unwrap();
        assert_eq!(json, "\"Coaching\"");
    }
}
