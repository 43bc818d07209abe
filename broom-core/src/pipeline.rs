//! Filtering and ordering of usage records.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::types::UsageRecord;

/// Inclusive bounds on `total_usages`. `None` means unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsageBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl UsageBounds {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    /// Build from signed values where any negative number means unbounded.
    pub fn from_signed(min: i64, max: i64) -> Self {
        Self {
            min: usize::try_from(min).ok(),
            max: usize::try_from(max).ok(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, total: usize) -> bool {
        self.min.map_or(true, |min| total >= min) && self.max.map_or(true, |max| total <= max)
    }
}

/// Keep only records whose total falls within `bounds`.
///
/// Whole records are dropped; individual usages are never touched.
pub fn filter_by_usage_count(records: Vec<UsageRecord>, bounds: UsageBounds) -> Vec<UsageRecord> {
    if bounds.is_unbounded() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| bounds.contains(r.total_usages))
        .collect()
}

/// Field used as the primary sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    Name,
    /// Defining file, then line.
    #[default]
    File,
    /// Total usage count.
    Usages,
}

impl SortKey {
    /// Lenient parse: anything unrecognised sorts by file.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "file" => Ok(SortKey::File),
            "usages" => Ok(SortKey::Usages),
            _ => Err(format!("Unknown sort key: '{}'", s)),
        }
    }
}

/// Sort key plus direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOptions {
    pub key: SortKey,
    pub ascending: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            key: SortKey::File,
            ascending: true,
        }
    }
}

fn compare(a: &UsageRecord, b: &UsageRecord, key: SortKey) -> Ordering {
    let (da, db) = (&a.definition, &b.definition);
    let primary = match key {
        SortKey::Name => Ordering::Equal,
        SortKey::File => da.file.cmp(&db.file).then(da.line.cmp(&db.line)),
        SortKey::Usages => a.total_usages.cmp(&b.total_usages),
    };
    primary
        .then_with(|| da.name.cmp(&db.name))
        .then_with(|| da.file.cmp(&db.file))
        .then_with(|| da.line.cmp(&db.line))
}

/// Sort records in place.
///
/// Ties on the primary key break on name, then file, then line. The
/// direction applies to the full comparison, tie-breaks included, so a
/// descending sort is the exact reverse of an ascending one.
pub fn sort_records(records: &mut [UsageRecord], options: SortOptions) {
    records.sort_by(|a, b| {
        let ord = compare(a, b, options.key);
        if options.ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}
