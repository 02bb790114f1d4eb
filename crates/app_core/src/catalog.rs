//! Catalog of cached images and its display summaries

use app_client::{CatalogResponse, ImageInfo};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// Size unit of a server size label (1024-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeUnit {
    B,
    KB,
    MB,
    GB,
    TB,
}

impl SizeUnit {
    /// How many of this unit make one MB
    fn per_mb(self) -> f64 {
        match self {
            SizeUnit::B => 1024.0 * 1024.0,
            SizeUnit::KB => 1024.0,
            SizeUnit::MB => 1.0,
            SizeUnit::GB => 1.0 / 1024.0,
            SizeUnit::TB => 1.0 / (1024.0 * 1024.0),
        }
    }

    fn larger(self) -> Option<SizeUnit> {
        match self {
            SizeUnit::B => Some(SizeUnit::KB),
            SizeUnit::KB => Some(SizeUnit::MB),
            SizeUnit::MB => Some(SizeUnit::GB),
            SizeUnit::GB => Some(SizeUnit::TB),
            SizeUnit::TB => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeUnit::B => "B",
            SizeUnit::KB => "KB",
            SizeUnit::MB => "MB",
            SizeUnit::GB => "GB",
            SizeUnit::TB => "TB",
        }
    }
}

impl FromStr for SizeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "B" => Ok(SizeUnit::B),
            "KB" | "KIB" => Ok(SizeUnit::KB),
            "MB" | "MIB" => Ok(SizeUnit::MB),
            "GB" | "GIB" => Ok(SizeUnit::GB),
            "TB" | "TIB" => Ok(SizeUnit::TB),
            _ => Err(format!("unknown size unit '{}'", s)),
        }
    }
}

/// A parsed `"<number> <unit>"` label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLabel {
    pub value: f64,
    pub unit: SizeUnit,
}

impl SizeLabel {
    pub fn new(value: f64, unit: SizeUnit) -> Self {
        Self { value, unit }
    }

    pub fn in_mb(&self) -> f64 {
        self.value / self.unit.per_mb()
    }

    /// Express a MB amount in MB, promoting to larger units at each 1024
    ///
    /// The comparison uses the value as it will be displayed, so an amount
    /// that rounds up to 1024 is shown in the next unit.
    pub fn from_mb(mb: f64) -> Self {
        let mut label = SizeLabel::new(mb, SizeUnit::MB);
        while round_two_decimals(label.value) >= 1024.0 {
            match label.unit.larger() {
                Some(unit) => label = SizeLabel::new(label.value / 1024.0, unit),
                None => break,
            }
        }
        label
    }
}

impl FromStr for SizeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(number), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("size label '{}' is not '<number> <unit>'", s));
        };

        let value: f64 = number
            .parse()
            .map_err(|_| format!("size label '{}' has no numeric value", s))?;
        if !value.is_finite() || value < 0.0 {
            return Err(format!("size label '{}' is out of range", s));
        }

        Ok(SizeLabel::new(value, unit.parse()?))
    }
}

impl fmt::Display for SizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_two_decimals(self.value), self.unit.as_str())
    }
}

fn round_two_decimals(value: f64) -> f64 {
    // `+ 0.0` turns a negative zero into a positive one
    (value * 100.0).round() / 100.0 + 0.0
}

/// Two decimals, ties rounded away from zero
pub fn format_two_decimals(value: f64) -> String {
    format!("{:.2}", round_two_decimals(value))
}

/// One cached image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// Unique name, also the path relative to the cache directory
    pub name: String,
    pub modified: Option<DateTime<Utc>>,
    /// Size label exactly as the server sent it
    pub size_label: String,
    /// Parsed size, `None` if the label is malformed
    pub size: Option<SizeLabel>,
}

impl ImageEntry {
    pub fn from_info(info: ImageInfo) -> Self {
        let modified = info.timestamp.to_datetime();
        if modified.is_none() {
            tracing::warn!("Unreadable timestamp for {}: {:?}", info.name, info.timestamp);
        }

        let size = match info.size.parse::<SizeLabel>() {
            Ok(size) => Some(size),
            Err(e) => {
                tracing::warn!("Ignoring size of {}: {}", info.name, e);
                None
            }
        };

        Self {
            name: info.name,
            modified,
            size_label: info.size,
            size,
        }
    }

    pub fn timestamp_millis(&self) -> Option<i64> {
        self.modified.map(|dt| dt.timestamp_millis())
    }
}

/// Ordered list of cached images, in server order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<ImageEntry>,
    reported_total: usize,
}

impl Catalog {
    pub fn new(entries: Vec<ImageEntry>) -> Self {
        let reported_total = entries.len();
        Self {
            entries,
            reported_total,
        }
    }

    pub fn from_response(response: CatalogResponse) -> Self {
        if response.total != response.images.len() {
            tracing::warn!(
                "Server reported {} images but listed {}",
                response.total,
                response.images.len()
            );
        }

        Self {
            reported_total: response.total,
            entries: response.images.into_iter().map(ImageEntry::from_info).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageEntry> {
        self.entries.iter()
    }

    /// Count as reported by the server
    pub fn reported_total(&self) -> usize {
        self.reported_total
    }

    /// Sum of all parseable sizes, in MB
    pub fn total_mb(&self) -> f64 {
        self.entries
            .iter()
            .filter_map(|e| e.size)
            .map(|s| s.in_mb())
            .fold(0.0, |acc, mb| acc + mb)
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            count: self.reported_total,
            total_size: SizeLabel::from_mb(self.total_mb()),
            unsized_entries: self.entries.iter().filter(|e| e.size.is_none()).count(),
        }
    }
}

/// Totals shown in the toolbar
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSummary {
    pub count: usize,
    pub total_size: SizeLabel,
    /// Entries left out of `total_size` because their label did not parse
    pub unsized_entries: usize,
}

impl CatalogSummary {
    pub fn total_size_label(&self) -> String {
        self.total_size.to_string()
    }
}

impl Default for CatalogSummary {
    fn default() -> Self {
        Catalog::default().summary()
    }
}

/// Human readable age, e.g. "3 hours ago"
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let (future, seconds) = (seconds < 0, seconds.unsigned_abs());

    let minutes = (seconds as f64 / 60.0).round() as u64;
    let hours = (seconds as f64 / 3600.0).round() as u64;
    let days = (seconds as f64 / 86400.0).round() as u64;

    let span = if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days)
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", ((days as f64) / 30.4).round() as u64)
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", ((days as f64) / 365.0).round() as u64)
    };

    if future {
        format!("in {}", span)
    } else {
        format!("{} ago", span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_client::Timestamp;
    use chrono::Duration;

    fn catalog_of(sizes: &[&str]) -> Catalog {
        Catalog::new(
            sizes
                .iter()
                .enumerate()
                .map(|(i, size)| {
                    ImageEntry::from_info(ImageInfo {
                        name: format!("img{}.png", i),
                        timestamp: Timestamp::Millis(0),
                        size: size.to_string(),
                    })
                })
                .collect(),
        )
    }

    #[test]
    fn test_total_promotes_to_gb() {
        let catalog = catalog_of(&["500 MB", "600 MB"]);
        assert_eq!(catalog.summary().total_size_label(), "1.07 GB");
    }

    #[test]
    fn test_total_stays_in_mb() {
        let catalog = catalog_of(&["10 MB"]);
        assert_eq!(catalog.summary().total_size_label(), "10.00 MB");
    }

    #[test]
    fn test_empty_total() {
        let summary = Catalog::default().summary();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_size_label(), "0.00 MB");
    }

    #[test]
    fn test_mixed_units_are_normalized() {
        let catalog = catalog_of(&["512 KB", "1 GB", "0.50 MB"]);
        // 0.5 + 1024 + 0.5 MB
        assert_eq!(catalog.summary().total_size_label(), "1.00 GB");

        let catalog = catalog_of(&["500 MB", "1 GB"]);
        assert_eq!(catalog.summary().total_size_label(), "1.49 GB");
    }

    #[test]
    fn test_malformed_sizes_are_excluded() {
        let catalog = catalog_of(&["10 MB", "huge", "3 parsecs"]);
        let summary = catalog.summary();
        assert_eq!(summary.total_size_label(), "10.00 MB");
        assert_eq!(summary.unsized_entries, 2);
        assert_eq!(catalog.get(1).unwrap().size_label, "huge");
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(format_two_decimals(0.125), "0.13");
        assert_eq!(format_two_decimals(0.625), "0.63");
        assert_eq!(format_two_decimals(1.0742), "1.07");
        assert_eq!(format_two_decimals(-0.0), "0.00");
    }

    #[test]
    fn test_promotion_uses_rounded_value() {
        assert_eq!(SizeLabel::from_mb(1023.999).to_string(), "1.00 GB");
        assert_eq!(SizeLabel::from_mb(1023.99).to_string(), "1023.99 MB");
        assert_eq!(SizeLabel::from_mb(1024.0 * 1024.0 - 0.001).to_string(), "1.00 TB");
    }

    #[test]
    fn test_size_label_parse() {
        assert_eq!("1.25 MB".parse::<SizeLabel>(), Ok(SizeLabel::new(1.25, SizeUnit::MB)));
        assert_eq!("3 gb".parse::<SizeLabel>(), Ok(SizeLabel::new(3.0, SizeUnit::GB)));
        assert!("MB".parse::<SizeLabel>().is_err());
        assert!("-1 MB".parse::<SizeLabel>().is_err());
        assert!("1 MB extra".parse::<SizeLabel>().is_err());
    }

    #[test]
    fn test_from_response_keeps_order() {
        let response = CatalogResponse {
            total: 2,
            images: vec![
                ImageInfo {
                    name: "newer.png".into(),
                    timestamp: Timestamp::Text("2024-03-02T00:00:00Z".into()),
                    size: "1.00 MB".into(),
                },
                ImageInfo {
                    name: "older.png".into(),
                    timestamp: Timestamp::Text("2024-03-01T00:00:00Z".into()),
                    size: "2.00 MB".into(),
                },
            ],
        };

        let catalog = Catalog::from_response(response);
        let names: Vec<_> = catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["newer.png", "older.png"]);
        assert_eq!(catalog.get(1).unwrap().timestamp_millis(), Some(1_709_251_200_000));
    }

    #[test]
    fn test_relative_time() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(10), now), "a few seconds ago");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(relative_time(now - Duration::days(3), now), "3 days ago");
        assert_eq!(relative_time(now - Duration::days(800), now), "2 years ago");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "in 5 minutes");
    }
}
