// src/domain/catalog/query.rs
//
// Query shaping for game listings.
//
// Everything here is pure: date windows are computed from a caller-supplied
// `today` so results never depend on the wall clock.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::entity::CatalogId;
use crate::domain::{DomainError, DomainResult};

/// Sort orders accepted by the catalog's game listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOrdering {
    RecentlyAdded,
    ReleaseDateDesc,
    ReleaseDateAsc,
    RatingDesc,
    MetacriticDesc,
    NameAsc,
    NameDesc,
    Relevance,
}

impl GameOrdering {
    pub const ALL: [GameOrdering; 8] = [
        GameOrdering::RecentlyAdded,
        GameOrdering::ReleaseDateDesc,
        GameOrdering::ReleaseDateAsc,
        GameOrdering::RatingDesc,
        GameOrdering::MetacriticDesc,
        GameOrdering::NameAsc,
        GameOrdering::NameDesc,
        GameOrdering::Relevance,
    ];

    /// Value sent as the `ordering` query parameter
    pub fn as_query_str(&self) -> &'static str {
        match self {
            GameOrdering::RecentlyAdded => "-added",
            GameOrdering::ReleaseDateDesc => "-released",
            GameOrdering::ReleaseDateAsc => "released",
            GameOrdering::RatingDesc => "-rating",
            GameOrdering::MetacriticDesc => "-metacritic",
            GameOrdering::NameAsc => "name",
            GameOrdering::NameDesc => "-name",
            GameOrdering::Relevance => "-relevance",
        }
    }
}

impl Default for GameOrdering {
    fn default() -> Self {
        GameOrdering::RecentlyAdded
    }
}

impl fmt::Display for GameOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_str())
    }
}

impl FromStr for GameOrdering {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameOrdering::ALL
            .iter()
            .copied()
            .find(|o| o.as_query_str() == s.trim())
            .ok_or_else(|| DomainError::InvalidValue(format!("Unknown ordering '{}'", s)))
    }
}

/// Inclusive range of release dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::InvariantViolation(format!(
                "Date range start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// January 1st of `from` through December 31st of `to`
    pub fn years(from: i32, to: i32) -> DomainResult<Self> {
        let start = NaiveDate::from_ymd_opt(from, 1, 1)
            .ok_or_else(|| DomainError::InvalidValue(format!("Invalid year {}", from)))?;
        let end = NaiveDate::from_ymd_opt(to, 12, 31)
            .ok_or_else(|| DomainError::InvalidValue(format!("Invalid year {}", to)))?;
        Self::new(start, end)
    }

    pub fn year(year: i32) -> DomainResult<Self> {
        Self::years(year, year)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `YYYY-MM-DD,YYYY-MM-DD` as the `dates` parameter expects
    pub fn to_query_value(&self) -> String {
        format!(
            "{},{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

/// Inclusive metacritic score bounds (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetacriticRange {
    pub min: u8,
    pub max: u8,
}

impl MetacriticRange {
    pub fn new(min: u8, max: u8) -> DomainResult<Self> {
        if min > max || max > 100 {
            return Err(DomainError::InvalidValue(format!(
                "Invalid metacritic range {}..{}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn to_query_value(&self) -> String {
        format!("{},{}", self.min, self.max)
    }
}

/// Filters for a game listing request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameQuery {
    pub search: Option<String>,
    pub genre: Option<CatalogId>,
    pub platform: Option<CatalogId>,
    pub ordering: Option<GameOrdering>,
    pub dates: Option<DateRange>,
    pub metacritic: Option<MetacriticRange>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl GameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.search = if text.trim().is_empty() { None } else { Some(text) };
        self
    }

    pub fn genre(mut self, id: CatalogId) -> Self {
        self.genre = Some(id);
        self
    }

    pub fn platform(mut self, id: CatalogId) -> Self {
        self.platform = Some(id);
        self
    }

    pub fn ordering(mut self, ordering: GameOrdering) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn dates(mut self, range: DateRange) -> Self {
        self.dates = Some(range);
        self
    }

    pub fn metacritic(mut self, range: MetacriticRange) -> Self {
        self.metacritic = Some(range);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Fill the page size only if the query does not set one
    pub fn with_default_page_size(mut self, size: u32) -> Self {
        if self.page_size.is_none() {
            self.page_size = Some(size);
        }
        self
    }

    /// Render as ordered `(name, value)` query parameters
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(search) = &self.search {
            params.push(("search", search.trim().to_string()));
        }
        if let Some(genre) = self.genre {
            params.push(("genres", genre.to_string()));
        }
        if let Some(platform) = self.platform {
            params.push(("platforms", platform.to_string()));
        }
        if let Some(dates) = &self.dates {
            params.push(("dates", dates.to_query_value()));
        }
        if let Some(metacritic) = &self.metacritic {
            params.push(("metacritic", metacritic.to_query_value()));
        }
        if let Some(ordering) = self.ordering {
            params.push(("ordering", ordering.as_query_str().to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(size) = self.page_size {
            params.push(("page_size", size.to_string()));
        }

        params
    }
}

/// Named release-date windows used by the calendar and new-release listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseWindow {
    /// Thirty days back through today
    Last30Days,
    /// Sunday of this week through today
    ThisWeekSoFar,
    /// Today through seven days ahead
    NextSevenDays,
    /// Sunday through Saturday of this week
    CurrentWeek,
    LastMonth,
    ThisMonth,
    NextMonth,
    /// Today through the same date next year
    NextTwelveMonths,
}

impl ReleaseWindow {
    pub fn range(&self, today: NaiveDate) -> DateRange {
        let (start, end) = match self {
            ReleaseWindow::Last30Days => (today - Duration::days(30), today),
            ReleaseWindow::ThisWeekSoFar => (start_of_week(today), today),
            ReleaseWindow::NextSevenDays => (today, today + Duration::days(7)),
            ReleaseWindow::CurrentWeek => {
                let start = start_of_week(today);
                (start, start + Duration::days(6))
            }
            ReleaseWindow::LastMonth => {
                let end = first_of_month(today) - Duration::days(1);
                (first_of_month(end), end)
            }
            ReleaseWindow::ThisMonth => (first_of_month(today), last_of_month(today)),
            ReleaseWindow::NextMonth => {
                let start = last_of_month(today) + Duration::days(1);
                (start, last_of_month(start))
            }
            ReleaseWindow::NextTwelveMonths => (
                today,
                today
                    .checked_add_months(Months::new(12))
                    .unwrap_or(today + Duration::days(365)),
            ),
        };
        DateRange { start, end }
    }

    /// Listing order that suits the window
    pub fn ordering(&self) -> GameOrdering {
        match self {
            ReleaseWindow::NextSevenDays | ReleaseWindow::NextTwelveMonths => {
                GameOrdering::ReleaseDateAsc
            }
            ReleaseWindow::CurrentWeek => GameOrdering::RecentlyAdded,
            _ => GameOrdering::ReleaseDateDesc,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            ReleaseWindow::Last30Days => "last-30-days",
            ReleaseWindow::ThisWeekSoFar => "this-week",
            ReleaseWindow::NextSevenDays => "next-week",
            ReleaseWindow::CurrentWeek => "current-week",
            ReleaseWindow::LastMonth => "last-month",
            ReleaseWindow::ThisMonth => "this-month",
            ReleaseWindow::NextMonth => "next-month",
            ReleaseWindow::NextTwelveMonths => "next-12-months",
        }
    }

    pub fn query(&self, today: NaiveDate) -> GameQuery {
        GameQuery::new()
            .dates(self.range(today))
            .ordering(self.ordering())
    }
}

impl FromStr for ReleaseWindow {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ALL: [ReleaseWindow; 8] = [
            ReleaseWindow::Last30Days,
            ReleaseWindow::ThisWeekSoFar,
            ReleaseWindow::NextSevenDays,
            ReleaseWindow::CurrentWeek,
            ReleaseWindow::LastMonth,
            ReleaseWindow::ThisMonth,
            ReleaseWindow::NextMonth,
            ReleaseWindow::NextTwelveMonths,
        ];
        ALL.iter()
            .copied()
            .find(|w| w.slug() == s.trim())
            .ok_or_else(|| DomainError::InvalidValue(format!("Unknown release window '{}'", s)))
    }
}

/// Curated top-games listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopCategory {
    /// Highest metacritic scores (80 and above) released in a year
    BestOfYear(i32),
    /// Most added games released in a year
    PopularInYear(i32),
    /// Community rating across the whole catalog
    AllTime,
}

impl TopCategory {
    pub const ALL_TIME_PAGE_SIZE: u32 = 40;

    pub fn query(&self) -> DomainResult<GameQuery> {
        let query = match *self {
            TopCategory::BestOfYear(year) => GameQuery::new()
                .dates(DateRange::year(year)?)
                .ordering(GameOrdering::MetacriticDesc)
                .metacritic(MetacriticRange::new(80, 100)?),
            TopCategory::PopularInYear(year) => GameQuery::new()
                .dates(DateRange::year(year)?)
                .ordering(GameOrdering::RecentlyAdded),
            TopCategory::AllTime => GameQuery::new()
                .ordering(GameOrdering::RatingDesc)
                .page_size(Self::ALL_TIME_PAGE_SIZE),
        };
        Ok(query)
    }
}

/// Sunday that starts the week containing `date`
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    // 31 days past the 1st always lands inside the following month
    let next_month = first_of_month(first_of_month(date) + Duration::days(31));
    next_month - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ordering_round_trips_through_wire_value() {
        for ordering in GameOrdering::ALL {
            let parsed: GameOrdering = ordering.as_query_str().parse().unwrap();
            assert_eq!(parsed, ordering);
        }
        assert!("-popularity".parse::<GameOrdering>().is_err());
    }

    #[test]
    fn test_query_params_in_order() {
        let query = GameQuery::new()
            .search("  zelda ")
            .genre(4)
            .ordering(GameOrdering::RatingDesc)
            .page(2)
            .page_size(20);

        assert_eq!(
            query.to_params(),
            vec![
                ("search", "zelda".to_string()),
                ("genres", "4".to_string()),
                ("ordering", "-rating".to_string()),
                ("page", "2".to_string()),
                ("page_size", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_blank_search_is_dropped() {
        let query = GameQuery::new().search("   ");
        assert!(query.search.is_none());
        assert!(query.to_params().is_empty());
    }

    #[test]
    fn test_page_is_at_least_one() {
        assert_eq!(GameQuery::new().page(0).page, Some(1));
    }

    #[test]
    fn test_default_page_size_does_not_override() {
        let query = GameQuery::new().page_size(40).with_default_page_size(20);
        assert_eq!(query.page_size, Some(40));
        let query = GameQuery::new().with_default_page_size(20);
        assert_eq!(query.page_size, Some(20));
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateRange::new(date(2024, 5, 2), date(2024, 5, 1)).is_err());
        let range = DateRange::years(2024, 2025).unwrap();
        assert_eq!(range.to_query_value(), "2024-01-01,2025-12-31");
        assert!(range.contains(date(2025, 6, 1)));
        assert!(!range.contains(date(2026, 1, 1)));
    }

    #[test]
    fn test_week_windows_start_on_sunday() {
        // 2024-05-15 is a Wednesday
        let today = date(2024, 5, 15);
        assert_eq!(start_of_week(today), date(2024, 5, 12));

        let week = ReleaseWindow::CurrentWeek.range(today);
        assert_eq!(week.to_query_value(), "2024-05-12,2024-05-18");

        let so_far = ReleaseWindow::ThisWeekSoFar.range(today);
        assert_eq!(so_far.to_query_value(), "2024-05-12,2024-05-15");

        // A Sunday starts its own week
        assert_eq!(start_of_week(date(2024, 5, 12)), date(2024, 5, 12));
    }

    #[test]
    fn test_month_windows() {
        let today = date(2024, 3, 10);
        assert_eq!(
            ReleaseWindow::LastMonth.range(today).to_query_value(),
            "2024-02-01,2024-02-29"
        );
        assert_eq!(
            ReleaseWindow::ThisMonth.range(today).to_query_value(),
            "2024-03-01,2024-03-31"
        );
        assert_eq!(
            ReleaseWindow::NextMonth.range(today).to_query_value(),
            "2024-04-01,2024-04-30"
        );
    }

    #[test]
    fn test_month_windows_across_year_boundary() {
        let today = date(2024, 12, 31);
        assert_eq!(
            ReleaseWindow::NextMonth.range(today).to_query_value(),
            "2025-01-01,2025-01-31"
        );
        let january = date(2025, 1, 1);
        assert_eq!(
            ReleaseWindow::LastMonth.range(january).to_query_value(),
            "2024-12-01,2024-12-31"
        );
    }

    #[test]
    fn test_rolling_windows() {
        let today = date(2024, 5, 15);
        assert_eq!(
            ReleaseWindow::Last30Days.range(today).to_query_value(),
            "2024-04-15,2024-05-15"
        );
        assert_eq!(
            ReleaseWindow::NextSevenDays.range(today).to_query_value(),
            "2024-05-15,2024-05-22"
        );
        assert_eq!(
            ReleaseWindow::NextTwelveMonths.range(today).to_query_value(),
            "2024-05-15,2025-05-15"
        );
    }

    #[test]
    fn test_window_orderings_and_slugs() {
        assert_eq!(ReleaseWindow::NextSevenDays.ordering(), GameOrdering::ReleaseDateAsc);
        assert_eq!(ReleaseWindow::ThisMonth.ordering(), GameOrdering::ReleaseDateDesc);
        assert_eq!("next-month".parse::<ReleaseWindow>().unwrap(), ReleaseWindow::NextMonth);
        assert!("someday".parse::<ReleaseWindow>().is_err());
    }

    #[test]
    fn test_top_categories() {
        let best = TopCategory::BestOfYear(2024).query().unwrap();
        let params = best.to_params();
        assert!(params.contains(&("dates", "2024-01-01,2024-12-31".to_string())));
        assert!(params.contains(&("metacritic", "80,100".to_string())));
        assert!(params.contains(&("ordering", "-metacritic".to_string())));

        let all_time = TopCategory::AllTime.query().unwrap();
        assert_eq!(all_time.page_size, Some(40));
        assert_eq!(all_time.ordering, Some(GameOrdering::RatingDesc));
    }

    #[test]
    fn test_metacritic_range_bounds() {
        assert!(MetacriticRange::new(90, 80).is_err());
        assert!(MetacriticRange::new(0, 101).is_err());
        assert_eq!(MetacriticRange::new(70, 100).unwrap().to_query_value(), "70,100");
    }
}
