//! Expense aggregation for the dashboard.
//!
//! Every function here is a pure function of the expense rows passed in (and
//! "today" for the current month KPI). Nothing is cached and nothing is read
//! from or written to the database.

use std::{collections::BTreeMap, fmt::Display};

use time::{Date, Weekday};

/// The label used for the top category when there are no expenses.
pub(super) const NO_CATEGORY_LABEL: &str = "N/A";

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// The fields of an expense that the dashboard needs.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ExpenseRow {
    pub date: Date,
    pub amount: f64,
    pub category: String,
}

/// A calendar month, displayed as `YYYY-MM`.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(super) struct YearMonth {
    year: i32,
    month: u8,
}

impl From<Date> for YearMonth {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month() as u8,
        }
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Kpis {
    /// Total spent in the same calendar month as today.
    pub current_month_total: f64,
    /// The category with the largest total, or [NO_CATEGORY_LABEL].
    pub top_category: String,
    pub top_category_total: f64,
    /// The largest single expense.
    pub max_expense: f64,
    pub expense_count: usize,
}

impl Default for Kpis {
    fn default() -> Self {
        Self {
            current_month_total: 0.0,
            top_category: NO_CATEGORY_LABEL.to_owned(),
            top_category_total: 0.0,
            max_expense: 0.0,
            expense_count: 0,
        }
    }
}

/// Everything the dashboard shows, derived from one user's expenses.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardSummary {
    /// Total per category name, in ascending name order.
    pub category_totals: BTreeMap<String, f64>,
    /// Total per calendar month, in chronological order.
    pub monthly_totals: BTreeMap<YearMonth, f64>,
    /// Total per day, in chronological order.
    pub daily_totals: BTreeMap<Date, f64>,
    /// Count and total spent on each day of the week, Monday first.
    pub weekday_totals: Vec<WeekdayTotal>,
    pub kpis: Kpis,
}

/// How often and how much a user spends on a day of the week.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct WeekdayTotal {
    pub weekday: Weekday,
    pub count: usize,
    pub total: f64,
}

/// Compute the dashboard tables and KPIs for `rows`.
///
/// Returns `None` if there are no rows, in which case there is nothing to chart.
pub(super) fn summarize(rows: &[ExpenseRow], today: Date) -> Option<DashboardSummary> {
    if rows.is_empty() {
        return None;
    }

    Some(DashboardSummary {
        category_totals: category_totals(rows),
        monthly_totals: monthly_totals(rows),
        daily_totals: daily_totals(rows),
        weekday_totals: weekday_totals(rows),
        kpis: compute_kpis(rows, today),
    })
}

pub(super) fn category_totals(rows: &[ExpenseRow]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for row in rows {
        *totals.entry(row.category.clone()).or_insert(0.0) += row.amount;
    }

    totals
}

pub(super) fn monthly_totals(rows: &[ExpenseRow]) -> BTreeMap<YearMonth, f64> {
    let mut totals = BTreeMap::new();

    for row in rows {
        *totals.entry(YearMonth::from(row.date)).or_insert(0.0) += row.amount;
    }

    totals
}

pub(super) fn daily_totals(rows: &[ExpenseRow]) -> BTreeMap<Date, f64> {
    let mut totals = BTreeMap::new();

    for row in rows {
        *totals.entry(row.date).or_insert(0.0) += row.amount;
    }

    totals
}

/// The weekday of each row, in the same order as `rows`.
pub(super) fn weekday_labels(rows: &[ExpenseRow]) -> Vec<Weekday> {
    rows.iter().map(|row| row.date.weekday()).collect()
}

/// Count and sum the expenses falling on each day of the week.
///
/// All seven days are included, Monday first, even if no expense falls on them.
pub(super) fn weekday_totals(rows: &[ExpenseRow]) -> Vec<WeekdayTotal> {
    let mut totals: Vec<WeekdayTotal> = WEEKDAYS
        .iter()
        .map(|&weekday| WeekdayTotal {
            weekday,
            count: 0,
            total: 0.0,
        })
        .collect();

    for (weekday, row) in weekday_labels(rows).into_iter().zip(rows) {
        let entry = &mut totals[weekday.number_days_from_monday() as usize];
        entry.count += 1;
        entry.total += row.amount;
    }

    totals
}

/// Compute the headline numbers for `rows`.
///
/// An empty slice gives [Kpis::default].
/// When several categories share the largest total, the one whose name sorts first wins.
pub(super) fn compute_kpis(rows: &[ExpenseRow], today: Date) -> Kpis {
    let current_month = YearMonth::from(today);

    let current_month_total = rows
        .iter()
        .filter(|row| YearMonth::from(row.date) == current_month)
        .map(|row| row.amount)
        .sum();

    let max_expense = rows
        .iter()
        .map(|row| row.amount)
        .fold(None, |max: Option<f64>, amount| {
            Some(max.map_or(amount, |max| max.max(amount)))
        })
        .unwrap_or(0.0);

    let mut top_category: Option<(String, f64)> = None;

    for (category, total) in category_totals(rows) {
        match &top_category {
            Some((_, top_total)) if total <= *top_total => {}
            _ => top_category = Some((category, total)),
        }
    }

    let (top_category, top_category_total) =
        top_category.unwrap_or_else(|| (NO_CATEGORY_LABEL.to_owned(), 0.0));

    Kpis {
        current_month_total,
        top_category,
        top_category_total,
        max_expense,
        expense_count: rows.len(),
    }
}

#[cfg(test)]
mod tests {
    use time::{Date, Weekday, macros::date};

    use super::{
        ExpenseRow, Kpis, YearMonth, category_totals, compute_kpis, daily_totals, monthly_totals,
        summarize, weekday_labels, weekday_totals,
    };

    fn row(date: Date, amount: f64, category: &str) -> ExpenseRow {
        ExpenseRow {
            date,
            amount,
            category: category.to_owned(),
        }
    }

    fn scenario_rows() -> Vec<ExpenseRow> {
        vec![
            row(date!(2024 - 01 - 05), 10.0, "Food"),
            row(date!(2024 - 01 - 20), 5.0, "Food"),
            row(date!(2024 - 02 - 01), 20.0, "Transport"),
        ]
    }

    fn assert_close(got: f64, want: f64) {
        assert!((got - want).abs() < 1e-9, "want {want}, got {got}");
    }

    #[test]
    fn summarize_scenario() {
        let summary = summarize(&scenario_rows(), date!(2024 - 02 - 15)).unwrap();

        let categories: Vec<(&str, f64)> = summary
            .category_totals
            .iter()
            .map(|(name, total)| (name.as_str(), *total))
            .collect();
        assert_eq!(categories, vec![("Food", 15.0), ("Transport", 20.0)]);

        let months: Vec<(String, f64)> = summary
            .monthly_totals
            .iter()
            .map(|(month, total)| (month.to_string(), *total))
            .collect();
        assert_eq!(
            months,
            vec![("2024-01".to_owned(), 15.0), ("2024-02".to_owned(), 20.0)]
        );

        assert_eq!(
            summary.kpis,
            Kpis {
                current_month_total: 20.0,
                top_category: "Transport".to_owned(),
                top_category_total: 20.0,
                max_expense: 20.0,
                expense_count: 3,
            }
        );
    }

    #[test]
    fn summarize_returns_none_for_no_expenses() {
        assert_eq!(summarize(&[], date!(2024 - 02 - 15)), None);
    }

    #[test]
    fn kpis_default_for_no_expenses() {
        let kpis = compute_kpis(&[], date!(2024 - 02 - 15));

        assert_eq!(kpis, Kpis::default());
        assert_eq!(kpis.top_category, "N/A");
        assert_eq!(kpis.current_month_total, 0.0);
        assert_eq!(kpis.max_expense, 0.0);
        assert_eq!(kpis.expense_count, 0);
    }

    #[test]
    fn all_totals_sum_to_the_raw_total() {
        let rows = vec![
            row(date!(2023 - 12 - 31), 0.1, "Food"),
            row(date!(2024 - 01 - 01), 0.2, "Health"),
            row(date!(2024 - 01 - 01), 3.3, "Food"),
            row(date!(2024 - 03 - 15), 99.99, "Housing"),
            row(date!(2024 - 03 - 16), 0.0, "Other"),
            row(date!(2024 - 03 - 16), 12.5, "Transport"),
        ];
        let raw_total: f64 = rows.iter().map(|row| row.amount).sum();

        assert_close(category_totals(&rows).values().sum(), raw_total);
        assert_close(monthly_totals(&rows).values().sum(), raw_total);
        assert_close(daily_totals(&rows).values().sum(), raw_total);
        assert_close(
            weekday_totals(&rows).iter().map(|day| day.total).sum(),
            raw_total,
        );
    }

    #[test]
    fn summarize_is_idempotent() {
        let rows = scenario_rows();
        let today = date!(2024 - 02 - 15);

        let first = summarize(&rows, today).unwrap();
        let second = summarize(&rows, today).unwrap();

        assert_eq!(first.category_totals, second.category_totals);
        assert_eq!(first.monthly_totals, second.monthly_totals);
        assert_eq!(first.daily_totals, second.daily_totals);
    }

    #[test]
    fn top_category_ties_pick_smallest_name() {
        let rows = vec![
            row(date!(2024 - 01 - 01), 10.0, "Transport"),
            row(date!(2024 - 01 - 02), 10.0, "Food"),
            row(date!(2024 - 01 - 03), 10.0, "Health"),
        ];

        let kpis = compute_kpis(&rows, date!(2024 - 01 - 31));

        assert_eq!(kpis.top_category, "Food");
        assert_eq!(kpis.top_category_total, 10.0);
    }

    #[test]
    fn current_month_total_only_counts_todays_month() {
        let rows = vec![
            row(date!(2023 - 02 - 10), 100.0, "Food"),
            row(date!(2024 - 02 - 01), 1.0, "Food"),
            row(date!(2024 - 02 - 29), 2.0, "Food"),
            row(date!(2024 - 03 - 01), 4.0, "Food"),
        ];

        let kpis = compute_kpis(&rows, date!(2024 - 02 - 15));

        assert_eq!(kpis.current_month_total, 3.0);
    }

    #[test]
    fn current_month_total_is_zero_when_month_has_no_expenses() {
        let kpis = compute_kpis(&scenario_rows(), date!(2025 - 06 - 01));

        assert_eq!(kpis.current_month_total, 0.0);
        assert_eq!(kpis.expense_count, 3);
    }

    #[test]
    fn months_sort_chronologically_across_years() {
        let mut months = vec![
            YearMonth::from(date!(2024 - 01 - 01)),
            YearMonth::from(date!(2023 - 12 - 01)),
            YearMonth::from(date!(2023 - 02 - 01)),
        ];

        months.sort();

        let labels: Vec<String> = months.iter().map(|month| month.to_string()).collect();
        assert_eq!(labels, vec!["2023-02", "2023-12", "2024-01"]);
    }

    #[test]
    fn daily_totals_merge_same_day() {
        let rows = vec![
            row(date!(2024 - 01 - 02), 1.5, "Food"),
            row(date!(2024 - 01 - 01), 2.0, "Food"),
            row(date!(2024 - 01 - 02), 3.0, "Transport"),
        ];

        let totals: Vec<(Date, f64)> = daily_totals(&rows).into_iter().collect();

        assert_eq!(
            totals,
            vec![(date!(2024 - 01 - 01), 2.0), (date!(2024 - 01 - 02), 4.5)]
        );
    }

    #[test]
    fn weekday_labels_follow_input_order() {
        let rows = vec![
            row(date!(2024 - 01 - 07), 1.0, "Food"),
            row(date!(2024 - 01 - 01), 1.0, "Food"),
            row(date!(2024 - 01 - 03), 1.0, "Food"),
        ];

        let labels: Vec<String> = weekday_labels(&rows)
            .iter()
            .map(|weekday| weekday.to_string())
            .collect();

        assert_eq!(labels, vec!["Sunday", "Monday", "Wednesday"]);
    }

    #[test]
    fn weekday_totals_cover_every_day() {
        let rows = vec![
            row(date!(2024 - 01 - 01), 1.0, "Food"),
            row(date!(2024 - 01 - 08), 2.0, "Food"),
            row(date!(2024 - 01 - 07), 4.0, "Food"),
        ];

        let totals = weekday_totals(&rows);

        assert_eq!(totals.len(), 7);
        assert_eq!(totals[0].weekday, Weekday::Monday);
        assert_eq!(totals[0].count, 2);
        assert_eq!(totals[0].total, 3.0);
        assert_eq!(totals[6].weekday, Weekday::Sunday);
        assert_eq!(totals[6].count, 1);
        assert_eq!(totals[1].count, 0);
    }
}
