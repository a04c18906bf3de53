//! KPI cards shown above the dashboard charts.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Kpis, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col justify-between";

/// Renders the four headline numbers as a grid of cards.
pub(super) fn kpi_cards_view(kpis: &Kpis) -> Markup {
    html! {
        section id="kpis" class="w-full mx-auto mb-8"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (kpi_card("Spent This Month", &format_currency(kpis.current_month_total), None))
                (kpi_card(
                    "Top Category",
                    &kpis.top_category,
                    Some(&format_currency(kpis.top_category_total)),
                ))
                (kpi_card("Largest Expense", &format_currency(kpis.max_expense), None))
                (kpi_card("Number of Expenses", &kpis.expense_count.to_string(), None))
            }
        }
    }
}

fn kpi_card(label: &str, value: &str, detail: Option<&str>) -> Markup {
    html! {
        div class=(CARD_STYLE) aria-label=(label)
        {
            h4 class="text-sm text-gray-600 dark:text-gray-400 mb-2" { (label) }

            div class="text-3xl font-bold truncate" title=(value) { (value) }

            @if let Some(detail) = detail {
                div class="text-sm text-gray-600 dark:text-gray-400 mt-1" { (detail) }
            }
        }
    }
}
