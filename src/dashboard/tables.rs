//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::WeekdayTotal,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

/// Renders how many expenses fall on each day of the week and how much they add up to.
pub(super) fn weekday_table(weekday_totals: &[WeekdayTotal]) -> Markup {
    html! {
        section id="weekday-spend" class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Spend by Weekday" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Weekday" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Expenses" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Total" }
                        }
                    }

                    tbody
                    {
                        @for day in weekday_totals {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th
                                    scope="row"
                                    class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                                {
                                    (day.weekday)
                                }
                                td class={(TABLE_CELL_STYLE) " text-right"} { (day.count) }
                                td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(day.total)) }
                            }
                        }
                    }
                }
            }
        }
    }
}
