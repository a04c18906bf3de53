//! Chart generation and rendering for the dashboard.
//!
//! Each chart is built as an ECharts option object with `charming`, serialized
//! to JSON, and initialized in the browser by [charts_script].

use std::collections::BTreeMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Symbol, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};
use time::Date;

use crate::{
    dashboard::aggregation::{DashboardSummary, YearMonth},
    html::HeadElement,
};

/// Where the ECharts library is loaded from.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the four dashboard charts from `summary`.
pub(super) fn build_dashboard_charts(summary: &DashboardSummary) -> [DashboardChart; 4] {
    [
        DashboardChart {
            id: "category-pie-chart",
            options: script_safe_options(category_pie_chart(&summary.category_totals)),
        },
        DashboardChart {
            id: "monthly-bar-chart",
            options: script_safe_options(monthly_bar_chart(&summary.monthly_totals)),
        },
        DashboardChart {
            id: "daily-line-chart",
            options: script_safe_options(daily_line_chart(&summary.daily_totals)),
        },
        DashboardChart {
            id: "category-donut-chart",
            options: script_safe_options(category_donut_chart(&summary.category_totals)),
        },
    ]
}

/// Serialize `chart` for embedding in an inline script.
///
/// Category names are user input, so `<` is escaped to stop a name like
/// `</script>` from closing the script element early.
fn script_safe_options(chart: Chart) -> String {
    chart.to_string().replace('<', "\\u003c")
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn category_data(category_totals: &BTreeMap<String, f64>) -> Vec<(f64, &str)> {
    category_totals
        .iter()
        .map(|(name, total)| (*total, name.as_str()))
        .collect()
}

fn category_pie_chart(category_totals: &BTreeMap<String, f64>) -> Chart {
    Chart::new()
        .title(Title::new().text("Expenses by Category"))
        .tooltip(item_tooltip())
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius("60%")
                .data(category_data(category_totals)),
        )
}

fn category_donut_chart(category_totals: &BTreeMap<String, f64>) -> Chart {
    Chart::new()
        .title(Title::new().text("Expenses by Category (Donut)"))
        .tooltip(item_tooltip())
        .legend(Legend::new().bottom("0"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(category_data(category_totals)),
        )
}

fn monthly_bar_chart(monthly_totals: &BTreeMap<YearMonth, f64>) -> Chart {
    let labels: Vec<String> = monthly_totals.keys().map(|month| month.to_string()).collect();
    let values: Vec<f64> = monthly_totals.values().copied().collect();

    Chart::new()
        .title(Title::new().text("Monthly Expenses"))
        .tooltip(axis_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis())
        .series(Bar::new().name("Expenses").data(values))
}

fn daily_line_chart(daily_totals: &BTreeMap<Date, f64>) -> Chart {
    let labels: Vec<String> = daily_totals.keys().map(|date| date.to_string()).collect();
    let values: Vec<f64> = daily_totals.values().copied().collect();

    Chart::new()
        .title(Title::new().text("Daily Spending Trend"))
        .tooltip(axis_tooltip())
        .grid(default_grid())
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(currency_axis())
        .series(
            Line::new()
                .name("Expenses")
                .symbol(Symbol::Circle)
                .show_symbol(true)
                .data(values),
        )
}

fn default_grid() -> Grid {
    Grid::new()
        .left("3%")
        .right("4%")
        .bottom("3%")
        .top(60)
        .contain_label(true)
}

fn currency_axis() -> Axis {
    Axis::new()
        .type_(AxisType::Value)
        .axis_label(AxisLabel::new().formatter(currency_formatter()))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

fn axis_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

fn item_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Item)
        .value_formatter(currency_formatter())
}
