use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    dashboard::{
        aggregation::{DashboardSummary, ExpenseRow, summarize},
        cards::kpi_cards_view,
        charts::{ECHARTS_URL, build_dashboard_charts, charts_script, charts_view},
        tables::weekday_table,
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    timezone::local_today,
};

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub db_connection: Arc<Mutex<Connection>>,
    /// Decides which month counts as the current month.
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// KPIs, charts and a weekday breakdown of the user's spending.
///
/// Users without expenses get a prompt to add one instead.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let rows = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        load_expense_rows(user_id, &connection).inspect_err(|error| {
            tracing::error!("Could not load dashboard data for user {user_id}: {error}")
        })?
    };

    let page = match summarize(&rows, today) {
        Some(summary) => summary_page(&summary),
        None => empty_page(),
    };

    Ok(page.into_response())
}

/// The user's expenses joined with their category names, oldest first.
fn load_expense_rows(user_id: UserID, connection: &Connection) -> Result<Vec<ExpenseRow>, Error> {
    let mut statement = connection.prepare(
        "SELECT e.date, e.amount, c.name
        FROM expense e
        JOIN category c ON c.id = e.category_id
        WHERE e.user_id = ?1
        ORDER BY e.date, e.id",
    )?;

    let rows = statement
        .query_map((user_id.as_i64(),), |row| {
            Ok(ExpenseRow {
                date: row.get(0)?,
                amount: row.get(1)?,
                category: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn empty_page() -> Markup {
    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        section class="flex flex-col items-center gap-2 px-6 py-8 mx-auto text-slate-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "No expenses yet" }

            p
            {
                "Your spending summary appears here after "
                (link(endpoints::NEW_EXPENSE_VIEW, "your first expense"))
                "."
            }
        }
    };

    base("Dashboard", &[], &content)
}

fn summary_page(summary: &DashboardSummary) -> Markup {
    let charts = build_dashboard_charts(summary);

    let content = html! {
        (NavBar::new(endpoints::DASHBOARD_VIEW).into_html())

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-xl text-slate-900 dark:text-white"
        {
            (kpi_cards_view(&summary.kpis))
            (charts_view(&charts))
            (weekday_table(&summary.weekday_totals))
        }
    };

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &head_elements, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        NewExpense, PasswordHash, UserID, Username, create_expense, create_user,
        db::initialize,
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{DashboardState, get_dashboard_page};

    fn setup() -> (DashboardState, UserID, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let alice = create_user(
            Username::new_unchecked("alice"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();
        let bob = create_user(
            Username::new_unchecked("bob"),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, alice.id, bob.id)
    }

    fn count(html: &Html, selector: &str) -> usize {
        html.select(&Selector::parse(selector).unwrap()).count()
    }

    #[tokio::test]
    async fn shows_no_data_prompt_without_expenses() {
        let (state, alice, bob) = setup();
        create_expense(
            NewExpense {
                date: date!(2024 - 01 - 05),
                amount: 10.0,
                category_id: 1,
            },
            bob,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = get_dashboard_page(State(state), Extension(alice))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(count(&html, "#charts"), 0);
        assert_eq!(
            count(
                &html,
                &format!("a[href=\"{}\"]", endpoints::NEW_EXPENSE_VIEW)
            ),
            1
        );
    }

    #[tokio::test]
    async fn shows_charts_and_kpis_with_expenses() {
        let (state, alice, _) = setup();
        for (date, amount, category_id) in [
            (date!(2024 - 01 - 05), 10.0, 1),
            (date!(2024 - 01 - 20), 5.0, 1),
            (date!(2024 - 02 - 01), 20.0, 2),
        ] {
            create_expense(
                NewExpense {
                    date,
                    amount,
                    category_id,
                },
                alice,
                &state.db_connection.lock().unwrap(),
            )
            .unwrap();
        }

        let response = get_dashboard_page(State(state), Extension(alice))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(count(&html, "#charts > div > div"), 4);
        assert_eq!(count(&html, "#kpis div[aria-label]"), 4);
        assert_eq!(count(&html, "#weekday-spend tbody tr"), 7);

        let top_category = html
            .select(&Selector::parse("div[aria-label=\"Top Category\"]").unwrap())
            .next()
            .expect("No top category card")
            .text()
            .collect::<String>();
        // Category 2 is "Transport" in the default categories.
        assert!(top_category.contains("Transport"));
    }

    #[tokio::test]
    async fn invalid_timezone_is_an_error() {
        let (mut state, alice, _) = setup();
        state.local_timezone = "Not/AZone".to_owned();

        let result = get_dashboard_page(State(state), Extension(alice)).await;

        assert!(result.is_err());
    }
}
