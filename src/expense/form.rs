//! The expense form shared by the add and edit pages.
//!
//! Fields are kept as strings so that invalid input can be shown back to the
//! user along with a message explaining what is wrong.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    category::{Category, CategoryId},
    expense::{Expense, NewExpense},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        loading_spinner,
    },
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const REQUIRED_MESSAGE: &str = "This field is required.";

/// The raw form data submitted when adding or editing an expense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseFormData {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category_id: String,
}

impl ExpenseFormData {
    /// Pre-fill the form with today's date and no amount or category.
    pub fn with_date(date: Date) -> Self {
        Self {
            date: date.to_string(),
            ..Default::default()
        }
    }
}

impl From<&Expense> for ExpenseFormData {
    fn from(expense: &Expense) -> Self {
        Self {
            date: expense.date.to_string(),
            amount: format!("{:.2}", expense.amount),
            category_id: expense.category_id.to_string(),
        }
    }
}

/// Messages for the fields of an [ExpenseFormData] that failed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFormErrors {
    pub date: Option<String>,
    pub amount: Option<String>,
    pub category_id: Option<String>,
}

impl ExpenseFormErrors {
    /// The message for a category ID that does not match any category.
    pub fn invalid_category() -> Self {
        Self {
            category_id: Some("Select a valid category.".to_owned()),
            ..Default::default()
        }
    }
}

/// Validate `form` against the available `categories`.
///
/// # Errors
///
/// Returns the messages for every invalid field.
pub fn parse_expense_form(
    form: &ExpenseFormData,
    categories: &[Category],
) -> Result<NewExpense, ExpenseFormErrors> {
    let date = parse_date(&form.date);
    let amount = parse_amount(&form.amount);
    let category_id = parse_category_id(&form.category_id, categories);

    match (date, amount, category_id) {
        (Ok(date), Ok(amount), Ok(category_id)) => Ok(NewExpense {
            date,
            amount,
            category_id,
        }),
        (date, amount, category_id) => Err(ExpenseFormErrors {
            date: date.err(),
            amount: amount.err(),
            category_id: category_id.err(),
        }),
    }
}

fn parse_date(raw_date: &str) -> Result<Date, String> {
    let raw_date = raw_date.trim();

    if raw_date.is_empty() {
        return Err(REQUIRED_MESSAGE.to_owned());
    }

    Date::parse(raw_date, DATE_FORMAT)
        .map_err(|_| "Enter a valid date in the format YYYY-MM-DD.".to_owned())
}

fn parse_amount(raw_amount: &str) -> Result<f64, String> {
    let raw_amount = raw_amount.trim();

    if raw_amount.is_empty() {
        return Err(REQUIRED_MESSAGE.to_owned());
    }

    match raw_amount.parse::<f64>() {
        Ok(amount) if !amount.is_finite() => Err("Enter a valid number.".to_owned()),
        Ok(amount) if amount < 0.0 => Err("Amount cannot be negative.".to_owned()),
        Ok(amount) => Ok(amount),
        Err(_) => Err("Enter a valid number.".to_owned()),
    }
}

fn parse_category_id(raw_category_id: &str, categories: &[Category]) -> Result<CategoryId, String> {
    let raw_category_id = raw_category_id.trim();

    if raw_category_id.is_empty() {
        return Err(REQUIRED_MESSAGE.to_owned());
    }

    raw_category_id
        .parse::<CategoryId>()
        .ok()
        .filter(|id| categories.iter().any(|category| category.id == *id))
        .ok_or_else(|| "Select a valid category.".to_owned())
}

/// Render the expense form that submits to `endpoint`.
pub fn expense_form_view(
    endpoint: &str,
    submit_text: &str,
    form: &ExpenseFormData,
    errors: &ExpenseFormErrors,
    categories: &[Category],
) -> Markup {
    let error_message = |message: &Option<String>| {
        html! {
            @if let Some(message) = message {
                p class=(FORM_ERROR_STYLE) { (message) }
            }
        }
    };

    html! {
        form
            hx-post=(endpoint)
            hx-target-error="#alert-container"
            hx-disabled-elt="#submit-button"
            hx-indicator="#indicator"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(form.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                (error_message(&errors.date))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0"
                        placeholder="0.00"
                        value=(form.amount)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (error_message(&errors.amount))
            }

            div
            {
                label for="category_id" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    name="category_id"
                    id="category_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select a category" }

                    @for category in categories {
                        @let is_selected = form.category_id.trim() == category.id.to_string();
                        option value=(category.id) selected[is_selected] { (category.name) }
                    }
                }

                (error_message(&errors.category_id))
            }

            button
                type="submit"
                id="submit-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                (submit_text)
            }
        }
    }
}
