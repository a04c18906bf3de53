//! Assertions about the forms rendered by the expense, category and auth pages.

use scraper::{ElementRef, Html, Selector};

fn select<'a>(element: &ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    let selector = Selector::parse(selector).unwrap();
    element.select(&selector).collect()
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

#[track_caller]
fn find_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    select(form, "input")
        .into_iter()
        .find(|input| input.value().attr("name") == Some(name))
        .unwrap_or_else(|| panic!("form has no input named {name:?}"))
}

#[track_caller]
fn find_submit_button<'a>(form: &ElementRef<'a>) -> ElementRef<'a> {
    let button = select(form, "button")
        .into_iter()
        .next()
        .expect("form has no button");
    assert_eq!(
        button.value().attr("type"),
        Some("submit"),
        "first button in the form should submit it"
    );
    button
}

#[track_caller]
fn assert_required_input_of_type(input: &ElementRef<'_>, type_: &str) {
    let name = input.value().attr("name").unwrap_or_default();
    assert_eq!(
        input.value().attr("type").unwrap_or_default(),
        type_,
        "input {name:?} has the wrong type"
    );
    assert!(
        input.value().attr("required").is_some(),
        "input {name:?} should be required"
    );
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("page has no form")
}

/// Check that `form` sends its request to `endpoint` via the HTMX `attribute`, e.g. `hx-post`.
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    assert_eq!(
        form.value().attr(attribute),
        Some(endpoint),
        "form should have {attribute}=\"{endpoint}\""
    );
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    assert_required_input_of_type(&find_input(form, name), type_);
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    let input = find_input(form, name);
    assert_required_input_of_type(&input, type_);
    assert_eq!(
        input.value().attr("value").unwrap_or_default(),
        value,
        "input {name:?} should keep the submitted value"
    );
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    find_submit_button(form);
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    assert_eq!(text_of(&find_submit_button(form)), text);
}

/// Check the first message paragraph in `form`, which is where field errors are rendered.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let message = select(form, "p")
        .into_iter()
        .next()
        .expect("form shows no error message");

    assert_eq!(text_of(&message), want_error_message);
}
