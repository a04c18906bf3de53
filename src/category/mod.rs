//! Expense categories shared by all users.

mod create;
mod db;
mod domain;
mod list;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::{
    create_category, create_category_table, get_all_categories, get_category,
    seed_default_categories,
};
pub use domain::{Category, CategoryId, CategoryName};
pub use list::get_categories_page;

#[cfg(test)]
pub(crate) use db::DEFAULT_CATEGORIES;
