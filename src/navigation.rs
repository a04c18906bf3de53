//! The navigation bar shown on every page behind the log-in.

use maud::{Markup, html};

use crate::endpoints;

/// Pages reachable from the navigation bar, in display order.
const PAGES: [(&str, &str); 3] = [
    (endpoints::EXPENSES_VIEW, "Expenses"),
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::CATEGORIES_VIEW, "Categories"),
];

const DESKTOP_LINK_STYLE: &str = "block py-2 px-3 rounded-sm lg:p-0 text-slate-900 \
    hover:bg-slate-100 lg:hover:bg-transparent lg:hover:text-emerald-700 \
    dark:text-white dark:hover:bg-slate-700 lg:dark:hover:text-emerald-400";
const DESKTOP_ACTIVE_LINK_STYLE: &str = "block py-2 px-3 rounded-sm lg:p-0 text-white \
    bg-emerald-700 lg:bg-transparent lg:text-emerald-700 lg:dark:text-emerald-400";

const MOBILE_LINK_STYLE: &str = "flex items-center justify-center w-full min-w-0 px-2.5 py-2 \
    rounded-lg text-xs sm:text-sm font-semibold text-slate-600 hover:bg-emerald-50 \
    hover:text-emerald-700 dark:text-slate-300 dark:hover:bg-emerald-900/20";
const MOBILE_ACTIVE_LINK_STYLE: &str = "flex items-center justify-center w-full min-w-0 px-2.5 \
    py-2 rounded-lg text-xs sm:text-sm font-semibold shadow-sm text-emerald-700 bg-emerald-50 \
    dark:text-emerald-200 dark:bg-emerald-900/30";

/// The navigation bar with the link for the current page highlighted.
pub struct NavBar<'a> {
    active_endpoint: &'a str,
}

impl<'a> NavBar<'a> {
    /// Pages that are not in the bar, such as the add-expense form, highlight nothing.
    pub fn new(active_endpoint: &'a str) -> Self {
        Self { active_endpoint }
    }

    fn links(&self) -> impl Iterator<Item = (&'static str, &'static str, bool)> + '_ {
        PAGES
            .into_iter()
            .map(|(url, title)| (url, title, url == self.active_endpoint))
            .chain([(endpoints::LOG_OUT, "Log out", false)])
    }

    /// A top bar for large screens and a bottom tab bar for small ones.
    pub fn into_html(self) -> Markup {
        html! {
            nav class="bg-white dark:bg-slate-900"
            {
                div class="flex flex-wrap items-center justify-between max-w-screen-xl mx-auto p-4"
                {
                    a
                        href=(endpoints::EXPENSES_VIEW)
                        class="text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Expense Tracker"
                    }

                    ul class="hidden lg:flex lg:flex-row lg:space-x-8 font-medium"
                    {
                        @for (url, title, is_current) in self.links() {
                            li
                            {
                                a
                                    href=(url)
                                    class=(if is_current { DESKTOP_ACTIVE_LINK_STYLE } else { DESKTOP_LINK_STYLE })
                                    aria-current=[is_current.then_some("page")]
                                {
                                    (title)
                                }
                            }
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 px-4 pb-4 lg:hidden"
            {
                ul
                    class="grid grid-cols-4 gap-2 px-4 py-3 rounded-xl border border-slate-200 \
                        bg-white/95 shadow-lg backdrop-blur dark:border-slate-700 dark:bg-slate-900/95"
                    aria-label="Primary"
                {
                    @for (url, title, is_current) in self.links() {
                        li class="min-w-0"
                        {
                            a
                                href=(url)
                                class=(if is_current { MOBILE_ACTIVE_LINK_STYLE } else { MOBILE_LINK_STYLE })
                                aria-current=[is_current.then_some("page")]
                            {
                                span class="truncate" { (title) }
                            }
                        }
                    }
                }
            }
        }
    }
}
