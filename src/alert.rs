//! Error alerts shown at the top of a page after a rejected form submission.

use maud::{Markup, html};

/// An error message with a headline and optional details.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub message: String,
    pub details: String,
}

impl Alert {
    /// Create an alert without details.
    pub fn error_simple(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: String::new(),
        }
    }

    pub fn into_html(self) -> Markup {
        html! {
            div
                role="alert"
                class="w-full p-4 mb-4 text-red-800 border border-red-300 \
                    rounded-lg bg-red-50 dark:bg-gray-800 dark:text-red-400 \
                    dark:border-red-800"
            {
                span class="font-medium" { (self.message) }

                @if !self.details.is_empty() {
                    p class="text-sm" { (self.details) }
                }
            }
        }
    }
}
