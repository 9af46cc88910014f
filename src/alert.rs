//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments that htmx swaps into `#alert-container` (see [base](crate::html::base)).

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded.
    SuccessSimple { message: String },
    /// The action failed.
    Error { message: String, details: String },
}

impl Alert {
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }

    /// Render the alert so that htmx swaps it into `#alert-container` alongside the main response.
    pub fn into_oob_markup(self) -> Markup {
        html! {
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                (self.into_markup())
            }
        }
    }

    fn into_markup(self) -> Markup {
        let (class, message, details) = match self {
            Alert::SuccessSimple { message } => ("alert alert-success", message, String::new()),
            Alert::Error { message, details } => ("alert alert-danger", message, details),
        };

        html! {
            div class=(class) role="alert"
            {
                button
                    type="button"
                    class="close"
                    aria-label="Закрыть"
                    onclick="this.parentElement.remove()"
                {
                    span aria-hidden="true" { "×" }
                }

                strong { (message) }

                @if !details.is_empty()
                {
                    p { (details) }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
