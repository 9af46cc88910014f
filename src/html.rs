use maud::{DOCTYPE, Markup, html};

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "btn btn-primary";
pub const BUTTON_DELETE_STYLE: &str = "btn btn-danger";

// Form styles
pub const FORM_GROUP_STYLE: &str = "form-group";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-control";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "container";

/// The currency sign shown after every sum.
pub const CURRENCY_SIGN: &str = "₽";

pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="ru"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Coffer" }
                link
                    rel="stylesheet"
                    href="https://cdn.jsdelivr.net/npm/bootstrap@3.4.1/dist/css/bootstrap.min.css";
                link
                    rel="stylesheet"
                    href="https://cdn.jsdelivr.net/npm/font-awesome@4.7.0/css/font-awesome.min.css";
                link href="/static/main.css" rel="stylesheet";

                script src="https://cdn.jsdelivr.net/npm/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://cdn.jsdelivr.net/npm/htmx-ext-response-targets@2.0.4/dist/response-targets.min.js" {}

                style
                {
                    r#"
                    #indicator.htmx-indicator {
                        display: none;
                    }

                    #indicator.htmx-request .htmx-indicator {
                        display: inline;
                    }

                    #indicator.htmx-request.htmx-indicator {
                        display: inline;
                    }
                    "#
                }

                script src="/static/app.js" defer {}
            }

            body hx-ext="response-targets"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class=(PAGE_CONTAINER_STYLE)
        {
            div class="text-center"
            {
                h1 class="display-1 text-primary" { (header) }

                p class="lead" { (description) }

                p { (fix) }

                a href="/" class=(BUTTON_PRIMARY_STYLE)
                {
                    "На главную"
                }
            }
        }
    );

    base(title, &content)
}

pub fn loading_spinner() -> Markup {
    html! {
        span
            id="indicator"
            class="htmx-indicator fa fa-spinner fa-spin"
            role="status"
            aria-hidden="true"
        {}
    }
}

/// Format a sum the way it is stored, e.g. "1500.00".
///
/// Negative sums (account balances) keep their minus sign.
pub fn format_sum(sum: f64) -> String {
    format!("{sum:.2}")
}
