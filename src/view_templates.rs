//! The shared page skeleton and styling constants for the HTML views.

use maud::{DOCTYPE, Markup, html};

/// Wrap `content` in the shared page skeleton.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Daftar" }
                link href="/static/main.css" rel="stylesheet";

                script src="https://unpkg.com/htmx.org@2.0.8" defer {}

                style
                {
                    r#"
                    .htmx-indicator {
                        display: none;
                    }

                    .htmx-request .htmx-indicator {
                        display: inline;
                    }
                    "#
                }
            }

            body
            {
                (content)
            }
        }
    }
}

/// Render an inline error banner for htmx swaps.
pub fn error_banner(title: &str, message: &str) -> Markup {
    html! {
        div class="error-banner" role="alert"
        {
            strong { (title) }
            p { (message) }
        }
    }
}

pub const FORM_LABEL_STYLE: &str = "form-label";
pub const FORM_TEXT_INPUT_STYLE: &str = "form-input";
pub const BUTTON_PRIMARY_STYLE: &str = "btn btn-primary";
