//! Turns a `PresentationView` into the HTML fragment the host embeds in its
//! sign-in page.
//!
//! Both forms are Handlebars templates compiled into the binary and registered
//! once. Every value is HTML-escaped by Handlebars and never parsed as a
//! template itself.

mod strings;

pub use strings::{strings, Locale, Strings};

use crate::ceremony::PresentationView;
use anyhow::{anyhow, Result};
use handlebars::Handlebars;
use serde::Serialize;

const AUTH_FORM: &str = "auth_form";
const ERROR_FORM: &str = "error_form";

#[derive(Serialize)]
struct Common<'a> {
    company: &'a str,
    support: &'a str,
    support_label: &'static str,
}

#[derive(Serialize)]
struct AuthForm<'a> {
    code: &'a str,
    status: &'a str,
    qr_payload: &'a str,
    heading: &'static str,
    instructions: &'static str,
    open_app: &'static str,
    continue_label: &'static str,
    #[serde(flatten)]
    common: Common<'a>,
}

#[derive(Serialize)]
struct ErrorForm<'a> {
    message: &'a str,
    error_heading: &'static str,
    #[serde(flatten)]
    common: Common<'a>,
}

#[derive(Clone)]
pub struct Renderer {
    handlebars: Handlebars<'static>,
    company_name: String,
    support_email: String,
}

impl Renderer {
    /// Register the form templates.
    ///
    /// # Errors
    /// Returns an error if a bundled template does not parse.
    pub fn new(company_name: String, support_email: String) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        handlebars.register_template_string(AUTH_FORM, include_str!("html/auth_form.html"))?;
        handlebars.register_template_string(ERROR_FORM, include_str!("html/error_form.html"))?;

        Ok(Self {
            handlebars,
            company_name,
            support_email,
        })
    }

    #[must_use]
    pub fn page_title(&self, locale: Locale) -> &'static str {
        strings(locale).page_title
    }

    /// # Errors
    /// Returns an error if the template cannot be rendered.
    pub fn form_html(&self, view: &PresentationView, locale: Locale) -> Result<String> {
        let text = strings(locale);
        let common = Common {
            company: &self.company_name,
            support: &self.support_email,
            support_label: text.support_label,
        };

        let rendered = match view {
            PresentationView::AuthView {
                code,
                status,
                qr_payload,
            } => self.handlebars.render(
                AUTH_FORM,
                &AuthForm {
                    code,
                    status,
                    qr_payload,
                    heading: text.heading,
                    instructions: text.instructions,
                    open_app: text.open_app,
                    continue_label: text.continue_label,
                    common,
                },
            ),
            PresentationView::ErrorView { message } => self.handlebars.render(
                ERROR_FORM,
                &ErrorForm {
                    message,
                    error_heading: text.error_heading,
                    common,
                },
            ),
        };

        rendered.map_err(|e| anyhow!("Failed to render {} form: {}", locale, e))
    }
}
