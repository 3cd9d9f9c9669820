//! The UI boundary. The workflow never touches a page directly; it asks a
//! [`View`] to show surfaces, move focus, toggle submit controls and navigate.

use url::Url;

/// Modal surfaces of the account workflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    Closed,
    Registration,
    Verification,
    Login,
}

/// Forms whose submit control and inline errors the workflow drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    Registration,
    Verification,
    Login,
}

/// Navigation controls derived from the stored session flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavState {
    pub logged_in: bool,
    pub email: Option<String>,
}

impl NavState {
    /// Login and register links are visible only while signed out.
    #[must_use]
    pub const fn shows_login_controls(&self) -> bool {
        !self.logged_in
    }

    #[must_use]
    pub const fn shows_logout_control(&self) -> bool {
        self.logged_in
    }
}

pub trait View: Send + Sync {
    fn show_surface(&self, surface: Surface);

    /// Moves focus to one of the six code cells.
    fn focus_cell(&self, index: usize);

    fn set_submit_enabled(&self, form: Form, enabled: bool);

    /// Inline error indicator (or alert) attached to a form.
    fn show_error(&self, form: Form, message: &str);

    fn show_notice(&self, message: &str);

    /// Seconds left before a resend is allowed; `0` re-enables the control.
    fn resend_countdown(&self, remaining: u32);

    /// Rewrites the visible URL without navigating.
    fn replace_url(&self, url: &Url);

    fn redirect(&self, url: &Url);

    fn render_nav(&self, nav: &NavState);
}
