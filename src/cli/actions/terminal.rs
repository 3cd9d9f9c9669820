use crate::hotelituss::{Form, NavState, Surface, View};
use tracing::trace;
use url::Url;

/// Renders workflow effects as lines on stdout, errors on stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalView;

const fn form_label(form: Form) -> &'static str {
    match form {
        Form::Registration => "registration",
        Form::Verification => "verification",
        Form::Login => "login",
    }
}

#[must_use]
pub fn nav_line(nav: &NavState) -> String {
    if nav.shows_logout_control() {
        match &nav.email {
            Some(email) => format!("signed in as {email} [logout]"),
            None => "signed in [logout]".to_string(),
        }
    } else {
        "signed out [login] [register]".to_string()
    }
}

impl View for TerminalView {
    fn show_surface(&self, surface: Surface) {
        match surface {
            Surface::Closed => trace!("surface closed"),
            Surface::Registration => println!("== Create your account =="),
            Surface::Verification => println!("== Enter the 6-character code sent to your email =="),
            Surface::Login => println!("== Sign in =="),
        }
    }

    fn focus_cell(&self, index: usize) {
        trace!(index, "focus code cell");
    }

    fn set_submit_enabled(&self, form: Form, enabled: bool) {
        trace!(form = form_label(form), enabled, "submit control");
    }

    fn show_error(&self, form: Form, message: &str) {
        eprintln!("{} error: {message}", form_label(form));
    }

    fn show_notice(&self, message: &str) {
        println!("{message}");
    }

    fn resend_countdown(&self, remaining: u32) {
        if remaining == 0 {
            println!("You can request a new code now.");
        } else {
            println!("Resend available in {remaining}s");
        }
    }

    fn replace_url(&self, url: &Url) {
        println!("location: {url}");
    }

    fn redirect(&self, url: &Url) {
        println!("redirect: {url}");
    }

    fn render_nav(&self, nav: &NavState) {
        println!("nav: {}", nav_line(nav));
    }
}
