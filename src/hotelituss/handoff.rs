//! Cross-origin session handoff.
//!
//! The two origins the site runs under cannot read each other's storage. The
//! redirecting page appends a marker to the target URL; the receiving page
//! consumes it on load, records the session locally, and strips it from the
//! visible URL so a reload does not repeat the write.
//!
//! Markers are assertions, not credentials: anyone can build `?logged=true`.

use url::{form_urlencoded, Url};

const MARKER_VALUE: &str = "true";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// `logged=true`: a login succeeded on the other origin.
    LoggedIn,
    /// `showLogin=true`: open the login surface on arrival.
    ShowLogin,
}

impl Marker {
    pub const ALL: [Self; 2] = [Self::LoggedIn, Self::ShowLogin];

    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::LoggedIn => "logged",
            Self::ShowLogin => "showLogin",
        }
    }

    fn from_pair(name: &str, value: &str) -> Option<Self> {
        if value != MARKER_VALUE {
            return None;
        }
        Self::ALL.into_iter().find(|marker| marker.param() == name)
    }
}

/// Decoded `(name, value)` of one raw `&`-separated query segment.
fn decode_segment(segment: &str) -> Option<(String, String)> {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
}

/// Returns `target` with `marker` set, replacing an existing occurrence.
/// Other query segments are kept exactly as written.
#[must_use]
pub fn attach(target: &Url, marker: Marker) -> Url {
    let pair = format!("{}={MARKER_VALUE}", marker.param());
    let mut segments: Vec<&str> = target
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|segment| {
            !segment.is_empty()
                && decode_segment(segment).map(|(name, _)| name).as_deref() != Some(marker.param())
        })
        .collect();
    segments.push(&pair);

    let mut url = target.clone();
    url.set_query(Some(&segments.join("&")));
    url
}

/// What a page load found in its own URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrival {
    /// The location with recognized markers removed.
    pub url: Url,
    pub logged_in: bool,
    pub show_login: bool,
}

impl Arrival {
    /// Whether the visible URL must be rewritten.
    #[must_use]
    pub const fn consumed_marker(&self) -> bool {
        self.logged_in || self.show_login
    }
}

/// Reads and strips handoff markers from a page location. Other parameters and
/// the fragment are preserved; a query left empty is dropped entirely.
#[must_use]
pub fn inspect(location: &Url) -> Arrival {
    let mut logged_in = false;
    let mut show_login = false;
    let mut kept = Vec::new();

    for segment in location.query().unwrap_or_default().split('&') {
        let marker = decode_segment(segment)
            .and_then(|(name, value)| Marker::from_pair(&name, &value));
        match marker {
            Some(Marker::LoggedIn) => logged_in = true,
            Some(Marker::ShowLogin) => show_login = true,
            None if segment.is_empty() => {}
            None => kept.push(segment),
        }
    }

    let mut url = location.clone();
    if logged_in || show_login {
        let query = kept.join("&");
        url.set_query((!query.is_empty()).then_some(query.as_str()));
    }

    Arrival {
        url,
        logged_in,
        show_login,
    }
}
