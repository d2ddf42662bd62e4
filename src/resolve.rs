use url::Url;

/// Describes the remote service a session talks to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Service {
    base_url: Option<String>,
}

impl Service {
    pub fn new() -> Self {
        Default::default()
    }

    /// Relative request URLs are joined onto `base_url`.
    pub fn base_url<T>(self, base_url: T) -> Self
    where
        T: Into<String>,
    {
        Service {
            base_url: Some(base_url.into()),
        }
    }

    pub fn get_base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Returns true if `url` carries a scheme.
///
/// Only the scheme is checked (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`),
/// the rest of the URL need not be valid.
pub fn is_absolute_url(url: &str) -> bool {
    let scheme = match url.split_once(':') {
        Some((scheme, _)) => scheme,
        None => return false,
    };
    let mut chars = scheme.chars();
    chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve a request URL against an optional service.
///
/// Absolute URLs are returned as-is. Relative URLs are joined onto the
/// service base URL when there is one, and returned unchanged otherwise.
pub fn resolve_url(url: &str, service: Option<&Service>) -> String {
    if is_absolute_url(url) {
        return url.to_owned();
    }
    let base_url = match service.and_then(Service::get_base_url) {
        Some(base_url) => base_url,
        None => return url.to_owned(),
    };
    match Url::parse(base_url).and_then(|base| base.join(url)) {
        Ok(joined) => joined.into(),
        Err(err) => {
            tracing::warn!(base_url, url, %err, "cannot join url onto service base url");
            url.to_owned()
        }
    }
}
