// Route name of the generic system error view.
pub const ERROR_ROUTE: &str = "ERROR";

// Code shown on the error view when a failure carried no HTTP status at all.
pub const SENTINEL_STATUS: &str = "999";

// What the error view displays. Passed explicitly with the navigation instead of
// living in shared display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    pub code: String,
}

impl ErrorContext {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }

    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(status) => Self::new(status.to_string()),
            None => Self::new(SENTINEL_STATUS),
        }
    }
}

// Redirect demanded by a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    // In-app route change to the error view.
    ErrorPage(ErrorContext),
    // Full navigation to an absolute logout URL.
    Logout { url: String },
}

impl Navigation {
    pub fn error_page(context: ErrorContext) -> Self {
        Navigation::ErrorPage(context)
    }

    // Route name for in-app navigations; logout leaves the app entirely.
    pub fn route_name(&self) -> Option<&'static str> {
        match self {
            Navigation::ErrorPage(_) => Some(ERROR_ROUTE),
            Navigation::Logout { .. } => None,
        }
    }
}

// Result of an endpoint binding call.
// `Redirected` means the caller's normal continuation must not run.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Proceed(T),
    Redirected(Navigation),
}

impl<T> Outcome<T> {
    pub fn proceed(self) -> Option<T> {
        match self {
            Outcome::Proceed(value) => Some(value),
            Outcome::Redirected(_) => None,
        }
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        match self {
            Outcome::Proceed(_) => None,
            Outcome::Redirected(navigation) => Some(navigation),
        }
    }

    pub fn is_redirected(&self) -> bool {
        matches!(self, Outcome::Redirected(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Proceed(value) => Outcome::Proceed(f(value)),
            Outcome::Redirected(navigation) => Outcome::Redirected(navigation),
        }
    }
}
