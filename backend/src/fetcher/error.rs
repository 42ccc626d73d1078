//! Error types for page fetcher operations.
//!
//! Every failure carries a structured [`ErrorContext`] describing which
//! calendar page was being fetched, so a recovered failure can be logged and
//! recorded without losing where it happened.

use std::fmt;

use crate::models::{Direction, Route, YearMonth};

/// Result type for page fetcher operations
pub type FetchResult<T> = Result<T, FetchError>;

/// Structured context for fetch errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "fetch", "read_snapshot")
    pub operation: Option<String>,
    /// Route label such as `PHX<->SEA`
    pub route: Option<String>,
    /// Direction of the leg being fetched
    pub direction: Option<Direction>,
    /// Calendar month of the page
    pub month: Option<YearMonth>,
    /// Additional details about the error
    pub details: Option<String>,
    /// Whether this error is retryable
    pub retryable: bool,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Describe the page being fetched.
    pub fn for_page(mut self, route: Route, direction: Direction, month: YearMonth) -> Self {
        self.route = Some(route.to_string());
        self.direction = Some(direction);
        self.month = Some(month);
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Mark this error as retryable.
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref route) = self.route {
            parts.push(format!("route={}", route));
        }
        if let Some(direction) = self.direction {
            parts.push(format!("direction={}", direction));
        }
        if let Some(month) = self.month {
            parts.push(format!("month={}", month));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        if self.retryable {
            parts.push("retryable=true".to_string());
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for page fetcher operations
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The calendar page could not be loaded (network, browser, I/O).
    #[error("Page load error: {message} {context}")]
    PageLoad {
        message: String,
        context: ErrorContext,
    },

    /// The page loaded but its content could not be parsed.
    #[error("Parse error: {message} {context}")]
    Parse {
        message: String,
        context: ErrorContext,
    },

    /// No calendar exists for the requested page.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// Gave up waiting for the calendar to render.
    #[error("Timeout error: {message} {context}")]
    Timeout {
        message: String,
        context: ErrorContext,
    },

    /// Internal/unexpected errors.
    #[error("Internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl FetchError {
    /// Create a page load error. Load failures are treated as transient.
    pub fn page_load(message: impl Into<String>) -> Self {
        Self::PageLoad {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create a page load error with full context.
    pub fn page_load_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::PageLoad {
            message: message.into(),
            context: context.retryable(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a parse error with context.
    pub fn parse_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Parse {
            message: message.into(),
            context,
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Create a not found error with context.
    pub fn not_found_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            context: ErrorContext::default().retryable(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::PageLoad { context, .. } => context.retryable,
            Self::Timeout { context, .. } => context.retryable,
            Self::Parse { context, .. } => context.retryable,
            _ => false,
        }
    }

    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PageLoad { .. } => "page_load",
            Self::Parse { .. } => "parse",
            Self::NotFound { .. } => "not_found",
            Self::Timeout { .. } => "timeout",
            Self::Internal { .. } => "internal",
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::PageLoad { context, .. } => context,
            Self::Parse { context, .. } => context,
            Self::NotFound { context, .. } => context,
            Self::Timeout { context, .. } => context,
            Self::Internal { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::PageLoad { context, .. }
            | Self::Parse { context, .. }
            | Self::NotFound { context, .. }
            | Self::Timeout { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    /// Add or update the operation in the error context.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Fill in the page coordinates unless the fetcher already did.
    pub fn with_page(mut self, route: Route, direction: Direction, month: YearMonth) -> Self {
        let context = self.context_mut();
        if context.route.is_none() {
            context.route = Some(route.to_string());
        }
        context.direction.get_or_insert(direction);
        context.month.get_or_insert(month);
        self
    }
}

impl From<String> for FetchError {
    fn from(s: String) -> Self {
        FetchError::internal(s)
    }
}

impl From<&str> for FetchError {
    fn from(s: &str) -> Self {
        FetchError::internal(s.to_string())
    }
}
