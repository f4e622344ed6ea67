use std::error::Error;
use std::fmt;

/// Error raised by tool operations.
///
/// Variants follow where the failure was observed: caller input, local
/// configuration, the operating system, a missing external dependency,
/// or the Promo Studio web API.
#[derive(Debug)]
pub enum ToolError {
    Validation(String),
    Configuration(String),
    System(String),
    Dependency {
        message: String,
        details: Option<String>,
    },
    Api {
        message: String,
        status: Option<u16>,
    },
}

impl ToolError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    #[must_use]
    pub fn system(message: impl Into<String>) -> Self {
        Self::System(message.into())
    }

    #[must_use]
    pub fn dependency(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Dependency {
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn api(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Api {
            message: message.into(),
            status,
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message)
            | Self::Configuration(message)
            | Self::System(message) => write!(f, "{message}"),
            Self::Dependency { message, details } => {
                write!(f, "{message}")?;
                if let Some(details) = details {
                    write!(f, "\nDetails: {details}")?;
                }
                Ok(())
            }
            Self::Api { message, status } => {
                write!(f, "{message}")?;
                if let Some(status) = status {
                    write!(f, " (status {status})")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for ToolError {}
