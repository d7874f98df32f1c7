use thiserror::Error;

/// Which engine rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A declaration was malformed or conflicted with an earlier one.
    Specification,
    /// An argument sequence did not satisfy the declared options.
    Parse,
}

/// Error raised by the specification compiler or the matching engine.
///
/// Both kinds are fatal to the call that produced them; nothing is recovered
/// or partially returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid option specification: {0}")]
    Specification(String),

    #[error("invalid arguments: {0}")]
    Parse(String),
}

impl Error {
    pub(crate) fn spec(msg: impl Into<String>) -> Self {
        Self::Specification(msg.into())
    }

    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Specification(_) => ErrorKind::Specification,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }

    /// The human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Specification(msg) | Self::Parse(msg) => msg.as_str(),
        }
    }

    pub fn is_specification(&self) -> bool {
        self.kind() == ErrorKind::Specification
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}

pub type Result<T> = std::result::Result<T, Error>;
