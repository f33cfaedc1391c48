use thiserror::Error;

/// Result type alias using AffirmError
pub type Result<T> = std::result::Result<T, AffirmError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error surfaced synchronously by Affirm maps to one of these kinds.
/// Each kind has a stable code usable for programmatic handling and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfErrorKind {
    // Configuration (programmer misuse)
    InvalidArgument,
    InvalidMemberPath,
    InvalidMapping,
    MissingMember,
    ReadOnlyMember,
    NoMembersSelected,
    InvalidConfiguration,

    // Pipeline
    NoStepHandled,

    // Assertion outcome
    AssertionFailed,

    // Internal
    Serialization,
    Internal,
}

impl AfErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            AfErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            AfErrorKind::InvalidMemberPath => "ERR_INVALID_MEMBER_PATH",
            AfErrorKind::InvalidMapping => "ERR_INVALID_MAPPING",
            AfErrorKind::MissingMember => "ERR_MISSING_MEMBER",
            AfErrorKind::ReadOnlyMember => "ERR_READ_ONLY_MEMBER",
            AfErrorKind::NoMembersSelected => "ERR_NO_MEMBERS_SELECTED",
            AfErrorKind::InvalidConfiguration => "ERR_INVALID_CONFIGURATION",
            AfErrorKind::NoStepHandled => "ERR_NO_STEP_HANDLED",
            AfErrorKind::AssertionFailed => "ERR_ASSERTION_FAILED",
            AfErrorKind::Serialization => "ERR_SERIALIZATION",
            AfErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is a setup-time programmer error rather than a test outcome
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self,
            AfErrorKind::AssertionFailed | AfErrorKind::Serialization | AfErrorKind::Internal
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus the context needed to locate the
/// offending configuration: the operation, the graph path and the member.
#[derive(Debug, Clone)]
pub struct AfError {
    kind: AfErrorKind,
    op: Option<String>,
    path: Option<String>,
    member: Option<String>,
    type_name: Option<String>,
    message: String,
}

impl AfError {
    /// Create a new error with the specified kind
    pub fn new(kind: AfErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            member: None,
            type_name: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add graph path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add member name context
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = Some(member.into());
        self
    }

    /// Add type name context
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> AfErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the graph path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the member name context, if any
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// Get the type name context, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {})", type_name)?;
        }
        if let Some(member) = &self.member {
            write!(f, " (member: {})", member)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for AfError {}

// ========== End Error Facility ==========

/// Error taxonomy for Affirm operations
///
/// Every variant except `AssertionFailed` is a configuration error: it is
/// raised at setup time and never downgraded to a reported mismatch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AffirmError {
    // ===== Configuration Errors =====
    /// A required argument was empty
    #[error("Argument {argument} cannot be empty")]
    EmptyArgument { argument: String },

    /// A member mapping name contained a path separator
    #[error("The {side} member name cannot be a nested path, but found {name}")]
    NestedMemberName { side: String, name: String },

    /// A configured member path could not be parsed
    #[error("Invalid member path {path}: {reason}")]
    InvalidMemberPath { path: String, reason: String },

    /// A path mapping renames members under different parents
    #[error("The parent of the subject path {subject_path} must match the parent of the expectation path {expectation_path}")]
    MismatchedMappingParents {
        expectation_path: String,
        subject_path: String,
    },

    /// A mapping targets a subject member that does not exist
    #[error("Subject of type {type_name} does not have member {member}")]
    MissingMappedMember { type_name: String, member: String },

    /// An object was given a value for a member its type does not declare
    #[error("Type {type_name} does not declare member {member}")]
    UnknownMember { type_name: String, member: String },

    /// A computed member cannot be assigned
    #[error("Member {member} of type {type_name} is computed and cannot be assigned")]
    ComputedMemberNotWritable { type_name: String, member: String },

    /// Structural comparison found nothing to compare
    #[error("No members were found for comparison of {type_name} at {path}. Please specify some members to include in the comparison or choose a more meaningful assertion.")]
    NoMembersSelected { type_name: String, path: String },

    /// The step plan did not produce a verdict for a node
    #[error("No equivalency step was found to handle the comparison at {path}")]
    NoStepHandled { path: String },

    /// Any other misconfiguration
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    // ===== Assertion Outcome =====
    /// One or more mismatches were reported
    #[error("{message}")]
    AssertionFailed {
        message: String,
        failure_count: usize,
    },

    // ===== Internal =====
    /// A report could not be serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from AffirmError to AfError
impl From<AffirmError> for AfError {
    fn from(err: AffirmError) -> Self {
        match err {
            AffirmError::EmptyArgument { argument } => AfError::new(AfErrorKind::InvalidArgument)
                .with_member(argument)
                .with_message("argument cannot be empty"),

            AffirmError::NestedMemberName { side, name } => {
                AfError::new(AfErrorKind::InvalidMapping)
                    .with_member(name)
                    .with_message(format!("{} member name cannot be a nested path", side))
            }

            AffirmError::InvalidMemberPath { path, reason } => {
                AfError::new(AfErrorKind::InvalidMemberPath)
                    .with_path(path)
                    .with_message(reason)
            }

            AffirmError::MismatchedMappingParents {
                expectation_path,
                subject_path,
            } => AfError::new(AfErrorKind::InvalidMapping)
                .with_path(expectation_path)
                .with_message(format!(
                    "subject path {} does not share the expectation path's parent",
                    subject_path
                )),

            AffirmError::MissingMappedMember { type_name, member } => {
                AfError::new(AfErrorKind::MissingMember)
                    .with_type_name(type_name)
                    .with_member(member)
                    .with_message("mapped subject member does not exist")
            }

            AffirmError::UnknownMember { type_name, member } => {
                AfError::new(AfErrorKind::MissingMember)
                    .with_type_name(type_name)
                    .with_member(member)
                    .with_message("type does not declare this member")
            }

            AffirmError::ComputedMemberNotWritable { type_name, member } => {
                AfError::new(AfErrorKind::ReadOnlyMember)
                    .with_type_name(type_name)
                    .with_member(member)
                    .with_message("computed members cannot be assigned")
            }

            AffirmError::NoMembersSelected { type_name, path } => {
                AfError::new(AfErrorKind::NoMembersSelected)
                    .with_type_name(type_name)
                    .with_path(path)
                    .with_message("no members were selected for structural comparison")
            }

            AffirmError::NoStepHandled { path } => AfError::new(AfErrorKind::NoStepHandled)
                .with_path(path)
                .with_message("no equivalency step handled the node"),

            AffirmError::InvalidConfiguration { reason } => {
                AfError::new(AfErrorKind::InvalidConfiguration).with_message(reason)
            }

            AffirmError::AssertionFailed {
                message,
                failure_count,
            } => AfError::new(AfErrorKind::AssertionFailed).with_message(format!(
                "{} mismatch(es): {}",
                failure_count, message
            )),

            AffirmError::Serialization { message } => {
                AfError::new(AfErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to AffirmError
impl From<serde_json::Error> for AffirmError {
    fn from(err: serde_json::Error) -> Self {
        AffirmError::Serialization {
            message: err.to_string(),
        }
    }
}
