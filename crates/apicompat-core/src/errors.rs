use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that can surface from snapshot decoding, configuration
/// loading or the CLI maps to one of these kinds. Each kind has a stable
/// error code for programmatic handling and tests. The comparison engine
/// itself never produces errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Snapshot decoding
    /// Snapshot bytes are not valid UTF-8 JSON or do not match the document shape
    InvalidSnapshot,
    /// `schema_version` is not one this build understands
    UnsupportedSchema,
    /// The same name appears twice within one declaration category or package list
    DuplicateDeclaration,
    /// A declaration is structurally malformed (bad variadic signature, dotted name)
    InvalidDeclaration,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::UnsupportedSchema => "ERR_UNSUPPORTED_SCHEMA",
            ExErrorKind::DuplicateDeclaration => "ERR_DUPLICATE_DECLARATION",
            ExErrorKind::InvalidDeclaration => "ERR_INVALID_DECLARATION",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the package and
/// declaration the failure refers to, when known.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    package: Option<String>,
    decl: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            package: None,
            decl: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add package path context
    pub fn with_package(mut self, path: impl Into<String>) -> Self {
        self.package = Some(path.into());
        self
    }

    /// Add declaration name context
    pub fn with_decl(mut self, name: impl Into<String>) -> Self {
        self.decl = Some(name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
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

    /// Get the package path context, if any
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }

    /// Get the declaration name context, if any
    pub fn decl(&self) -> Option<&str> {
        self.decl.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(package) = &self.package {
            write!(f, " (package: {})", package)?;
        }
        if let Some(decl) = &self.decl {
            write!(f, " (decl: {})", decl)?;
        }
        if let Some(source) = &self.source {
            write!(f, " <- {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised while building or decoding snapshots
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiCompatError {
    /// Two declarations in the same category share a name
    #[error("Duplicate {category} declaration {name} in package {package}")]
    DuplicateDeclaration {
        package: String,
        category: &'static str,
        name: String,
    },

    /// The same package path appears twice in one document
    #[error("Duplicate package path: {package}")]
    DuplicatePackage { package: String },

    /// A type member name is used both as a method and as a free function
    #[error("Type {type_name} in package {package} has both a method and a function named {member}")]
    MemberNameClash {
        package: String,
        type_name: String,
        member: String,
    },

    /// Variadic flag set on a signature whose last parameter is not a slice
    #[error("Function {name} in package {package} is variadic but its last parameter is not a slice")]
    InvalidVariadic { package: String, name: String },

    /// Declaration names are plain identifiers; `.` is reserved for qualified member keys
    #[error("Declaration name {name:?} in package {package} is not a plain identifier")]
    InvalidName { package: String, name: String },

    /// Snapshot document uses a schema version this build cannot read
    #[error("Unsupported snapshot schema_version {found}, expected {expected}")]
    UnsupportedSchema { found: u32, expected: u32 },

    /// Serialization error (JSON/TOML encoding or decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from ApiCompatError to ExError
impl From<ApiCompatError> for ExError {
    fn from(err: ApiCompatError) -> Self {
        let message = err.to_string();
        match err {
            ApiCompatError::DuplicateDeclaration { package, name, .. } => {
                ExError::new(ExErrorKind::DuplicateDeclaration)
                    .with_package(package)
                    .with_decl(name)
                    .with_message(message)
            }
            ApiCompatError::DuplicatePackage { package } => {
                ExError::new(ExErrorKind::DuplicateDeclaration)
                    .with_package(package)
                    .with_message(message)
            }
            ApiCompatError::MemberNameClash {
                package,
                type_name,
                member,
            } => ExError::new(ExErrorKind::DuplicateDeclaration)
                .with_package(package)
                .with_decl(format!("{}.{}", type_name, member))
                .with_message(message),
            ApiCompatError::InvalidVariadic { package, name } => {
                ExError::new(ExErrorKind::InvalidDeclaration)
                    .with_package(package)
                    .with_decl(name)
                    .with_message(message)
            }
            ApiCompatError::InvalidName { package, name } => {
                ExError::new(ExErrorKind::InvalidDeclaration)
                    .with_package(package)
                    .with_decl(name)
                    .with_message(message)
            }
            ApiCompatError::UnsupportedSchema { .. } => {
                ExError::new(ExErrorKind::UnsupportedSchema).with_message(message)
            }
            ApiCompatError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ApiCompatError {
    fn from(err: serde_json::Error) -> Self {
        ApiCompatError::Serialization {
            message: err.to_string(),
        }
    }
}
