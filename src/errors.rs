use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkStashError {
    Config(String),
    FileOperation(String),
    Serialization(String),
    StorageBackendNotFound(String),
    Validation(String),
    NotFound(String),
}

impl LinkStashError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LinkStashError::Config(_) => "E001",
            LinkStashError::FileOperation(_) => "E002",
            LinkStashError::Serialization(_) => "E003",
            LinkStashError::StorageBackendNotFound(_) => "E004",
            LinkStashError::Validation(_) => "E005",
            LinkStashError::NotFound(_) => "E006",
        }
    }

    /// Human readable error category
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkStashError::Config(_) => "Configuration Error",
            LinkStashError::FileOperation(_) => "File Operation Error",
            LinkStashError::Serialization(_) => "Serialization Error",
            LinkStashError::StorageBackendNotFound(_) => "Storage Backend Not Found",
            LinkStashError::Validation(_) => "Validation Error",
            LinkStashError::NotFound(_) => "Resource Not Found",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkStashError::Config(msg)
            | LinkStashError::FileOperation(msg)
            | LinkStashError::Serialization(msg)
            | LinkStashError::StorageBackendNotFound(msg)
            | LinkStashError::Validation(msg)
            | LinkStashError::NotFound(msg) => msg,
        }
    }

    /// Colored output for server startup failures
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// Plain output for CLI mode
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    pub fn http_status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            LinkStashError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkStashError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkStashError::Config(_)
            | LinkStashError::FileOperation(_)
            | LinkStashError::Serialization(_)
            | LinkStashError::StorageBackendNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for LinkStashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkStashError {}

impl LinkStashError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkStashError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkStashError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkStashError::Serialization(msg.into())
    }

    pub fn storage_backend_not_found<T: Into<String>>(msg: T) -> Self {
        LinkStashError::StorageBackendNotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkStashError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkStashError::NotFound(msg.into())
    }
}

impl From<std::io::Error> for LinkStashError {
    fn from(err: std::io::Error) -> Self {
        LinkStashError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkStashError {
    fn from(err: serde_json::Error) -> Self {
        LinkStashError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LinkStashError {
    fn from(err: toml::de::Error) -> Self {
        LinkStashError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LinkStashError {
    fn from(err: toml::ser::Error) -> Self {
        LinkStashError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkStashError>;
