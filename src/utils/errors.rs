#![forbid(unsafe_code)]

use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("greeting_server input parameters:\n{}", .0)]
    InputParms(String),

    /// Inaccessible logger configuration file.
    #[error("Unable to access the Log4rs configuration file: {}", .0)]
    Log4rsInitialization(String),

    #[error("Reading application configuration file: {}", .0)]
    ReadingConfigFile(String),

    #[error("Unable to parse TOML file: {}", .0)]
    TOMLParseError(String),

    #[error("Data directory error: {}", .0)]
    DirectoryError(String),

    /// Client input rejected by a handler.  The message is returned verbatim.
    #[error("{}", .0)]
    InvalidArgument(String),

    #[error("Greeting store error: {}", .0)]
    StoreError(String),

    #[error("Template error: {}", .0)]
    TemplateError(String),
}
