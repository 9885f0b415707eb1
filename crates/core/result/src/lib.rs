#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;

/// Result type with custom Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error information
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// Type of error and additional information
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub error_type: ErrorType,

    /// Where this error occurred
    pub location: String,
}

/// Possible error types
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorType {
    /// This error was not labeled :(
    LabelMe,

    // ? Auth related errors
    NotAuthenticated,
    AuthFailed {
        message: String,
    },

    // ? Form related errors
    FailedValidation {
        error: String,
    },
    OperationInFlight,

    // ? Collaborator errors
    DatabaseError {
        operation: String,
        collection: String,
    },
    UploadFailed {
        message: String,
    },
    InvalidImage,
    LocationUnavailable {
        message: String,
    },

    // ? General errors
    NotFound,
    InternalError,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_type {
            ErrorType::LabelMe => write!(f, "unlabeled error"),
            ErrorType::NotAuthenticated => write!(f, "not authenticated"),
            ErrorType::AuthFailed { message } => write!(f, "{message}"),
            ErrorType::FailedValidation { error } => write!(f, "validation failed: {error}"),
            ErrorType::OperationInFlight => write!(f, "operation already in flight"),
            ErrorType::DatabaseError {
                operation,
                collection,
            } => write!(f, "database {operation} on {collection} failed"),
            ErrorType::UploadFailed { message } => write!(f, "{message}"),
            ErrorType::InvalidImage => write!(f, "not a valid image"),
            ErrorType::LocationUnavailable { message } => write!(f, "{message}"),
            ErrorType::NotFound => write!(f, "not found"),
            ErrorType::InternalError => write!(f, "internal error"),
        }
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! create_error {
    ( $error: ident $( $tt:tt )? ) => {
        $crate::Error {
            error_type: $crate::ErrorType::$error $( $tt )?,
            location: format!("{}:{}:{}", file!(), line!(), column!()),
        }
    };
}

#[macro_export]
macro_rules! create_database_error {
    ( $operation: expr, $collection: expr ) => {
        create_error!(DatabaseError {
            operation: $operation.to_string(),
            collection: $collection.to_string()
        })
    };
}

#[macro_export]
#[cfg(debug_assertions)]
macro_rules! query {
    ( $self: ident, $type: ident, $collection: expr, $($rest:expr),+ ) => {
        Ok($self.$type($collection, $($rest),+).await.unwrap())
    };
}

#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! query {
    ( $self: ident, $type: ident, $collection: expr, $($rest:expr),+ ) => {
        $self.$type($collection, $($rest),+).await
            .map_err(|_| create_database_error!(stringify!($type), $collection))
    };
}

/// Report the underlying error and collapse it into InternalError
#[macro_export]
macro_rules! report_internal_error {
    ( $expr: expr ) => {
        $expr.map_err(|err| {
            log::error!("internal error: {err:?}");
            create_error!(InternalError)
        })
    };
}
