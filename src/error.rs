/// Process exit codes used by [`AppError`].
pub mod exit {
    /// Bad arguments, unreadable/unwritable local files.
    pub const USAGE: u8 = 2;
    /// The sales dataset could not be fetched or parsed.
    pub const DATA_UNAVAILABLE: u8 = 3;
    /// Terminal, server or rendering failures after startup.
    pub const RUNTIME: u8 = 4;
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Startup failure: the dataset source is unreachable or malformed.
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(exit::DATA_UNAVAILABLE, message)
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(exit::USAGE, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(exit::RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn is_data_unavailable(&self) -> bool {
        self.exit_code == exit::DATA_UNAVAILABLE
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
