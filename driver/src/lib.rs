use error_stack::Report;
use kernel::KernelError;

pub mod database;
pub mod error;

/// Reads `key` from the process environment or a `.env` file, falling back to
/// `default` when the variable is not set.
pub fn env_or(key: &str, default: &str) -> error_stack::Result<String, KernelError> {
    match dotenvy::var(key) {
        Ok(value) => Ok(value),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(default.to_string()),
        Err(error) => Err(Report::new(error)
            .change_context(KernelError::Internal)
            .attach_printable(format!("Env {} is not readable", key))),
    }
}
