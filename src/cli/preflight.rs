//! Pre-flight checks before operations that need secrets.

use crate::config::{resolve_api_key, TvdbCredentials};
use crate::error::Result;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Running the agent requires a model API key.
    Agent,
    /// Searching TVDB requires TVDB credentials.
    TvdbSearch,
    /// Wikipedia lookups need nothing.
    Summary,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Agent => {
            resolve_api_key()?;
        }
        Operation::TvdbSearch => {
            TvdbCredentials::from_env()?;
        }
        Operation::Summary => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_summary_no_requirements() {
        assert!(check(Operation::Summary).is_ok());
    }
}
