//! Shell completions command.

use clap_complete::Shell;

use crate::error::CcfError;
use crate::features::shell::{completion_install_instructions, generate_completions};

/// Execute completions command
///
/// # Errors
///
/// Returns an error if the completion script cannot be generated.
pub fn completions(shell: Shell, install: bool) -> Result<String, CcfError> {
    if install {
        Ok(completion_install_instructions(shell))
    } else {
        generate_completions(shell)
    }
}
