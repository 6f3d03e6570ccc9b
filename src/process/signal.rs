use std::sync::Once;

use super::ProcessError;

static INSTALL: Once = Once::new();

/// Keeps the shell alive when Ctrl-C interrupts a foreground child. The child
/// still gets the default SIGINT behaviour; the shell just returns to its
/// prompt.
pub fn install_interrupt_guard() -> Result<(), ProcessError> {
    let mut result = Ok(());
    INSTALL.call_once(|| {
        result = ctrlc::set_handler(|| {}).map_err(ProcessError::from);
    });
    result
}
