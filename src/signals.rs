//! Interrupt/signal handling for graceful shutdown
//!
//! Ctrl+C cancels the pipeline's [`CancellationToken`], which force-closes any
//! open credential prompt. A second Ctrl+C exits immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

use crate::status::ExitStatus;

/// Global flag for Ctrl+C interrupt handling
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Check if the application was interrupted (Ctrl+C pressed)
#[inline]
pub fn was_interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

/// Install the Ctrl+C handler; interrupts cancel `token`
pub fn install_interrupt_handler(token: CancellationToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        // Second interrupt - force exit without cleanup
        if INTERRUPTED.swap(true, Ordering::SeqCst) {
            std::process::exit(ExitStatus::Interrupted as i32);
        }
        eprintln!("\nInterrupted");
        token.cancel();
    })
}
