use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::SIGINT;

/// Shared stop flag. Writers use `Release`, pollers use `Acquire`.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Sets the token when the process receives SIGINT.
    pub fn cancel_on_interrupt(&self) -> io::Result<()> {
        signal_hook::flag::register(SIGINT, Arc::clone(&self.flag))?;
        Ok(())
    }
}
