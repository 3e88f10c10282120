//! Cooperative cancellation, consulted at enumeration boundaries during
//! traversal (§5).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cheaply cloneable cooperative cancellation flag. Enumerations check it
/// between elements and abort with [`crate::error::FormatError::PipelineCancelled`]
/// when set; output already written to the sink before cancellation is
/// retained.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
