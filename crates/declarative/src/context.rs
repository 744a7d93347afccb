//! Progress and confirmation callbacks
//!
//! These traits keep the engine free of any particular terminal UI.

use crate::types::ApplyResult;

/// Progress callback for execution operations
pub trait ProgressCallback: Send {
    /// Called when starting a batch of instances of one kind
    fn on_batch_start(&mut self, kind: &str, count: usize);

    /// Called when an instance completes
    fn on_resource_complete(&mut self, key: &str, result: &ApplyResult);

    /// Called when a batch completes
    fn on_batch_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback {
    /// Ask the user to confirm an action
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _kind: &str, _count: usize) {}
    fn on_resource_complete(&mut self, _key: &str, _result: &ApplyResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}
