//! Session context shared by the steps of one flow

use lumen_core::{PendingMnemonic, SignHashRequest};
use serde::Serialize;

use crate::destination::{Destination, FlowId};

/// Saved re-entry point of a suspended flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Continuation {
    pub flow: FlowId,
    pub resume_at: Destination,
    /// Back-stack depth to restore before resuming
    pub return_depth: usize,
}

/// Where the controller stands with respect to sub-flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ResumeState {
    #[default]
    Normal,
    AwaitingPrerequisite,
    Resuming,
}

/// Mutable state of the active flow
///
/// Created when a flow starts and discarded when it reaches the main menu.
/// Only the controller may record or clear the continuation.
#[derive(Debug, Default)]
pub struct SessionContext {
    /// Index into the key-source store
    pub selected_key_source: Option<usize>,
    /// Account derived from the pending request's path
    pub account_index: Option<u32>,
    /// Hash-signing request waiting for a key source
    pub pending_sign_hash: Option<SignHashRequest>,
    /// Mnemonic being entered or scanned
    pub pending_mnemonic: Option<PendingMnemonic>,
    continuation: Option<Continuation>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn continuation(&self) -> Option<&Continuation> {
        self.continuation.as_ref()
    }

    pub fn has_continuation(&self) -> bool {
        self.continuation.is_some()
    }

    pub(crate) fn set_continuation(&mut self, continuation: Continuation) {
        self.continuation = Some(continuation);
    }

    pub(crate) fn continuation_mut(&mut self) -> Option<&mut Continuation> {
        self.continuation.as_mut()
    }

    pub(crate) fn take_continuation(&mut self) -> Option<Continuation> {
        self.continuation.take()
    }
}
