//! The views the device ships

pub mod key_source;
pub mod main_menu;
pub mod scan;
pub mod sign_hash;

use crate::destination::{Destination, ViewId};
use crate::error::FlowError;
use crate::view::Input;

/// Menu entries offered wherever a key source can be loaded
pub const LOAD_KEY_SOURCE_OPTIONS: [&str; 3] = [
    "Scan a key source",
    "Enter 12-word mnemonic",
    "Enter 24-word mnemonic",
];

pub fn mnemonic_entry(word_count: usize, word_index: usize) -> Destination {
    Destination::new(ViewId::MnemonicEntry)
        .with_arg("word_count", word_count)
        .with_arg("word_index", word_index)
}

pub fn key_source_finalize(fingerprint: &str) -> Destination {
    Destination::new(ViewId::KeySourceFinalize).with_arg("fingerprint", fingerprint)
}

/// Input that got past screen validation but the view has no edge for
pub(crate) fn unexpected(view: ViewId, input: &Input) -> FlowError {
    FlowError::UnexpectedInput {
        view,
        reason: format!("no transition for {:?}", redact(input)),
    }
}

fn redact(input: &Input) -> Input {
    match input {
        Input::Text(_) => Input::Text("<redacted>".to_string()),
        other => other.clone(),
    }
}
