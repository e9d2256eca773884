//! Destinations: immutable descriptors of the next step of a flow

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, Result};

/// Every step the device knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewId {
    MainMenu,
    Scan,
    MnemonicEntry,
    PassphraseEntry,
    KeySourceFinalize,
    SignHashSelectKeySource,
    SignHashDireWarning,
    SignHashShowAddress,
    SignHashShowHash,
    SignHashShowSignature,
}

impl ViewId {
    pub const ALL: [ViewId; 10] = [
        ViewId::MainMenu,
        ViewId::Scan,
        ViewId::MnemonicEntry,
        ViewId::PassphraseEntry,
        ViewId::KeySourceFinalize,
        ViewId::SignHashSelectKeySource,
        ViewId::SignHashDireWarning,
        ViewId::SignHashShowAddress,
        ViewId::SignHashShowHash,
        ViewId::SignHashShowSignature,
    ];
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Flows that can be suspended while a prerequisite is acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowId {
    SignHash,
}

/// A single view argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Str(String),
    Int(i64),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Str(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Int(value)
    }
}

impl From<usize> for ArgValue {
    fn from(value: usize) -> Self {
        ArgValue::Int(value as i64)
    }
}

pub type ViewArgs = BTreeMap<String, ArgValue>;

/// Where the flow goes next
///
/// Equality and hashing only consider the view and its arguments:
/// `clear_history` is an instruction to the controller, not part of the
/// destination's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Destination {
    pub view: ViewId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: ViewArgs,
    #[serde(default)]
    pub clear_history: bool,
}

impl Destination {
    pub fn new(view: ViewId) -> Self {
        Self {
            view,
            args: ViewArgs::new(),
            clear_history: false,
        }
    }

    /// The top-level menu every flow starts from and returns to
    pub fn root() -> Self {
        Self::new(ViewId::MainMenu)
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<ArgValue>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    /// Mark this destination as the start of a fresh history
    pub fn clearing_history(mut self) -> Self {
        self.clear_history = true;
        self
    }

    pub fn is_root(&self) -> bool {
        *self == Self::root()
    }

    pub fn str_arg(&self, key: &'static str) -> Result<&str> {
        match self.args.get(key) {
            Some(ArgValue::Str(value)) => Ok(value),
            _ => Err(self.missing(key)),
        }
    }

    pub fn int_arg(&self, key: &'static str) -> Result<i64> {
        match self.args.get(key) {
            Some(ArgValue::Int(value)) => Ok(*value),
            _ => Err(self.missing(key)),
        }
    }

    /// Integer argument that must fit a `usize`
    pub fn index_arg(&self, key: &'static str) -> Result<usize> {
        self.int_arg(key)
            .and_then(|value| usize::try_from(value).map_err(|_| self.missing(key)))
    }

    fn missing(&self, arg: &'static str) -> FlowError {
        FlowError::MissingArgument {
            view: self.view,
            arg,
        }
    }
}

impl PartialEq for Destination {
    fn eq(&self, other: &Self) -> bool {
        self.view == other.view && self.args == other.args
    }
}

impl Eq for Destination {}

impl Hash for Destination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.view.hash(state);
        self.args.hash(state);
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.view)?;
        if !self.args.is_empty() {
            let args = serde_json::to_string(&self.args).map_err(|_| fmt::Error)?;
            write!(f, " {}", args)?;
        }
        Ok(())
    }
}
