//! Lumen Flow - navigation and flow control for the air-gapped signer
//!
//! A flow is a sequence of [`View`]s, each named by a [`Destination`]. The
//! [`FlowController`] runs the view for the current destination with the
//! user's input, records the result in the [`BackStack`], and can suspend a
//! flow while a missing prerequisite (a key source) is acquired, resuming it
//! at the exact step that asked for it.
//!
//! ```text
//! MainMenu ─► Scan ─► SignHashSelectKeySource ─► DireWarning ─► ShowAddress ─► ShowHash ─► ShowSignature
//!                            │        ▲
//!                            ▼        │ resume
//!                     Scan / MnemonicEntry ─► KeySourceFinalize
//! ```

pub mod back_stack;
pub mod context;
pub mod controller;
pub mod destination;
pub mod error;
pub mod frontend;
pub mod registry;
pub mod view;
pub mod views;

pub use back_stack::BackStack;
pub use context::{Continuation, ResumeState, SessionContext};
pub use controller::FlowController;
pub use destination::{ArgValue, Destination, FlowId, ViewArgs, ViewId};
pub use error::{FlowError, Result};
pub use frontend::{Frontend, ScriptedFrontend};
pub use registry::{ViewFactory, ViewRegistry};
pub use view::{Input, Outcome, Screen, ScreenKind, StepContext, View};
