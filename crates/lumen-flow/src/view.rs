//! The view abstraction: one interactive step of a flow

use lumen_core::{KeySourceStore, Settings, Signer};
use serde::{Deserialize, Serialize};

use crate::context::SessionContext;
use crate::destination::{Destination, FlowId};
use crate::error::Result;

/// What the user did on a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Input {
    /// Pick menu option `i` (zero-based)
    Select(usize),
    /// Go back one step
    Back,
    /// Text typed on the keyboard or decoded from a scanned QR code
    Text(String),
}

/// What a view offers the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub title: String,
    pub body: Vec<String>,
    pub kind: ScreenKind,
    pub show_back: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenKind {
    Menu { options: Vec<String> },
    TextEntry { prompt: String, masked: bool },
    Scan,
    QrDisplay { payload: String, options: Vec<String> },
}

impl Screen {
    pub fn menu<S: Into<String>>(title: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
            kind: ScreenKind::Menu {
                options: options.into_iter().map(Into::into).collect(),
            },
            show_back: true,
        }
    }

    pub fn text_entry(title: impl Into<String>, prompt: impl Into<String>, masked: bool) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
            kind: ScreenKind::TextEntry {
                prompt: prompt.into(),
                masked,
            },
            show_back: true,
        }
    }

    pub fn scan(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
            kind: ScreenKind::Scan,
            show_back: true,
        }
    }

    pub fn qr_display(title: impl Into<String>, payload: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
            kind: ScreenKind::QrDisplay {
                payload: payload.into(),
                options,
            },
            show_back: true,
        }
    }

    pub fn with_body<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.body.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn without_back(mut self) -> Self {
        self.show_back = false;
        self
    }

    /// Menu options, if the screen has any
    pub fn options(&self) -> &[String] {
        match &self.kind {
            ScreenKind::Menu { options } | ScreenKind::QrDisplay { options, .. } => {
                options.as_slice()
            }
            ScreenKind::TextEntry { .. } | ScreenKind::Scan => &[],
        }
    }

    /// Whether the screen accepts free text
    pub fn accepts_text(&self) -> bool {
        matches!(self.kind, ScreenKind::TextEntry { .. } | ScreenKind::Scan)
    }
}

/// What a view asks the controller to do after it ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Forward(Destination),
    Back,
    Root,
    /// Suspend the current flow and start acquiring a prerequisite
    Subflow { entry: Destination, flow: FlowId },
    /// The prerequisite is in place; resume the suspended flow if any
    CompleteSubflow { natural_next: Destination },
}

/// Everything a view may touch while it runs
///
/// The borrows only live for one call, so the view executing now is the
/// single writer of the session.
pub struct StepContext<'a> {
    pub session: &'a mut SessionContext,
    pub key_sources: &'a mut KeySourceStore,
    pub settings: &'a Settings,
    pub signer: &'a dyn Signer,
}

/// One interactive step
///
/// Views are built fresh from their [`Destination`] for every dispatch and
/// dropped afterwards. They never see the back-stack.
pub trait View {
    /// Describe what the user is offered
    fn screen(&self, ctx: &StepContext<'_>) -> Screen;

    /// Handle the user's input
    ///
    /// The input has already been checked against [`View::screen`].
    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_options() {
        let menu = Screen::menu("Main", ["A", "B"]);
        assert_eq!(menu.options().len(), 2);
        assert!(!menu.accepts_text());

        let entry = Screen::text_entry("Word", "word 1", false);
        assert!(entry.options().is_empty());
        assert!(entry.accepts_text());

        let qr = Screen::qr_display("Sig", "abcd", vec!["Done".to_string()]).without_back();
        assert_eq!(qr.options(), ["Done".to_string()]);
        assert!(!qr.show_back);
    }
}
