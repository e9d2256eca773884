//! Input/rendering collaborator

use std::collections::VecDeque;

use crate::destination::Destination;
use crate::error::{FlowError, Result};
use crate::view::{Input, Screen};

/// Shows a screen and waits for the user's answer
///
/// Returning [`FlowError::InputClosed`] ends the controller loop cleanly.
pub trait Frontend {
    fn present(&mut self, destination: &Destination, screen: &Screen) -> Result<Input>;
}

/// Frontend that replays a fixed list of inputs and records every screen
#[derive(Debug, Default)]
pub struct ScriptedFrontend {
    inputs: VecDeque<Input>,
    shown: Vec<(Destination, Screen)>,
}

impl ScriptedFrontend {
    pub fn new(inputs: impl IntoIterator<Item = Input>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
            shown: Vec::new(),
        }
    }

    /// Screens presented so far, oldest first
    pub fn shown(&self) -> &[(Destination, Screen)] {
        &self.shown
    }

    pub fn last_shown(&self) -> Option<&(Destination, Screen)> {
        self.shown.last()
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl Frontend for ScriptedFrontend {
    fn present(&mut self, destination: &Destination, screen: &Screen) -> Result<Input> {
        self.shown.push((destination.clone(), screen.clone()));
        self.inputs.pop_front().ok_or(FlowError::InputClosed)
    }
}
