//! Top-level menu, the root of every flow

use crate::destination::{Destination, ViewId};
use crate::error::Result;
use crate::view::{Input, Outcome, Screen, StepContext, View};

use super::{mnemonic_entry, unexpected};

const SCAN: usize = 0;
const ENTER_12_WORDS: usize = 1;
const ENTER_24_WORDS: usize = 2;

pub struct MainMenuView;

impl MainMenuView {
    pub fn build(_destination: &Destination) -> Result<Box<dyn View>> {
        Ok(Box::new(MainMenuView))
    }
}

impl View for MainMenuView {
    fn screen(&self, ctx: &StepContext<'_>) -> Screen {
        let loaded = match ctx.key_sources.len() {
            0 => "No key sources loaded".to_string(),
            1 => "1 key source loaded".to_string(),
            n => format!("{} key sources loaded", n),
        };
        Screen::menu(
            "Home",
            ["Scan", "Enter 12-word mnemonic", "Enter 24-word mnemonic"],
        )
        .with_body([loaded])
        .without_back()
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        match input {
            Input::Select(SCAN) => Ok(Outcome::Forward(Destination::new(ViewId::Scan))),
            Input::Select(ENTER_12_WORDS) => {
                ctx.session.pending_mnemonic = None;
                Ok(Outcome::Forward(mnemonic_entry(12, 0)))
            }
            Input::Select(ENTER_24_WORDS) => {
                ctx.session.pending_mnemonic = None;
                Ok(Outcome::Forward(mnemonic_entry(24, 0)))
            }
            // Already at the root
            Input::Back => Ok(Outcome::Back),
            other => Err(unexpected(ViewId::MainMenu, &other)),
        }
    }
}
