//! Loading a key source: word-by-word entry, optional passphrase, and the
//! final review that adds it to the device's key-source store

use lumen_core::{PendingMnemonic, SUPPORTED_WORD_COUNTS};
use tracing::{debug, info};

use crate::destination::{Destination, ViewId};
use crate::error::{FlowError, Result};
use crate::view::{Input, Outcome, Screen, StepContext, View};

use super::{key_source_finalize, mnemonic_entry, unexpected};

pub struct MnemonicEntryView {
    destination: Destination,
    word_count: usize,
    word_index: usize,
}

impl MnemonicEntryView {
    pub fn build(destination: &Destination) -> Result<Box<dyn View>> {
        let word_count = destination.index_arg("word_count")?;
        if !SUPPORTED_WORD_COUNTS.contains(&word_count) {
            return Err(lumen_core::Error::UnsupportedWordCount(word_count).into());
        }
        let word_index = destination.index_arg("word_index")?;
        if word_index >= word_count {
            return Err(FlowError::MissingArgument {
                view: ViewId::MnemonicEntry,
                arg: "word_index",
            });
        }
        Ok(Box::new(MnemonicEntryView {
            destination: destination.clone(),
            word_count,
            word_index,
        }))
    }
}

impl View for MnemonicEntryView {
    fn screen(&self, _ctx: &StepContext<'_>) -> Screen {
        Screen::text_entry(
            "Enter mnemonic",
            format!("Word {} of {}", self.word_index + 1, self.word_count),
            false,
        )
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        let word = match input {
            Input::Text(word) => word,
            Input::Back => return Ok(Outcome::Back),
            other => return Err(unexpected(ViewId::MnemonicEntry, &other)),
        };

        let pending = match ctx.session.pending_mnemonic.take() {
            Some(pending) if pending.word_count() == self.word_count => pending,
            _ => PendingMnemonic::new(self.word_count)?,
        };
        let pending = ctx.session.pending_mnemonic.insert(pending);

        if !pending.set_word(self.word_index, &word)? {
            debug!(word_index = self.word_index, "word not in wordlist, asking again");
            return Ok(Outcome::Forward(self.destination.clone()));
        }

        if self.word_index + 1 < self.word_count {
            return Ok(Outcome::Forward(mnemonic_entry(
                self.word_count,
                self.word_index + 1,
            )));
        }

        // Last word: the checksum decides whether this is a usable key source
        let source = pending.to_key_source()?;
        Ok(Outcome::Forward(key_source_finalize(source.fingerprint())))
    }
}

pub struct PassphraseEntryView;

impl PassphraseEntryView {
    pub fn build(_destination: &Destination) -> Result<Box<dyn View>> {
        Ok(Box::new(PassphraseEntryView))
    }
}

impl View for PassphraseEntryView {
    fn screen(&self, ctx: &StepContext<'_>) -> Screen {
        let screen = Screen::text_entry("Passphrase", "Enter passphrase", true);
        if ctx.settings.passphrase.requires_passphrase() {
            screen.with_body(["A passphrase is required"])
        } else {
            screen
        }
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        let passphrase = match input {
            Input::Text(passphrase) => passphrase,
            Input::Back => return Ok(Outcome::Back),
            other => return Err(unexpected(ViewId::PassphraseEntry, &other)),
        };

        if passphrase.is_empty() && ctx.settings.passphrase.requires_passphrase() {
            return Ok(Outcome::Forward(Destination::new(ViewId::PassphraseEntry)));
        }

        let pending = ctx
            .session
            .pending_mnemonic
            .as_mut()
            .ok_or(FlowError::MissingContext {
                view: ViewId::PassphraseEntry,
                what: "mnemonic being loaded",
            })?;
        pending.set_passphrase(passphrase);
        let source = pending.to_key_source()?;
        Ok(Outcome::Forward(key_source_finalize(source.fingerprint())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinalizeOption {
    Done,
    Passphrase,
}

pub struct KeySourceFinalizeView {
    fingerprint: String,
}

impl KeySourceFinalizeView {
    pub fn build(destination: &Destination) -> Result<Box<dyn View>> {
        Ok(Box::new(KeySourceFinalizeView {
            fingerprint: destination.str_arg("fingerprint")?.to_string(),
        }))
    }

    fn options(ctx: &StepContext<'_>) -> Vec<FinalizeOption> {
        let policy = ctx.settings.passphrase;
        if !policy.allows_passphrase() {
            vec![FinalizeOption::Done]
        } else if policy.requires_passphrase() && !Self::has_passphrase(ctx) {
            vec![FinalizeOption::Passphrase]
        } else {
            vec![FinalizeOption::Done, FinalizeOption::Passphrase]
        }
    }

    fn has_passphrase(ctx: &StepContext<'_>) -> bool {
        ctx.session
            .pending_mnemonic
            .as_ref()
            .and_then(PendingMnemonic::passphrase)
            .is_some_and(|passphrase| !passphrase.is_empty())
    }
}

impl View for KeySourceFinalizeView {
    fn screen(&self, ctx: &StepContext<'_>) -> Screen {
        let has_passphrase = Self::has_passphrase(ctx);
        let labels = Self::options(ctx).into_iter().map(|option| match option {
            FinalizeOption::Done => "Done",
            FinalizeOption::Passphrase if has_passphrase => "Change passphrase",
            FinalizeOption::Passphrase => "Add passphrase",
        });
        Screen::menu("Finalize key source", labels)
            .with_body([format!("Fingerprint: {}", self.fingerprint)])
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        let options = Self::options(ctx);
        let choice = match input {
            Input::Select(index) => options.get(index).copied().ok_or(
                FlowError::SelectionOutOfRange {
                    view: ViewId::KeySourceFinalize,
                    index,
                    options: options.len(),
                },
            )?,
            Input::Back => return Ok(Outcome::Back),
            other => return Err(unexpected(ViewId::KeySourceFinalize, &other)),
        };

        match choice {
            FinalizeOption::Passphrase => Ok(Outcome::Forward(Destination::new(
                ViewId::PassphraseEntry,
            ))),
            FinalizeOption::Done => {
                let pending = ctx.session.pending_mnemonic.take().ok_or(
                    FlowError::MissingContext {
                        view: ViewId::KeySourceFinalize,
                        what: "mnemonic being loaded",
                    },
                )?;
                let source = pending.to_key_source()?;
                let index = ctx.key_sources.add(source);
                info!(index, fingerprint = %self.fingerprint, "key source ready");
                Ok(Outcome::CompleteSubflow {
                    natural_next: Destination::root(),
                })
            }
        }
    }
}
