//! Hash-signing flow
//!
//! select key source -> dire warning -> show address -> show hash -> signature
//!
//! When no suitable key source is loaded the first step suspends the flow
//! and sends the user to load one; the controller brings them back here
//! once it is in the store.

use lumen_core::{parse_account_index, MessageHash, Signature, StellarPath};
use tracing::info;

use crate::destination::{Destination, FlowId, ViewId};
use crate::error::{FlowError, Result};
use crate::view::{Input, Outcome, Screen, StepContext, View};

use super::{mnemonic_entry, unexpected, LOAD_KEY_SOURCE_OPTIONS};

pub struct SelectKeySourceView;

impl SelectKeySourceView {
    pub fn build(_destination: &Destination) -> Result<Box<dyn View>> {
        Ok(Box::new(SelectKeySourceView))
    }

    fn load_key_source(ctx: &mut StepContext<'_>, option: usize) -> Result<Outcome> {
        let entry = match option {
            0 => Destination::new(ViewId::Scan),
            1 => mnemonic_entry(12, 0),
            2 => mnemonic_entry(24, 0),
            _ => {
                return Err(FlowError::SelectionOutOfRange {
                    view: ViewId::SignHashSelectKeySource,
                    index: ctx.key_sources.len() + option,
                    options: ctx.key_sources.len() + LOAD_KEY_SOURCE_OPTIONS.len(),
                })
            }
        };
        ctx.session.pending_mnemonic = None;
        Ok(Outcome::Subflow {
            entry,
            flow: FlowId::SignHash,
        })
    }
}

impl View for SelectKeySourceView {
    fn screen(&self, ctx: &StepContext<'_>) -> Screen {
        let options = ctx
            .key_sources
            .fingerprints()
            .into_iter()
            .chain(LOAD_KEY_SOURCE_OPTIONS.iter().map(|s| s.to_string()));
        let screen = Screen::menu("Select key source", options);
        match &ctx.session.pending_sign_hash {
            Some(request) => screen.with_body([format!("Path: {}", request.derivation_path)]),
            None => screen,
        }
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        let index = match input {
            Input::Select(index) => index,
            Input::Back => return Ok(Outcome::Back),
            other => return Err(unexpected(ViewId::SignHashSelectKeySource, &other)),
        };

        if index >= ctx.key_sources.len() {
            return Self::load_key_source(ctx, index - ctx.key_sources.len());
        }

        let request = ctx
            .session
            .pending_sign_hash
            .as_ref()
            .ok_or(FlowError::MissingContext {
                view: ViewId::SignHashSelectKeySource,
                what: "sign-hash request",
            })?;
        let account = parse_account_index(&request.derivation_path)?;

        let source = ctx.key_sources.get(index)?;
        let address = ctx.signer.derive_address(source, account)?;
        ctx.session.selected_key_source = Some(index);
        ctx.session.account_index = Some(account);

        let next = if ctx.settings.dire_warnings {
            ViewId::SignHashDireWarning
        } else {
            ViewId::SignHashShowAddress
        };
        Ok(Outcome::Forward(
            Destination::new(next).with_arg("address", address),
        ))
    }
}

pub struct DireWarningView {
    address: String,
}

impl DireWarningView {
    pub fn build(destination: &Destination) -> Result<Box<dyn View>> {
        Ok(Box::new(DireWarningView {
            address: destination.str_arg("address")?.to_string(),
        }))
    }
}

impl View for DireWarningView {
    fn screen(&self, _ctx: &StepContext<'_>) -> Screen {
        Screen::menu("Caution", ["I understand"]).with_body([
            "You are about to sign a raw hash.",
            "The device cannot show what it authorizes.",
            "Only continue if you trust the requester.",
        ])
    }

    fn run(&mut self, _ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        match input {
            Input::Select(0) => Ok(Outcome::Forward(
                Destination::new(ViewId::SignHashShowAddress).with_arg("address", self.address.as_str()),
            )),
            // Backing out of the warning abandons the request
            Input::Back => Ok(Outcome::Root),
            other => Err(unexpected(ViewId::SignHashDireWarning, &other)),
        }
    }
}

pub struct ShowAddressView {
    address: String,
}

impl ShowAddressView {
    pub fn build(destination: &Destination) -> Result<Box<dyn View>> {
        Ok(Box::new(ShowAddressView {
            address: destination.str_arg("address")?.to_string(),
        }))
    }
}

impl View for ShowAddressView {
    fn screen(&self, ctx: &StepContext<'_>) -> Screen {
        let mut body = vec![self.address.clone()];
        if let Some(account) = ctx.session.account_index {
            body.push(format!("Path: {}", StellarPath::new(account)));
        }
        Screen::menu("Signing address", ["Continue", "Abort"]).with_body(body)
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        match input {
            Input::Select(0) => {
                let request = ctx.session.pending_sign_hash.as_ref().ok_or(
                    FlowError::MissingContext {
                        view: ViewId::SignHashShowAddress,
                        what: "sign-hash request",
                    },
                )?;
                Ok(Outcome::Forward(
                    Destination::new(ViewId::SignHashShowHash)
                        .with_arg("hash", request.hash.to_hex()),
                ))
            }
            Input::Select(1) => Ok(Outcome::Root),
            Input::Back => Ok(Outcome::Back),
            other => Err(unexpected(ViewId::SignHashShowAddress, &other)),
        }
    }
}

pub struct ShowHashView {
    hash: MessageHash,
}

impl ShowHashView {
    pub fn build(destination: &Destination) -> Result<Box<dyn View>> {
        let hash = MessageHash::from_hex(destination.str_arg("hash")?)?;
        Ok(Box::new(ShowHashView { hash }))
    }
}

impl View for ShowHashView {
    fn screen(&self, _ctx: &StepContext<'_>) -> Screen {
        Screen::menu("Review hash", ["Sign", "Abort"]).with_body(self.hash.grouped(16))
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        match input {
            Input::Select(0) => {
                let missing = |what| FlowError::MissingContext {
                    view: ViewId::SignHashShowHash,
                    what,
                };
                let index = ctx
                    .session
                    .selected_key_source
                    .ok_or_else(|| missing("selected key source"))?;
                let account = ctx
                    .session
                    .account_index
                    .ok_or_else(|| missing("account index"))?;

                let request = ctx
                    .session
                    .pending_sign_hash
                    .as_ref()
                    .ok_or_else(|| missing("sign-hash request"))?;
                // Only the hash the request carried is ever signed
                if request.hash != self.hash {
                    return Err(missing("sign-hash request for the reviewed hash"));
                }

                let source = ctx.key_sources.get(index)?;
                let signature = ctx
                    .signer
                    .derive_and_sign(source, account, request.hash.as_bytes())?;
                info!(account, fingerprint = source.fingerprint(), "hash signed");

                Ok(Outcome::Forward(
                    Destination::new(ViewId::SignHashShowSignature)
                        .with_arg("signature", signature.to_hex())
                        .clearing_history(),
                ))
            }
            Input::Select(1) => Ok(Outcome::Root),
            Input::Back => Ok(Outcome::Back),
            other => Err(unexpected(ViewId::SignHashShowHash, &other)),
        }
    }
}

pub struct ShowSignatureView {
    signature: Signature,
}

impl ShowSignatureView {
    pub fn build(destination: &Destination) -> Result<Box<dyn View>> {
        let signature = Signature::from_hex(destination.str_arg("signature")?)?;
        Ok(Box::new(ShowSignatureView { signature }))
    }
}

impl View for ShowSignatureView {
    fn screen(&self, _ctx: &StepContext<'_>) -> Screen {
        Screen::qr_display("Signature", self.signature.to_hex(), vec!["Done".to_string()])
            .without_back()
    }

    fn run(&mut self, _ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        match input {
            Input::Select(0) | Input::Back => Ok(Outcome::Root),
            other => Err(unexpected(ViewId::SignHashShowSignature, &other)),
        }
    }
}
