//! Camera step: decodes whatever QR code the user points the device at

use lumen_core::{Error as CoreError, ScanPayload};
use tracing::{debug, info};

use crate::destination::{Destination, ViewId};
use crate::error::Result;
use crate::view::{Input, Outcome, Screen, StepContext, View};

use super::{key_source_finalize, unexpected};

pub struct ScanView;

impl ScanView {
    pub fn build(_destination: &Destination) -> Result<Box<dyn View>> {
        Ok(Box::new(ScanView))
    }
}

impl View for ScanView {
    fn screen(&self, ctx: &StepContext<'_>) -> Screen {
        let hint = if ctx.session.has_continuation() {
            "Scan a SeedQR or mnemonic"
        } else {
            "Scan a SeedQR, mnemonic or sign-hash request"
        };
        Screen::scan("Scan").with_body([hint])
    }

    fn run(&mut self, ctx: &mut StepContext<'_>, input: Input) -> Result<Outcome> {
        let payload = match input {
            Input::Text(payload) => payload,
            Input::Back => return Ok(Outcome::Back),
            other => return Err(unexpected(ViewId::Scan, &other)),
        };

        let decoded = ScanPayload::parse(&payload)?;
        debug!(kind = decoded.kind(), "scan decoded");

        match decoded {
            ScanPayload::SignHash(request) => {
                // A key-source sub-flow cannot start a second signing request
                if ctx.session.has_continuation() {
                    return Err(CoreError::UnrecognizedPayload(
                        "expected a key source, got a sign-hash request".to_string(),
                    )
                    .into());
                }
                info!(path = %request.derivation_path, "sign-hash request received");
                ctx.session.pending_sign_hash = Some(request);
                Ok(Outcome::Forward(Destination::new(
                    ViewId::SignHashSelectKeySource,
                )))
            }
            ScanPayload::KeySource(pending) => {
                let source = pending.to_key_source()?;
                ctx.session.pending_mnemonic = Some(pending);
                Ok(Outcome::Forward(key_source_finalize(source.fingerprint())))
            }
        }
    }
}
