//! Flow controller: runs views, owns the back-stack and session, and
//! suspends/resumes flows around missing prerequisites

use lumen_core::{KeySource, KeySourceStore, Settings, SignHashRequest, Signer};
use tracing::{debug, error, info, warn};

use crate::back_stack::BackStack;
use crate::context::{Continuation, ResumeState, SessionContext};
use crate::destination::{Destination, FlowId, ViewId};
use crate::error::{FlowError, Result};
use crate::frontend::Frontend;
use crate::registry::ViewRegistry;
use crate::view::{Input, Outcome, Screen, StepContext};

pub struct FlowController {
    registry: ViewRegistry,
    back_stack: BackStack,
    session: SessionContext,
    key_sources: KeySourceStore,
    settings: Settings,
    signer: Box<dyn Signer>,
    resume_state: ResumeState,
}

impl FlowController {
    /// Controller with the standard views
    pub fn new(settings: Settings, signer: Box<dyn Signer>) -> Self {
        Self::with_registry(ViewRegistry::standard(), settings, signer)
    }

    pub fn with_registry(registry: ViewRegistry, settings: Settings, signer: Box<dyn Signer>) -> Self {
        Self {
            registry,
            back_stack: BackStack::with_max_depth(Destination::root(), settings.max_history),
            session: SessionContext::new(),
            key_sources: KeySourceStore::new(),
            settings,
            signer,
            resume_state: ResumeState::Normal,
        }
    }

    pub fn root(&self) -> &Destination {
        self.back_stack.root()
    }

    /// The step the user is on
    pub fn current(&self) -> Destination {
        self.back_stack.current()
    }

    pub fn back_stack(&self) -> &BackStack {
        &self.back_stack
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn key_sources(&self) -> &KeySourceStore {
        &self.key_sources
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn resume_state(&self) -> ResumeState {
        self.resume_state
    }

    /// Load a key source outside of any flow, returning its store index
    pub fn add_key_source(&mut self, source: KeySource) -> usize {
        self.key_sources.add(source)
    }

    /// Start a new hash-signing flow for a request that arrived from outside
    pub fn begin_sign_hash(&mut self, request: SignHashRequest) -> Destination {
        self.abort_to_root();
        info!(path = %request.derivation_path, "sign-hash flow started");
        self.session.pending_sign_hash = Some(request);
        self.navigate_to(Destination::new(ViewId::SignHashSelectKeySource))
    }

    /// Describe a destination without running it
    pub fn screen(&mut self, destination: &Destination) -> Result<Screen> {
        let view = self.registry.instantiate(destination)?;
        let ctx = StepContext {
            session: &mut self.session,
            key_sources: &mut self.key_sources,
            settings: &self.settings,
            signer: self.signer.as_ref(),
        };
        Ok(view.screen(&ctx))
    }

    /// Dispatch the current step
    pub fn step(&mut self, input: Input) -> Result<Destination> {
        let current = self.current();
        self.dispatch(&current, input)
    }

    /// Run one step and return where the flow goes next
    ///
    /// `current` must be the step on top of the back-stack. Contract
    /// violations abort the flow and are returned as errors. Any other
    /// failure aborts the flow and lands on the root destination.
    pub fn dispatch(&mut self, current: &Destination, input: Input) -> Result<Destination> {
        let top = self.back_stack.current();
        if *current != top {
            let e = FlowError::NotCurrent {
                requested: current.view,
                current: top.view,
            };
            return self.fail(current, e);
        }
        if self.resume_state == ResumeState::Resuming {
            self.resume_state = ResumeState::Normal;
        }

        let outcome = match self.run_view(current, input) {
            Ok(outcome) => outcome,
            Err(e) => return self.fail(current, e),
        };
        debug!(%current, ?outcome, "view finished");

        let next = self.apply(current, outcome);
        match self.registry.instantiate(&next) {
            Ok(_) => Ok(next),
            Err(e) => self.fail(&next, e),
        }
    }

    /// Go back one step
    ///
    /// At the root this returns the root unchanged. While a sub-flow is
    /// pending, going back abandons it and returns to the root.
    pub fn navigate_back(&mut self) -> Destination {
        if let Some(continuation) = self.session.continuation() {
            info!(flow = ?continuation.flow, "back during sub-flow, abandoning");
            return self.abort_to_root();
        }

        let previous = self.back_stack.pop();
        if previous.is_root() {
            self.reset_session();
        }
        debug!(%previous, "navigated back");
        previous
    }

    /// Suspend the flow at `resume_at` and start the sub-flow at `entry`
    ///
    /// If a sub-flow is already pending its continuation is kept: the outer
    /// flow is the one that resumes.
    pub fn request_subflow(
        &mut self,
        entry: Destination,
        flow: FlowId,
        resume_at: Destination,
    ) -> Destination {
        if let Some(outer) = self.session.continuation() {
            debug!(outer = ?outer.flow, nested = ?flow, "nested sub-flow, keeping outer continuation");
            return self.navigate_to(entry);
        }

        if self.back_stack.current() != resume_at {
            self.navigate_to(resume_at.clone());
        }
        let continuation = Continuation {
            flow,
            return_depth: self.back_stack.len(),
            resume_at,
        };
        info!(?flow, resume_at = %continuation.resume_at, "sub-flow requested");
        self.session.set_continuation(continuation);
        self.resume_state = ResumeState::AwaitingPrerequisite;
        self.navigate_to(entry)
    }

    /// Finish a sub-flow
    ///
    /// Returns to the saved resume point if a flow is suspended, otherwise
    /// proceeds to `natural_next`.
    pub fn complete_subflow(&mut self, natural_next: Destination) -> Destination {
        let Some(continuation) = self.session.take_continuation() else {
            return self.navigate_to(natural_next);
        };

        info!(flow = ?continuation.flow, resume_at = %continuation.resume_at, "resuming flow");
        self.back_stack.truncate(continuation.return_depth);
        self.resume_state = ResumeState::Resuming;
        let resume_at = continuation.resume_at;
        if resume_at.is_root() {
            self.back_stack.clear();
        } else {
            self.back_stack.push(resume_at.clone());
        }
        resume_at
    }

    /// Drop the flow entirely and return to the root
    pub fn abort_to_root(&mut self) -> Destination {
        self.back_stack.clear();
        self.reset_session();
        self.root().clone()
    }

    /// Drive the flow with a frontend until its input closes
    pub fn run(&mut self, frontend: &mut dyn Frontend) -> Result<()> {
        loop {
            let current = self.current();
            let screen = match self.screen(&current) {
                Ok(screen) => screen,
                Err(e) => {
                    self.fail(&current, e)?;
                    continue;
                }
            };

            let input = match frontend.present(&current, &screen) {
                Ok(input) => input,
                Err(FlowError::InputClosed) => {
                    info!("input closed, leaving flow");
                    return Ok(());
                }
                Err(e) => return Err(e),
            };

            self.dispatch(&current, input)?;
        }
    }

    fn run_view(&mut self, destination: &Destination, input: Input) -> Result<Outcome> {
        let mut view = self.registry.instantiate(destination)?;
        let mut ctx = StepContext {
            session: &mut self.session,
            key_sources: &mut self.key_sources,
            settings: &self.settings,
            signer: self.signer.as_ref(),
        };
        let screen = view.screen(&ctx);
        validate_input(destination.view, &screen, &input)?;
        view.run(&mut ctx, input)
    }

    fn apply(&mut self, current: &Destination, outcome: Outcome) -> Destination {
        match outcome {
            Outcome::Forward(next) => self.navigate_to(next),
            Outcome::Back => self.navigate_back(),
            Outcome::Root => self.abort_to_root(),
            Outcome::Subflow { entry, flow } => self.request_subflow(entry, flow, current.clone()),
            Outcome::CompleteSubflow { natural_next } => self.complete_subflow(natural_next),
        }
    }

    fn navigate_to(&mut self, destination: Destination) -> Destination {
        if destination.is_root() {
            info!("flow finished");
            return self.abort_to_root();
        }

        if destination.clear_history {
            self.back_stack.clear();
            if let Some(continuation) = self.session.continuation_mut() {
                continuation.return_depth = 0;
            }
        }

        if let Some(evicted) = self.back_stack.push(destination.clone()) {
            debug!(%evicted, "history full, dropped oldest entry");
            if let Some(continuation) = self.session.continuation_mut() {
                continuation.return_depth = continuation.return_depth.saturating_sub(1);
            }
        }
        destination
    }

    fn fail(&mut self, destination: &Destination, e: FlowError) -> Result<Destination> {
        if e.is_contract_violation() {
            error!(%destination, error = %e, "flow contract violated");
            self.abort_to_root();
            Err(e)
        } else {
            warn!(%destination, error = %e, "flow aborted");
            Ok(self.abort_to_root())
        }
    }

    fn reset_session(&mut self) {
        self.session = SessionContext::new();
        self.resume_state = ResumeState::Normal;
    }
}

fn validate_input(view: ViewId, screen: &Screen, input: &Input) -> Result<()> {
    match input {
        Input::Back => Ok(()),
        Input::Select(_) if screen.accepts_text() => Err(FlowError::UnexpectedInput {
            view,
            reason: "selection on a text screen".to_string(),
        }),
        Input::Select(index) if *index >= screen.options().len() => {
            Err(FlowError::SelectionOutOfRange {
                view,
                index: *index,
                options: screen.options().len(),
            })
        }
        Input::Select(_) => Ok(()),
        Input::Text(_) if screen.accepts_text() => Ok(()),
        Input::Text(_) => Err(FlowError::UnexpectedInput {
            view,
            reason: "text on a menu".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Ed25519Signer, MessageHash};

    const PHRASE: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn controller() -> FlowController {
        FlowController::new(Settings::default(), Box::new(Ed25519Signer::new()))
    }

    fn request(path: &str) -> SignHashRequest {
        SignHashRequest::new(path, MessageHash::new(vec![0xaa; 32]).unwrap())
    }

    #[test]
    fn test_navigate_back_at_root_is_idempotent() {
        let mut flow = controller();
        assert!(flow.navigate_back().is_root());
        assert!(flow.navigate_back().is_root());
        assert!(flow.back_stack().is_empty());
    }

    #[test]
    fn test_forward_then_back() {
        let mut flow = controller();
        let scan = flow.step(Input::Select(0)).unwrap();
        assert_eq!(scan, Destination::new(ViewId::Scan));
        assert_eq!(flow.back_stack().len(), 1);
        assert!(flow.step(Input::Back).unwrap().is_root());
        assert!(flow.back_stack().is_empty());
    }

    #[test]
    fn test_selection_out_of_range_is_a_contract_violation() {
        let mut flow = controller();
        let result = flow.dispatch(&Destination::root(), Input::Select(7));
        assert!(matches!(
            result,
            Err(FlowError::SelectionOutOfRange { index: 7, options: 3, .. })
        ));
        assert!(flow.back_stack().is_empty());
    }

    #[test]
    fn test_wrong_input_kind_is_rejected() {
        let mut flow = controller();
        assert!(matches!(
            flow.step(Input::Text("hello".into())),
            Err(FlowError::UnexpectedInput { .. })
        ));

        flow.step(Input::Select(0)).unwrap();
        assert!(matches!(
            flow.step(Input::Select(0)),
            Err(FlowError::UnexpectedInput { view: ViewId::Scan, .. })
        ));
    }

    #[test]
    fn test_unregistered_view() {
        let mut flow = FlowController::with_registry(
            ViewRegistry::new(),
            Settings::default(),
            Box::new(Ed25519Signer::new()),
        );
        assert_eq!(
            flow.step(Input::Select(0)),
            Err(FlowError::UnregisteredView(ViewId::MainMenu))
        );
    }

    #[test]
    fn test_unparsable_path_aborts_to_root() {
        let mut flow = controller();
        flow.add_key_source(KeySource::from_phrase(PHRASE, "").unwrap());
        flow.begin_sign_hash(request("not/a/path"));
        assert!(flow.session().pending_sign_hash.is_some());

        let next = flow.step(Input::Select(0)).unwrap();
        assert!(next.is_root());
        assert!(flow.back_stack().is_empty());
        assert!(flow.session().pending_sign_hash.is_none());
    }

    #[test]
    fn test_subflow_request_and_completion() {
        let mut flow = controller();
        let select = flow.begin_sign_hash(request("m/44'/148'/0'"));

        let entry = flow.request_subflow(Destination::new(ViewId::Scan), FlowId::SignHash, select.clone());
        assert_eq!(entry, Destination::new(ViewId::Scan));
        assert_eq!(flow.resume_state(), ResumeState::AwaitingPrerequisite);
        assert_eq!(flow.session().continuation().unwrap().return_depth, 1);

        let resumed = flow.complete_subflow(Destination::root());
        assert_eq!(resumed, select);
        assert_eq!(flow.resume_state(), ResumeState::Resuming);
        assert!(!flow.session().has_continuation());
        assert_eq!(flow.back_stack().len(), 1);
        assert!(flow.session().pending_sign_hash.is_some());
    }

    #[test]
    fn test_complete_subflow_without_continuation_goes_to_natural_next() {
        let mut flow = controller();
        flow.step(Input::Select(0)).unwrap();
        assert!(flow.complete_subflow(Destination::root()).is_root());
        assert_eq!(flow.resume_state(), ResumeState::Normal);
    }

    #[test]
    fn test_nested_subflow_keeps_outer_continuation() {
        let mut flow = controller();
        let select = flow.begin_sign_hash(request("m/44'/148'/0'"));
        flow.request_subflow(Destination::new(ViewId::Scan), FlowId::SignHash, select.clone());
        flow.request_subflow(
            Destination::new(ViewId::PassphraseEntry),
            FlowId::SignHash,
            Destination::new(ViewId::Scan),
        );

        let continuation = flow.session().continuation().unwrap();
        assert_eq!(continuation.resume_at, select);
        assert_eq!(flow.current(), Destination::new(ViewId::PassphraseEntry));
        assert_eq!(flow.complete_subflow(Destination::root()), select);
    }

    #[test]
    fn test_back_during_subflow_aborts() {
        let mut flow = controller();
        let select = flow.begin_sign_hash(request("m/44'/148'/0'"));
        flow.request_subflow(Destination::new(ViewId::Scan), FlowId::SignHash, select);

        assert!(flow.navigate_back().is_root());
        assert!(!flow.session().has_continuation());
        assert_eq!(flow.resume_state(), ResumeState::Normal);
        assert!(flow.back_stack().is_empty());
    }

    #[test]
    fn test_evicted_history_keeps_resume_depth_consistent() {
        let settings = Settings {
            max_history: 4,
            ..Settings::default()
        };
        let mut flow = FlowController::new(settings, Box::new(Ed25519Signer::new()));
        let select = flow.begin_sign_hash(request("m/44'/148'/0'"));
        flow.request_subflow(crate::views::mnemonic_entry(12, 0), FlowId::SignHash, select.clone());
        for index in 1..6 {
            flow.step(Input::Text("abandon".into())).unwrap();
            assert_eq!(flow.current(), crate::views::mnemonic_entry(12, index));
        }
        assert_eq!(flow.session().continuation().unwrap().return_depth, 0);

        assert_eq!(flow.complete_subflow(Destination::root()), select);
        assert_eq!(flow.back_stack().len(), 1);
    }

    #[test]
    fn test_resuming_becomes_normal_after_dispatch() {
        let mut flow = controller();
        let select = flow.begin_sign_hash(request("m/44'/148'/0'"));
        flow.request_subflow(Destination::new(ViewId::Scan), FlowId::SignHash, select);
        flow.complete_subflow(Destination::root());
        assert_eq!(flow.resume_state(), ResumeState::Resuming);

        flow.step(Input::Back).unwrap();
        assert_eq!(flow.resume_state(), ResumeState::Normal);
    }

    #[test]
    fn test_dispatching_a_step_that_is_not_current_is_rejected() {
        let mut flow = controller();
        flow.add_key_source(KeySource::from_phrase(PHRASE, "").unwrap());
        flow.begin_sign_hash(request("m/44'/148'/0'"));
        let warning = flow.step(Input::Select(0)).unwrap();
        assert_eq!(warning.view, ViewId::SignHashDireWarning);

        let skipped = Destination::new(ViewId::SignHashShowHash).with_arg("hash", "bb".repeat(32));
        assert_eq!(
            flow.dispatch(&skipped, Input::Select(0)),
            Err(FlowError::NotCurrent {
                requested: ViewId::SignHashShowHash,
                current: ViewId::SignHashDireWarning,
            })
        );
        assert!(flow.back_stack().is_empty());
        assert!(flow.session().pending_sign_hash.is_none());
    }

    #[test]
    fn test_hash_review_refuses_a_hash_the_request_did_not_carry() {
        let mut flow = controller();
        flow.add_key_source(KeySource::from_phrase(PHRASE, "").unwrap());
        flow.begin_sign_hash(request("m/44'/148'/0'"));
        let warning = flow.step(Input::Select(0)).unwrap();

        let other = Destination::new(ViewId::SignHashShowHash).with_arg("hash", "bb".repeat(32));
        flow.request_subflow(other.clone(), FlowId::SignHash, warning);
        assert_eq!(flow.current(), other);

        assert!(matches!(
            flow.step(Input::Select(0)),
            Err(FlowError::MissingContext { view: ViewId::SignHashShowHash, .. })
        ));
        assert!(flow.current().is_root());
    }
}
