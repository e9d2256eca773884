#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lumen_core::{Ed25519Signer, Settings};
use lumen_flow::{FlowController, Input};

#[derive(Debug, Arbitrary)]
enum FuzzInput {
    Select(u8),
    Back,
    Text(String),
}

fuzz_target!(|inputs: Vec<FuzzInput>| {
    let mut flow = FlowController::new(Settings::default(), Box::new(Ed25519Signer::new()));

    for input in inputs.into_iter().take(64) {
        let input = match input {
            FuzzInput::Select(i) => Input::Select(i as usize),
            FuzzInput::Back => Input::Back,
            FuzzInput::Text(text) => Input::Text(text),
        };

        match flow.step(input) {
            Ok(next) => {
                assert_eq!(next, flow.current());
                assert!(flow.back_stack().len() <= flow.settings().max_history);
                if next.is_root() {
                    assert!(flow.back_stack().is_empty());
                    assert!(!flow.session().has_continuation());
                }
            }
            // Contract violations abort the flow
            Err(e) => {
                assert!(e.is_contract_violation());
                assert!(flow.current().is_root());
            }
        }
    }
});
