//! View factories keyed by [`ViewId`]

use std::collections::HashMap;

use crate::destination::{Destination, ViewId};
use crate::error::{FlowError, Result};
use crate::view::View;
use crate::views;

/// Builds a view from its destination, validating the arguments
pub type ViewFactory = fn(&Destination) -> Result<Box<dyn View>>;

#[derive(Clone, Default)]
pub struct ViewRegistry {
    factories: HashMap<ViewId, ViewFactory>,
}

impl ViewRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every view the device ships
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ViewId::MainMenu, views::main_menu::MainMenuView::build);
        registry.register(ViewId::Scan, views::scan::ScanView::build);
        registry.register(ViewId::MnemonicEntry, views::key_source::MnemonicEntryView::build);
        registry.register(ViewId::PassphraseEntry, views::key_source::PassphraseEntryView::build);
        registry.register(
            ViewId::KeySourceFinalize,
            views::key_source::KeySourceFinalizeView::build,
        );
        registry.register(
            ViewId::SignHashSelectKeySource,
            views::sign_hash::SelectKeySourceView::build,
        );
        registry.register(
            ViewId::SignHashDireWarning,
            views::sign_hash::DireWarningView::build,
        );
        registry.register(
            ViewId::SignHashShowAddress,
            views::sign_hash::ShowAddressView::build,
        );
        registry.register(ViewId::SignHashShowHash, views::sign_hash::ShowHashView::build);
        registry.register(
            ViewId::SignHashShowSignature,
            views::sign_hash::ShowSignatureView::build,
        );
        registry
    }

    /// Register (or replace) the factory for a view
    pub fn register(&mut self, view: ViewId, factory: ViewFactory) {
        self.factories.insert(view, factory);
    }

    pub fn is_registered(&self, view: ViewId) -> bool {
        self.factories.contains_key(&view)
    }

    pub fn instantiate(&self, destination: &Destination) -> Result<Box<dyn View>> {
        let factory = self
            .factories
            .get(&destination.view)
            .ok_or(FlowError::UnregisteredView(destination.view))?;
        factory(destination)
    }
}

impl std::fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut views: Vec<_> = self.factories.keys().collect();
        views.sort();
        f.debug_struct("ViewRegistry").field("views", &views).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_is_complete() {
        let registry = ViewRegistry::standard();
        for view in ViewId::ALL {
            assert!(registry.is_registered(view), "{} not registered", view);
        }
    }

    #[test]
    fn test_unregistered_view() {
        let registry = ViewRegistry::new();
        assert_eq!(
            registry.instantiate(&Destination::root()).err(),
            Some(FlowError::UnregisteredView(ViewId::MainMenu))
        );
    }

    #[test]
    fn test_missing_argument_is_reported_by_factory() {
        let registry = ViewRegistry::standard();
        let result = registry.instantiate(&Destination::new(ViewId::SignHashShowAddress));
        assert!(matches!(
            result.err(),
            Some(FlowError::MissingArgument { arg: "address", .. })
        ));
    }
}
