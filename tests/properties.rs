//! Property tests for component invariants.

use proptest::prelude::*;

use spark_components::{
    ComponentContext, ComponentManager, Config, Control, ControlOptions, Dialog, DialogOptions,
    Document, OptionsBag,
};

fn setup() -> (Document, ComponentContext) {
    let doc = Document::new();
    let ctx = ComponentContext::new(doc.clone(), Config::default());
    (doc, ctx)
}

proptest! {
    #[test]
    fn test_loading_restores_any_label(label in ".{0,40}", repeats in 1usize..4) {
        let (doc, ctx) = setup();
        let button = doc.append_element(doc.body(), "button").unwrap();
        doc.set_text_content(button, &label);
        let control = Control::new(&ctx, button, ControlOptions::default());

        for _ in 0..repeats {
            control.set_loading(true);
        }
        prop_assert_eq!(doc.text_content(button), "Loading...");
        control.set_loading(false);
        prop_assert_eq!(doc.text_content(button), label);
        prop_assert!(!control.is_loading());
    }

    #[test]
    fn test_open_close_alternation(steps in proptest::collection::vec(any::<bool>(), 1..24)) {
        let (doc, ctx) = setup();
        let root = doc.create_element("div");
        let dialog = Dialog::new(&ctx, root, DialogOptions::default());

        for open in steps {
            if open {
                dialog.open().unwrap();
            } else {
                dialog.close();
            }
            prop_assert_eq!(dialog.is_open(), open);
            prop_assert_eq!(doc.is_connected(dialog.backdrop()), open);
            prop_assert_eq!(ctx.overlays().is_scroll_locked(), open);
        }
    }

    #[test]
    fn test_instantiate_binds_supplied_element(
        name in "[a-z][a-z-]{0,12}",
        tag in prop::sample::select(vec!["div", "button", "form", "section"]),
    ) {
        let doc = Document::new();
        let mut manager = ComponentManager::new(doc.clone());
        manager.register_component_as::<Control>(name.clone());
        let element = doc.append_element(doc.body(), tag).unwrap();

        let instance = manager.instantiate(&name, element, &OptionsBag::new()).unwrap();
        prop_assert_eq!(instance.map(|instance| instance.root()), Some(element));
    }

    #[test]
    fn test_unregistered_name_yields_nothing(name in "[a-z]{1,12}") {
        let doc = Document::new();
        let manager = ComponentManager::new(doc.clone());
        let element = doc.append_element(doc.body(), "div").unwrap();

        let instance = manager.instantiate(&name, element, &OptionsBag::new()).unwrap();
        prop_assert!(instance.is_none());
    }
}
