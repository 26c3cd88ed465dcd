//! Landing page walkthrough.
//!
//! Builds a page with a call-to-action button, a signup dialog and a signup
//! form, lets `auto_init` wire them, then drives a short user session.
//!
//! Run with `RUST_LOG=debug cargo run --example landing_page` to see the
//! component lifecycle.

use std::rc::Rc;
use std::time::Duration;

use spark_components::{
    ComponentManager, Control, Dialog, Document, FieldValidator, NodeId, Point, Rect, Result,
    SubmitHook,
};

fn build_page(doc: &Document) -> Result<(NodeId, NodeId, NodeId)> {
    let body = doc.body();

    let cta = doc.append_element(body, "button")?;
    doc.set_attribute(cta, "type", "button");
    doc.set_attribute(cta, "data-component", "button");
    doc.set_attribute(cta, "data-options", r#"{"loadingText": "One moment..."}"#);
    doc.set_text_content(cta, "Get Started");
    doc.set_bounding_rect(cta, Rect::new(24.0, 320.0, 180.0, 48.0));

    let dialog = doc.append_element(body, "div")?;
    doc.add_class(dialog, "modal");
    doc.set_attribute(dialog, "data-component", "modal");
    let close = doc.append_element(dialog, "button")?;
    doc.set_attribute(close, "data-modal-close", "");
    doc.set_text_content(close, "Close");

    let form = doc.append_element(dialog, "form")?;
    doc.set_attribute(form, "data-component", "form-validator");
    for kind in ["text", "email"] {
        let group = doc.append_element(form, "div")?;
        doc.add_class(group, "form__group");
        let input = doc.append_element(group, "input")?;
        doc.set_attribute(input, "type", kind);
        doc.set_attribute(input, "name", kind);
        doc.set_attribute(input, "required", "");
        let error = doc.append_element(group, "span")?;
        doc.add_class(error, "form__error");
    }
    let submit = doc.append_element(form, "button")?;
    doc.set_text_content(submit, "Sign up");

    Ok((cta, dialog, form))
}

fn main() -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let doc = Document::new();
    let (cta, dialog_root, form) = build_page(&doc)?;

    let on_submit: SubmitHook = Rc::new(|doc: &Document, form: NodeId| {
        let fields = doc
            .select(form, "input")
            .unwrap_or_default()
            .into_iter()
            .map(|input| doc.value(input))
            .collect::<Vec<_>>();
        println!("signup accepted: {fields:?}");
    });

    let mut manager = ComponentManager::with_builtins(doc.clone());
    manager.register("form-validator", FieldValidator::constructor(on_submit));
    let report = manager.auto_init();
    println!("{report:?}");

    let control = report
        .instances
        .iter()
        .find_map(|instance| instance.downcast_ref::<Control>())
        .cloned();
    let dialog = report
        .instances
        .iter()
        .find_map(|instance| instance.downcast_ref::<Dialog>())
        .cloned();

    doc.click(cta, Point::new(100.0, 340.0));
    println!("ripples after click: {}", doc.select(cta, ".ripple")?.len());
    doc.advance(Duration::from_millis(600));
    println!("ripples after 600ms: {}", doc.select(cta, ".ripple")?.len());

    if let Some(dialog) = &dialog {
        dialog.open()?;
        println!(
            "dialog open: {}, body overflow: {:?}",
            dialog.is_open(),
            doc.style(doc.body(), "overflow")
        );
    }

    let inputs = doc.select(form, "input")?;
    let submit = doc.select(form, "button")?;
    if let Some(submit) = submit.first() {
        doc.click_center(*submit);
        for error in doc.select(form, ".form__error")? {
            println!("error: {:?}", doc.text_content(error));
        }

        if let [name, email] = inputs.as_slice() {
            doc.set_value(*name, "Ada Lovelace");
            doc.set_value(*email, "ada@example.com");
        }
        if let Some(control) = &control {
            control.set_loading(true);
        }
        doc.click_center(*submit);
        if let Some(control) = &control {
            control.set_loading(false);
            println!("cta label: {:?}", doc.text_content(cta));
        }
    }

    doc.key_down("Escape");
    println!("dialog open after Escape: {}", doc.has_class(dialog_root, "modal--open"));

    doc.unload();
    Ok(())
}
