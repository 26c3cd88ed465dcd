//! FieldValidator Primitive - Required and email checks for a form.
//!
//! Registered as `"form-validator"`.
//!
//! # Rules
//!
//! Values are trimmed before checking:
//! - a `required` field must not be empty
//! - a non-empty `type="email"` field must look like `local@domain.tld`
//!
//! Each check refreshes the field's error display: the first `.form__error`
//! inside the field's parent receives the message and is shown or hidden, and
//! the field itself toggles `form__input--error`.
//!
//! # Submission
//!
//! The native submission is always prevented. When every required field
//! passes, the [`SubmitHook`] runs instead.
//!
//! ```ignore
//! let hook: SubmitHook = Rc::new(|doc: &Document, form: NodeId| send(doc, form));
//! let validator = FieldValidator::with_submit_hook(&ctx, form, ValidatorOptions::default(), hook);
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dom::{Compound, Document, Event, EventKind, NodeId, SelectorList};
use crate::engine::{
    parse_options, Component, ComponentContext, Constructor, Declarative, Instance, OptionsBag,
};
use crate::error::Result;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Called with the form once a submission passes validation.
pub type SubmitHook = Rc<dyn Fn(&Document, NodeId)>;

fn default_submit_hook() -> SubmitHook {
    Rc::new(|_doc: &Document, form: NodeId| {
        tracing::info!(form = ?form, "Form submitted successfully");
    })
}

/// Options accepted by [`FieldValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ValidatorOptions {
    pub validate_on_submit: bool,
    pub validate_on_blur: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            validate_on_submit: true,
            validate_on_blur: true,
        }
    }
}

/// Why a field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str("This field is required"),
            FieldError::InvalidEmail => f.write_str("Please enter a valid email address"),
        }
    }
}

impl std::error::Error for FieldError {}

fn fields() -> SelectorList {
    ["input", "textarea", "select"]
        .into_iter()
        .map(Compound::tag)
        .collect()
}

fn required_fields() -> SelectorList {
    ["input", "textarea", "select"]
        .into_iter()
        .map(|tag| Compound::tag(tag).with_attribute("required"))
        .collect()
}

struct ValidatorInner {
    document: Document,
    form: NodeId,
    options: ValidatorOptions,
    error_selector: SelectorList,
    input_error_class: String,
    on_submit: SubmitHook,
}

impl ValidatorInner {
    fn handle_submit(&self, event: &mut Event) {
        event.prevent_default();
        if self.validate_form() {
            (self.on_submit)(&self.document, self.form);
        } else {
            tracing::debug!(form = ?self.form, "submission blocked by validation");
        }
    }

    fn validate_form(&self) -> bool {
        let inputs = self.document.query_selector_all(self.form, &required_fields());
        // Every field is checked so every display is refreshed.
        inputs
            .into_iter()
            .fold(true, |valid, input| self.validate_field(input) && valid)
    }

    fn check_field(&self, input: NodeId) -> std::result::Result<(), FieldError> {
        let doc = &self.document;
        let value = doc.value(input);
        let value = value.trim();
        if doc.has_attribute(input, "required") && value.is_empty() {
            return Err(FieldError::Required);
        }
        if doc.input_type(input) == "email" && !value.is_empty() && !EMAIL.is_match(value) {
            return Err(FieldError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_field(&self, input: NodeId) -> bool {
        let outcome = self.check_field(input);
        self.show_field_error(input, outcome.err());
        outcome.is_ok()
    }

    fn show_field_error(&self, input: NodeId, error: Option<FieldError>) {
        let doc = &self.document;
        let display = doc
            .parent(input)
            .and_then(|parent| doc.query_selector(parent, &self.error_selector));
        if let Some(display) = display {
            match error {
                Some(error) => {
                    doc.set_text_content(display, &error.to_string());
                    doc.set_style(display, "display", "block");
                }
                None => {
                    doc.set_text_content(display, "");
                    doc.set_style(display, "display", "none");
                }
            }
        }
        doc.toggle_class(input, &self.input_error_class, error.is_some());
    }
}

/// Validator bound to one form element
#[derive(Clone)]
pub struct FieldValidator {
    inner: Rc<ValidatorInner>,
}

impl FieldValidator {
    /// Bind to `form` with the default submit hook.
    pub fn new(ctx: &ComponentContext, form: NodeId, options: ValidatorOptions) -> Self {
        Self::with_submit_hook(ctx, form, options, default_submit_hook())
    }

    /// Bind to `form`, running `on_submit` after each valid submission.
    pub fn with_submit_hook(
        ctx: &ComponentContext,
        form: NodeId,
        options: ValidatorOptions,
        on_submit: SubmitHook,
    ) -> Self {
        let config = ctx.config();
        let inner = Rc::new(ValidatorInner {
            document: ctx.document().clone(),
            form,
            options,
            error_selector: Compound::any().with_class(&config.error_class).into(),
            input_error_class: config.input_error_class.clone(),
            on_submit,
        });
        let doc = &inner.document;

        if options.validate_on_submit {
            let owner = inner.clone();
            doc.add_listener(form, EventKind::Submit, move |_doc, event| {
                owner.handle_submit(event);
            });
        }

        if options.validate_on_blur {
            for input in doc.query_selector_all(form, &fields()) {
                let owner = inner.clone();
                doc.add_listener(input, EventKind::Blur, move |_doc, _event| {
                    owner.validate_field(input);
                });
            }
        }

        Self { inner }
    }

    /// Registry constructor that injects `on_submit` into every instance.
    pub fn constructor(on_submit: SubmitHook) -> Constructor {
        Rc::new(
            move |ctx: &ComponentContext, form: NodeId, bag: &OptionsBag| {
                let options = parse_options::<ValidatorOptions>(Self::NAME, bag)?;
                let validator = Self::with_submit_hook(ctx, form, options, on_submit.clone());
                Ok(Rc::new(validator) as Instance)
            },
        )
    }

    /// Prevent the native submission, then run the hook if the form is valid.
    pub fn handle_submit(&self, event: &mut Event) {
        self.inner.handle_submit(event);
    }

    /// Validate every required field, refreshing all displays.
    pub fn validate_form(&self) -> bool {
        self.inner.validate_form()
    }

    /// Validate one field and refresh its display.
    pub fn validate_field(&self, input: NodeId) -> bool {
        self.inner.validate_field(input)
    }

    /// The validation rule alone, without touching the display.
    pub fn check_field(&self, input: NodeId) -> std::result::Result<(), FieldError> {
        self.inner.check_field(input)
    }

    pub fn options(&self) -> ValidatorOptions {
        self.inner.options
    }
}

impl Component for FieldValidator {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn root(&self) -> NodeId {
        self.inner.form
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Declarative for FieldValidator {
    const NAME: &'static str = "form-validator";
    type Options = ValidatorOptions;

    fn construct(ctx: &ComponentContext, root: NodeId, options: ValidatorOptions) -> Result<Self> {
        Ok(Self::new(ctx, root, options))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dom::DispatchOutcome;
    use std::cell::Cell;

    struct Fixture {
        doc: Document,
        ctx: ComponentContext,
        form: NodeId,
    }

    fn setup() -> Fixture {
        let doc = Document::new();
        let ctx = ComponentContext::new(doc.clone(), Config::default());
        let form = doc.append_element(doc.body(), "form").unwrap();
        Fixture { doc, ctx, form }
    }

    /// A `div.form__group` holding the field and its error display.
    fn field(fixture: &Fixture, kind: &str, required: bool) -> (NodeId, NodeId) {
        let doc = &fixture.doc;
        let group = doc.append_element(fixture.form, "div").unwrap();
        let input = doc.append_element(group, "input").unwrap();
        doc.set_attribute(input, "type", kind);
        if required {
            doc.set_attribute(input, "required", "");
        }
        let error = doc.append_element(group, "span").unwrap();
        doc.add_class(error, "form__error");
        (input, error)
    }

    #[test]
    fn test_required_field() {
        let fixture = setup();
        let (input, error) = field(&fixture, "text", true);
        let validator = FieldValidator::new(&fixture.ctx, fixture.form, ValidatorOptions::default());
        let doc = &fixture.doc;

        doc.set_value(input, "   ");
        assert!(!validator.validate_field(input));
        assert_eq!(doc.text_content(error), "This field is required");
        assert_eq!(doc.style(error, "display").as_deref(), Some("block"));
        assert!(doc.has_class(input, "form__input--error"));

        doc.set_value(input, "Ada");
        assert!(validator.validate_field(input));
        assert_eq!(doc.text_content(error), "");
        assert_eq!(doc.style(error, "display").as_deref(), Some("none"));
        assert!(!doc.has_class(input, "form__input--error"));
    }

    #[test]
    fn test_email_rule() {
        let fixture = setup();
        let (input, _) = field(&fixture, "email", false);
        let validator = FieldValidator::new(&fixture.ctx, fixture.form, ValidatorOptions::default());
        let doc = &fixture.doc;

        for (value, expected) in [
            ("a@b.co", Ok(())),
            ("", Ok(())),
            ("not-an-email", Err(FieldError::InvalidEmail)),
            ("a@b", Err(FieldError::InvalidEmail)),
            ("a b@c.de", Err(FieldError::InvalidEmail)),
        ] {
            doc.set_value(input, value);
            assert_eq!(validator.check_field(input), expected, "value {value:?}");
        }
    }

    #[test]
    fn test_required_takes_precedence_over_email() {
        let fixture = setup();
        let (input, error) = field(&fixture, "email", true);
        let validator = FieldValidator::new(&fixture.ctx, fixture.form, ValidatorOptions::default());

        assert!(!validator.validate_field(input));
        assert_eq!(fixture.doc.text_content(error), "This field is required");
    }

    #[test]
    fn test_missing_error_display_still_toggles_class() {
        let fixture = setup();
        let doc = &fixture.doc;
        let input = doc.append_element(fixture.form, "input").unwrap();
        doc.set_attribute(input, "required", "");
        let validator = FieldValidator::new(&fixture.ctx, fixture.form, ValidatorOptions::default());

        assert!(!validator.validate_field(input));
        assert!(doc.has_class(input, "form__input--error"));
    }

    #[test]
    fn test_validate_form_checks_every_field() {
        let fixture = setup();
        let (first, first_error) = field(&fixture, "text", true);
        let (second, second_error) = field(&fixture, "email", true);
        let (optional, _) = field(&fixture, "text", false);
        let validator = FieldValidator::new(&fixture.ctx, fixture.form, ValidatorOptions::default());
        let doc = &fixture.doc;

        doc.set_value(second, "bad");
        assert!(!validator.validate_form());
        assert_eq!(doc.text_content(first_error), "This field is required");
        assert_eq!(doc.text_content(second_error), "Please enter a valid email address");
        assert!(!doc.has_class(optional, "form__input--error"));

        doc.set_value(first, "Ada");
        doc.set_value(second, "ada@example.com");
        assert!(validator.validate_form());
        assert_eq!(doc.style(first_error, "display").as_deref(), Some("none"));
    }

    #[test]
    fn test_submit_runs_hook_only_when_valid() {
        let fixture = setup();
        let (input, _) = field(&fixture, "text", true);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let hook: SubmitHook = Rc::new(move |_doc: &Document, _form: NodeId| counter.set(counter.get() + 1));
        let _validator = FieldValidator::with_submit_hook(
            &fixture.ctx,
            fixture.form,
            ValidatorOptions::default(),
            hook,
        );
        let doc = &fixture.doc;

        assert_eq!(doc.submit(fixture.form), DispatchOutcome::Prevented);
        assert_eq!(calls.get(), 0);

        doc.set_value(input, "Ada");
        assert_eq!(doc.submit(fixture.form), DispatchOutcome::Prevented);
        assert_eq!(calls.get(), 1);
        assert!(doc.submitted_forms().is_empty());
    }

    #[test]
    fn test_blur_validates_field() {
        let fixture = setup();
        let (input, error) = field(&fixture, "text", true);
        let _validator = FieldValidator::new(&fixture.ctx, fixture.form, ValidatorOptions::default());
        let doc = &fixture.doc;

        doc.focus(input);
        doc.blur();
        assert_eq!(doc.text_content(error), "This field is required");
    }

    #[test]
    fn test_disabled_triggers() {
        let fixture = setup();
        let (input, error) = field(&fixture, "text", true);
        let options = ValidatorOptions {
            validate_on_submit: false,
            validate_on_blur: false,
        };
        let _validator = FieldValidator::new(&fixture.ctx, fixture.form, options);
        let doc = &fixture.doc;

        doc.focus(input);
        doc.blur();
        assert_eq!(doc.text_content(error), "");
        assert_eq!(doc.submit(fixture.form), DispatchOutcome::Completed);
        assert_eq!(doc.submitted_forms(), vec![fixture.form]);
    }
}
