//! Layered assembly of one error value.
//!
//! A [`Builder`] pairs a frozen configuration ([`BuilderOptions`], shared
//! between clones) with per-call overrides. [`Builder::create`] resolves the
//! layers in a fixed order:
//!
//! 1. class: per-call override, else the configured class
//! 2. message: per-call override, else the configured message
//! 3. properties: configured defaults, then the per-call map, then the code
//!
//! Later writes win when keys collide. `create` does not consume the builder,
//! so calling it twice yields two independent, equal values.

use std::sync::Arc;

use serde_json::Value;

use crate::class::{CodedError, ErrorClass, ExtraProperties};
use crate::format::format_message;
use crate::ErrorCode;

/// Fixed configuration of a builder. Never changes after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderOptions {
    pub error_class: ErrorClass,
    pub message: String,
    pub extra_properties: Option<ExtraProperties>,
    pub code: ErrorCode,
}

/// Per-call overrides; all empty on a fresh builder.
#[derive(Debug, Clone, Default, PartialEq)]
struct Overrides {
    message: Option<String>,
    extra_properties: Option<ExtraProperties>,
    error_class: Option<ErrorClass>,
}

/// Assembles one [`CodedError`] from configuration plus overrides.
///
/// # Example
///
/// ```
/// use errdomain_core::{Builder, BuilderOptions, ErrorClass, ErrorCode};
///
/// let builder = Builder::new(BuilderOptions {
///     error_class: ErrorClass::error(),
///     message: "How are you %s?".to_string(),
///     extra_properties: None,
///     code: ErrorCode::new("1"),
/// });
///
/// let err = builder.format_message(&["foo".into()]).create();
/// assert_eq!(err.message(), "How are you foo?");
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
    options: Arc<BuilderOptions>,
    overrides: Overrides,
}

impl Builder {
    /// Creates a fresh builder over `options`.
    pub fn new(options: BuilderOptions) -> Self {
        Self::from_shared(Arc::new(options))
    }

    pub(crate) fn from_shared(options: Arc<BuilderOptions>) -> Self {
        Self {
            options,
            overrides: Overrides::default(),
        }
    }

    /// Returns the fixed configuration.
    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    /// Returns a builder with the same configuration and no overrides.
    ///
    /// The configuration is shared; this builder is left untouched.
    #[must_use]
    pub fn new_builder(&self) -> Self {
        Self::from_shared(Arc::clone(&self.options))
    }

    /// Overrides the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.overrides.message = Some(message.into());
        self
    }

    /// Formats the configured message with `args` and uses it as the message.
    ///
    /// Always starts from the configured message, ignoring any earlier
    /// [`message`](Self::message) override.
    #[must_use]
    pub fn format_message(self, args: &[Value]) -> Self {
        let formatted = format_message(&self.options.message, args);
        self.message(formatted)
    }

    /// Formats an arbitrary template with `args` and uses it as the message.
    #[must_use]
    pub fn format_new_message(self, template: &str, args: &[Value]) -> Self {
        let formatted = format_message(template, args);
        self.message(formatted)
    }

    /// Overrides the class for the value this builder creates.
    #[must_use]
    pub fn override_error_class(mut self, error_class: ErrorClass) -> Self {
        self.overrides.error_class = Some(error_class);
        self
    }

    /// Sets the per-call extra properties, replacing any map set earlier on
    /// this builder. Merging with the configured defaults happens in
    /// [`create`](Self::create).
    #[must_use]
    pub fn extra_properties(mut self, properties: ExtraProperties) -> Self {
        self.overrides.extra_properties = Some(properties);
        self
    }

    /// Builds the error value.
    pub fn create(&self) -> CodedError {
        let error_class = self
            .overrides
            .error_class
            .as_ref()
            .unwrap_or(&self.options.error_class);

        // An empty override counts as unset.
        let message = self
            .overrides
            .message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.options.message);

        let mut error = error_class.construct(message);
        if let Some(defaults) = &self.options.extra_properties {
            error.assign(defaults);
        }
        if let Some(per_call) = &self.overrides.extra_properties {
            error.assign(per_call);
        }
        error.set_code(self.options.code.clone());
        error
    }
}
