//! Descriptors: configured, reusable error kinds.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::builder::{Builder, BuilderOptions};
use crate::class::{CodedError, ErrorClass, ExtraProperties};
use crate::ErrorCode;

/// One error kind registered in a [`Domain`](crate::Domain).
///
/// A descriptor is a cheap handle; clones share the same configuration and
/// compare equal. Its code, default message, default extra properties and
/// class never change after [`Domain::create`](crate::Domain::create)
/// returns it. Every produced error goes through a fresh [`Builder`], so
/// calls never observe each other's overrides.
///
/// [`call`](Self::call) and [`construct`](Self::construct) are the two
/// invocation forms of an error kind and produce identical values.
///
/// # Example
///
/// ```
/// use errdomain_core::Domain;
///
/// let mut domain = Domain::new();
/// let not_found = domain.create("Not found").unwrap();
///
/// let err = not_found.with_message("User missing");
/// assert_eq!(err.message(), "User missing");
/// assert!(not_found.is(&err));
/// ```
#[derive(Clone)]
pub struct Descriptor {
    options: Arc<BuilderOptions>,
}

impl Descriptor {
    pub(crate) fn new(options: BuilderOptions) -> Self {
        Self {
            options: Arc::new(options),
        }
    }

    pub fn code(&self) -> &ErrorCode {
        &self.options.code
    }

    /// Returns the default message; empty when none was configured.
    pub fn default_message(&self) -> &str {
        &self.options.message
    }

    pub fn default_extra_properties(&self) -> Option<&ExtraProperties> {
        self.options.extra_properties.as_ref()
    }

    pub fn error_class(&self) -> &ErrorClass {
        &self.options.error_class
    }

    /// Produces an error, optionally overriding the message and merging
    /// per-call extra properties over the defaults.
    pub fn call(&self, message: Option<&str>, extra_properties: Option<ExtraProperties>) -> CodedError {
        let mut builder = self.builder();
        if let Some(message) = message {
            builder = builder.message(message);
        }
        if let Some(extra_properties) = extra_properties {
            builder = builder.extra_properties(extra_properties);
        }
        builder.create()
    }

    /// Constructor form of [`call`](Self::call).
    pub fn construct(&self, message: Option<&str>, extra_properties: Option<ExtraProperties>) -> CodedError {
        self.call(message, extra_properties)
    }

    /// Produces an error with every default in place.
    pub fn error(&self) -> CodedError {
        self.call(None, None)
    }

    /// Produces an error with an overridden message.
    pub fn with_message(&self, message: &str) -> CodedError {
        self.call(Some(message), None)
    }

    /// Produces an error whose message is the default message formatted with
    /// `args`.
    pub fn format(&self, args: &[Value]) -> CodedError {
        self.builder().format_message(args).create()
    }

    /// Returns a fresh builder seeded with this descriptor's configuration.
    pub fn builder(&self) -> Builder {
        Builder::from_shared(Arc::clone(&self.options))
    }

    /// Returns true if `candidate` is an error of this kind.
    ///
    /// The candidate must be a [`CodedError`] constructed from this
    /// descriptor's class and carrying this descriptor's code. A value of any
    /// other type never matches, even if it exposes the same code.
    pub fn is(&self, candidate: &dyn Any) -> bool {
        candidate
            .downcast_ref::<CodedError>()
            .is_some_and(|err| self.matches(err))
    }

    /// Typed form of [`is`](Self::is).
    pub fn matches(&self, err: &CodedError) -> bool {
        err.instance_of(&self.options.error_class) && err.code() == Some(&self.options.code)
    }

    /// Returns true if `err` is a [`CodedError`] of this kind.
    ///
    /// Useful on the `source()` chain of a wrapping error.
    pub fn is_error(&self, err: &(dyn std::error::Error + 'static)) -> bool {
        err.downcast_ref::<CodedError>()
            .is_some_and(|err| self.matches(err))
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.options, &other.options)
    }
}

impl Eq for Descriptor {}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("code", &self.options.code)
            .field("default_message", &self.options.message)
            .field("error_class", &self.options.error_class.name())
            .finish()
    }
}
