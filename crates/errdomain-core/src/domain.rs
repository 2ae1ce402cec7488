//! Error domains: code allocation and descriptor storage.
//!
//! A [`Domain`] owns the mapping from code to [`Descriptor`]. It never holds
//! two descriptors under the same code and never removes one.
//!
//! # Code Allocation
//!
//! ```text
//! create(options)
//!     │
//!     ├── explicit code ──▶ taken? ──yes──▶ Err(DuplicateCode), nothing changes
//!     │                       │
//!     │                       no
//!     │                       ▼
//!     └── no code ───▶ generator.next_code() until free
//!                             │
//!                             ▼
//!                   Descriptor inserted under its code
//! ```
//!
//! # Concurrency
//!
//! `create` takes `&mut self`; the check-then-insert sequence is only
//! atomic under Rust's exclusive borrow. Share a domain across threads by
//! wrapping it in a lock. Descriptors themselves are immutable and can be
//! used from any thread.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::builder::BuilderOptions;
use crate::class::{ErrorClass, ExtraProperties};
use crate::codegen::{CodeGenerator, IncrementNumber};
use crate::descriptor::Descriptor;
use crate::error::{DomainError, DomainResult};
use crate::ErrorCode;

// ============================================================================
// Options
// ============================================================================

/// Construction options for a [`Domain`].
///
/// Unset fields fall back to [`ErrorClass::error`] and
/// [`IncrementNumber::default`].
#[derive(Default)]
pub struct DomainOptions {
    pub error_class: Option<ErrorClass>,
    pub code_generator: Option<Box<dyn CodeGenerator>>,
}

impl DomainOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the class used by descriptors that do not name their own.
    #[must_use]
    pub fn error_class(mut self, error_class: ErrorClass) -> Self {
        self.error_class = Some(error_class);
        self
    }

    /// Sets the generator used for descriptors created without a code.
    #[must_use]
    pub fn code_generator(mut self, generator: impl CodeGenerator + 'static) -> Self {
        self.code_generator = Some(Box::new(generator));
        self
    }
}

impl fmt::Debug for DomainOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainOptions")
            .field("error_class", &self.error_class)
            .field("code_generator", &self.code_generator.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Options for one error kind, the object form of [`Domain::create`].
///
/// A plain string converts into options carrying only a message, so
/// `domain.create("Not found")` is the common short form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorOptions {
    pub message: Option<String>,
    pub code: Option<ErrorCode>,
    pub extra_properties: Option<ExtraProperties>,
    pub error_class: Option<ErrorClass>,
}

impl DescriptorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn extra_properties(mut self, properties: ExtraProperties) -> Self {
        self.extra_properties = Some(properties);
        self
    }

    #[must_use]
    pub fn error_class(mut self, error_class: ErrorClass) -> Self {
        self.error_class = Some(error_class);
        self
    }
}

impl From<&str> for DescriptorOptions {
    fn from(message: &str) -> Self {
        Self::new().message(message)
    }
}

impl From<String> for DescriptorOptions {
    fn from(message: String) -> Self {
        Self::new().message(message)
    }
}

// ============================================================================
// Domain
// ============================================================================

/// Registry of error kinds sharing one code space.
///
/// # Example
///
/// ```
/// use errdomain_core::Domain;
///
/// let mut domain = Domain::new();
/// let not_found = domain.create("Not found").unwrap();
/// let invalid = domain.create("Invalid").unwrap();
///
/// assert_eq!(not_found.code().as_str(), "1");
/// assert_eq!(invalid.code().as_str(), "2");
/// assert_eq!(not_found.error().message(), "Not found");
/// ```
pub struct Domain {
    /// Class for descriptors that do not name their own
    error_class: ErrorClass,

    /// Source of codes for descriptors created without one
    code_generator: Box<dyn CodeGenerator>,

    /// Code → descriptor. Keys are unique by construction.
    errors: HashMap<ErrorCode, Descriptor>,

    /// Codes in registration order, for listing.
    order: Vec<ErrorCode>,
}

impl Domain {
    /// Creates a domain with the default class and a `1, 2, 3, ...` generator.
    pub fn new() -> Self {
        Self::with_options(DomainOptions::default())
    }

    pub fn with_options(options: DomainOptions) -> Self {
        Self {
            error_class: options.error_class.unwrap_or_default(),
            code_generator: options
                .code_generator
                .unwrap_or_else(|| Box::new(IncrementNumber::default())),
            errors: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Returns the class used by descriptors that do not name their own.
    pub fn error_class(&self) -> &ErrorClass {
        &self.error_class
    }

    /// Registers a new error kind.
    ///
    /// Accepts [`DescriptorOptions`] or a bare message. When the options carry
    /// a code it must be free; otherwise the code generator is called until it
    /// yields a code not yet taken, each call (including discarded ones)
    /// advancing it.
    ///
    /// # Errors
    ///
    /// - `DomainError::DuplicateCode` if the explicit code is already taken.
    ///   The domain and its generator are left untouched.
    pub fn create(&mut self, options: impl Into<DescriptorOptions>) -> DomainResult<Descriptor> {
        self.register(options.into())
    }

    /// Positional form of [`create`](Self::create): message, code and default
    /// extra properties, all optional. The class is always the domain's.
    ///
    /// # Errors
    ///
    /// - `DomainError::DuplicateCode` if `code` is already taken.
    pub fn create_positional(
        &mut self,
        message: Option<&str>,
        code: Option<ErrorCode>,
        extra_properties: Option<ExtraProperties>,
    ) -> DomainResult<Descriptor> {
        self.register(DescriptorOptions {
            message: message.map(str::to_string),
            code,
            extra_properties,
            error_class: None,
        })
    }

    /// Runs `factory` with a handle that can only create descriptors in this
    /// domain, returning whatever the factory builds.
    ///
    /// # Example
    ///
    /// ```
    /// use errdomain_core::{Descriptor, Domain, DomainResult};
    ///
    /// struct Errors {
    ///     not_found: Descriptor,
    ///     invalid: Descriptor,
    /// }
    ///
    /// let mut domain = Domain::new();
    /// let errors = domain
    ///     .create_errors(|create| -> DomainResult<Errors> {
    ///         Ok(Errors {
    ///             not_found: create.create("Not found")?,
    ///             invalid: create.create("Invalid")?,
    ///         })
    ///     })
    ///     .unwrap();
    /// assert_eq!(errors.invalid.code().as_str(), "2");
    /// ```
    pub fn create_errors<T, F>(&mut self, factory: F) -> T
    where
        F: FnOnce(&mut DescriptorFactory<'_>) -> T,
    {
        let mut handle = DescriptorFactory { domain: self };
        factory(&mut handle)
    }

    /// Returns the descriptor registered under `code`, if any.
    pub fn find_error_descriptor_for_code(&self, code: &str) -> Option<&Descriptor> {
        self.errors.get(code)
    }

    /// Returns true if a descriptor is registered under `code`.
    pub fn is_taken(&self, code: &str) -> bool {
        self.errors.contains_key(code)
    }

    /// Iterates descriptors in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Descriptor> + '_ {
        self.order.iter().filter_map(|code| self.errors.get(code))
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn register(&mut self, options: DescriptorOptions) -> DomainResult<Descriptor> {
        let DescriptorOptions {
            message,
            code,
            extra_properties,
            error_class,
        } = options;

        let code = match code {
            Some(code) if self.is_taken(code.as_str()) => {
                warn!(code = %code, "Rejected duplicate error code");
                return Err(DomainError::DuplicateCode { code });
            }
            Some(code) => code,
            None => self.free_code(),
        };

        let descriptor = Descriptor::new(BuilderOptions {
            error_class: error_class.unwrap_or_else(|| self.error_class.clone()),
            message: message.unwrap_or_default(),
            extra_properties,
            code: code.clone(),
        });

        debug!(
            code = %code,
            class = %descriptor.error_class(),
            "Registered error descriptor"
        );

        self.order.push(code.clone());
        self.errors.insert(code, descriptor.clone());
        Ok(descriptor)
    }

    /// Draws codes from the generator until one is free.
    fn free_code(&mut self) -> ErrorCode {
        loop {
            let candidate = self.code_generator.next_code();
            if !self.is_taken(candidate.as_str()) {
                return candidate;
            }
            trace!(code = %candidate, "Generated code already taken, probing again");
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Domain")
            .field("error_class", &self.error_class)
            .field("codes", &self.order)
            .finish()
    }
}

/// Handle passed to [`Domain::create_errors`] factories.
pub struct DescriptorFactory<'a> {
    domain: &'a mut Domain,
}

impl DescriptorFactory<'_> {
    /// Same as [`Domain::create`].
    ///
    /// # Errors
    ///
    /// - `DomainError::DuplicateCode` if the explicit code is already taken.
    pub fn create(&mut self, options: impl Into<DescriptorOptions>) -> DomainResult<Descriptor> {
        self.domain.create(options)
    }

    /// Same as [`Domain::create_positional`].
    ///
    /// # Errors
    ///
    /// - `DomainError::DuplicateCode` if `code` is already taken.
    pub fn create_positional(
        &mut self,
        message: Option<&str>,
        code: Option<ErrorCode>,
        extra_properties: Option<ExtraProperties>,
    ) -> DomainResult<Descriptor> {
        self.domain.create_positional(message, code, extra_properties)
    }
}
