//! errdomain - registries of code-tagged error kinds
//!
//! Umbrella crate re-exporting the public surface of `errdomain-core`:
//! construct a [`Domain`] (optionally with [`DomainOptions`]), register error
//! kinds with [`Domain::create`] or [`Domain::create_errors`], and query it
//! with [`Domain::is_taken`] and [`Domain::find_error_descriptor_for_code`].
//! Code generators live in [`generators`].
//!
//! ```
//! use errdomain::{generators, Domain, DomainOptions};
//!
//! let mut domain =
//!     Domain::with_options(DomainOptions::new().code_generator(generators::format_code("WOO_%d", 1, 1)));
//! let invalid = domain.create("Invalid").unwrap();
//! assert_eq!(invalid.code().as_str(), "WOO_1");
//! ```

pub use errdomain_core::{
    Builder, BuilderOptions, BuiltCatalog, Catalog, CatalogEntry, CodeValue, CodedError,
    Descriptor, DescriptorFactory, DescriptorOptions, Domain, DomainError, DomainOptions,
    DomainResult, ErrorClass, ErrorCode, ExtraProperties, GeneratorConfig, Registry,
};

/// Standard code generators.
pub mod generators {
    pub use errdomain_core::codegen::{
        format_code, increment_number, CodeFormat, CodeGenerator, FormatCode, IncrementNumber,
    };
}

/// Positional `%s`/`%d` message templating.
pub use errdomain_core::format_message;
