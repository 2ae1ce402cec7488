//! errdomain core - code-tagged error kinds
//!
//! A [`Domain`] registers error kinds once, giving each a unique code, a
//! default message, default extra properties and a class. The returned
//! [`Descriptor`] then produces [`CodedError`] values on demand, with
//! per-call message and property overrides, and recognises its own errors
//! via [`Descriptor::is`].
//!
//! ```
//! use errdomain_core::{DescriptorOptions, Domain};
//! use serde_json::json;
//!
//! let mut domain = Domain::new();
//! let not_found = domain
//!     .create(DescriptorOptions::new().message("%s not found").code("404"))
//!     .unwrap();
//!
//! let err = not_found.format(&[json!("User")]);
//! assert_eq!(err.to_string(), "Error: User not found");
//! assert!(not_found.is(&err));
//! assert!(domain.is_taken("404"));
//! ```
//!
//! Production code follows the panic-free policy: no `.unwrap()`,
//! `.expect()`, `panic!()`, `unreachable!()` or `todo!()`.

pub mod builder;
pub mod catalog;
pub mod class;
pub mod code;
pub mod codegen;
pub mod descriptor;
pub mod domain;
pub mod error;
pub mod format;
pub mod registry;

// Re-exports for convenience
pub use builder::{Builder, BuilderOptions};
pub use catalog::{BuiltCatalog, Catalog, CatalogEntry, CodeValue, GeneratorConfig};
pub use class::{CodedError, ErrorClass, ExtraProperties};
pub use code::ErrorCode;
pub use codegen::{format_code, increment_number, CodeFormat, CodeGenerator, FormatCode, IncrementNumber};
pub use descriptor::Descriptor;
pub use domain::{DescriptorFactory, DescriptorOptions, Domain, DomainOptions};
pub use error::{DomainError, DomainResult};
pub use format::format_message;
pub use registry::Registry;
