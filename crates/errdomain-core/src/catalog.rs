//! Declarative error catalogs loaded from TOML.
//!
//! A catalog describes one domain and the error kinds registered in it:
//!
//! ```toml
//! error_class = "AppError"
//!
//! [codes]
//! kind = "format"
//! template = "APP_%d"
//!
//! [[errors]]
//! name = "NOT_FOUND"
//! message = "Entity %s not found"
//! code = "404"
//!
//! [errors.extra]
//! http_status = 404
//! ```
//!
//! Entries are registered in file order through [`Domain::create`], so
//! generated codes follow the order of the file and skip explicit codes that
//! appear earlier.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::class::{ErrorClass, ExtraProperties};
use crate::codegen::{CodeGenerator, FormatCode, IncrementNumber};
use crate::descriptor::Descriptor;
use crate::domain::{DescriptorOptions, Domain, DomainOptions};
use crate::error::{DomainError, DomainResult};
use crate::ErrorCode;

/// Class name that resolves to the process default class.
pub const DEFAULT_CLASS_NAME: &str = "Error";

const fn one() -> i64 {
    1
}

/// Code generation policy of a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// Decimal codes `start`, `start + step`, ...
    Sequential {
        #[serde(default = "one")]
        start: i64,
        #[serde(default = "one")]
        step: i64,
    },
    /// Sequential numbers passed through a `%d` template.
    Format {
        template: String,
        #[serde(default = "one")]
        start: i64,
        #[serde(default = "one")]
        step: i64,
    },
}

impl GeneratorConfig {
    fn step(&self) -> i64 {
        match self {
            Self::Sequential { step, .. } | Self::Format { step, .. } => *step,
        }
    }

    /// Instantiates the configured generator.
    pub fn generator(&self) -> Box<dyn CodeGenerator> {
        match self {
            Self::Sequential { start, step } => Box::new(IncrementNumber::new(*start, *step)),
            Self::Format {
                template,
                start,
                step,
            } => Box::new(FormatCode::with_sequence(template.as_str(), *start, *step)),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::Sequential { start: 1, step: 1 }
    }
}

/// A code as written in a catalog: a string or an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodeValue {
    Text(String),
    Number(i64),
}

impl From<&CodeValue> for ErrorCode {
    fn from(value: &CodeValue) -> Self {
        match value {
            CodeValue::Text(s) => ErrorCode::new(s.clone()),
            CodeValue::Number(n) => ErrorCode::from(*n),
        }
    }
}

/// One error kind in a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogEntry {
    /// Name used to look the descriptor up after building
    pub name: String,

    #[serde(default)]
    pub message: Option<String>,

    /// Explicit code; generated when absent
    #[serde(default)]
    pub code: Option<CodeValue>,

    /// Class name overriding the catalog's class for this entry
    #[serde(default)]
    pub class: Option<String>,

    /// Default extra properties
    #[serde(default)]
    pub extra: Option<ExtraProperties>,
}

/// A parsed catalog document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Class for entries that do not name one; the default class when absent
    #[serde(default)]
    pub error_class: Option<String>,

    #[serde(default)]
    pub codes: GeneratorConfig,

    #[serde(default)]
    pub errors: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// - `DomainError::ConfigParse` if the text is not a valid catalog document.
    pub fn from_toml_str(text: &str) -> DomainResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// - `DomainError::Io` if the file cannot be read.
    /// - `DomainError::ConfigParse` if its contents are not a valid catalog.
    pub fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DomainError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            errors = catalog.errors.len(),
            "Loaded error catalog"
        );
        Ok(catalog)
    }

    /// Checks constraints the TOML schema cannot express.
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidConfig` on duplicate entry names, or a zero
    ///   generator step that cannot supply every generated code: more than
    ///   one entry needs one, or its single code is claimed explicitly.
    pub fn validate(&self) -> DomainResult<()> {
        let mut names = HashSet::new();
        for entry in &self.errors {
            if !names.insert(entry.name.as_str()) {
                return Err(DomainError::InvalidConfig {
                    reason: format!("duplicate error name: {}", entry.name),
                });
            }
        }

        let generated = self.errors.iter().filter(|e| e.code.is_none()).count();
        if self.codes.step() == 0 && generated > 0 {
            if generated > 1 {
                return Err(DomainError::InvalidConfig {
                    reason: "code generator step is 0 but several errors need generated codes"
                        .to_string(),
                });
            }
            let fixed = self.codes.generator().next_code();
            let claimed = self
                .errors
                .iter()
                .filter_map(|e| e.code.as_ref())
                .any(|code| ErrorCode::from(code) == fixed);
            if claimed {
                return Err(DomainError::InvalidConfig {
                    reason: format!(
                        "code generator step is 0 and its only code {fixed} is claimed explicitly"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Creates a domain and registers every entry in file order.
    ///
    /// Entries naming the same class share one [`ErrorClass`] identity; the
    /// name `Error` resolves to [`ErrorClass::error`].
    ///
    /// # Errors
    ///
    /// - `DomainError::InvalidConfig` if [`validate`](Self::validate) fails.
    /// - `DomainError::DuplicateCode` if two entries claim the same code.
    pub fn build(&self) -> DomainResult<BuiltCatalog> {
        self.validate()?;

        let mut classes = ClassTable::default();
        let mut options = DomainOptions {
            error_class: None,
            code_generator: Some(self.codes.generator()),
        };
        if let Some(name) = &self.error_class {
            options = options.error_class(classes.resolve(name));
        }

        let mut domain = Domain::with_options(options);
        let mut descriptors = Vec::with_capacity(self.errors.len());

        for entry in &self.errors {
            let mut descriptor_options = DescriptorOptions {
                message: entry.message.clone(),
                code: entry.code.as_ref().map(ErrorCode::from),
                extra_properties: entry.extra.clone(),
                error_class: None,
            };
            if let Some(name) = &entry.class {
                descriptor_options = descriptor_options.error_class(classes.resolve(name));
            }

            let descriptor = domain.create(descriptor_options)?;
            debug!(name = %entry.name, code = %descriptor.code(), "Catalog entry registered");
            descriptors.push((entry.name.clone(), descriptor));
        }

        Ok(BuiltCatalog {
            domain,
            descriptors,
        })
    }
}

/// One class per distinct name.
#[derive(Default)]
struct ClassTable {
    classes: HashMap<String, ErrorClass>,
}

impl ClassTable {
    fn resolve(&mut self, name: &str) -> ErrorClass {
        if name == DEFAULT_CLASS_NAME {
            return ErrorClass::error();
        }
        self.classes
            .entry(name.to_string())
            .or_insert_with(|| ErrorClass::new(name.to_string()))
            .clone()
    }
}

/// A domain built from a catalog, with descriptors addressable by name.
#[derive(Debug)]
pub struct BuiltCatalog {
    pub domain: Domain,
    /// Entry name and descriptor, in file order
    pub descriptors: Vec<(String, Descriptor)>,
}

impl BuiltCatalog {
    /// Returns the descriptor registered for entry `name`.
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.descriptors
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, descriptor)| descriptor)
    }

    /// Returns the entry name registered under `code`.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.descriptors
            .iter()
            .find(|(_, descriptor)| descriptor.code() == code)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = r#"
error_class = "AppError"

[codes]
kind = "format"
template = "APP_%d"

[[errors]]
name = "INVALID"
message = "Invalid input"
code = "APP_1"

[[errors]]
name = "NOT_FOUND"
message = "Entity %s not found"

[errors.extra]
http_status = 404

[[errors]]
name = "TIMEOUT"
class = "TimeoutError"
code = 504
"#;

    #[test]
    fn test_parse_sample() {
        let catalog = Catalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.error_class.as_deref(), Some("AppError"));
        assert_eq!(
            catalog.codes,
            GeneratorConfig::Format {
                template: "APP_%d".to_string(),
                start: 1,
                step: 1
            }
        );
        assert_eq!(catalog.errors.len(), 3);
        assert_eq!(catalog.errors[2].code, Some(CodeValue::Number(504)));
    }

    #[test]
    fn test_defaults() {
        let catalog = Catalog::from_toml_str("").unwrap();
        assert_eq!(catalog.codes, GeneratorConfig::default());
        assert!(catalog.errors.is_empty());
    }

    #[test]
    fn test_build_registers_in_order() {
        let built = Catalog::from_toml_str(SAMPLE).unwrap().build().unwrap();

        let not_found = built.get("NOT_FOUND").unwrap();
        let invalid = built.get("INVALID").unwrap();
        let timeout = built.get("TIMEOUT").unwrap();

        assert_eq!(invalid.code(), "APP_1");
        // The generated sequence skips the explicit code registered earlier.
        assert_eq!(not_found.code(), "APP_2");
        assert_eq!(timeout.code(), "504");
        let names: Vec<&str> = built.descriptors.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["INVALID", "NOT_FOUND", "TIMEOUT"]);
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let text = "[[errors]]\nname = \"A\"\ncode = 1\n[[errors]]\nname = \"B\"\ncode = \"1\"\n";
        let result = Catalog::from_toml_str(text).unwrap().build();
        assert!(matches!(result, Err(DomainError::DuplicateCode { .. })));
    }

    #[test]
    fn test_build_shares_classes_by_name() {
        let text = r#"
[[errors]]
name = "A"
class = "Custom"

[[errors]]
name = "B"
class = "Custom"

[[errors]]
name = "C"
class = "Error"
"#;
        let built = Catalog::from_toml_str(text).unwrap().build().unwrap();
        let a = built.get("A").unwrap();
        let b = built.get("B").unwrap();
        let c = built.get("C").unwrap();

        assert_eq!(a.error_class(), b.error_class());
        assert_eq!(c.error_class(), &ErrorClass::error());
        assert!(!a.is(&c.error()));
    }

    #[test]
    fn test_extra_properties_flow_through() {
        let built = Catalog::from_toml_str(SAMPLE).unwrap().build().unwrap();
        let err = built.get("NOT_FOUND").unwrap().format(&[json!("user")]);
        assert_eq!(err.message(), "Entity user not found");
        assert_eq!(err.property("http_status"), Some(&json!(404)));
        assert_eq!(err.class().name(), "AppError");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let text = "[[errors]]\nname = \"A\"\n[[errors]]\nname = \"A\"\n";
        let result = Catalog::from_toml_str(text).unwrap().build();
        assert!(matches!(result, Err(DomainError::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_step_rejected_when_codes_are_generated() {
        let text = "[codes]\nkind = \"sequential\"\nstep = 0\n[[errors]]\nname = \"A\"\n[[errors]]\nname = \"B\"\n";
        let result = Catalog::from_toml_str(text).unwrap().validate();
        assert!(matches!(result, Err(DomainError::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_step_rejected_when_its_code_is_claimed() {
        let text = "[codes]\nkind = \"sequential\"\nstep = 0\n[[errors]]\nname = \"A\"\ncode = \"1\"\n[[errors]]\nname = \"B\"\n";
        let catalog = Catalog::from_toml_str(text).unwrap();
        assert!(matches!(catalog.validate(), Err(DomainError::InvalidConfig { .. })));
        assert!(matches!(catalog.build(), Err(DomainError::InvalidConfig { .. })));
    }

    #[test]
    fn test_zero_step_with_one_free_generated_code_builds() {
        let text = "[codes]\nkind = \"format\"\ntemplate = \"Z%d\"\nstart = 5\nstep = 0\n[[errors]]\nname = \"A\"\ncode = \"Z1\"\n[[errors]]\nname = \"B\"\n";
        let built = Catalog::from_toml_str(text).unwrap().build().unwrap();
        assert_eq!(built.get("B").unwrap().code(), "Z5");
    }

    #[test]
    fn test_unknown_field_is_parse_error() {
        let result = Catalog::from_toml_str("colour = \"red\"");
        assert!(matches!(result, Err(DomainError::ConfigParse(_))));
    }

    #[test]
    fn test_name_of() {
        let built = Catalog::from_toml_str(SAMPLE).unwrap().build().unwrap();
        assert_eq!(built.name_of("504"), Some("TIMEOUT"));
        assert!(built.name_of("nope").is_none());
    }
}
