// cdmqc-core/src/infrastructure/sql/mod.rs
//
// SQL construction. Every query ships as a minijinja template that only ever
// interpolates identifiers drawn from the static table catalogue or from a
// schema name that passed `ensure_identifier`. Runtime values (dates,
// encounter types) travel as bound parameters, never as spliced literals.

pub mod jinja;
pub mod templates;

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::error::DomainError;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Literal pattern, cannot fail to compile.
        #[allow(clippy::unwrap_used)]
        let pattern = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
        pattern
    })
}

/// Rejects anything that cannot be spliced into SQL as a bare identifier.
pub fn ensure_identifier(name: &str) -> Result<(), DomainError> {
    if identifier_pattern().is_match(name) {
        Ok(())
    } else {
        Err(DomainError::InvalidIdentifier(name.to_string()))
    }
}

/// `schema.table`, both halves validated by the caller.
pub fn qualified(schema: &str, table: &str) -> String {
    format!("{schema}.{table}")
}

/// Escapes a literal for embedding in a single-quoted SQL string.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers_pass() {
        assert!(ensure_identifier("CDM_2024").is_ok());
        assert!(ensure_identifier("_staging").is_ok());
        assert!(ensure_identifier("DEMOGRAPHIC").is_ok());
    }

    #[test]
    fn test_injection_shaped_names_are_rejected() {
        assert!(ensure_identifier("CDM; DROP TABLE x").is_err());
        assert!(ensure_identifier("a.b").is_err());
        assert!(ensure_identifier("").is_err());
        assert!(ensure_identifier("1abc").is_err());
        assert!(ensure_identifier("x'--").is_err());
    }

    #[test]
    fn test_quote_literal_doubles_quotes() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(quote_literal("plain"), "'plain'");
    }
}
