// cdmqc-core/src/infrastructure/sql/jinja.rs
//
// Renders the SQL templates from `templates.rs` against a serde_json context.
// Undefined variables are a hard error: a check template silently rendering
// an empty table name would produce a valid-looking but wrong query.

use minijinja::{Environment, UndefinedBehavior};

use crate::application::ports::TemplateEngine;
use crate::error::CdmqcError;
use crate::infrastructure::error::InfrastructureError;

pub struct SqlRenderer<'a> {
    env: Environment<'a>,
}

impl<'a> SqlRenderer<'a> {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        env.add_filter("upper", |value: &str| value.to_uppercase());
        env.add_filter("lower", |value: &str| value.to_lowercase());

        Self { env }
    }
}

impl<'a> Default for SqlRenderer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> TemplateEngine for SqlRenderer<'a> {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, CdmqcError> {
        self.env
            .render_str(template, context)
            .map_err(|e| CdmqcError::Infrastructure(InfrastructureError::TemplateError(e)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn test_render_interpolates_context() -> Result<()> {
        let renderer = SqlRenderer::new();
        let sql = renderer.render(
            "SELECT COUNT(*) FROM {{ schema }}.{{ table }}",
            &json!({ "schema": "CDM_2024", "table": "DEMOGRAPHIC" }),
        )?;
        assert_eq!(sql, "SELECT COUNT(*) FROM CDM_2024.DEMOGRAPHIC");
        Ok(())
    }

    #[test]
    fn test_undefined_variable_is_an_error() {
        let renderer = SqlRenderer::new();
        let result = renderer.render("SELECT * FROM {{ schema }}.{{ table }}", &json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_conditional_blocks() -> Result<()> {
        let renderer = SqlRenderer::new();
        let template = "SELECT 1{% if temporal %} WHERE {{ temporal }} >= CAST(? AS DATE){% endif %}";
        let windowed = renderer.render(template, &json!({ "temporal": "ADMIT_DATE" }))?;
        assert_eq!(windowed, "SELECT 1 WHERE ADMIT_DATE >= CAST(? AS DATE)");
        let plain = renderer.render(template, &json!({ "temporal": null }))?;
        assert_eq!(plain, "SELECT 1");
        Ok(())
    }
}
