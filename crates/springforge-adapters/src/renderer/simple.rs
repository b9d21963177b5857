//! Simple variable substitution renderer.

use std::sync::Arc;

use springforge_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::RenderContext,
    error::SpringforgeResult,
};
use tracing::{instrument, trace};

use crate::builtin_templates::TemplateCatalogue;

/// Renders catalogue templates with `{{name}}` substitution.
pub struct SimpleRenderer {
    catalogue: Arc<TemplateCatalogue>,
}

impl SimpleRenderer {
    pub fn new(catalogue: Arc<TemplateCatalogue>) -> Self {
        Self { catalogue }
    }

    /// Renderer over the shipped catalogue.
    pub fn builtin() -> SpringforgeResult<Self> {
        Ok(Self::new(TemplateCatalogue::builtin()?))
    }

    pub fn catalogue(&self) -> &TemplateCatalogue {
        &self.catalogue
    }
}

impl TemplateRenderer for SimpleRenderer {
    #[instrument(skip(self, context))]
    fn render(&self, template_id: &str, context: &RenderContext) -> SpringforgeResult<String> {
        let Some(template) = self.catalogue.get(template_id) else {
            return Err(ApplicationError::RenderingFailed {
                template_id: template_id.to_string(),
                reason: "no template with this id".into(),
            }
            .into());
        };

        let rendered = context.render(template);
        trace!(bytes = rendered.len(), "Template rendered");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use springforge_core::error::SpringforgeError;

    fn ctx() -> RenderContext {
        RenderContext::new()
            .with_variable("package", "com.acme.orders.model")
            .with_variable("className", "Order")
    }

    #[test]
    fn renders_builtin_templates() {
        let renderer = SimpleRenderer::builtin().unwrap();
        let text = renderer.render("dto/DTO", &ctx()).unwrap();
        assert!(text.starts_with("package com.acme.orders.model;"));
        assert!(text.contains("public record Order(Long id, String name)"));
    }

    #[test]
    fn unknown_template_fails_with_its_id() {
        let renderer = SimpleRenderer::builtin().unwrap();
        let err = renderer.render("nope/Missing", &ctx()).unwrap_err();
        assert!(matches!(
            err,
            SpringforgeError::Application(ApplicationError::RenderingFailed { ref template_id, .. })
                if template_id == "nope/Missing"
        ));
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = SimpleRenderer::builtin().unwrap();
        let a = renderer.render("security/JwtService", &ctx()).unwrap();
        let b = renderer.render("security/JwtService", &ctx()).unwrap();
        assert_eq!(a, b);
        assert!(a.contains("@Value(\"${jwt.secret}\")"));
    }
}
