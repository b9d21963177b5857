//! Render context and identifier casing helpers.

use std::collections::BTreeMap;

/// Variables handed to the template renderer.
///
/// A **Value Object**: built once per generation run, then only read. Keys
/// are ordered so rendering and debugging output are stable.
///
/// ## Built-in Variables
///
/// | Variable | Example |
/// |----------|---------|
/// | `package` | `com.acme.orders` |
/// | `basePackage` | `com.acme.orders` |
/// | `entity` | `Orders` |
/// | `entityVar` | `orders` |
/// | `appClass` | `OrdersApplication` |
/// | `package.<layer>` | `com.acme.orders.domain.model` |
/// | `versions.<key>` | `0.12.6` |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    variables: BTreeMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, consuming self.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Replace `{{key}}` placeholders in a single left-to-right pass.
    ///
    /// - `{{unknown}}` stays literal
    /// - substituted values are never rescanned
    /// - whitespace inside the braces is ignored (`{{ entity }}`)
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                return out;
            };

            let key = after[..end].trim();
            match self.variables.get(key) {
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

/// Body of a Java string literal holding `value`.
pub fn escape_java_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

// ============================================================================
// Identifier Case Conversion
// ============================================================================

/// `order-service` → `OrderService`
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// `order-service` → `orderService`
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `OrderService` → `order_service`
pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

/// `OrderService` → `order-service`
pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split an identifier into lowercase words.
///
/// Separators (`_`, `-`, `.`, whitespace) always split. A lower→upper
/// transition splits (`myApp`). An acronym followed by a word splits before
/// the word's capital (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        if !c.is_alphanumeric() {
            continue;
        }

        if let Some(&next) = chars.peek() {
            if (c.is_lowercase() || c.is_ascii_digit()) && next.is_uppercase() {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }

            if c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(|n| n.is_lowercase())
            {
                current.push(c);
                words.push(current.to_lowercase());
                current.clear();
                continue;
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}
