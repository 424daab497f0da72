//! # Drafting Configuration Module
//!
//! Sender persona and sampling settings for email generation, with a builder
//! in the same style as the crawler configuration.

/// Configuration for the email drafter
#[derive(Debug, Clone)]
pub struct DraftingConfig {
    /// Name used to sign the email
    pub sender_name: String,

    /// Fund the sender writes on behalf of
    pub firm_name: String,

    /// One-line description of the fund used in the templates
    pub firm_background: String,

    /// System role sent with every drafting request
    pub system_role: String,

    /// Sampling temperature for drafts
    pub temperature: f64,

    /// Optional cap on generated tokens
    pub max_output_tokens: Option<u64>,
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            sender_name: "William".to_string(),
            firm_name: "JMI Equity".to_string(),
            firm_background:
                "an $8B+ growth fund that's backed 180+ B2B software companies over the last 30 years"
                    .to_string(),
            system_role: "You are a professional email writer.".to_string(),
            temperature: 0.7,
            max_output_tokens: None,
        }
    }
}

/// Builder for DraftingConfig
#[derive(Debug, Default)]
pub struct DraftingConfigBuilder {
    config: DraftingConfig,
}

impl DraftingConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: DraftingConfig::default(),
        }
    }

    pub fn sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.config.sender_name = sender_name.into();
        self
    }

    pub fn firm_name(mut self, firm_name: impl Into<String>) -> Self {
        self.config.firm_name = firm_name.into();
        self
    }

    pub fn firm_background(mut self, firm_background: impl Into<String>) -> Self {
        self.config.firm_background = firm_background.into();
        self
    }

    pub fn system_role(mut self, system_role: impl Into<String>) -> Self {
        self.config.system_role = system_role.into();
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, max_output_tokens: Option<u64>) -> Self {
        self.config.max_output_tokens = max_output_tokens;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DraftingConfig {
        self.config
    }
}

impl DraftingConfig {
    /// Create a new builder
    pub fn builder() -> DraftingConfigBuilder {
        DraftingConfigBuilder::new()
    }

    /// Substitute the persona placeholders in a prompt template
    pub fn fill(&self, template: &str) -> String {
        template
            .replace("{sender}", &self.sender_name)
            .replace("{firm_background}", &self.firm_background)
            .replace("{firm}", &self.firm_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_all_placeholders() {
        let config = DraftingConfig::builder()
            .sender_name("Priya")
            .firm_name("Northwind Capital")
            .firm_background("a $2B fund")
            .build();

        let filled = config.fill("{firm} ({firm_background}) - {sender}, {firm}");
        assert_eq!(filled, "Northwind Capital (a $2B fund) - Priya, Northwind Capital");
    }

    #[test]
    fn test_defaults() {
        let config = DraftingConfig::default();
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.system_role, "You are a professional email writer.");
        assert!(config.max_output_tokens.is_none());
    }
}
