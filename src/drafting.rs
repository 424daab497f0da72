//! # Email Drafting Module
//!
//! Composes generation prompts from a fixed persona, worked example templates,
//! the refinement addendum (edit history plus crawled company information),
//! and, when redrafting, the prior draft with the user's comments.
//!
//! Generation is stateless per call. Failures surface as `GenError`; callers
//! that only need text to show can use the `*_or_message` variants, which
//! degrade to a human-readable error message instead.

mod config;
mod prompts;

pub use config::{DraftingConfig, DraftingConfigBuilder};

use tracing::{error, info, instrument};

use crate::crawler::{CompanyInfo, Crawler};
use crate::model::{GenError, GenerationRequest, LanguageModel};
use crate::refinement::RefinementEngine;

/// Drafts and redrafts outreach emails
pub struct EmailDrafter<M> {
    model: M,
    refinement: RefinementEngine,
    config: DraftingConfig,
}

impl<M> EmailDrafter<M>
where
    M: LanguageModel,
{
    pub fn new(model: M, refinement: RefinementEngine, config: DraftingConfig) -> Self {
        Self {
            model,
            refinement,
            config,
        }
    }

    pub fn refinement(&self) -> &RefinementEngine {
        &self.refinement
    }

    pub fn config(&self) -> &DraftingConfig {
        &self.config
    }

    /// Persona and worked templates shared by every drafting prompt
    fn skeleton(&self) -> String {
        let templates = prompts::TEMPLATES
            .iter()
            .map(|t| self.config.fill(t))
            .collect::<Vec<_>>()
            .join("\n\n");
        format!(
            "{}\n\n{}\n\n{}",
            self.config.fill(prompts::PERSONA),
            prompts::TEMPLATES_HEADER,
            templates
        )
    }

    /// Full prompt for a first draft
    pub async fn draft_prompt(&self, company_info: &CompanyInfo) -> String {
        let addendum = self.refinement.build_refinement_addendum(company_info).await;
        format!(
            "{}\n\n{}\n\n{}",
            self.skeleton(),
            prompts::DRAFT_DIRECTIVE,
            addendum
        )
    }

    /// Full prompt for a revision of `prior_draft`
    pub async fn regenerate_prompt(
        &self,
        prior_draft: &str,
        company_info: &CompanyInfo,
        user_comments: &str,
    ) -> String {
        let addendum = self.refinement.build_refinement_addendum(company_info).await;
        format!(
            "{}\n\n{}\n\n{}\n{}\n\n{}\n{}\n\n{}",
            self.skeleton(),
            prompts::REGENERATE_DIRECTIVE,
            prompts::PREVIOUS_DRAFT_HEADER,
            prior_draft.trim(),
            prompts::COMMENTS_HEADER,
            user_comments.trim(),
            addendum
        )
    }

    fn request(&self, prompt: String) -> GenerationRequest {
        let request = GenerationRequest::new(self.config.system_role.clone(), prompt)
            .temperature(self.config.temperature);
        match self.config.max_output_tokens {
            Some(max) => request.max_output_tokens(max),
            None => request,
        }
    }

    /// Draft a new email for the company
    #[instrument(skip_all, fields(info_chars = company_info.as_str().len()))]
    pub async fn draft(&self, company_info: &CompanyInfo) -> Result<String, GenError> {
        let prompt = self.draft_prompt(company_info).await;
        let result = self.model.generate(self.request(prompt)).await;
        match &result {
            Ok(email) => info!("Drafted email of length {}", email.len()),
            Err(e) => error!("Email generation failed: {}", e),
        }
        result
    }

    /// Redraft `prior_draft`, addressing the user's comments
    #[instrument(skip_all, fields(info_chars = company_info.as_str().len()))]
    pub async fn regenerate(
        &self,
        prior_draft: &str,
        company_info: &CompanyInfo,
        user_comments: &str,
    ) -> Result<String, GenError> {
        let prompt = self
            .regenerate_prompt(prior_draft, company_info, user_comments)
            .await;
        let result = self.model.generate(self.request(prompt)).await;
        match &result {
            Ok(email) => info!("Regenerated email of length {}", email.len()),
            Err(e) => error!("Email regeneration failed: {}", e),
        }
        result
    }

    /// Like `draft`, but a failure becomes the text to display
    pub async fn draft_or_message(&self, company_info: &CompanyInfo) -> String {
        self.draft(company_info)
            .await
            .unwrap_or_else(|e| failure_message(&e))
    }

    /// Like `regenerate`, but a failure becomes the text to display
    pub async fn regenerate_or_message(
        &self,
        prior_draft: &str,
        company_info: &CompanyInfo,
        user_comments: &str,
    ) -> String {
        self.regenerate(prior_draft, company_info, user_comments)
            .await
            .unwrap_or_else(|e| failure_message(&e))
    }
}

/// Text shown in place of a draft when generation fails
pub fn failure_message(error: &GenError) -> String {
    format!("Error generating email: {}", error)
}

/// A drafted email together with the information it was based on
#[derive(Debug, Clone)]
pub struct GeneratedEmail {
    pub company_info: CompanyInfo,
    pub email: Result<String, GenError>,
}

/// Crawl a company's site, then draft an email from what was found
pub struct EmailGenerator<M> {
    crawler: Crawler<M>,
    drafter: EmailDrafter<M>,
}

impl<M> EmailGenerator<M>
where
    M: LanguageModel,
{
    pub fn new(crawler: Crawler<M>, drafter: EmailDrafter<M>) -> Self {
        Self { crawler, drafter }
    }

    pub fn crawler(&self) -> &Crawler<M> {
        &self.crawler
    }

    pub fn drafter(&self) -> &EmailDrafter<M> {
        &self.drafter
    }

    #[instrument(skip(self))]
    pub async fn generate(&self, company_url: &str) -> GeneratedEmail {
        let company_info = self.crawler.crawl(company_url).await;
        let email = self.drafter.draft(&company_info).await;
        GeneratedEmail {
            company_info,
            email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlerConfig;
    use crate::model::MockLanguageModel;
    use crate::refinement::{EditLogStore, RefinementConfig, StorageConfig};
    use mockito::Server;
    use tempfile::{tempdir, TempDir};

    fn drafter(model: MockLanguageModel) -> (EmailDrafter<MockLanguageModel>, TempDir) {
        let dir = tempdir().unwrap();
        let refinement = RefinementEngine::new(
            EditLogStore::with_config(StorageConfig {
                path: dir.path().join("edit_history.json"),
            }),
            RefinementConfig::default(),
        );
        let config = DraftingConfig::builder()
            .sender_name("Priya")
            .firm_name("Northwind Capital")
            .build();
        (EmailDrafter::new(model, refinement, config), dir)
    }

    #[tokio::test]
    async fn test_draft_prompt_structure() {
        let model = MockLanguageModel::new();
        model.push_text("Subject: A long hook\n\nHi Ana,").await;
        let (drafter, _dir) = drafter(model.clone());

        let email = drafter
            .draft(&CompanyInfo::new("Acme builds warehouse robots."))
            .await
            .unwrap();

        assert_eq!(email, "Subject: A long hook\n\nHi Ana,");
        let requests = model.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.system_role, "You are a professional email writer.");
        assert_eq!(request.temperature, 0.7);
        assert!(request.max_output_tokens.is_none());

        let prompt = &request.user_prompt;
        assert!(prompt.contains("investor at Northwind Capital"));
        assert!(prompt.contains("Best,\nPriya"));
        assert!(!prompt.contains("{sender}"));
        assert!(prompt.contains("subject line is long"));
        assert!(prompt.ends_with(
            "Here is some information on the company:\nAcme builds warehouse robots."
        ));
        assert_eq!(prompt.matches("Acme builds warehouse robots.").count(), 1);
    }

    #[tokio::test]
    async fn test_draft_includes_edit_history() {
        let model = MockLanguageModel::new();
        let (drafter, _dir) = drafter(model.clone());
        drafter
            .refinement()
            .append_edit("Dear Sir,\n", "Hey Ana,\n")
            .await
            .unwrap();

        drafter.draft(&CompanyInfo::new("Acme")).await.ok();

        let prompt = &model.requests().await[0].user_prompt;
        assert!(prompt.contains("-Dear Sir,"));
        assert!(prompt.contains("+Hey Ana,"));
        assert!(prompt.contains("tone, structure, length, and vocabulary"));
    }

    #[tokio::test]
    async fn test_regenerate_includes_prior_draft_and_comments() {
        let model = MockLanguageModel::new();
        model.push_text("Revised email").await;
        let (drafter, _dir) = drafter(model.clone());

        let email = drafter
            .regenerate(
                "Subject: Old\n\nHi Ana, long intro.",
                &CompanyInfo::new("Acme"),
                "Make it shorter and mention robotics.",
            )
            .await
            .unwrap();

        assert_eq!(email, "Revised email");
        let prompt = &model.requests().await[0].user_prompt;
        assert!(prompt.contains("Previous draft:\nSubject: Old\n\nHi Ana, long intro."));
        assert!(prompt.contains(
            "User comments on the previous draft:\nMake it shorter and mention robotics."
        ));
        assert!(prompt.contains("investor at Northwind Capital"));
        assert!(prompt.ends_with("Here is some information on the company:\nAcme"));
    }

    #[tokio::test]
    async fn test_failure_surfaces_gen_error() {
        let model = MockLanguageModel::new();
        model
            .push_error(GenError::Completion("invalid api key".to_string()))
            .await;
        model
            .push_error(GenError::Completion("invalid api key".to_string()))
            .await;
        let (drafter, _dir) = drafter(model);
        let info = CompanyInfo::new("Acme");

        let result = drafter.draft(&info).await;
        assert_eq!(result, Err(GenError::Completion("invalid api key".to_string())));

        let message = drafter.regenerate_or_message("draft", &info, "shorter").await;
        assert_eq!(message, "Error generating email: invalid api key");
    }

    #[tokio::test]
    async fn test_generator_crawls_then_drafts() {
        let mut server = Server::new_async().await;
        let _home = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<h1>Acme</h1><p>Warehouse robots for retailers</p>")
            .expect(1)
            .create_async()
            .await;

        let model = MockLanguageModel::with_responder(|request| {
            if request.system_role == "You are a professional email writer." {
                Ok("Subject: Robots\n\nHi there".to_string())
            } else {
                Ok("Acme sells warehouse robots.".to_string())
            }
        });
        let crawler = Crawler::new(
            model.clone(),
            CrawlerConfig::builder().delay_ms(0).max_depth(1).build(),
        )
        .unwrap();
        let (drafter, _dir) = drafter(model.clone());

        let generated = EmailGenerator::new(crawler, drafter)
            .generate(&server.url())
            .await;

        assert_eq!(generated.company_info.as_str(), "Acme sells warehouse robots.");
        assert_eq!(generated.email.unwrap(), "Subject: Robots\n\nHi there");
        let requests = model.requests().await;
        assert_eq!(requests.len(), 2);
        assert!(requests[1].user_prompt.ends_with("Acme sells warehouse robots."));
    }
}
