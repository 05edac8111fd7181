//! Marketing description generation.
//!
//! Every failure of the generative service (network, quota, timeout, empty
//! or malformed answer) is absorbed here and replaced by a deterministic
//! sentence built from the title. Callers always get a description.

use std::sync::Arc;
use std::time::Duration;

use ml_client::TextGenerator;
use tracing::{debug, instrument, warn};

/// Prompt sent to the generative model for a product title
pub fn build_prompt(title: &str) -> String {
    format!(
        "You are a creative marketing assistant.\n\
         Write a short, appealing product description (max 2 sentences) for: {}",
        title
    )
}

/// Description used whenever generation fails
pub fn fallback_description(title: &str) -> String {
    format!(
        "This is a fantastic, high-quality {}. It's the perfect addition to any modern home!",
        title
    )
}

/// Produces one description per product title.
///
/// Stateless apart from the shared client: no cache, no retry. Each call is
/// independent.
#[derive(Clone)]
pub struct DescriptionGenerator {
    generator: Arc<dyn TextGenerator>,
    timeout: Option<Duration>,
}

impl DescriptionGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: None,
        }
    }

    /// Give up on the generative call after `timeout` (default: rely on the
    /// client's own timeout)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Generated description for `title`, or the fallback on any failure
    #[instrument(skip(self))]
    pub async fn generate(&self, title: &str) -> String {
        match self.try_generate(title).await {
            Ok(text) => text,
            Err(reason) => {
                warn!("Description generation degraded for '{}': {}", title, reason);
                fallback_description(title)
            }
        }
    }

    async fn try_generate(&self, title: &str) -> Result<String, String> {
        let prompt = build_prompt(title);
        let call = self.generator.generate(&prompt);

        let response = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| format!("timed out after {:?}", limit))?,
            None => call.await,
        };

        let text = response.map_err(|e| e.to_string())?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err("empty response".to_string());
        }

        debug!("Generated {} character description", trimmed.len());
        Ok(trimmed.to_string())
    }
}
