use crate::utils::Result;
use async_trait::async_trait;

/// A remote engine that turns one piece of text into another language.
///
/// Implementations make a single attempt per call; retrying is the caller's job.
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str)
        -> Result<String>;

    fn name(&self) -> &str;
}
