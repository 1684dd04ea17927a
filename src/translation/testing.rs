use crate::translation::service::TranslationService;
use crate::utils::{Result, TranslatorError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process stand-in for a remote engine. Successful calls return
/// `"[<target>] <text>"`.
pub(crate) struct ScriptedService {
    fail_first: usize,
    fail_containing: Option<String>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedService {
    pub(crate) fn echo() -> Self {
        Self::failing_first(0)
    }

    pub(crate) fn failing_first(n: usize) -> Self {
        Self {
            fail_first: n,
            fail_containing: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn always_failing() -> Self {
        Self::failing_first(usize::MAX)
    }

    pub(crate) fn failing_on(needle: &str) -> Self {
        Self {
            fail_containing: Some(needle.to_string()),
            ..Self::echo()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn seen(&self) -> Vec<String> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranslationService for ScriptedService {
    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        target_lang: &str,
    ) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(text.to_string());
        }

        let poisoned = self
            .fail_containing
            .as_deref()
            .is_some_and(|needle| text.contains(needle));
        if call < self.fail_first || poisoned {
            return Err(TranslatorError::RateLimited("scripted".to_string()));
        }

        Ok(format!("[{}] {}", target_lang, text))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
