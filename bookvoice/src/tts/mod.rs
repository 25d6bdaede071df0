//! TTS backend trait and request options.

pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use log::warn;
use std::time::Duration;

/// Voices accepted by the OpenAI speech endpoint.
pub const VOICES: &[&str] = &[
    "alloy", "ash", "ballad", "coral", "echo", "fable", "onyx", "nova", "sage", "shimmer", "verse",
];

/// Default voice model.
pub const DEFAULT_VOICE: &str = "nova";

/// Default speech model.
pub const DEFAULT_MODEL: &str = "tts-1";

/// Options for a synthesis request.
#[derive(Debug, Clone)]
pub struct TtsOptions {
    /// Voice name (must be one of [`VOICES`])
    pub voice: String,
    /// Speech model identifier
    pub model: String,
}

impl Default for TtsOptions {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl TtsOptions {
    /// Create new options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the voice.
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }
}

/// TTS backend trait - all synthesis engines implement this.
#[async_trait]
pub trait TtsBackend: Send + Sync {
    /// Synthesize one chunk of text, returning encoded MP3 bytes.
    async fn synthesize(&self, text: &str, options: &TtsOptions) -> Result<Vec<u8>>;

    /// Synthesize with exponential backoff between failed attempts. No
    /// backoff after the final attempt, the error returns immediately.
    async fn synthesize_with_retry(
        &self,
        text: &str,
        options: &TtsOptions,
        max_retries: u32,
    ) -> Result<Vec<u8>> {
        let mut last_error = None;

        for attempt in 0..max_retries {
            match self.synthesize(text, options).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) => {
                    warn!(
                        "synthesis failed (attempt {}/{}): {}",
                        attempt + 1,
                        max_retries,
                        e
                    );
                    last_error = Some(e);
                    if attempt + 1 < max_retries {
                        tokio::time::sleep(Duration::from_secs(1u64 << attempt.min(4))).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("all retry attempts failed")))
    }

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Create the default TTS backend.
pub fn create_backend(api_key: String) -> Result<Box<dyn TtsBackend>> {
    Ok(Box::new(openai::OpenAiSpeechBackend::new(api_key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Backend that fails a fixed number of times, then succeeds.
    struct FlakyBackend {
        failures_left: AtomicU32,
        attempts: AtomicU32,
    }

    impl FlakyBackend {
        fn failing(times: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(times),
                attempts: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl TtsBackend for FlakyBackend {
        async fn synthesize(&self, _text: &str, _options: &TtsOptions) -> Result<Vec<u8>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                anyhow::bail!("transient failure");
            }
            Ok(vec![0xff])
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_transient_failures() {
        let backend = FlakyBackend::failing(2);
        let bytes = backend
            .synthesize_with_retry("text", &TtsOptions::default(), 3)
            .await
            .unwrap();

        assert_eq!(bytes, vec![0xff]);
        assert_eq!(backend.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_no_backoff_after_final_attempt() {
        let backend = FlakyBackend::failing(u32::MAX);
        let start = tokio::time::Instant::now();
        let result = backend
            .synthesize_with_retry("text", &TtsOptions::default(), 3)
            .await;

        assert!(result.is_err());
        assert_eq!(backend.attempts.load(Ordering::SeqCst), 3);
        // Backoff of 1s + 2s between attempts, none after the last one
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn test_options_default() {
        let opts = TtsOptions::default();
        assert_eq!(opts.voice, "nova");
        assert_eq!(opts.model, "tts-1");
    }

    #[test]
    fn test_options_builder() {
        let opts = TtsOptions::new().with_voice("onyx");
        assert_eq!(opts.voice, "onyx");
    }

    #[test]
    fn test_default_voice_is_known() {
        assert!(VOICES.contains(&DEFAULT_VOICE));
    }
}
