//! Fixed user-facing strings.
//!
//! These are part of the observable contract (UI copy and wire bodies), so
//! they live in one place instead of being scattered as literals.

/// Shown when `send` is invoked with an empty or whitespace-only prompt.
pub const EMPTY_PROMPT: &str = "Пожалуйста, введите или произнесите запрос";

/// Generic failure shown for any upstream/transport error. Detail stays in logs.
pub const REQUEST_FAILED: &str =
    "Ошибка при получении ответа. Пожалуйста, попробуйте снова.";

/// Rendered verbatim when a 2xx proxy body carries no `message` field.
pub const FALLBACK_ANSWER: &str = "Не удалось получить ответ";

/// Proxy success body when the upstream returned no completion content.
pub const NO_UPSTREAM_CONTENT: &str = "No response received";

/// Proxy 400 body for an absent/empty prompt.
pub const PROMPT_REQUIRED: &str = "Prompt is required";

/// Proxy 429 body when the upstream signals a rate limit.
pub const RATE_LIMIT_EXCEEDED: &str = "Rate limit exceeded";

/// Proxy 500 body for any other upstream failure.
pub const UPSTREAM_FAILED: &str = "Failed to fetch response from upstream";
