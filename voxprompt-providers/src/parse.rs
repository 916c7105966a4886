use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extracts the first choice's content from a chat-completion body.
///
/// An empty choices list, a missing `content` field, or empty content all
/// resolve to `Ok(None)` — the upstream answering with nothing is a normal
/// outcome, not a decode failure.
pub fn completion_content(body: &[u8]) -> anyhow::Result<Option<String>> {
    let resp: ChatCompletionResponse =
        serde_json::from_slice(body).context("decode chat completion JSON")?;
    Ok(resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.is_empty()))
}
