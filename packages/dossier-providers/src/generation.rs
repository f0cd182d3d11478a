use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

const ANSWER_SYSTEM_PROMPT: &str = "\
You answer questions using only the provided context passages. \
If the context does not contain the answer, say so plainly.";

/// Asks the generation model to answer `question` from `context_chunks`.
///
/// The wire shape is the common chat-completions contract; the answer is
/// the first choice's message content, verbatim.
pub async fn answer(
	cfg: &dossier_config::GenerationProviderConfig,
	question: &str,
	context_chunks: &[String],
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let context = context_chunks.join("\n\n---\n\n");
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [
			{ "role": "system", "content": ANSWER_SYSTEM_PROMPT },
			{ "role": "user", "content": format!("Context:\n{context}\n\nQuestion: {question}") },
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_answer(json)
}

fn parse_answer(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_owned)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Generation response is missing message content.".to_string(),
		})
}
