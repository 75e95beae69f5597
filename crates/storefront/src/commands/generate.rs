//! Draft site copy from a business description.
//!
//! Sends the description to an OpenAI-compatible chat completions endpoint,
//! asks for a JSON object and merges the returned headline, about text and
//! feature list into `site.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use storefront_site::config::Feature;
use storefront_site::SiteConfig;

/// Chat completions endpoint used unless `--endpoint` is given.
pub const DEFAULT_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Model used unless `--model` is given.
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

// Wire types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Copy returned by the model. Any field may be missing.
#[derive(Debug, Default, PartialEq)]
struct DraftCopy {
    headline: Option<String>,
    subtext: Option<String>,
    about_title: Option<String>,
    about_summary: Option<String>,
    features: Vec<Feature>,
}

/// Run the generate command.
pub async fn run(
    config_path: &Path,
    describe: &str,
    endpoint: &str,
    model: &str,
    api_key: Option<String>,
) -> Result<()> {
    let describe = describe.trim();
    if describe.is_empty() {
        anyhow::bail!("Describe the business with --describe");
    }
    let api_key = api_key
        .filter(|k| !k.trim().is_empty())
        .with_context(|| format!("Set {} to your API key", API_KEY_ENV))?;

    let existed = config_path.exists();
    let mut config = if existed {
        SiteConfig::load(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        SiteConfig::default()
    };

    tracing::info!("Requesting copy from {} ({})", endpoint, model);

    let client = reqwest::Client::new();
    let content = request_copy(&client, endpoint, &api_key, model, describe).await?;
    let draft = parse_draft(&content)?;

    let updated = apply(&mut config, draft);
    if updated.is_empty() {
        anyhow::bail!("The reply had none of the requested fields");
    }
    config.validate()?;

    fs::write(config_path, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    tracing::info!("Updated {} in {}", updated.join(", "), config_path.display());
    if existed {
        tracing::warn!("Comments in {} were not kept", config_path.display());
    }

    Ok(())
}

fn prompt(describe: &str) -> String {
    format!(
        "Write website copy for this business: {describe}. \
         Reply with a JSON object with string fields hero_h (headline), hero_sub (subheadline), \
         about_h (about section title), about_short (two sentence summary, Markdown allowed) \
         and feat_data (one feature per line written as icon|Title|Description, \
         icon being bolt, wallet or check)."
    )
}

/// Post the prompt and return the model's message content.
async fn request_copy(
    client: &reqwest::Client,
    endpoint: &str,
    api_key: &str,
    model: &str,
    describe: &str,
) -> Result<String> {
    let body = serde_json::to_string(&ChatRequest {
        model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt(describe),
        }],
        response_format: ResponseFormat {
            kind: "json_object",
        },
    })?;

    let response = client
        .post(endpoint)
        .header(AUTHORIZATION, format!("Bearer {}", api_key))
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", endpoint))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        anyhow::bail!("API key rejected by {} ({})", endpoint, status);
    }
    let text = response.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("{} returned {}: {}", endpoint, status, text);
    }

    let reply: ChatResponse =
        serde_json::from_str(&text).context("Unexpected chat completions response")?;

    reply
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .context("The reply had no choices")
}

/// Read the model's JSON object. Values are taken as text whatever their
/// JSON type; `feat_data` may be lines or a list.
fn parse_draft(content: &str) -> Result<DraftCopy> {
    let fields: Map<String, Value> =
        serde_json::from_str(content.trim()).context("The reply is not a JSON object")?;

    let features = match fields.get("feat_data") {
        Some(Value::Array(items)) => items.iter().filter_map(feature_from_value).collect(),
        Some(value) => text(value)
            .map(|lines| lines.lines().filter_map(parse_feature_line).collect())
            .unwrap_or_default(),
        None => vec![],
    };

    Ok(DraftCopy {
        headline: fields.get("hero_h").and_then(text),
        subtext: fields.get("hero_sub").and_then(text),
        about_title: fields.get("about_h").and_then(text),
        about_summary: fields.get("about_short").and_then(text),
        features,
    })
}

fn text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn feature_from_value(value: &Value) -> Option<Feature> {
    match value {
        Value::Object(fields) => Some(Feature {
            icon: first_text(fields, &["icon"]).unwrap_or_default(),
            title: first_text(fields, &["title", "Title"])?,
            body: first_text(fields, &["desc", "description", "body", "Desc"]).unwrap_or_default(),
        }),
        other => text(other).as_deref().and_then(parse_feature_line),
    }
}

fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| fields.get(*key).and_then(text))
}

/// `icon | Title | Description`; lines without a `|` are not features.
fn parse_feature_line(line: &str) -> Option<Feature> {
    if !line.contains('|') {
        return None;
    }

    let mut parts = line.splitn(3, '|').map(str::trim);
    let icon = parts.next().unwrap_or_default().to_string();
    let title = parts.next().filter(|t| !t.is_empty())?.to_string();
    let body = parts.next().unwrap_or_default().to_string();

    Some(Feature { icon, title, body })
}

/// Merge the draft into `config`, returning the names of the sections changed.
fn apply(config: &mut SiteConfig, draft: DraftCopy) -> Vec<&'static str> {
    let mut updated = Vec::new();

    if let Some(headline) = draft.headline {
        config.hero.headline = headline;
        updated.push("hero.headline");
    }
    if let Some(subtext) = draft.subtext {
        config.hero.subtext = subtext;
        updated.push("hero.subtext");
    }
    if let Some(title) = draft.about_title {
        config.about.title = title;
        updated.push("about.title");
    }
    if let Some(summary) = draft.about_summary {
        config.about.summary = summary;
        updated.push("about.summary");
    }
    if !draft.features.is_empty() {
        config.features.items = draft.features;
        updated.push("features.items");
    }

    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use axum::http::HeaderMap;
    use axum::response::{IntoResponse, Response};
    use axum::{routing::post, Json, Router};
    use serde_json::json;

    const ROUTE: &str = "/openai/v1/chat/completions";

    async fn completions(headers: HeaderMap, body: String) -> Response {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer test-key");
        if !authorized {
            return StatusCode::UNAUTHORIZED.into_response();
        }

        let request: Value = match serde_json::from_str(&body) {
            Ok(request) => request,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        };
        if request["response_format"]["type"] != "json_object"
            || request["model"] != DEFAULT_MODEL
            || !request["messages"][0]["content"]
                .as_str()
                .is_some_and(|c| c.contains("candle maker"))
        {
            return StatusCode::BAD_REQUEST.into_response();
        }

        let content = json!({
            "hero_h": "Hand-Poured Light",
            "hero_sub": "Small batch candles from Leeds.",
            "about_h": "Our Workshop",
            "about_short": "We pour **every** candle by hand.",
            "feat_data": "bolt | Fast Dispatch | Sent the next day.\ncheck | Natural Wax | Soy and beeswax only."
        })
        .to_string();

        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
        .into_response()
    }

    async fn spawn_mock() -> SocketAddr {
        let app = Router::new().route(ROUTE, post(completions));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[test]
    fn parses_feature_lines() {
        let feature = parse_feature_line("wallet | No Fees | Pay **once** | own it").unwrap();

        assert_eq!(feature.icon, "wallet");
        assert_eq!(feature.title, "No Fees");
        assert_eq!(feature.body, "Pay **once** | own it");
        assert_eq!(parse_feature_line("just a sentence"), None);
        assert_eq!(parse_feature_line("bolt | | body"), None);
    }

    #[test]
    fn reads_loosely_typed_replies() {
        let draft = parse_draft(
            r#"{"hero_h": "Lamps", "hero_sub": 42, "about_h": null,
                "feat_data": ["bolt|Fast|Quick", {"icon": "check", "title": "Safe", "desc": "Sealed"}]}"#,
        )
        .unwrap();

        assert_eq!(draft.headline.as_deref(), Some("Lamps"));
        assert_eq!(draft.subtext.as_deref(), Some("42"));
        assert_eq!(draft.about_title, None);
        assert_eq!(draft.features.len(), 2);
        assert_eq!(draft.features[1].body, "Sealed");
        assert!(parse_draft("not json").is_err());
    }

    #[test]
    fn apply_keeps_fields_the_reply_lacks() {
        let mut config = SiteConfig::default();
        let about = config.about.title.clone();
        let features = config.features.items.clone();

        let updated = apply(
            &mut config,
            DraftCopy {
                headline: Some("Lamps".to_string()),
                ..Default::default()
            },
        );

        assert_eq!(updated, vec!["hero.headline"]);
        assert_eq!(config.hero.headline, "Lamps");
        assert_eq!(config.about.title, about);
        assert_eq!(config.features.items, features);
    }

    #[tokio::test]
    async fn writes_generated_copy_into_config() {
        let addr = spawn_mock().await;
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[identity]\nname = \"Wick & Co\"\n").unwrap();

        run(
            &path,
            "a candle maker in Leeds",
            &format!("http://{}{}", addr, ROUTE),
            DEFAULT_MODEL,
            Some("test-key".to_string()),
        )
        .await
        .unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.identity.name, "Wick & Co");
        assert_eq!(config.hero.headline, "Hand-Poured Light");
        assert_eq!(config.about.summary, "We pour **every** candle by hand.");
        assert_eq!(config.features.items.len(), 2);
        assert_eq!(config.features.items[1].title, "Natural Wax");
    }

    #[tokio::test]
    async fn rejected_key_leaves_config_alone() {
        let addr = spawn_mock().await;
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[identity]\nname = \"Wick & Co\"\n").unwrap();

        let result = run(
            &path,
            "a candle maker in Leeds",
            &format!("http://{}{}", addr, ROUTE),
            DEFAULT_MODEL,
            Some("wrong-key".to_string()),
        )
        .await;

        assert!(result.unwrap_err().to_string().contains("API key rejected"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[identity]\nname = \"Wick & Co\"\n"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let temp = tempfile::tempdir().unwrap();

        let result = run(
            &temp.path().join("site.toml"),
            "a candle maker",
            "http://127.0.0.1:9/unused",
            DEFAULT_MODEL,
            None,
        )
        .await;

        assert!(result.unwrap_err().to_string().contains(API_KEY_ENV));
        assert!(!temp.path().join("site.toml").exists());
    }
}
