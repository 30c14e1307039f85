use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::utils::{DeepLConfig, ProxyError, Result};

const FREE_API_URL: &str = "https://api-free.deepl.com/v2/translate";
const PRO_API_URL: &str = "https://api.deepl.com/v2/translate";

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

#[derive(Debug, Clone)]
pub struct DeepLClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl DeepLClient {
    pub fn new(config: &DeepLConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        if api_key.is_empty() {
            return Err(ProxyError::Config("DEEPL_KEY is not set".to_string()));
        }

        // Free-tier keys end in ":fx" and live on their own host.
        let api_url = match &config.api_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ if api_key.to_ascii_lowercase().ends_with(":fx") => FREE_API_URL.to_string(),
            _ => PRO_API_URL.to_string(),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| ProxyError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
    ) -> Result<Vec<String>> {
        let mut form: Vec<(&str, String)> =
            texts.iter().map(|t| ("text", t.clone())).collect();
        form.push(("target_lang", target_lang.to_ascii_uppercase()));

        let response = self
            .client
            .post(&self.api_url)
            .header(
                "Authorization",
                format!("DeepL-Auth-Key {}", self.api_key),
            )
            .form(&form)
            .send()
            .await
            .map_err(|e| ProxyError::Upstream {
                status: e.status().map(|s| s.as_u16()),
                retry_after: None,
                message: format!("DeepL request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Upstream {
                status: Some(status.as_u16()),
                retry_after,
                message: extract_error_message(&body)
                    .unwrap_or_else(|| format!("DeepL returned {status}")),
            });
        }

        let parsed: TranslateResponse =
            response.json().await.map_err(|e| ProxyError::Upstream {
                status: Some(status.as_u16()),
                retry_after: None,
                message: format!("invalid DeepL response body: {e}"),
            })?;

        Ok(parsed
            .translations
            .into_iter()
            .map(|t| t.text)
            .collect())
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(|v| v.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str, url: Option<&str>) -> DeepLConfig {
        DeepLConfig {
            api_key: key.to_string(),
            api_url: url.map(String::from),
            timeout_seconds: 30,
        }
    }

    #[test]
    fn free_key_selects_the_free_endpoint() {
        let client = DeepLClient::new(&config("abc123:fx", None)).unwrap();
        assert_eq!(client.api_url(), FREE_API_URL);

        let client = DeepLClient::new(&config("abc123:FX", None)).unwrap();
        assert_eq!(client.api_url(), FREE_API_URL);
    }

    #[test]
    fn pro_key_selects_the_pro_endpoint() {
        let client = DeepLClient::new(&config("abc123", None)).unwrap();
        assert_eq!(client.api_url(), PRO_API_URL);
    }

    #[test]
    fn explicit_url_wins_over_key_heuristic() {
        let client =
            DeepLClient::new(&config("abc:fx", Some(" http://localhost:1188/translate "))).unwrap();
        assert_eq!(client.api_url(), "http://localhost:1188/translate");
    }

    #[test]
    fn key_is_trimmed_and_unquoted() {
        let client = DeepLClient::new(&config("  \"abc123:fx\"  ", None)).unwrap();
        assert_eq!(client.api_key, "abc123:fx");
    }

    #[test]
    fn empty_key_is_a_config_error() {
        let err = DeepLClient::new(&config("  \"\" ", None)).unwrap_err();
        assert!(matches!(err, ProxyError::Config(_)));
    }

    #[test]
    fn error_message_is_extracted_from_json_bodies() {
        assert_eq!(
            extract_error_message(r#"{"message":"Quota exceeded"}"#),
            Some("Quota exceeded".to_string())
        );
        assert_eq!(
            extract_error_message(r#"{"error":"bad key"}"#),
            Some("bad key".to_string())
        );
        assert_eq!(extract_error_message("not json"), None);
    }
}
