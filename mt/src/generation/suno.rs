//! Suno-style generation API client
//!
//! Talks to a self-hosted Suno API wrapper: `POST {base_url}/api/generate`
//! with a JSON body, answered by a JSON array of track records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::{GenerateRequest, GeneratedTrack, GenerationError, MusicGenerator};
use crate::config::GenerationConfig;

/// Generation API client
pub struct SunoClient {
    base_url: String,
    make_instrumental: bool,
    wait_audio: bool,
    http: Client,
}

impl SunoClient {
    /// Create a new client from the generation config
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        debug!(?config, "SunoClient::from_config: called");
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GenerationError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            make_instrumental: config.make_instrumental,
            wait_audio: config.wait_audio,
            http,
        })
    }

    /// Full URL of the generate endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn build_request<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            prompt,
            make_instrumental: self.make_instrumental,
            wait_audio: self.wait_audio,
        }
    }
}

/// Parse the service's response body into track records
///
/// The body must be a non-empty JSON array. Records are read leniently: a
/// field with the wrong type is treated as missing instead of failing the
/// whole response, since only the first record is ever played.
pub fn parse_tracks(body: &str) -> Result<Vec<GeneratedTrack>, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let Some(records) = value.as_array() else {
        debug!("parse_tracks: body is not an array");
        return Err(GenerationError::InvalidResponse(format!(
            "expected a JSON array of tracks, got: {}",
            truncate(body, 200)
        )));
    };
    if records.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(records.iter().map(GeneratedTrack::from_value).collect())
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[async_trait]
impl MusicGenerator for SunoClient {
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedTrack>, GenerationError> {
        let url = self.endpoint();
        debug!(%url, prompt_len = prompt.len(), "SunoClient::generate: called");

        let response = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "SunoClient::generate: API error");
            return Err(GenerationError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let tracks = parse_tracks(&text)?;
        info!("Generation returned {} track(s)", tracks.len());
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(base_url: &str) -> GenerationConfig {
        GenerationConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        }
    }

    /// Answer exactly one HTTP request with the given status and body,
    /// handing back the raw request body that was received
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            let request_body = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break text[header_end + 4..].to_string();
                    }
                }
                if n == 0 {
                    break String::new();
                }
            };

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request_body
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = SunoClient::from_config(&config("http://localhost:3000/")).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000/api/generate");
    }

    #[test]
    fn test_build_request_uses_config_flags() {
        let mut cfg = config("http://localhost:3000");
        cfg.make_instrumental = false;
        let client = SunoClient::from_config(&cfg).unwrap();
        let request = client.build_request("soft piano");
        assert_eq!(request.prompt, "soft piano");
        assert!(!request.make_instrumental);
        assert!(request.wait_audio);
    }

    #[test]
    fn test_parse_tracks() {
        let tracks = parse_tracks(r#"[{"id": "a", "audio_url": "https://x/a.mp3"}, {"id": "b"}]"#).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].audio_ref(), "https://x/a.mp3");
        assert_eq!(tracks[1].audio_ref(), "N/A");
    }

    #[test]
    fn test_parse_tracks_wrong_audio_type_degrades() {
        let tracks = parse_tracks(r#"[{"id": "a", "audio_url": 123}]"#).unwrap();
        assert_eq!(tracks[0].id.as_deref(), Some("a"));
        assert_eq!(tracks[0].audio_ref(), "N/A");
    }

    #[test]
    fn test_parse_tracks_bad_later_record_keeps_first() {
        let tracks = parse_tracks(r#"[{"id": "a", "audio_url": "https://x/a.mp3"}, {"id": 7}]"#).unwrap();
        assert_eq!(tracks[0].id.as_deref(), Some("a"));
        assert_eq!(tracks[0].audio_ref(), "https://x/a.mp3");
        assert_eq!(tracks[1].id, None);
    }

    #[tokio::test]
    async fn test_generate_malformed_record_still_succeeds() {
        let (base_url, server) = serve_once("200 OK", r#"[{"id": "t1", "audio_url": false}]"#).await;
        let client = SunoClient::from_config(&config(&base_url)).unwrap();

        let tracks = client.generate("calm piano").await.unwrap();
        assert_eq!(tracks[0].id.as_deref(), Some("t1"));
        assert!(!tracks[0].has_audio());
        server.await.unwrap();
    }

    #[test]
    fn test_parse_tracks_rejects_bad_shapes() {
        assert!(matches!(parse_tracks("[]"), Err(GenerationError::EmptyResponse)));
        assert!(matches!(
            parse_tracks(r#"{"error": "nope"}"#),
            Err(GenerationError::InvalidResponse(_))
        ));
        assert!(matches!(parse_tracks("not json"), Err(GenerationError::Json(_))));
    }

    #[tokio::test]
    async fn test_generate_success_sends_payload() {
        let (base_url, server) = serve_once("200 OK", r#"[{"id": "t1", "audio_url": "https://cdn/t1.mp3"}]"#).await;
        let client = SunoClient::from_config(&config(&base_url)).unwrap();

        let tracks = client.generate("calm piano").await.unwrap();
        assert_eq!(tracks[0].id.as_deref(), Some("t1"));

        let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(sent["prompt"], "calm piano");
        assert_eq!(sent["make_instrumental"], true);
        assert_eq!(sent["wait_audio"], true);
    }

    #[tokio::test]
    async fn test_generate_non_success_is_api_error() {
        let (base_url, server) = serve_once("502 Bad Gateway", r#"{"error": "upstream down"}"#).await;
        let client = SunoClient::from_config(&config(&base_url)).unwrap();

        let err = client.generate("calm piano").await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("upstream down"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_generate_network_error() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SunoClient::from_config(&config(&format!("http://{}", addr))).unwrap();
        let err = client.generate("calm piano").await.unwrap_err();
        assert!(matches!(err, GenerationError::Network(_)));
    }
}
