use crate::config::ClientConfig;
use crate::error::BackendError;
use crate::models::{AskRequest, UploadReply};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use url::Url;

pub const UPLOAD_FIELD: &str = "file";
const PDF_MIME: &str = "application/pdf";
const FALLBACK_FILENAME: &str = "document.pdf";

/// Raw answer bytes in arrival order.
pub type AnswerStream = BoxStream<'static, Result<Bytes, BackendError>>;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Sends the file to `/upload` and returns the decoded JSON reply.
    async fn upload(&self, file: &Path) -> Result<UploadReply, BackendError>;

    /// Posts the question to `/ask` and hands back the response body as a
    /// stream of chunks.
    async fn ask(&self, question: &str) -> Result<AnswerStream, BackendError>;
}

pub struct HttpBackend {
    client: Client,
    upload_url: Url,
    ask_url: Url,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ClientConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client,
            upload_url: config.base_url.join("upload")?,
            ask_url: config.base_url.join("ask")?,
        })
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    pub fn ask_url(&self) -> &Url {
        &self.ask_url
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, file: &Path) -> Result<UploadReply, BackendError> {
        let contents = tokio::fs::read(file)
            .await
            .map_err(|source| BackendError::ReadFile {
                path: file.to_path_buf(),
                source,
            })?;

        let filename = file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());

        log::info!(
            "Uploading {} ({} bytes) to {}",
            filename,
            contents.len(),
            self.upload_url
        );

        let part = Part::bytes(contents).file_name(filename).mime_str(PDF_MIME)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Upload returned status {}", status);
        }

        // The reply body is JSON whatever the status says.
        let body = response.bytes().await?;
        let reply: UploadReply = serde_json::from_slice(&body)?;
        Ok(reply)
    }

    async fn ask(&self, question: &str) -> Result<AnswerStream, BackendError> {
        log::info!("Asking {} ({} chars)", self.ask_url, question.chars().count());

        let response = self.client
            .post(self.ask_url.clone())
            .json(&AskRequest { question })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("Ask returned status {}, streaming body anyway", status);
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(BackendError::from));
        Ok(chunks.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_joined_to_base_url() {
        let config = ClientConfig::new()
            .unwrap()
            .with_base_url("http://localhost:8080/pdf")
            .unwrap();
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.upload_url().as_str(), "http://localhost:8080/pdf/upload");
        assert_eq!(backend.ask_url().as_str(), "http://localhost:8080/pdf/ask");
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let backend = HttpBackend::new(&ClientConfig::new().unwrap()).unwrap();
        let err = backend
            .upload(Path::new("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ReadFile { .. }));
    }
}
