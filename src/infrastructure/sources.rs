// infrastructure/sources.rs
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::info;

use crate::infrastructure::error::{AppError, AppResult};

/// Source de texte brut pour les imports (web ou fichier local)
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Lit le contenu complet de la source
    async fn fetch(&self) -> AppResult<String>;

    /// Description de la source pour les logs
    fn describe(&self) -> String;
}

/// Texte récupéré par un GET HTTP
pub struct HttpSource {
    http_client: HttpClient,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Client HTTP: {}", e)))?;

        Ok(Self {
            http_client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl TextSource for HttpSource {
    async fn fetch(&self) -> AppResult<String> {
        info!("🌐 Téléchargement de {}", self.url);

        let response = self.http_client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalSource(format!(
                "GET {} a répondu {}",
                self.url,
                response.status()
            )));
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Texte lu depuis un fichier local
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TextSource for FileSource {
    async fn fetch(&self) -> AppResult<String> {
        info!("📄 Lecture de {}", self.path.display());

        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::ExternalSource(format!("{}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Source en mémoire
pub struct StaticSource(pub String);

#[async_trait]
impl TextSource for StaticSource {
    async fn fetch(&self) -> AppResult<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn http_source_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/1342/1342-0.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("It is a truth"))
            .mount(&server)
            .await;

        let source = HttpSource::new(
            format!("{}/files/1342/1342-0.txt", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(source.fetch().await.unwrap(), "It is a truth");
    }

    #[tokio::test]
    async fn http_error_status_fails_the_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = HttpSource::new(format!("{}/missing.txt", server.uri()), Duration::from_secs(5)).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::ExternalSource(_)));
    }

    #[tokio::test]
    async fn file_source_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "q1,src,Great quote").unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.fetch().await.unwrap(), "q1,src,Great quote");
    }

    #[tokio::test]
    async fn missing_file_is_an_external_source_error() {
        let source = FileSource::new("/definitely/not/here.csv");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::ExternalSource(_)));
    }
}
