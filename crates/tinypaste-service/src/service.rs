use async_trait::async_trait;
use std::sync::Arc;
use tinypaste_core::codec;
use tinypaste_core::{CreatePaste, PasteError, PasteId, PasteRecord, Pastebin, Repository};
use tinypaste_generator::{RandomTokenSource, SecretIdGenerator, SecretIdSettings, TokenSource};
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Public ids returned per page by [`Pastebin::list`].
pub const DEFAULT_PAGE_SIZE: u64 = 25;

/// Encoded ids that would shadow the gateway's own routes.
pub const DEFAULT_RESERVED_CODES: &[&str] = &["pastes", "health"];

#[derive(Debug, Clone, TypedBuilder)]
pub struct PasteServiceSettings {
    /// Encodings never handed out as public ids. A key whose encoding is in
    /// this list is skipped and the paste is stored again under the next key.
    #[builder(default = DEFAULT_RESERVED_CODES.iter().map(|code| code.to_string()).collect())]
    pub reserved_codes: Vec<String>,
    #[builder(default = DEFAULT_PAGE_SIZE)]
    pub page_size: u64,
    #[builder(default)]
    pub secret: SecretIdSettings,
}

impl Default for PasteServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Pastebin`] trait.
///
/// This service wraps a [`Repository`] and a [`SecretIdGenerator`] to handle:
/// - Validation of new pastes
/// - Public ids rendered through the identifier codec
/// - Secret tokens minted against the repository
///
/// Validation failures are returned before the repository is touched.
/// Storage failures are not retried.
#[derive(Debug)]
pub struct PasteService<R, S = RandomTokenSource> {
    repository: Arc<R>,
    secrets: SecretIdGenerator<S>,
    reserved_codes: Vec<String>,
    page_size: u64,
}

impl<R: Repository> PasteService<R, RandomTokenSource> {
    /// Creates a service that draws secret tokens from the thread-local RNG.
    pub fn new(repository: R, settings: PasteServiceSettings) -> Self {
        let secrets = SecretIdGenerator::new(settings.secret);
        Self::with_secret_generator(repository, secrets, settings)
    }
}

impl<R: Repository, S: TokenSource> PasteService<R, S> {
    /// Creates a service with a custom secret token generator.
    ///
    /// `settings.secret` is ignored in favour of the generator's own settings.
    pub fn with_secret_generator(
        repository: R,
        secrets: SecretIdGenerator<S>,
        settings: PasteServiceSettings,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            secrets,
            reserved_codes: settings.reserved_codes,
            page_size: settings.page_size.max(1),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn validate_text(text: &str) -> Result<(), PasteError> {
        if text.is_empty() {
            return Err(PasteError::Validation(
                "Paste text cannot be empty.".to_string(),
            ));
        }
        Ok(())
    }

    fn is_reserved(&self, code: &str) -> bool {
        self.reserved_codes.iter().any(|reserved| reserved == code)
    }

    async fn create_secret(&self, text: String) -> Result<PasteId, PasteError> {
        let token = self.secrets.mint(&*self.repository).await?;
        self.repository
            .insert_secret(&token, PasteRecord::new(text))
            .await?;

        debug!(length = token.body().len(), "stored secret paste");
        Ok(PasteId::Secret(token))
    }

    async fn create_public(&self, text: String) -> Result<PasteId, PasteError> {
        loop {
            let key = self
                .repository
                .insert_public(PasteRecord::new(text.clone()))
                .await?;

            let code = codec::encode(key);
            if self.is_reserved(&code) {
                warn!(key, code = %code, "skipping key whose encoding is reserved");
                continue;
            }

            debug!(key, code = %code, "stored public paste");
            return Ok(PasteId::Public(key));
        }
    }
}

#[async_trait]
impl<R: Repository, S: TokenSource> Pastebin for PasteService<R, S> {
    async fn create(&self, params: CreatePaste) -> Result<PasteId, PasteError> {
        Self::validate_text(&params.text)?;

        if params.secret {
            self.create_secret(params.text).await
        } else {
            self.create_public(params.text).await
        }
    }

    async fn read(&self, raw_id: &str) -> Result<PasteRecord, PasteError> {
        let id = PasteId::parse(raw_id).inspect_err(|e| {
            trace!(raw_id, error = %e, "malformed paste id");
        })?;

        let record = match &id {
            // A burned key keeps its row in the store but is never an address.
            PasteId::Public(_) if self.is_reserved(raw_id) => None,
            PasteId::Public(key) => self.repository.get_public(*key).await?,
            PasteId::Secret(token) => self.repository.get_secret(token).await?,
        };

        record.ok_or_else(|| {
            trace!(raw_id, "paste not found");
            PasteError::NotFound(raw_id.to_string())
        })
    }

    async fn list(&self, page: u64) -> Result<Vec<PasteId>, PasteError> {
        if page == 0 {
            return Err(PasteError::Validation(
                "page numbers start at 1".to_string(),
            ));
        }

        let offset = (page - 1)
            .checked_mul(self.page_size)
            .ok_or_else(|| PasteError::Validation(format!("page {page} is out of range")))?;

        let keys = self
            .repository
            .list_public(offset, self.page_size)
            .await?;

        // Burned keys are dropped, so a page can come back short.
        Ok(keys
            .into_iter()
            .filter(|&key| !self.is_reserved(&codec::encode(key)))
            .map(PasteId::Public)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinypaste_storage::InMemoryRepository;

    fn test_service() -> PasteService<InMemoryRepository> {
        PasteService::new(InMemoryRepository::new(), PasteServiceSettings::default())
    }

    fn public(text: &str) -> CreatePaste {
        CreatePaste {
            text: text.to_string(),
            secret: false,
        }
    }

    fn secret(text: &str) -> CreatePaste {
        CreatePaste {
            text: text.to_string(),
            secret: true,
        }
    }

    #[tokio::test]
    async fn create_public_then_read() {
        let service = test_service();

        let id = service.create(public("hello")).await.unwrap();

        assert!(matches!(id, PasteId::Public(_)));
        let record = service.read(&id.to_string()).await.unwrap();
        assert_eq!(record.text, "hello");
    }

    #[tokio::test]
    async fn public_ids_are_encoded_keys() {
        let service = test_service();

        let first = service.create(public("a")).await.unwrap();
        let second = service.create(public("b")).await.unwrap();

        // the in-memory store starts at key 1
        assert_eq!(first.to_string(), codec::encode(1));
        assert_eq!(second.to_string(), codec::encode(2));
    }

    #[tokio::test]
    async fn create_secret_then_read() {
        let service = test_service();

        let id = service.create(secret("hidden")).await.unwrap();

        let raw = id.to_string();
        assert!(raw.starts_with('+'));
        assert_eq!(raw.len(), 6);
        assert_eq!(service.read(&raw).await.unwrap().text, "hidden");
    }

    #[tokio::test]
    async fn secret_pastes_are_not_listed() {
        let service = test_service();

        service.create(secret("hidden")).await.unwrap();
        let shown = service.create(public("shown")).await.unwrap();

        assert_eq!(service.list(1).await.unwrap(), vec![shown]);
    }

    #[tokio::test]
    async fn empty_text_is_rejected_before_storage() {
        let service = test_service();

        let err = service.create(public("")).await.unwrap_err();
        assert!(matches!(err, PasteError::Validation(_)));

        let err = service.create(secret("")).await.unwrap_err();
        assert!(matches!(err, PasteError::Validation(_)));

        assert!(service.repository().is_empty());
    }

    #[tokio::test]
    async fn read_never_issued_id_is_not_found() {
        let service = test_service();
        service.create(public("hello")).await.unwrap();

        let err = service.read(&codec::encode(999)).await.unwrap_err();
        assert!(matches!(err, PasteError::NotFound(_)));
        assert!(err.is_not_found());

        let err = service.read("+nosuch").await.unwrap_err();
        assert!(matches!(err, PasteError::NotFound(_)));
    }

    #[tokio::test]
    async fn read_malformed_id_reports_invalid_identifier() {
        let service = test_service();

        for raw in ["", "+", "ab~", "sD", "a.b"] {
            let err = service.read(raw).await.unwrap_err();
            assert!(matches!(err, PasteError::InvalidIdentifier(_)), "{raw}");
            assert!(err.is_not_found());
        }
    }

    #[tokio::test]
    async fn reserved_encodings_are_skipped() {
        let reserved_key = codec::decode("pastes").unwrap();
        let repository = InMemoryRepository::with_first_key(reserved_key);
        let service = PasteService::new(repository, PasteServiceSettings::default());

        let id = service.create(public("hello")).await.unwrap();

        assert_eq!(id, PasteId::Public(reserved_key + 1));
        assert_ne!(id.to_string(), "pastes");
        assert_eq!(service.read(&id.to_string()).await.unwrap().text, "hello");
    }

    #[tokio::test]
    async fn burned_keys_are_neither_listed_nor_readable() {
        let reserved_key = codec::decode("pastes").unwrap();
        let repository = InMemoryRepository::with_first_key(reserved_key);
        let service = PasteService::new(repository, PasteServiceSettings::default());

        let id = service.create(public("hello")).await.unwrap();

        // the burned row is still in the store
        assert_eq!(service.repository().len(), 2);
        assert_eq!(service.list(1).await.unwrap(), vec![id]);

        let err = service.read("pastes").await.unwrap_err();
        assert!(matches!(err, PasteError::NotFound(_)));
    }

    #[tokio::test]
    async fn custom_reserved_codes() {
        let settings = PasteServiceSettings::builder()
            .reserved_codes(vec![codec::encode(1), codec::encode(2)])
            .build();
        let service = PasteService::new(InMemoryRepository::new(), settings);

        let id = service.create(public("hello")).await.unwrap();

        assert_eq!(id, PasteId::Public(3));
    }

    #[tokio::test]
    async fn list_pages_newest_first() {
        let settings = PasteServiceSettings::builder().page_size(2).build();
        let service = PasteService::new(InMemoryRepository::new(), settings);
        for i in 0..5 {
            service.create(public(&format!("paste {i}"))).await.unwrap();
        }

        let page = |keys: &[u64]| keys.iter().copied().map(PasteId::Public).collect::<Vec<_>>();
        assert_eq!(service.list(1).await.unwrap(), page(&[5, 4]));
        assert_eq!(service.list(2).await.unwrap(), page(&[3, 2]));
        assert_eq!(service.list(3).await.unwrap(), page(&[1]));
        assert!(service.list(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_rejects_page_zero() {
        let service = test_service();
        let err = service.list(0).await.unwrap_err();
        assert!(matches!(err, PasteError::Validation(_)));
    }

    #[tokio::test]
    async fn list_rejects_overflowing_page() {
        let service = test_service();
        let err = service.list(u64::MAX).await.unwrap_err();
        assert!(matches!(err, PasteError::Validation(_)));
    }

    #[tokio::test]
    async fn exhausted_secret_minting_surfaces() {
        let settings = PasteServiceSettings::builder()
            .secret(
                SecretIdSettings::builder()
                    .initial_length(1)
                    .max_collisions_per_length(u32::MAX)
                    .max_attempts(64)
                    .build(),
            )
            .build();
        let service = PasteService::new(InMemoryRepository::new(), settings);

        // Fill every one-symbol token so each draw collides.
        for &symbol in codec::ALPHABET.iter() {
            let token = tinypaste_core::SecretToken::from_body(&(symbol as char).to_string()).unwrap();
            service
                .repository()
                .insert_secret(&token, PasteRecord::new("taken"))
                .await
                .unwrap();
        }

        let err = service.create(secret("hello")).await.unwrap_err();
        assert!(matches!(err, PasteError::ResourceExhausted { attempts: 64 }));
    }
}
