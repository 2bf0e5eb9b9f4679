//! Blob-storage HTTP API wrapper. Objects live under a configured bucket;
//! the database keeps the pointers.

use super::ExternalError;

const SERVICE: &str = "storage";

pub struct BlobStore {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    bucket: String,
}

impl BlobStore {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: Option<String>,
        bucket: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            bucket: bucket.to_string(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            self.bucket,
            key.trim_start_matches('/')
        )
    }

    pub async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ExternalError> {
        let mut request = self
            .http
            .put(self.object_url(key))
            .header("Content-Type", content_type)
            .body(bytes);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(ExternalError::http(SERVICE))?;
        ExternalError::check_status(SERVICE, response)?;
        Ok(())
    }

    pub async fn fetch(&self, key: &str) -> Result<Vec<u8>, ExternalError> {
        let mut request = self.http.get(self.object_url(key));
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(ExternalError::http(SERVICE))?;
        let response = ExternalError::check_status(SERVICE, response)?;
        let bytes = response
            .bytes()
            .await
            .map_err(ExternalError::http(SERVICE))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> BlobStore {
        BlobStore::new(
            reqwest::Client::new(),
            "http://localhost:9000/",
            None,
            "fundline-documents",
        )
    }

    #[test]
    fn object_urls_join_cleanly() {
        let store = store();
        assert_eq!(
            store.object_url("clients/abc/doc.pdf"),
            "http://localhost:9000/fundline-documents/clients/abc/doc.pdf"
        );
        // leading slash on the key must not produce a double slash
        assert_eq!(
            store.object_url("/clients/abc/doc.pdf"),
            "http://localhost:9000/fundline-documents/clients/abc/doc.pdf"
        );
    }
}
