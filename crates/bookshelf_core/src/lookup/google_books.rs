//! Google Books volumes API client.

use crate::config::LookupConfig;
use crate::lookup::{CatalogEntry, CatalogLookup, LookupError};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Instant;

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
struct Volume {
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
struct VolumeInfo {
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
}

impl VolumesResponse {
    /// First volume's metadata; `None` when the listing is empty.
    fn into_entry(self) -> Option<CatalogEntry> {
        if self.total_items == 0 {
            return None;
        }
        let info = self.items.into_iter().next()?.volume_info;
        Some(CatalogEntry {
            authors: info.authors,
            publisher: info.publisher,
            published_date: info.published_date,
        })
    }
}

/// Blocking lookup against `GET {base_url}?q=isbn:{isbn}`.
pub struct GoogleBooksLookup {
    client: Client,
    base_url: String,
}

impl GoogleBooksLookup {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(LookupError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

impl CatalogLookup for GoogleBooksLookup {
    fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<CatalogEntry>, LookupError> {
        let started_at = Instant::now();
        let result = self
            .client
            .get(&self.base_url)
            .query(&[("q", format!("isbn:{isbn}"))])
            .send()
            .map_err(LookupError::Transport)
            .and_then(|response| {
                let status = response.status();
                if !status.is_success() {
                    return Err(LookupError::Status(status.as_u16()));
                }
                response
                    .json::<VolumesResponse>()
                    .map_err(LookupError::Decode)
            });

        match result {
            Ok(body) => {
                let entry = body.into_entry();
                info!(
                    "event=catalog_lookup module=lookup status=ok found={} duration_ms={}",
                    entry.is_some(),
                    started_at.elapsed().as_millis()
                );
                Ok(entry)
            }
            Err(err) => {
                warn!(
                    "event=catalog_lookup module=lookup status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::VolumesResponse;

    fn parse(body: &str) -> VolumesResponse {
        serde_json::from_str(body).expect("fixture should decode")
    }

    #[test]
    fn empty_listing_is_not_found() {
        assert_eq!(parse(r#"{"kind":"books#volumes","totalItems":0}"#).into_entry(), None);
    }

    #[test]
    fn first_volume_supplies_metadata() {
        let entry = parse(
            r#"{"totalItems":2,"items":[
                {"volumeInfo":{"title":"Emma","authors":["Jane Austen"],
                  "publisher":"Penguin","publishedDate":"2003-04-29"}},
                {"volumeInfo":{"authors":["Someone Else"]}}
            ]}"#,
        )
        .into_entry()
        .expect("entry should exist");

        assert_eq!(entry.authors, vec!["Jane Austen".to_string()]);
        assert_eq!(entry.publisher.as_deref(), Some("Penguin"));
        assert_eq!(entry.published_date.as_deref(), Some("2003-04-29"));
    }

    #[test]
    fn partial_volume_info_leaves_fields_absent() {
        let entry = parse(r#"{"totalItems":1,"items":[{"volumeInfo":{}}]}"#)
            .into_entry()
            .expect("entry should exist");
        assert_eq!(entry.authors_line(), "missing");
        assert_eq!(entry.publisher_or_missing(), "missing");
    }
}
