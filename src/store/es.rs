//! Elasticsearch-backed unit store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use elasticsearch::{
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    CountParts, Elasticsearch, SearchParts, UpdateParts,
};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::UnitStore;
use crate::models::{AdminUnit, Level};

/// Audit scans read the whole geocoded set in one page; district-level
/// datasets stay well under the index's default result window.
const SCAN_WINDOW: usize = 10_000;

/// Elasticsearch client wrapper scoped to the admin-unit index.
#[derive(Clone)]
pub struct EsUnitStore {
    client: Elasticsearch,
    pub index_name: String,
}

impl EsUnitStore {
    pub async fn new(es_url: &str, index_name: &str) -> Result<Self> {
        let url = Url::parse(es_url)?;
        let conn_pool = SingleNodeConnectionPool::new(url);
        let transport = TransportBuilder::new(conn_pool).disable_proxy().build()?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            index_name: index_name.to_string(),
        })
    }

    /// Check if cluster is healthy
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .cluster()
            .health(elasticsearch::cluster::ClusterHealthParts::None)
            .send()
            .await?;

        Ok(response.status_code().is_success())
    }

    async fn search(&self, query: serde_json::Value, size: usize) -> Result<Vec<AdminUnit>> {
        let response = self
            .client
            .search(SearchParts::Index(&[&self.index_name]))
            .body(json!({
                "query": query,
                "size": size,
                "sort": [{"id.keyword": {"order": "asc"}}]
            }))
            .send()
            .await
            .context("Unit search request failed")?;

        let body = response.json::<serde_json::Value>().await?;

        let hits = body["hits"]["hits"].as_array().cloned().unwrap_or_default();
        let mut units = Vec::with_capacity(hits.len());
        for hit in hits {
            let unit: AdminUnit = serde_json::from_value(hit["_source"].clone())
                .context("Malformed admin-unit document")?;
            units.push(unit);
        }

        debug!("Search matched {} units", units.len());
        Ok(units)
    }

    async fn count(&self, query: serde_json::Value) -> Result<u64> {
        let response = self
            .client
            .count(CountParts::Index(&[&self.index_name]))
            .body(json!({ "query": query }))
            .send()
            .await
            .context("Unit count request failed")?;

        let body = response.json::<serde_json::Value>().await?;
        Ok(body["count"].as_u64().unwrap_or(0))
    }

    async fn partial_update(&self, id: &str, doc: serde_json::Value) -> Result<()> {
        let response = self
            .client
            .update(UpdateParts::IndexId(&self.index_name, id))
            .body(json!({ "doc": doc }))
            .send()
            .await
            .context("Unit update request failed")?;

        if !response.status_code().is_success() {
            let error_body = response.text().await?;
            anyhow::bail!("Update of unit {} failed: {}", id, error_body);
        }

        Ok(())
    }
}

#[async_trait]
impl UnitStore for EsUnitStore {
    async fn find_candidates(&self, level: Level, limit: usize) -> Result<Vec<AdminUnit>> {
        // A false flag and a missing coordinate are equivalent "pending"
        // signals; either one makes the unit a candidate.
        let query = json!({
            "bool": {
                "filter": [{"term": {"level": level.field_name()}}],
                "should": [
                    {"term": {"isGeocoded": false}},
                    {"bool": {"must_not": {"exists": {"field": "latitude"}}}},
                    {"bool": {"must_not": {"exists": {"field": "longitude"}}}}
                ],
                "minimum_should_match": 1
            }
        });

        self.search(query, limit).await
    }

    async fn find_geocoded(&self) -> Result<Vec<AdminUnit>> {
        let query = json!({
            "bool": {
                "filter": [{"term": {"isGeocoded": true}}]
            }
        });

        self.search(query, SCAN_WINDOW).await
    }

    async fn commit_coordinates(&self, id: &str, lat: f64, lon: f64) -> Result<()> {
        self.partial_update(
            id,
            json!({
                "latitude": lat,
                "longitude": lon,
                "isGeocoded": true
            }),
        )
        .await
    }

    async fn clear_coordinates(&self, id: &str) -> Result<()> {
        self.partial_update(
            id,
            json!({
                "latitude": null,
                "longitude": null,
                "isGeocoded": false
            }),
        )
        .await
    }

    async fn count_units(&self, level: Level) -> Result<u64> {
        self.count(json!({
            "bool": {
                "filter": [{"term": {"level": level.field_name()}}]
            }
        }))
        .await
    }

    async fn count_geocoded(&self, level: Level) -> Result<u64> {
        // Geocoded means flag set AND both coordinates present; a document
        // with only one of the two signals is still pending.
        self.count(json!({
            "bool": {
                "filter": [
                    {"term": {"level": level.field_name()}},
                    {"term": {"isGeocoded": true}},
                    {"exists": {"field": "latitude"}},
                    {"exists": {"field": "longitude"}}
                ]
            }
        }))
        .await
    }
}
