//! Client for the remote recipe index.
//!
//! Two endpoints are used: `GET {base}/search?q=<query>` returning the
//! result list, and `GET {base}/get?rId=<id>` returning one recipe. Both
//! the bare payloads and the public forkify envelopes are accepted.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, NetworkError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    #[serde(alias = "recipe_id")]
    pub id: String,
    pub title: String,
    #[serde(alias = "publisher")]
    pub author: String,
    #[serde(alias = "image_url")]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeDetail {
    pub title: String,
    #[serde(alias = "publisher")]
    pub author: String,
    #[serde(alias = "image_url")]
    pub image: String,
    #[serde(alias = "source_url")]
    pub url: String,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default, rename = "cookingTime", alias = "cooking_time")]
    pub cooking_time: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchPayload {
    Bare(Vec<RecipeSummary>),
    Envelope { recipes: Vec<RecipeSummary> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DetailPayload {
    Envelope { recipe: RecipeDetail },
    Bare(RecipeDetail),
}

pub fn decode_search(body: &str) -> Result<Vec<RecipeSummary>, NetworkError> {
    Ok(match serde_json::from_str(body)? {
        SearchPayload::Bare(results) => results,
        SearchPayload::Envelope { recipes } => recipes,
    })
}

pub fn decode_detail(body: &str) -> Result<RecipeDetail, NetworkError> {
    Ok(match serde_json::from_str(body)? {
        DetailPayload::Envelope { recipe } => recipe,
        DetailPayload::Bare(recipe) => recipe,
    })
}

#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<Vec<RecipeSummary>>;

    async fn recipe(&self, id: &str) -> AppResult<RecipeDetail>;
}

pub struct HttpRecipeApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecipeApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NetworkError::from)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        decode: fn(&str) -> Result<T, NetworkError>,
    ) -> Result<T, NetworkError> {
        let url = format!("{}/{path}", self.base_url);
        log::debug!("GET {url} {query:?}");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status(status));
        }
        let body = response.text().await?;
        decode(&body)
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn search(&self, query: &str) -> AppResult<Vec<RecipeSummary>> {
        Ok(self.get("search", &[("q", query)], decode_search).await?)
    }

    async fn recipe(&self, id: &str) -> AppResult<RecipeDetail> {
        Ok(self.get("get", &[("rId", id)], decode_detail).await?)
    }
}
