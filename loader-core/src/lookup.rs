use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::{config::LookupConfig, error::LookupError, model::LookupResponse};

/// Current-weather lookup by coordinates.
#[async_trait]
pub trait LookupClient: Send + Sync {
    async fn lookup(&self, lon: &str, lat: &str) -> Result<LookupResponse, LookupError>;
}

/// OpenWeather "current weather" client.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    endpoint: Url,
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    /// Merge `appid` and the given parameters into the endpoint query,
    /// replacing pairs with the same name and keeping the rest.
    fn build_url(&self, params: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        let overridden = |k: &str| k == "appid" || params.iter().any(|(name, _)| *name == k);

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !overridden(&**k))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.extend_pairs(kept);
            query.append_pair("appid", &self.api_key);
            query.extend_pairs(params);
        }

        url
    }
}

#[async_trait]
impl LookupClient for OpenWeatherClient {
    async fn lookup(&self, lon: &str, lat: &str) -> Result<LookupResponse, LookupError> {
        let url = self.build_url(&[("lon", lon), ("lat", lat)]);

        debug!(lon, lat, "sending weather API request");
        let res = self.http.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            // An unreadable error body is reported as empty.
            let body = res.text().await.unwrap_or_default();
            return Err(LookupError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
