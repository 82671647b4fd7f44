//! Typed gateway to the bahn.de web API.
//!
//! Hides URL construction, browser-identity headers, cookie handling,
//! timezone conversion, response decoding, and error classification behind
//! a small set of async operations returning domain entities.

mod endpoints;

pub use endpoints::{
    BASE_URL, ENDPOINT_ARRIVALS, ENDPOINT_DEPARTURES, ENDPOINT_FORMATION, ENDPOINT_JOURNEY,
    ENDPOINT_LOCATIONS, ENDPOINT_NEARBY, MODES_OF_TRANSIT,
};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Europe::Berlin;
use rand::Rng;
use uuid::Uuid;

use crate::cache::ResponseCache;
use crate::error::{ApiError, Result};
use crate::models::{
    BoardResponse, Departure, Formation, FormationResponse, Journey, JourneyResponse, Location,
    LocationResponse,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which side of a station board to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSide {
    Departures,
    Arrivals,
}

impl BoardSide {
    fn endpoint(self) -> &'static str {
        match self {
            BoardSide::Departures => ENDPOINT_DEPARTURES,
            BoardSide::Arrivals => ENDPOINT_ARRIVALS,
        }
    }
}

/// Parameters for a departure/arrival board query.
#[derive(Debug, Clone, Default)]
pub struct StationBoardRequest {
    pub eva: i64,
    pub station_id: String,
    /// Query instant; defaults to now.
    pub date_time: Option<DateTime<Utc>>,
    /// Number of via stations per entry; defaults to 5.
    pub num_vias: u32,
    /// Transport mode filter; empty means all modes.
    pub modes: Vec<String>,
}

/// Parameters for a nearby-station search.
#[derive(Debug, Clone)]
pub struct NearbyRequest {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in meters; defaults to 9999.
    pub radius: u32,
    /// Maximum number of results; defaults to 100.
    pub max_results: u32,
}

impl Default for NearbyRequest {
    fn default() -> Self {
        Self {
            lat: 0.0,
            lon: 0.0,
            radius: 9999,
            max_results: 100,
        }
    }
}

/// Parameters for a formation (Wagenreihung) query.
#[derive(Debug, Clone)]
pub struct FormationRequest {
    pub eva: i64,
    pub train_type: String,
    pub train_number: String,
    /// Departure instant; defaults to now.
    pub departure: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════════════════════════════
// BROWSER IDENTITY
// ═══════════════════════════════════════════════════════════════════

/// One consistent browser identity, fixed for the client's lifetime.
#[derive(Debug, Clone)]
struct BrowserProfile {
    user_agent: String,
    sec_ch_ua: String,
    mobile: bool,
}

/// (template, Chromium major for sec-ch-ua, mobile) — `XXXX`/`YYY` are
/// replaced with pseudo-random version digits at construction.
const USER_AGENT_TEMPLATES: [(&str, u32, bool); 8] = [
    ("Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.XXXX.YYY Mobile Safari/537.36", 114, true),
    ("Mozilla/5.0 (Linux; Android 14; SM-S928B/DS) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.XXXX.YYY Mobile Safari/537.36", 120, true),
    ("Mozilla/5.0 (Linux; Android 14; Pixel 9 Pro Build/AD1A.240418.003; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/124.0.XXXX.YYY Mobile Safari/537.36", 124, true),
    ("Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.XXXX.YYY Mobile Safari/537.36", 112, true),
    ("Mozilla/5.0 (Linux; Android 15; moto g - 2025 Build/V1VK35.22-13-2; wv) AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/132.0.XXXX.YYY Mobile Safari/537.36", 132, true),
    ("Mozilla/5.0 (X11; CrOS x86_64 14541.0.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.XXXX.YYY Safari/537.36", 134, false),
    ("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.XXXX.YYY Safari/537.36", 131, false),
    ("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.XXXX.YYY Safari/537.36", 129, false),
];

const DESKTOP_PLATFORMS: [&str; 3] = ["\"Windows\"", "\"macOS\"", "\"ChromeOS\""];

impl BrowserProfile {
    fn random() -> Self {
        let mut rng = rand::thread_rng();
        let (template, major, mobile) =
            USER_AGENT_TEMPLATES[rng.gen_range(0..USER_AGENT_TEMPLATES.len())];

        let build: u32 = rng.gen_range(0..1000);
        let patch: u32 = rng.gen_range(0..100);
        let user_agent = template
            .replace("XXXX", &build.to_string())
            .replace("YYY", &patch.to_string());

        let sec_ch_ua = format!(
            "\"Chromium\";v=\"{major}\", \"Not?A_Brand\";v=\"24\", \"Google Chrome\";v=\"{major}\""
        );

        Self {
            user_agent,
            sec_ch_ua,
            mobile,
        }
    }
}

fn correlation_id() -> String {
    format!("{}_{}", Uuid::new_v4(), Uuid::new_v4())
}

// ═══════════════════════════════════════════════════════════════════
// CLIENT
// ═══════════════════════════════════════════════════════════════════

/// API client for bahn.de. Cheap to clone behind an [`Arc`]; its identity
/// fields are immutable after construction and the cache hook is shared.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    cache: Option<Arc<dyn ResponseCache>>,
    browser: BrowserProfile,
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache: None,
        }
    }
}

impl ClientBuilder {
    /// Override the base URL (used by tests against a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<Client> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Client {
            http,
            base_url: self.base_url,
            cache: self.cache,
            browser: BrowserProfile::random(),
        })
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Client with default settings and no cache.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Search stations by name. Fails with `InvalidRequest` on an empty query.
    pub async fn search_locations(&self, query: &str) -> Result<Vec<Location>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidRequest("empty query".into()));
        }

        let params = vec![
            ("suchbegriff".to_string(), query.to_string()),
            ("typ".to_string(), "ALL".to_string()),
            ("limit".to_string(), "10".to_string()),
        ];
        let body = self.get(ENDPOINT_LOCATIONS, &params).await?;

        let entries: Vec<LocationResponse> =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(entries
            .into_iter()
            .map(LocationResponse::into_location)
            .collect())
    }

    /// Search stations near a coordinate.
    pub async fn search_nearby(&self, req: NearbyRequest) -> Result<Vec<Location>> {
        let radius = if req.radius == 0 { 9999 } else { req.radius };
        let max_results = if req.max_results == 0 {
            100
        } else {
            req.max_results
        };

        let params = vec![
            ("lat".to_string(), req.lat.to_string()),
            ("long".to_string(), req.lon.to_string()),
            ("radius".to_string(), radius.to_string()),
            ("maxNo".to_string(), max_results.to_string()),
        ];
        let body = self.get(ENDPOINT_NEARBY, &params).await?;

        let entries: Vec<LocationResponse> =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(entries
            .into_iter()
            .map(LocationResponse::into_location)
            .collect())
    }

    /// Departure or arrival board for a station.
    pub async fn station_board(
        &self,
        req: StationBoardRequest,
        side: BoardSide,
    ) -> Result<Vec<Departure>> {
        let dt = req
            .date_time
            .unwrap_or_else(Utc::now)
            .with_timezone(&Berlin);

        let num_vias = if req.num_vias == 0 { 5 } else { req.num_vias };

        let mut params = vec![
            ("datum".to_string(), dt.format("%Y-%m-%d").to_string()),
            ("zeit".to_string(), dt.format("%H:%M:00").to_string()),
            ("ortExtId".to_string(), req.eva.to_string()),
            ("ortId".to_string(), req.station_id.clone()),
            ("mitVias".to_string(), "true".to_string()),
            ("maxVias".to_string(), num_vias.to_string()),
        ];

        if req.modes.is_empty() {
            for mode in MODES_OF_TRANSIT {
                params.push(("verkehrsmittel[]".to_string(), mode.to_string()));
            }
        } else {
            for mode in &req.modes {
                params.push(("verkehrsmittel[]".to_string(), mode.clone()));
            }
        }

        let body = self.get(side.endpoint(), &params).await?;

        let resp: BoardResponse =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(resp
            .entries
            .into_iter()
            .map(|e| e.into_departure())
            .collect())
    }

    /// Convenience wrapper for the departures side.
    pub async fn departures(&self, req: StationBoardRequest) -> Result<Vec<Departure>> {
        self.station_board(req, BoardSide::Departures).await
    }

    /// Convenience wrapper for the arrivals side.
    pub async fn arrivals(&self, req: StationBoardRequest) -> Result<Vec<Departure>> {
        self.station_board(req, BoardSide::Arrivals).await
    }

    /// Journey details by journey id.
    pub async fn journey(&self, journey_id: &str, with_polyline: bool) -> Result<Journey> {
        if journey_id.is_empty() {
            return Err(ApiError::InvalidRequest("empty journey id".into()));
        }

        let params = vec![
            ("journeyId".to_string(), journey_id.to_string()),
            ("poly".to_string(), with_polyline.to_string()),
        ];
        let body = self.get(ENDPOINT_JOURNEY, &params).await?;

        let resp: JourneyResponse =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(resp.into_journey(journey_id))
    }

    /// Train formation (Wagenreihung). The endpoint speaks UTC.
    pub async fn formation(&self, req: FormationRequest) -> Result<Formation> {
        let departure = req.departure.unwrap_or_else(Utc::now);

        let params = vec![
            ("administrationId".to_string(), "80".to_string()),
            ("category".to_string(), req.train_type.clone()),
            ("date".to_string(), departure.format("%Y-%m-%d").to_string()),
            ("evaNumber".to_string(), req.eva.to_string()),
            ("number".to_string(), req.train_number.clone()),
            (
                "time".to_string(),
                departure.format("%Y-%m-%dT%H:%M:%S.000Z").to_string(),
            ),
        ];
        let body = self.get(ENDPOINT_FORMATION, &params).await?;

        let resp: FormationResponse =
            serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(resp.into_formation(&req.train_type))
    }

    /// GET with browser headers and the optional response cache.
    async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Vec<u8>> {
        let url = reqwest::Url::parse_with_params(&format!("{}{}", self.base_url, endpoint), params)
            .map_err(|e| ApiError::InvalidRequest(format!("bad request URL: {e}")))?;

        if let Some(cache) = &self.cache {
            if let Some(data) = cache.get(url.as_str()) {
                tracing::debug!(%url, "cache hit");
                return Ok(data);
            }
        }

        let bp = &self.browser;
        let mut request = self
            .http
            .get(url.clone())
            .header("Accept", "application/json, text/plain, */*")
            .header("Accept-Language", "de-DE,de;q=0.9,en-US;q=0.8,en;q=0.7")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Origin", "https://www.bahn.de")
            .header("Referer", "https://www.bahn.de/buchung/fahrplan/suche")
            .header("User-Agent", bp.user_agent.as_str())
            .header("Sec-Fetch-Dest", "empty")
            .header("Sec-Fetch-Mode", "cors")
            .header("Sec-Fetch-Site", "same-origin")
            .header("sec-ch-ua", bp.sec_ch_ua.as_str())
            .header("x-correlation-id", correlation_id());

        if bp.mobile {
            request = request
                .header("sec-ch-ua-mobile", "?1")
                .header("sec-ch-ua-platform", "\"Android\"");
        } else {
            let platform =
                DESKTOP_PLATFORMS[rand::thread_rng().gen_range(0..DESKTOP_PLATFORMS.len())];
            request = request
                .header("sec-ch-ua-mobile", "?0")
                .header("sec-ch-ua-platform", platform);
        }

        let response = request.send().await.map_err(ApiError::from_transport)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ApiError::from_status(status.as_u16(), endpoint));
        }

        let body = response
            .bytes()
            .await
            .map_err(ApiError::from_transport)?
            .to_vec();

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(url.as_str(), &body) {
                tracing::warn!(%url, error = %e, "failed to write cache entry");
            }
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_profile_is_internally_consistent() {
        for _ in 0..32 {
            let bp = BrowserProfile::random();
            assert!(!bp.user_agent.contains("XXXX"));
            assert!(!bp.user_agent.contains("YYY"));
            assert!(bp.sec_ch_ua.contains("Chromium"));
            assert_eq!(bp.mobile, bp.user_agent.contains("Mobile"));
        }
    }

    #[test]
    fn correlation_id_shape() {
        let id = correlation_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 2);
        for part in parts {
            assert_eq!(part.len(), 36);
            assert!(Uuid::parse_str(part).is_ok());
        }
    }

    #[tokio::test]
    async fn empty_query_is_rejected_client_side() {
        let client = Client::new().unwrap();
        let err = client.search_locations("   ").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
