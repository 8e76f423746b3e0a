//! Weather API client for fetching observations and location search
//!
//! Integrates with WeatherAPI.com for current conditions, location
//! search, and bulk daily history. Transient upstream failures are
//! retried with exponential backoff before surfacing as an error.

use chrono::NaiveDate;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
}

/// Current conditions at a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub precipitation_mm: f64,
    pub cloud_coverage: i32,
    pub uv_index: Option<f64>,
    pub description: String,
    pub icon_url: Option<String>,
}

/// A location candidate from the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// One day from the bulk history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryDay {
    pub date: NaiveDate,
    pub min_temp: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
    pub total_precip_mm: f64,
    pub total_snow_cm: f64,
    pub uv_index: f64,
    pub description: String,
}

// WeatherAPI.com response payloads

#[derive(Debug, Deserialize)]
struct ApiCurrentResponse {
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: f64,
    pressure_mb: f64,
    wind_kph: f64,
    #[serde(default)]
    wind_dir: Option<String>,
    #[serde(default)]
    precip_mm: f64,
    #[serde(default)]
    cloud: i32,
    #[serde(default)]
    uv: Option<f64>,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    #[serde(default)]
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSearchResult {
    name: String,
    country: String,
    lat: Decimal,
    lon: Decimal,
}

#[derive(Debug, Deserialize)]
struct ApiHistoryResponse {
    forecast: ApiForecastDays,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDays {
    forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDay {
    date: NaiveDate,
    day: ApiDay,
}

#[derive(Debug, Deserialize)]
struct ApiDay {
    mintemp_c: f64,
    maxtemp_c: f64,
    avgtemp_c: f64,
    avghumidity: f64,
    maxwind_kph: f64,
    #[serde(default)]
    totalprecip_mm: f64,
    #[serde(default)]
    totalsnow_cm: f64,
    #[serde(default)]
    uv: f64,
    condition: ApiCondition,
}

impl WeatherClient {
    /// Create a new WeatherClient with retrying transport
    pub fn new(base_url: String, api_key: String) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(reqwest::Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetch current conditions by GPS coordinates
    pub async fn get_current(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<CurrentConditions> {
        let url = format!(
            "{}/current.json?key={}&q={},{}&aqi=no",
            self.base_url, self.api_key, latitude, longitude
        );

        let data: ApiCurrentResponse = self.get_json(&url).await?;
        Ok(Self::convert_current(data.current))
    }

    /// Search locations matching a free-text query
    pub async fn search_locations(&self, query: &str) -> AppResult<Vec<SearchResult>> {
        let url = format!(
            "{}/search.json?key={}&q={}",
            self.base_url,
            self.api_key,
            urlencode(query)
        );

        let data: Vec<ApiSearchResult> = self.get_json(&url).await?;
        Ok(data
            .into_iter()
            .map(|loc| SearchResult {
                name: format!("{}, {}", loc.name, loc.country),
                latitude: loc.lat,
                longitude: loc.lon,
            })
            .collect())
    }

    /// Fetch daily history for a date range (bounded by the upstream
    /// plan, typically 7 days)
    pub async fn get_history(
        &self,
        latitude: Decimal,
        longitude: Decimal,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<HistoryDay>> {
        let url = format!(
            "{}/history.json?key={}&q={},{}&dt={}&end_dt={}",
            self.base_url, self.api_key, latitude, longitude, start, end
        );

        let data: ApiHistoryResponse = self.get_json(&url).await?;
        Ok(data
            .forecast
            .forecastday
            .into_iter()
            .map(|day| HistoryDay {
                date: day.date,
                min_temp: day.day.mintemp_c,
                max_temp: day.day.maxtemp_c,
                avg_temp: day.day.avgtemp_c,
                avg_humidity: day.day.avghumidity,
                avg_wind_speed: kph_to_mps(day.day.maxwind_kph),
                total_precip_mm: day.day.totalprecip_mm,
                total_snow_cm: day.day.totalsnow_cm,
                uv_index: day.day.uv,
                description: day.day.condition.text,
            })
            .collect())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::warn!("Weather API request failed: {}", e);
            AppError::WeatherServiceUnavailable
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Weather API error: {} - {}", status, body);
            return Err(AppError::WeatherServiceUnavailable);
        }

        response.json().await.map_err(|e| {
            tracing::warn!("Failed to parse weather response: {}", e);
            AppError::WeatherServiceUnavailable
        })
    }

    fn convert_current(current: ApiCurrent) -> CurrentConditions {
        CurrentConditions {
            temperature: current.temp_c,
            feels_like: current.feelslike_c,
            humidity: current.humidity,
            pressure: current.pressure_mb,
            wind_speed: kph_to_mps(current.wind_kph),
            wind_direction: current.wind_dir.unwrap_or_else(|| "N/A".to_string()),
            precipitation_mm: current.precip_mm,
            cloud_coverage: current.cloud,
            uv_index: current.uv,
            description: current.condition.text,
            icon_url: current.condition.icon.map(|icon| normalize_icon_url(&icon)),
        }
    }
}

/// Wind speeds arrive in km/h; observations are stored in m/s
fn kph_to_mps(kph: f64) -> f64 {
    kph / 3.6
}

/// Icon URLs arrive protocol-relative ("//cdn...")
fn normalize_icon_url(icon: &str) -> String {
    if let Some(rest) = icon.strip_prefix("//") {
        format!("https://{}", rest)
    } else if icon.starts_with("https://") || icon.starts_with("http://") {
        icon.to_string()
    } else {
        format!("https://{}", icon)
    }
}

/// Minimal percent-encoding for query strings
fn urlencode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => {
                encoded.push('%');
                encoded.push_str(&format!("{:02X}", byte));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kph_conversion() {
        assert!((kph_to_mps(36.0) - 10.0).abs() < f64::EPSILON);
        assert_eq!(kph_to_mps(0.0), 0.0);
    }

    #[test]
    fn test_icon_url_normalization() {
        assert_eq!(
            normalize_icon_url("//cdn.weatherapi.com/day/113.png"),
            "https://cdn.weatherapi.com/day/113.png"
        );
        assert_eq!(
            normalize_icon_url("https://cdn.weatherapi.com/day/113.png"),
            "https://cdn.weatherapi.com/day/113.png"
        );
    }

    #[test]
    fn test_urlencode_spaces_and_symbols() {
        assert_eq!(urlencode("New York"), "New%20York");
        assert_eq!(urlencode("a&b"), "a%26b");
        assert_eq!(urlencode("plain"), "plain");
    }

    #[test]
    fn test_parse_search_payload() {
        let payload = r#"[{"name":"London","country":"United Kingdom","lat":51.52,"lon":-0.11}]"#;
        let results: Vec<ApiSearchResult> = serde_json::from_str(payload).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "London");
    }

    #[test]
    fn test_parse_current_payload_with_missing_optionals() {
        let payload = r#"{
            "current": {
                "temp_c": 18.5,
                "feelslike_c": 17.0,
                "humidity": 72,
                "pressure_mb": 1012.0,
                "wind_kph": 14.4,
                "condition": {"text": "Partly cloudy"}
            }
        }"#;
        let response: ApiCurrentResponse = serde_json::from_str(payload).unwrap();
        let conditions = WeatherClient::convert_current(response.current);
        assert_eq!(conditions.wind_direction, "N/A");
        assert_eq!(conditions.precipitation_mm, 0.0);
        assert!((conditions.wind_speed - 4.0).abs() < 1e-9);
        assert!(conditions.icon_url.is_none());
    }
}
