//! Live MOER feed client.
//!
//! Speaks plain HTTP/1 to the configured relay endpoint with a bearer
//! token, one bounded request per call. The feed reports a 0–100
//! percentile signal index; conversion to g CO₂/kWh goes through the
//! region's observed baseline and swing. Forecast responses arrive at
//! 5-minute resolution and are resampled to hourly.

use std::time::Duration;

use carbongate_core::config::SourceConfig;
use carbongate_core::{IntensitySourceTag, RegionProfile};
use http_body_util::BodyExt;
use tracing::{debug, warn};

use crate::error::{SourceError, SourceResult};
use crate::fallback::static_reading;
use crate::source::{FallbackReason, IntensityReading, IntensitySource, SourceOutcome};

/// Environment variable holding the feed's API token.
pub const TOKEN_ENV: &str = "CARBONGATE_MOER_TOKEN";

/// Relative spread of the feed's confidence band around the reported
/// percentile.
const SIGNAL_SPREAD: f64 = 0.08;

/// The feed serves at most 72 hours of forecast.
const MAX_FORECAST_HOURS: u32 = 72;

/// Forecast points per hour (5-minute resolution).
const POINTS_PER_HOUR: usize = 12;

/// Client for the live marginal-intensity feed.
#[derive(Debug, Clone)]
pub struct MoerClient {
    endpoint: Option<String>,
    token: Option<String>,
    deadline: Duration,
}

impl MoerClient {
    pub fn new(endpoint: Option<String>, token: Option<String>, deadline: Duration) -> Self {
        Self {
            endpoint,
            token,
            deadline,
        }
    }

    /// Build from the gate config, reading the token from the
    /// environment.
    pub fn from_env(config: &SourceConfig) -> Self {
        Self::new(
            config.api_base.clone(),
            std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()),
            Duration::from_millis(config.deadline_ms),
        )
    }

    /// Check the non-network preconditions for a live call.
    fn preconditions<'a>(
        &'a self,
        region: &'a RegionProfile,
    ) -> Result<(&'a str, &'a str, &'a str), FallbackReason> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(FallbackReason::MissingEndpoint)?;
        let token = self
            .token
            .as_deref()
            .ok_or(FallbackReason::MissingCredentials)?;
        let ba = region
            .balancing_authority
            .as_deref()
            .ok_or(FallbackReason::NoBalancingAuthority)?;
        Ok((endpoint, token, ba))
    }

    /// One bounded GET returning parsed JSON.
    async fn get_json(
        &self,
        endpoint: &str,
        token: &str,
        path_and_query: &str,
    ) -> SourceResult<serde_json::Value> {
        let deadline_ms = self.deadline.as_millis() as u64;
        tokio::time::timeout(self.deadline, async {
            let stream = tokio::net::TcpStream::connect(endpoint)
                .await
                .map_err(|e| SourceError::Connect(e.to_string()))?;

            let io = hyper_util::rt::TokioIo::new(stream);
            let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
                .await
                .map_err(|e| SourceError::Handshake(e.to_string()))?;

            // Drive the connection in the background.
            tokio::spawn(async move {
                let _ = conn.await;
            });

            let req = http::Request::builder()
                .method("GET")
                .uri(path_and_query)
                .header("host", endpoint)
                .header("authorization", format!("Bearer {token}"))
                .header("user-agent", "carbongate-intensity/0.1")
                .body(http_body_util::Empty::<bytes::Bytes>::new())
                .map_err(|e| SourceError::Request(e.to_string()))?;

            let resp = sender
                .send_request(req)
                .await
                .map_err(|e| SourceError::Request(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(SourceError::Status(resp.status().as_u16()));
            }

            let body = resp
                .into_body()
                .collect()
                .await
                .map_err(|e| SourceError::Payload(e.to_string()))?
                .to_bytes();
            serde_json::from_slice(&body).map_err(|e| SourceError::Payload(e.to_string()))
        })
        .await
        .map_err(|_| SourceError::DeadlineExceeded(deadline_ms))?
    }
}

impl IntensitySource for MoerClient {
    async fn lookup(&self, region: &RegionProfile) -> SourceOutcome {
        let (endpoint, token, ba) = match self.preconditions(region) {
            Ok(parts) => parts,
            Err(reason) => {
                debug!(region = %region.id, ?reason, "live lookup skipped");
                return SourceOutcome::Fallback {
                    reading: static_reading(region),
                    reason,
                };
            }
        };

        let path = format!("/v3/signal-index?region={ba}&signal_type=co2_moer");
        let json = match self.get_json(endpoint, token, &path).await {
            Ok(json) => json,
            Err(e) => {
                warn!(region = %region.id, error = %e, "live lookup failed, using static fallback");
                return SourceOutcome::Fallback {
                    reading: static_reading(region),
                    reason: FallbackReason::Unavailable(e.to_string()),
                };
            }
        };

        let Some(pct) = json["data"][0]["value"].as_f64() else {
            warn!(region = %region.id, "live payload missing signal value");
            return SourceOutcome::Fallback {
                reading: static_reading(region),
                reason: FallbackReason::Unavailable("payload missing data[0].value".to_string()),
            };
        };

        // σ from the feed's typical ±8% confidence band, pushed through
        // the same percentile mapping.
        let hi = percentile_to_g_kwh(region, pct * (1.0 + SIGNAL_SPREAD));
        let lo = percentile_to_g_kwh(region, pct * (1.0 - SIGNAL_SPREAD));

        SourceOutcome::Live(IntensityReading {
            intensity_g_kwh: percentile_to_g_kwh(region, pct),
            sigma_g_kwh: (hi - lo) / 2.0,
            percent_clean: Some((100.0 - pct).clamp(0.0, 100.0)),
            tag: IntensitySourceTag::Live,
        })
    }

    async fn forecast(&self, region: &RegionProfile, hours_ahead: u32) -> Vec<f64> {
        let (endpoint, token, ba) = match self.preconditions(region) {
            Ok(parts) => parts,
            Err(reason) => {
                debug!(region = %region.id, ?reason, "live forecast skipped");
                return Vec::new();
            }
        };

        let horizon = hours_ahead.min(MAX_FORECAST_HOURS);
        let path =
            format!("/v3/forecast?region={ba}&signal_type=co2_moer&horizon_hours={horizon}");
        let json = match self.get_json(endpoint, token, &path).await {
            Ok(json) => json,
            Err(e) => {
                warn!(region = %region.id, error = %e, "live forecast failed");
                return Vec::new();
            }
        };

        let Some(points) = json["data"].as_array() else {
            return Vec::new();
        };
        let values: Vec<f64> = points
            .iter()
            .filter_map(|p| p["value"].as_f64())
            .map(|pct| percentile_to_g_kwh(region, pct))
            .collect();

        let hourly: Vec<f64> = if values.len() >= POINTS_PER_HOUR {
            values.iter().copied().step_by(POINTS_PER_HOUR).collect()
        } else {
            values
        };
        hourly.into_iter().take(hours_ahead as usize).collect()
    }
}

/// Map a 0–100 percentile signal index to g CO₂/kWh using the region's
/// observed baseline and swing.
fn percentile_to_g_kwh(region: &RegionProfile, pct: f64) -> f64 {
    region.baseline_g_kwh + (pct / 100.0) * region.range_g_kwh
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbongate_core::ProfileCatalog;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn client_for(endpoint: &str) -> MoerClient {
        MoerClient::new(
            Some(endpoint.to_string()),
            Some("test-token".to_string()),
            Duration::from_millis(500),
        )
    }

    fn http_response(status: &str, json: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{json}",
            json.len()
        )
    }

    /// One-shot HTTP stub: accepts a single connection, reads the
    /// request, writes the canned response, closes.
    async fn stub_server(response: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        addr
    }

    #[test]
    fn percentile_mapping() {
        let catalog = ProfileCatalog::builtin();
        let region = catalog.region("us-east-1");
        // baseline 150 + 50% of 350 = 325.
        assert!((percentile_to_g_kwh(region, 50.0) - 325.0).abs() < 1e-9);
        assert!((percentile_to_g_kwh(region, 0.0) - 150.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn missing_token_falls_back_without_io() {
        let catalog = ProfileCatalog::builtin();
        let client = MoerClient::new(
            Some("127.0.0.1:1".to_string()),
            None,
            Duration::from_millis(100),
        );
        let outcome = client.lookup(catalog.region("us-east-1")).await;
        match outcome {
            SourceOutcome::Fallback { reason, reading } => {
                assert_eq!(reason, FallbackReason::MissingCredentials);
                assert_eq!(reading.tag, IntensitySourceTag::StaticFallback);
            }
            SourceOutcome::Live(_) => panic!("expected fallback"),
        }
    }

    #[tokio::test]
    async fn missing_endpoint_falls_back() {
        let catalog = ProfileCatalog::builtin();
        let client = MoerClient::new(None, Some("t".to_string()), Duration::from_millis(100));
        let outcome = client.lookup(catalog.region("us-east-1")).await;
        assert!(matches!(
            outcome,
            SourceOutcome::Fallback {
                reason: FallbackReason::MissingEndpoint,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unmapped_region_falls_back() {
        let catalog = ProfileCatalog::builtin();
        let client = client_for("127.0.0.1:1");
        // The default region has no balancing authority.
        let outcome = client.lookup(catalog.region("somewhere-new")).await;
        assert!(matches!(
            outcome,
            SourceOutcome::Fallback {
                reason: FallbackReason::NoBalancingAuthority,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn live_lookup_maps_percentile() {
        let addr =
            stub_server(http_response("200 OK", r#"{"data":[{"value":50.0}]}"#)).await;
        let catalog = ProfileCatalog::builtin();
        let outcome = client_for(&addr).lookup(catalog.region("us-east-1")).await;

        match outcome {
            SourceOutcome::Live(reading) => {
                assert!((reading.intensity_g_kwh - 325.0).abs() < 1e-9);
                assert_eq!(reading.percent_clean, Some(50.0));
                assert_eq!(reading.tag, IntensitySourceTag::Live);
                // ±8% percentile band → σ = 0.08 × 0.5 × 350 = 14.
                assert!((reading.sigma_g_kwh - 14.0).abs() < 1e-9);
            }
            SourceOutcome::Fallback { reason, .. } => panic!("fell back: {reason:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_falls_back() {
        let addr = stub_server(http_response("503 Service Unavailable", "{}")).await;
        let catalog = ProfileCatalog::builtin();
        let outcome = client_for(&addr).lookup(catalog.region("us-east-1")).await;
        match outcome {
            SourceOutcome::Fallback { reason, .. } => match reason {
                FallbackReason::Unavailable(msg) => assert!(msg.contains("503")),
                other => panic!("unexpected reason {other:?}"),
            },
            SourceOutcome::Live(_) => panic!("expected fallback"),
        }
    }

    #[tokio::test]
    async fn garbage_payload_falls_back() {
        let addr = stub_server(http_response("200 OK", r#"{"data":[]}"#)).await;
        let catalog = ProfileCatalog::builtin();
        let outcome = client_for(&addr).lookup(catalog.region("us-east-1")).await;
        assert!(!outcome.is_live());
    }

    #[tokio::test]
    async fn silent_server_hits_the_deadline() {
        // Accepts the connection and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            if let Ok((socket, _)) = listener.accept().await {
                // Hold the socket open until the client gives up.
                tokio::time::sleep(Duration::from_secs(5)).await;
                drop(socket);
            }
        });

        let catalog = ProfileCatalog::builtin();
        let client = MoerClient::new(
            Some(addr),
            Some("t".to_string()),
            Duration::from_millis(100),
        );
        let outcome = client.lookup(catalog.region("us-east-1")).await;
        match outcome {
            SourceOutcome::Fallback { reason, .. } => match reason {
                FallbackReason::Unavailable(msg) => assert!(msg.contains("deadline")),
                other => panic!("unexpected reason {other:?}"),
            },
            SourceOutcome::Live(_) => panic!("expected fallback"),
        }
    }

    #[tokio::test]
    async fn forecast_resamples_five_minute_points() {
        // 24 five-minute points = 2 hours of feed.
        let values: Vec<String> = (0..24).map(|i| format!(r#"{{"value":{i}.0}}"#)).collect();
        let json = format!(r#"{{"data":[{}]}}"#, values.join(","));
        let addr = stub_server(http_response("200 OK", &json)).await;

        let catalog = ProfileCatalog::builtin();
        let series = client_for(&addr)
            .forecast(catalog.region("us-east-1"), 48)
            .await;

        // Every 12th point survives: percentiles 0 and 12.
        assert_eq!(series.len(), 2);
        assert!((series[0] - 150.0).abs() < 1e-9);
        assert!((series[1] - (150.0 + 0.12 * 350.0)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn forecast_failure_is_empty_series() {
        let catalog = ProfileCatalog::builtin();
        let client = MoerClient::new(None, None, Duration::from_millis(50));
        let series = client.forecast(catalog.region("us-east-1"), 48).await;
        assert!(series.is_empty());
    }
}
