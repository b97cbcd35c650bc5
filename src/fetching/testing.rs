//! Test doubles for the transport and clock seams.

use crate::fetching::clock::Clock;
use crate::fetching::transport::{HttpResponse, HttpTransport, TransportError};
use crate::types::daily_record::DailyTemperatureRecord;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Successful Open-Meteo archive body for `records`.
pub(crate) fn archive_body(records: &[DailyTemperatureRecord]) -> Vec<u8> {
    json!({
        "latitude": 51.5,
        "longitude": -0.12,
        "generationtime_ms": 0.12,
        "utc_offset_seconds": 0,
        "timezone": "GMT",
        "timezone_abbreviation": "GMT",
        "elevation": 23.0,
        "daily_units": {
            "time": "iso8601",
            "temperature_2m_max": "°C",
            "temperature_2m_min": "°C"
        },
        "daily": {
            "time": records.iter().map(|r| r.date.format("%Y-%m-%d").to_string()).collect::<Vec<_>>(),
            "temperature_2m_max": records.iter().map(|r| r.max_temp).collect::<Vec<_>>(),
            "temperature_2m_min": records.iter().map(|r| r.min_temp).collect::<Vec<_>>(),
        }
    })
    .to_string()
    .into_bytes()
}

pub(crate) fn ok(body: Vec<u8>) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse { status: 200, body })
}

pub(crate) fn status(status: u16) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse {
        status,
        body: Vec::new(),
    })
}

pub(crate) fn timeout() -> Result<HttpResponse, TransportError> {
    Err(TransportError::Timeout {
        url: "scripted".to_string(),
        message: "operation timed out".to_string(),
    })
}

/// Replays queued results in order. Once the queue is empty, the last result repeats.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    last: Mutex<Option<Result<HttpResponse, TransportError>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<(String, String)>>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Query parameters of every request so far.
    pub(crate) fn requests(&self) -> Vec<Vec<(String, String)>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(
        &self,
        _url: &str,
        query: &[(&str, String)],
    ) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(
            query
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        );

        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        match next {
            Some(result) => {
                *last = Some(result.clone());
                result
            }
            None => last.clone().unwrap_or_else(|| status(500)),
        }
    }
}

/// A clock that only moves when told to. Sleeps return immediately and are recorded.
#[derive(Debug)]
pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
