use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::heatmap::{Coordinate, SampleSource, ScanSample};
use crate::store::overview::OverviewFilter;

/// One scan: every access point heard from one place at one time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanFrame {
    pub number: i64,
    /// Epoch seconds.
    pub time: i64,
    /// `[latitude, longitude]`.
    pub location: [f64; 2],
    #[serde(default)]
    pub access_points: Vec<ApObservation>,
}

impl ScanFrame {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.location[0], self.location[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApObservation {
    pub ssid: String,
    pub bssid: String,
    pub rssi: i32,
}

/// A single observation of one bssid.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Datapoint {
    pub location: Coordinate,
    pub rssi: i32,
    pub time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BssidSummary {
    pub bssid: String,
    /// Number of scans the bssid shows up in.
    pub scans: usize,
}

pub type SsidOverview = BTreeMap<String, Vec<BssidSummary>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Transmitter not found: {0}")]
    NotFound(String),
    #[error("Invalid overview filter type: {0}")]
    InvalidFilter(u8),
}

/// Scan frames kept as YAML files in one folder.
pub struct ScanStore {
    base: PathBuf,
}

impl ScanStore {
    pub fn new(base: PathBuf) -> Self {
        ScanStore { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// All readable frames ordered by scan number. Files that fail to read or parse
    /// are logged and skipped.
    pub fn frames(&self) -> Result<Vec<ScanFrame>, StorageError> {
        if !self.base.exists() {
            return Ok(Vec::new());
        }

        let mut frames = Vec::new();
        for entry in self.base.read_dir()? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || !is_yaml(&path) {
                continue;
            }

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    error!("Failed to read scan file {}: {}", path.display(), e);
                    continue;
                }
            };

            match serde_yaml::from_str::<ScanFrame>(&content) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    error!("Failed to parse scan file {}: {}", path.display(), e);
                }
            }
        }

        frames.sort_by_key(|f| f.number);
        Ok(frames)
    }

    pub fn fetch_samples(&self, bssid: &str) -> Result<Vec<ScanSample>, StorageError> {
        let samples: Vec<ScanSample> = self
            .frames()?
            .iter()
            .flat_map(|frame| {
                frame
                    .access_points
                    .iter()
                    .filter(|ap| ap.bssid == bssid)
                    .map(move |ap| ScanSample {
                        signal_strength: ap.rssi,
                        location: frame.coordinate(),
                        sequence_number: frame.number,
                        observed_at: frame.time,
                    })
            })
            .collect();

        if samples.is_empty() {
            return Err(StorageError::NotFound(bssid.to_string()));
        }
        Ok(samples)
    }

    pub fn datapoints(&self, bssid: &str) -> Result<Vec<Datapoint>, StorageError> {
        Ok(self
            .fetch_samples(bssid)?
            .into_iter()
            .map(|s| Datapoint {
                location: s.location,
                rssi: s.signal_strength,
                time: s.observed_at,
            })
            .collect())
    }

    /// Networks and the bssids seen broadcasting them, with scan counts.
    /// Networks without a matching bssid are left out.
    pub fn ssid_overview(&self, filter: &OverviewFilter) -> Result<SsidOverview, StorageError> {
        let mut counts: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
        let frames = self.frames()?;
        for ap in frames.iter().flat_map(|f| &f.access_points) {
            if !filter.matches(&ap.ssid, &ap.bssid) {
                continue;
            }
            *counts
                .entry(ap.ssid.as_str())
                .or_default()
                .entry(ap.bssid.as_str())
                .or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(ssid, bssids)| {
                let summaries = bssids
                    .into_iter()
                    .map(|(bssid, scans)| BssidSummary {
                        bssid: bssid.to_string(),
                        scans,
                    })
                    .collect();
                (ssid.to_string(), summaries)
            })
            .collect())
    }
}

impl SampleSource for ScanStore {
    type Error = StorageError;

    fn fetch_samples(&self, transmitter_id: &str) -> Result<Vec<ScanSample>, StorageError> {
        ScanStore::fetch_samples(self, transmitter_id)
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
