//! In-memory chart dataset: chart entries joined with track audio features.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub danceability: f64,
    pub energy: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
}

impl AudioFeatures {
    pub const NAMES: [&'static str; 7] = [
        "danceability",
        "energy",
        "speechiness",
        "acousticness",
        "instrumentalness",
        "liveness",
        "valence",
    ];

    pub fn values(&self) -> [f64; 7] {
        [
            self.danceability,
            self.energy,
            self.speechiness,
            self.acousticness,
            self.instrumentalness,
            self.liveness,
            self.valence,
        ]
    }

    fn from_values(v: [f64; 7]) -> Self {
        Self {
            danceability: v[0],
            energy: v[1],
            speechiness: v[2],
            acousticness: v[3],
            instrumentalness: v[4],
            liveness: v[5],
            valence: v[6],
        }
    }
}

/// One chart entry: a track's daily streams in one region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    pub artist: String,
    pub region: String,
    pub date: NaiveDate,
    pub streams: u64,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub duration_minutes: f64,
    #[serde(default)]
    pub release_year: Option<i32>,
    #[serde(default)]
    pub tempo: f64,
    #[serde(default)]
    pub loudness: f64,
    #[serde(flatten)]
    pub features: AudioFeatures,
}

/// Directed weighted edge between two labelled nodes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flow {
    pub source: String,
    pub target: String,
    pub value: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub tracks: Vec<TrackRecord>,
}

impl Dataset {
    pub fn new(tracks: Vec<TrackRecord>) -> Self {
        Self { tracks }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn max_streams(&self) -> u64 {
        self.tracks.iter().map(|t| t.streams).max().unwrap_or(0)
    }

    /// Total streams per calendar month, oldest first. Months are keyed by their first day.
    pub fn monthly_streams(&self) -> Vec<(NaiveDate, u64)> {
        let mut months: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for t in &self.tracks {
            if let Some(month) = NaiveDate::from_ymd_opt(t.date.year(), t.date.month(), 1) {
                *months.entry(month).or_default() += t.streams;
            }
        }
        months.into_iter().collect()
    }

    /// Unweighted mean of the audio features of matching tracks.
    pub fn mean_features<F>(&self, filter: F) -> Option<AudioFeatures>
    where
        F: Fn(&TrackRecord) -> bool,
    {
        let mut sum = [0.0f64; 7];
        let mut n = 0usize;
        for t in self.tracks.iter().filter(|t| filter(t)) {
            for (acc, v) in sum.iter_mut().zip(t.features.values()) {
                *acc += v;
            }
            n += 1;
        }
        if n == 0 {
            return None;
        }
        Some(AudioFeatures::from_values(sum.map(|s| s / n as f64)))
    }

    /// Streams per region, largest first (ties broken by name).
    pub fn streams_by_region(&self) -> Vec<(String, u64)> {
        sorted_totals(self.tracks.iter().map(|t| (t.region.as_str(), t.streams)))
    }

    pub fn top_artists(&self, n: usize) -> Vec<(String, u64)> {
        let mut totals = sorted_totals(self.tracks.iter().map(|t| (t.artist.as_str(), t.streams)));
        totals.truncate(n);
        totals
    }

    /// Region -> artist stream flows restricted to the top regions and artists.
    pub fn region_artist_flows(&self, max_regions: usize, max_artists: usize) -> Vec<Flow> {
        let regions: Vec<String> = self
            .streams_by_region()
            .into_iter()
            .take(max_regions)
            .map(|(r, _)| r)
            .collect();
        let artists: Vec<String> = self
            .top_artists(max_artists)
            .into_iter()
            .map(|(a, _)| a)
            .collect();

        let mut flows: BTreeMap<(&str, &str), u64> = BTreeMap::new();
        for t in &self.tracks {
            if regions.contains(&t.region) && artists.contains(&t.artist) {
                *flows.entry((t.region.as_str(), t.artist.as_str())).or_default() += t.streams;
            }
        }
        flows
            .into_iter()
            .map(|((source, target), value)| Flow {
                source: source.to_string(),
                target: target.to_string(),
                value,
            })
            .collect()
    }

    /// Rank of every track by streams, largest = 1. Ties share the lowest rank.
    pub fn overall_rank(&self) -> Vec<u32> {
        let mut order: Vec<usize> = (0..self.tracks.len()).collect();
        order.sort_by(|&a, &b| self.tracks[b].streams.cmp(&self.tracks[a].streams));

        let mut ranks = vec![0u32; self.tracks.len()];
        let mut current_rank = 0u32;
        let mut last_streams = None;
        for (pos, &idx) in order.iter().enumerate() {
            let streams = self.tracks[idx].streams;
            if last_streams != Some(streams) {
                current_rank = pos as u32 + 1;
                last_streams = Some(streams);
            }
            ranks[idx] = current_rank;
        }
        ranks
    }
}

fn sorted_totals<'a>(items: impl Iterator<Item = (&'a str, u64)>) -> Vec<(String, u64)> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for (key, streams) in items {
        *totals.entry(key).or_default() += streams;
    }
    let mut out: Vec<(String, u64)> = totals
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}
