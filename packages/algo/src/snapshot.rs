//! Persisted engine state
//!
//! Snapshots are JSON objects carrying a numeric `version` field. Loading detects the
//! version and applies one upgrade step per historical schema:
//!
//! - **V1**: the untagged browser format (`openDeck`, `completeDeck`,
//!   `mastery` as `{s2e, e2s}` or a bare count, `srsData`, ...).
//! - **V2**: the current format, [`Snapshot`].
//!
//! Individual records of an unexpected shape are replaced with fresh ones
//! rather than failing the whole load.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::mastery::MasteryRecord;
use crate::srs::SrsRecord;
use crate::streak::StreakState;
use crate::types::{Item, SentenceId};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported snapshot shape: {0}")]
    Malformed(String),
}

/// Current (V2) snapshot layout
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Monotonic write counter; stores keep only the newest revision
    pub revision: u64,
    pub saved_at_ms: i64,
    pub active_deck: Vec<Item>,
    pub graduated_deck: Vec<Item>,
    pub mastery: BTreeMap<String, MasteryRecord>,
    pub srs: BTreeMap<String, SrsRecord>,
    pub sentence_mastery: BTreeMap<SentenceId, u32>,
    pub completed_sentences: BTreeSet<SentenceId>,
    pub streaks: StreakState,
    pub gate_override: bool,
}

/// Schema version written by [`Snapshot::to_json`]
pub const SNAPSHOT_VERSION: u64 = 2;

#[derive(Serialize)]
struct SnapshotEnvelopeRef<'a> {
    version: u64,
    snapshot: &'a Snapshot,
}

#[derive(Deserialize)]
struct SnapshotEnvelope {
    snapshot: Snapshot,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(&SnapshotEnvelopeRef {
            version: SNAPSHOT_VERSION,
            snapshot: self,
        })?)
    }

    /// Decodes any known snapshot version, upgrading it to the current one
    pub fn from_json(raw: &str, required_per_direction: u8) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(map) = value else {
            return Err(SnapshotError::Malformed("expected a JSON object".to_string()));
        };

        match detect_version(&map)? {
            1 => Ok(upgrade_v1(&map, required_per_direction)),
            _ => {
                let envelope: SnapshotEnvelope = serde_json::from_str(raw)?;
                Ok(envelope.snapshot)
            }
        }
    }
}

/// Untagged objects are the V1 browser format
fn detect_version(map: &Map<String, Value>) -> Result<u64, SnapshotError> {
    match map.get("version") {
        None => Ok(1),
        Some(version) => match version.as_u64() {
            Some(SNAPSHOT_VERSION) => Ok(SNAPSHOT_VERSION),
            _ => Err(SnapshotError::Malformed(format!(
                "unknown snapshot version {version}"
            ))),
        },
    }
}

// ==================== V1 → V2 ====================

#[derive(Deserialize)]
struct LegacyCard {
    id: Option<u32>,
    #[serde(alias = "sourceText")]
    spanish: String,
    #[serde(alias = "targetText")]
    english: String,
}

#[derive(Deserialize)]
struct LegacyMastery {
    s2e: i64,
    e2s: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySrs {
    last_review: Option<f64>,
    interval: f64,
    ease: f64,
}

/// Upgrades the untagged browser snapshot. `lockoutEndTime` is dropped.
pub fn upgrade_v1(map: &Map<String, Value>, required_per_direction: u8) -> Snapshot {
    let mastery = object_field(map, "mastery")
        .map(|records| {
            records
                .iter()
                .map(|(key, value)| (key.clone(), legacy_mastery(value, required_per_direction)))
                .collect()
        })
        .unwrap_or_default();

    let srs = object_field(map, "srsData")
        .map(|records| {
            records
                .iter()
                .map(|(key, value)| (key.clone(), legacy_srs(value)))
                .collect()
        })
        .unwrap_or_default();

    let sentence_mastery = object_field(map, "sentenceMastery")
        .map(|records| {
            records
                .iter()
                .filter_map(|(key, value)| {
                    let id = key.parse::<SentenceId>().ok()?;
                    let count = value.as_u64()?;
                    Some((id, count.min(u32::MAX as u64) as u32))
                })
                .collect()
        })
        .unwrap_or_default();

    let completed_sentences = map
        .get("completedSentences")
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| match id {
                    Value::Number(n) => n.as_u64().map(|v| v as SentenceId),
                    Value::String(s) => s.parse().ok(),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let streaks = StreakState {
        current: counter_field(map, "streak"),
        best: counter_field(map, "bestStreak"),
        unlock: counter_field(map, "unlockStreak"),
    }
    .sanitized();

    Snapshot {
        revision: 0,
        saved_at_ms: 0,
        active_deck: legacy_deck(map, "openDeck"),
        graduated_deck: legacy_deck(map, "completeDeck"),
        mastery,
        srs,
        sentence_mastery,
        completed_sentences,
        streaks,
        gate_override: false,
    }
}

fn object_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    map.get(key).and_then(Value::as_object)
}

fn counter_field(map: &Map<String, Value>, key: &str) -> u32 {
    map.get(key)
        .and_then(Value::as_u64)
        .map(|v| v.min(u32::MAX as u64) as u32)
        .unwrap_or(0)
}

fn legacy_deck(map: &Map<String, Value>, key: &str) -> Vec<Item> {
    let Some(cards) = map.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };
    cards
        .iter()
        .enumerate()
        .filter_map(|(idx, card)| {
            let card: LegacyCard = serde_json::from_value(card.clone()).ok()?;
            Some(Item::new(card.id.unwrap_or(idx as u32), card.spanish, card.english))
        })
        .collect()
}

fn legacy_mastery(value: &Value, required: u8) -> MasteryRecord {
    if let Some(count) = value.as_i64() {
        return MasteryRecord::from_legacy_count(count, required);
    }
    match serde_json::from_value::<LegacyMastery>(value.clone()) {
        Ok(m) => MasteryRecord::new(
            m.s2e.clamp(0, required as i64) as u8,
            m.e2s.clamp(0, required as i64) as u8,
        ),
        Err(_) => MasteryRecord::default(),
    }
}

fn legacy_srs(value: &Value) -> SrsRecord {
    match serde_json::from_value::<LegacySrs>(value.clone()) {
        Ok(srs) => SrsRecord {
            last_review_ms: srs.last_review.filter(|v| v.is_finite()).map(|v| v as i64),
            interval_days: if srs.interval.is_finite() && srs.interval >= 1.0 {
                srs.interval.round().min(u32::MAX as f64) as u32
            } else {
                1
            },
            ease_factor: srs.ease,
        }
        .sanitized(),
        Err(_) => SrsRecord::default(),
    }
}
