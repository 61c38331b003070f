//! Sensor groups.
//!
//! Individually named sensors are classified into coarse groups by keyword.
//! Every known group owns a canonical profile, a reserved identifier and a
//! service identifier, so values from many sensors can be bucketed per group
//! and packed into one payload each.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use advcodec_wire::{encode, DecodedValues};
use bytes::Bytes;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog;
use crate::config::GroupConfig;
use crate::error::{ProfileError, Result};
use crate::profile::Profile;
use crate::registry::ProfileRegistry;

static BUILTIN: Lazy<GroupRegistry> = Lazy::new(|| {
    GroupRegistry::from_registry(ProfileRegistry::builtin(), GroupConfig::default())
        .unwrap_or_else(|err| panic!("built-in group table is invalid: {err}"))
});

/// Values bucketed per group.
pub type GroupedValues = BTreeMap<SensorGroup, DecodedValues>;

/// Coarse sensor category. Ordering follows classification priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorGroup {
    Environmental,
    AirQuality,
    Motion,
    Ambient,
    System,
    Current,
    Unknown,
}

impl SensorGroup {
    /// Every group except `Unknown`, in classification priority.
    pub const KNOWN: [SensorGroup; 6] = [
        SensorGroup::Environmental,
        SensorGroup::AirQuality,
        SensorGroup::Motion,
        SensorGroup::Ambient,
        SensorGroup::System,
        SensorGroup::Current,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            SensorGroup::Environmental => "environmental",
            SensorGroup::AirQuality => "air_quality",
            SensorGroup::Motion => "motion",
            SensorGroup::Ambient => "ambient",
            SensorGroup::System => "system",
            SensorGroup::Current => "current",
            SensorGroup::Unknown => "unknown",
        }
    }

    /// Lowercase substrings that place a sensor name in this group.
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            SensorGroup::Environmental => &[
                "bmp",
                "hdc",
                "sht",
                "dht",
                "aht",
                "temperature",
                "humidity",
                "pressure",
            ],
            SensorGroup::AirQuality => &["ens", "sgp", "ccs", "aqi", "co2", "tvoc"],
            SensorGroup::Motion => &["mpu", "bmi", "bmm", "lsm", "accel", "gyro", "magnet"],
            SensorGroup::Ambient => &["veml", "tsl", "bh1", "light", "color", "brightness"],
            SensorGroup::System => &["bq", "ip5306", "battery", "power", "charging"],
            SensorGroup::Current => &["sct", "current"],
            SensorGroup::Unknown => &[],
        }
    }
}

impl fmt::Display for SensorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensorGroup {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "environmental" => Ok(SensorGroup::Environmental),
            "air_quality" | "airquality" => Ok(SensorGroup::AirQuality),
            "motion" => Ok(SensorGroup::Motion),
            "ambient" => Ok(SensorGroup::Ambient),
            "system" => Ok(SensorGroup::System),
            "current" => Ok(SensorGroup::Current),
            "unknown" => Ok(SensorGroup::Unknown),
            _ => Err(ProfileError::UnknownGroup(s.to_string())),
        }
    }
}

/// The group whose keywords first occur in `sensor_name`, if any.
///
/// Matching is case-insensitive and follows [`SensorGroup::KNOWN`] order.
pub fn match_group(sensor_name: &str) -> Option<SensorGroup> {
    let lower = sensor_name.to_lowercase();
    SensorGroup::KNOWN.into_iter().find(|group| {
        group
            .keywords()
            .iter()
            .any(|keyword| lower.contains(*keyword))
    })
}

/// Classify with the default policy: unmatched names are environmental.
pub fn classify(sensor_name: &str) -> SensorGroup {
    match_group(sensor_name).unwrap_or(GroupConfig::default().unmatched)
}

/// Packing data owned by one known group.
#[derive(Debug, Clone)]
pub struct GroupEntry {
    pub group: SensorGroup,
    pub identifier: u16,
    pub service_id: String,
    pub profile: Arc<Profile>,
}

/// One encoded payload per non-empty group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupPacket {
    pub group: SensorGroup,
    pub identifier: u16,
    pub service_id: String,
    pub payload: Bytes,
}

/// Immutable mapping from groups to their canonical profiles.
pub struct GroupRegistry {
    entries: BTreeMap<SensorGroup, GroupEntry>,
    related: BTreeMap<SensorGroup, Vec<Arc<Profile>>>,
    config: GroupConfig,
}

impl GroupRegistry {
    /// The built-in group table over [`ProfileRegistry::builtin`].
    pub fn builtin() -> &'static GroupRegistry {
        &BUILTIN
    }

    /// Resolve every known group's canonical profile from `profiles`.
    ///
    /// Each canonical profile must use its group's reserved identifier.
    /// Related device profiles that are not registered are left out.
    pub fn from_registry(profiles: &ProfileRegistry, config: GroupConfig) -> Result<Self> {
        let mut entries = BTreeMap::new();
        let mut related = BTreeMap::new();

        for group in SensorGroup::KNOWN {
            let profile = catalog::canonical_profile_name(group)
                .and_then(|name| profiles.shared(name))
                .ok_or(ProfileError::MissingCanonicalProfile(group))?;
            let identifier = catalog::reserved_identifier(group)
                .ok_or(ProfileError::MissingCanonicalProfile(group))?;
            let service_id = catalog::service_id(group)
                .ok_or(ProfileError::MissingCanonicalProfile(group))?;

            if profile.identifier() != identifier {
                return Err(ProfileError::IdentifierMismatch {
                    group,
                    profile: profile.name().to_string(),
                    expected: identifier,
                    found: profile.identifier(),
                });
            }

            let others: Vec<Arc<Profile>> = catalog::related_profile_names(group)
                .iter()
                .filter_map(|name| profiles.shared(name).cloned())
                .collect();

            debug!(%group, profile = profile.name(), identifier, "registered group");
            entries.insert(
                group,
                GroupEntry {
                    group,
                    identifier,
                    service_id: service_id.to_string(),
                    profile: Arc::clone(profile),
                },
            );
            related.insert(group, others);
        }

        Ok(Self {
            entries,
            related,
            config,
        })
    }

    /// A copy of this table with a different classification policy.
    pub fn with_config(&self, config: GroupConfig) -> Self {
        Self {
            entries: self.entries.clone(),
            related: self.related.clone(),
            config,
        }
    }

    /// Classify a sensor name, applying the configured fallback.
    pub fn classify(&self, sensor_name: &str) -> SensorGroup {
        match_group(sensor_name).unwrap_or(self.config.unmatched)
    }

    pub fn entry(&self, group: SensorGroup) -> Option<&GroupEntry> {
        self.entries.get(&group)
    }

    /// Canonical profile of a group.
    pub fn profile_for(&self, group: SensorGroup) -> Option<&Profile> {
        self.entry(group).map(|entry| entry.profile.as_ref())
    }

    pub fn service_id_for(&self, group: SensorGroup) -> Option<&str> {
        self.entry(group).map(|entry| entry.service_id.as_str())
    }

    pub fn identifier_for(&self, group: SensorGroup) -> Option<u16> {
        self.entry(group).map(|entry| entry.identifier)
    }

    /// Reverse lookup of a reserved identifier; `Unknown` when unreserved.
    pub fn group_for_identifier(&self, identifier: u16) -> SensorGroup {
        self.entries
            .values()
            .find(|entry| entry.identifier == identifier)
            .map_or(SensorGroup::Unknown, |entry| entry.group)
    }

    /// Group whose service identifier matches, ASCII case-insensitively.
    pub fn group_for_service_id(&self, service_id: &str) -> SensorGroup {
        self.entries
            .values()
            .find(|entry| entry.service_id.eq_ignore_ascii_case(service_id))
            .map_or(SensorGroup::Unknown, |entry| entry.group)
    }

    /// The canonical profile followed by device profiles carrying the same data.
    pub fn profiles_for_group(&self, group: SensorGroup) -> Vec<&Profile> {
        let canonical = self.profile_for(group);
        let related = self
            .related
            .get(&group)
            .into_iter()
            .flatten()
            .map(Arc::as_ref);
        canonical.into_iter().chain(related).collect()
    }

    /// Merge each sensor's values into the bucket of its group.
    ///
    /// Sensors are processed in iteration order; when two sensors of the
    /// same group report the same value name, the later one wins.
    pub fn organize_by_group<'a, K>(
        &self,
        per_sensor: impl IntoIterator<Item = (K, &'a DecodedValues)>,
    ) -> GroupedValues
    where
        K: AsRef<str>,
    {
        let mut grouped = GroupedValues::new();
        for (sensor, values) in per_sensor {
            let group = self.classify(sensor.as_ref());
            let bucket = grouped.entry(group).or_default();
            bucket.extend(values.iter().map(|(name, value)| (name.clone(), *value)));
        }
        grouped
    }

    /// Encode every non-empty group with its canonical profile.
    ///
    /// Empty groups produce no packet. Groups without a canonical profile
    /// (only `Unknown`) are skipped with a warning.
    pub fn pack_all_groups(&self, grouped: &GroupedValues) -> Vec<GroupPacket> {
        let mut packets = Vec::new();
        for (&group, values) in grouped {
            if values.is_empty() {
                continue;
            }
            let Some(entry) = self.entry(group) else {
                warn!(%group, values = values.len(), "no canonical profile for group, not packed");
                continue;
            };
            packets.push(GroupPacket {
                group,
                identifier: entry.identifier,
                service_id: entry.service_id.clone(),
                payload: encode(values, entry.profile.primary()),
            });
        }
        packets
    }

    /// Get registry configuration.
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }
}
