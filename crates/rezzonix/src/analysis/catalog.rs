use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Organs and body systems that can be selected for a balance scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Organ {
    Brain,
    Heart,
    Lung,
    Liver,
    Kidney,
    Stomach,
    Pancreas,
    Intestine,
    Thyroid,
    Spine,
    Immune,
    Circulatory,
}

impl Organ {
    pub const ALL: [Organ; 12] = [
        Organ::Brain,
        Organ::Heart,
        Organ::Lung,
        Organ::Liver,
        Organ::Kidney,
        Organ::Stomach,
        Organ::Pancreas,
        Organ::Intestine,
        Organ::Thyroid,
        Organ::Spine,
        Organ::Immune,
        Organ::Circulatory,
    ];

    /// Canonical label stored on records and fed into the scan seed.
    pub const fn label(self) -> &'static str {
        match self {
            Organ::Brain => "Brain",
            Organ::Heart => "Heart",
            Organ::Lung => "Lung",
            Organ::Liver => "Liver",
            Organ::Kidney => "Kidney",
            Organ::Stomach => "Stomach",
            Organ::Pancreas => "Pancreas",
            Organ::Intestine => "Intestine",
            Organ::Thyroid => "Thyroid",
            Organ::Spine => "Spine",
            Organ::Immune => "Immune",
            Organ::Circulatory => "Circulatory",
        }
    }

    /// Label sent by the Turkish-language mobile client.
    pub const fn turkish_label(self) -> &'static str {
        match self {
            Organ::Brain => "Beyin",
            Organ::Heart => "Kalp",
            Organ::Lung => "Akciğer",
            Organ::Liver => "Karaciğer",
            Organ::Kidney => "Böbrek",
            Organ::Stomach => "Mide",
            Organ::Pancreas => "Pankreas",
            Organ::Intestine => "Bağırsak",
            Organ::Thyroid => "Tiroid",
            Organ::Spine => "Omurga",
            Organ::Immune => "Bağışıklık",
            Organ::Circulatory => "Dolaşım",
        }
    }

    /// Resolve either label, ignoring surrounding whitespace and case.
    pub fn from_label(raw: &str) -> Option<Self> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Self::ALL.into_iter().find(|organ| {
            organ.label().to_lowercase() == needle || organ.turkish_label().to_lowercase() == needle
        })
    }
}

impl fmt::Display for Organ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Organ {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Organ {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Organ::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown organ '{raw}'")))
    }
}

/// Connectivity mode of the sensing device attached to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    #[serde(rename = "BLE")]
    Ble,
    #[serde(rename = "USB")]
    Usb,
}

impl SensorKind {
    pub const fn label(self) -> &'static str {
        match self {
            SensorKind::Ble => "BLE",
            SensorKind::Usb => "USB",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BLE" | "BLUETOOTH" => Some(SensorKind::Ble),
            "USB" => Some(SensorKind::Usb),
            _ => None,
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_english_and_turkish_labels() {
        assert_eq!(Organ::from_label("heart"), Some(Organ::Heart));
        assert_eq!(Organ::from_label(" Kalp "), Some(Organ::Heart));
        assert_eq!(Organ::from_label("Karaciğer"), Some(Organ::Liver));
        assert_eq!(Organ::from_label("Spleen"), None);
        assert_eq!(Organ::from_label("  "), None);
    }

    #[test]
    fn every_organ_round_trips_through_its_labels() {
        for organ in Organ::ALL {
            assert_eq!(Organ::from_label(organ.label()), Some(organ));
            assert_eq!(Organ::from_label(organ.turkish_label()), Some(organ));
        }
    }

    #[test]
    fn organ_serializes_as_canonical_label() {
        let json = serde_json::to_string(&Organ::Circulatory).expect("serializes");
        assert_eq!(json, "\"Circulatory\"");
        let parsed: Organ = serde_json::from_str("\"Dolaşım\"").expect("deserializes");
        assert_eq!(parsed, Organ::Circulatory);
    }

    #[test]
    fn sensor_kind_accepts_case_variants() {
        assert_eq!(SensorKind::from_label("ble"), Some(SensorKind::Ble));
        assert_eq!(SensorKind::from_label("USB"), Some(SensorKind::Usb));
        assert_eq!(SensorKind::from_label("serial"), None);
        assert_eq!(
            serde_json::to_string(&SensorKind::Usb).expect("serializes"),
            "\"USB\""
        );
    }
}
