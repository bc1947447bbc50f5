//! Controlled vocabularies for enumerated record fields
//!
//! Each vocabulary accepts its canonical spelling plus a few legacy aliases
//! found in the configuration workbooks. Matching ignores ASCII case and
//! surrounding whitespace but otherwise compares the whole cell.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::issue::Field;

/// Error returned when a cell does not match any accepted spelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub field: Field,
    pub value: String,
}

impl std::fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} '{}'", self.field.label(), self.value)
    }
}

impl std::error::Error for ParseEnumError {}

/// A fixed enumeration parsed from free-text cells
pub trait Vocabulary: Sized + Copy + 'static {
    /// Field reported when parsing fails
    const FIELD: Field;

    /// Every variant, in declaration order
    fn all() -> &'static [Self];

    /// Canonical spelling (what gets written out)
    fn as_str(&self) -> &'static str;

    /// Canonical spelling first, then aliases
    fn spellings(&self) -> &'static [&'static str];

    /// Parse a raw cell value
    fn parse(raw: &str) -> Result<Self, ParseEnumError> {
        let trimmed = raw.trim();
        Self::all()
            .iter()
            .copied()
            .find(|variant| {
                variant
                    .spellings()
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| ParseEnumError {
                field: Self::FIELD,
                value: raw.to_string(),
            })
    }
}

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident ($field:expr) {
            $($variant:ident => $canonical:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl Vocabulary for $name {
            const FIELD: Field = $field;

            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }

            fn spellings(&self) -> &'static [&'static str] {
                match self {
                    $($name::$variant => &[$canonical $(, $alias)*]),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$name as Vocabulary>::parse(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

vocabulary! {
    /// Risk classification tier of a software package
    LevelOfCare(Field::LevelOfCare) {
        None => "NONE",
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
        Safety => "SAFETY",
    }
}

vocabulary! {
    /// Lifecycle status of a software package
    SoftwareStatus(Field::SoftwareStatus) {
        Devel => "DEVEL" | "Development",
        ReadyInstall => "RDY_INSTALL" | "Ready for installation" | "Ready for install",
        ReadyIntTest => "RDY_INT_TEST"
            | "Ready for integration test"
            | "Ready for verification with beam",
        ReadyBeam => "RDY_BEAM" | "Ready for beam",
        Retired => "RETIRED",
    }
}

vocabulary! {
    /// Lifecycle status of one installation on a host
    InstallStatus(Field::InstallStatus) {
        Devel => "DEVEL" | "Development",
        Maint => "MAINT" | "Maintenance",
        ReadyInstall => "RDY_INSTALL" | "Ready for installation" | "Ready for install",
        ReadyIntTest => "RDY_INT_TEST"
            | "Ready for integration test"
            | "Ready for verification with beam",
        ReadyBeam => "RDY_BEAM" | "Ready for beam",
        Deprecated => "DEPRECATED",
    }
}

vocabulary! {
    /// Where the software sources are kept
    VersionControl(Field::VersionControl) {
        Git => "Git",
        AssetCentre => "AssetCentre" | "AssetCenter",
        Filesystem => "Filesystem",
        Debian => "Debian",
        Other => "Other",
    }
}

vocabulary! {
    /// Machine area an installation belongs to
    Area(Field::Area) {
        Global => "Global",
        Fe => "FE",
        Ls1 => "LS1",
        Fs1 => "FS1",
        Ls2 => "LS2",
        Fs2 => "FS2",
        Ls3 => "LS3",
        Bds => "BDS",
        Fs => "FS",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_status_spellings() {
        let cases = [
            ("devel", SoftwareStatus::Devel),
            ("DEVELOPMENT", SoftwareStatus::Devel),
            ("Ready for install", SoftwareStatus::ReadyInstall),
            ("ready FOR installation", SoftwareStatus::ReadyInstall),
            ("rdy_install", SoftwareStatus::ReadyInstall),
            ("Ready for verification with beam", SoftwareStatus::ReadyIntTest),
            ("ready for integration test", SoftwareStatus::ReadyIntTest),
            ("Ready for beam", SoftwareStatus::ReadyBeam),
            ("retired", SoftwareStatus::Retired),
        ];
        for (raw, expected) in cases {
            assert_eq!(raw.parse::<SoftwareStatus>(), Ok(expected), "{raw}");
        }
    }

    #[test]
    fn test_whole_string_match_only() {
        assert!("Ready".parse::<SoftwareStatus>().is_err());
        assert!("DEVEL2".parse::<SoftwareStatus>().is_err());
        assert!("LS".parse::<Area>().is_err());
        // Surrounding whitespace is not part of the value
        assert_eq!("  fe ".parse::<Area>(), Ok(Area::Fe));
    }

    #[test]
    fn test_install_status_differs_from_software_status() {
        assert_eq!("Maintenance".parse::<InstallStatus>(), Ok(InstallStatus::Maint));
        assert_eq!("deprecated".parse::<InstallStatus>(), Ok(InstallStatus::Deprecated));
        assert!("RETIRED".parse::<InstallStatus>().is_err());
        assert!("MAINT".parse::<SoftwareStatus>().is_err());
    }

    #[test]
    fn test_version_control_aliases() {
        assert_eq!("assetcenter".parse::<VersionControl>(), Ok(VersionControl::AssetCentre));
        assert_eq!("FILESYSTEM".parse::<VersionControl>(), Ok(VersionControl::Filesystem));
        assert_eq!(VersionControl::Filesystem.as_str(), "Filesystem");
    }

    #[test]
    fn test_parse_error_reports_field_and_raw_value() {
        let err = "Sometime".parse::<LevelOfCare>().unwrap_err();
        assert_eq!(err.field, Field::LevelOfCare);
        assert_eq!(err.value, "Sometime");
        assert_eq!(err.to_string(), "unknown level of care 'Sometime'");
    }

    #[test]
    fn test_serde_uses_canonical_spelling() {
        let json = serde_json::to_string(&SoftwareStatus::ReadyIntTest).unwrap();
        assert_eq!(json, "\"RDY_INT_TEST\"");
        let parsed: SoftwareStatus = serde_json::from_str("\"Ready for beam\"").unwrap();
        assert_eq!(parsed, SoftwareStatus::ReadyBeam);
        assert!(serde_json::from_str::<Area>("\"Moon\"").is_err());
    }

    #[test]
    fn test_every_canonical_spelling_round_trips() {
        for area in Area::ALL {
            assert_eq!(area.as_str().parse::<Area>(), Ok(*area));
        }
        for loc in LevelOfCare::ALL {
            assert_eq!(loc.to_string().to_lowercase().parse::<LevelOfCare>(), Ok(*loc));
        }
    }
}
