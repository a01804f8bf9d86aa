use serde::Serialize;

/// Crop used whenever a configured key is not in the table.
pub const DEFAULT_CROP: &str = "banana";

/// A named period of the growth cycle with its own crop coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthStage {
    pub name: &'static str,
    pub duration_days: u32,
    pub kc: f64,
}

impl GrowthStage {
    const fn new(name: &'static str, duration_days: u32, kc: f64) -> Self {
        Self {
            name,
            duration_days,
            kc,
        }
    }
}

/// Four-stage growth profile (initial, development, mid-season, late-season)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropProfile {
    pub key: &'static str,
    pub display: &'static str,
    pub stages: [GrowthStage; 4],
}

const fn four_stage(
    key: &'static str,
    display: &'static str,
    durations: [u32; 4],
    kc: [f64; 4],
) -> CropProfile {
    CropProfile {
        key,
        display,
        stages: [
            GrowthStage::new("Initial", durations[0], kc[0]),
            GrowthStage::new("Development", durations[1], kc[1]),
            GrowthStage::new("Mid-season", durations[2], kc[2]),
            GrowthStage::new("Late-season", durations[3], kc[3]),
        ],
    }
}

// Durations and Kc values follow FAO-56 tables for humid subtropical hills.
// The default crop must stay first.
static CROP_PROFILES: [CropProfile; 8] = [
    four_stage("banana", "Banana", [120, 90, 120, 60], [0.50, 0.80, 1.10, 1.00]),
    four_stage("rice", "Rice (paddy)", [30, 30, 60, 30], [1.05, 1.10, 1.20, 0.90]),
    four_stage("maize", "Maize", [25, 40, 45, 30], [0.30, 0.70, 1.20, 0.60]),
    four_stage("tomato", "Tomato", [30, 40, 45, 30], [0.60, 0.85, 1.15, 0.80]),
    four_stage("potato", "Potato", [25, 30, 45, 30], [0.50, 0.80, 1.15, 0.75]),
    four_stage("ginger", "Ginger", [30, 60, 120, 60], [0.50, 0.80, 1.05, 0.70]),
    four_stage("cardamom", "Large Cardamom", [60, 90, 150, 65], [0.60, 0.85, 1.00, 0.90]),
    four_stage("wheat", "Wheat", [15, 25, 50, 30], [0.30, 0.75, 1.15, 0.40]),
];

pub fn crop_profiles() -> &'static [CropProfile] {
    &CROP_PROFILES
}

impl CropProfile {
    /// Case-insensitive lookup by key
    pub fn find(key: &str) -> Option<&'static CropProfile> {
        let key = key.trim().to_lowercase();
        CROP_PROFILES.iter().find(|p| p.key == key)
    }

    /// Lookup that never fails: unknown keys resolve to the default crop.
    pub fn lookup(key: &str) -> &'static CropProfile {
        Self::find(key).unwrap_or_else(|| {
            tracing::warn!(
                crop = %key,
                default = DEFAULT_CROP,
                "Unknown crop key, using default crop profile"
            );
            Self::default_profile()
        })
    }

    pub fn default_profile() -> &'static CropProfile {
        &CROP_PROFILES[0]
    }

    pub fn total_duration_days(&self) -> u32 {
        self.stages.iter().map(|s| s.duration_days).sum()
    }

    pub fn last_stage(&self) -> &GrowthStage {
        let [.., last] = &self.stages;
        last
    }
}

impl std::fmt::Display for CropProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_banana() {
        assert_eq!(CropProfile::default_profile().key, DEFAULT_CROP);
    }

    #[test]
    fn find_is_case_insensitive() {
        assert_eq!(CropProfile::find("Maize").map(|p| p.key), Some("maize"));
        assert_eq!(CropProfile::find("  RICE ").map(|p| p.key), Some("rice"));
        assert!(CropProfile::find("unknown_xyz").is_none());
        assert!(CropProfile::find("").is_none());
    }

    #[test]
    fn lookup_falls_back_to_default() {
        assert_eq!(CropProfile::lookup("unknown_xyz").key, DEFAULT_CROP);
        assert_eq!(CropProfile::lookup("tomato").key, "tomato");
    }

    #[test]
    fn keys_are_unique_and_lowercase() {
        let profiles = crop_profiles();
        for (i, profile) in profiles.iter().enumerate() {
            assert_eq!(profile.key, profile.key.to_lowercase());
            assert!(
                profiles[i + 1..].iter().all(|p| p.key != profile.key),
                "Duplicate crop key {}",
                profile.key
            );
        }
    }

    #[test]
    fn stage_values_are_sane() {
        for profile in crop_profiles() {
            for stage in &profile.stages {
                assert!(stage.kc >= 0.0, "{} {} has negative kc", profile.key, stage.name);
                assert!(stage.kc <= 1.5, "{} {} kc out of range", profile.key, stage.name);
            }
            assert!(profile.total_duration_days() > 0);
        }
    }

    #[test]
    fn last_stage_is_late_season() {
        let banana = CropProfile::default_profile();
        assert_eq!(banana.last_stage().name, "Late-season");
        assert_eq!(banana.total_duration_days(), 390);
    }
}
