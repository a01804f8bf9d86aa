use crate::models::CropProfile;
use chrono::NaiveDate;
use serde::Serialize;

/// Active growth stage for a crop on a given day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageResolution {
    /// Key of the profile actually used (after default-crop fallback)
    pub crop_key: &'static str,
    pub crop_display: &'static str,
    pub stage: &'static str,
    pub kc: f64,
    pub days_elapsed: u32,
}

/// Whole days since sowing. Future sow dates clamp to zero.
pub fn days_since_sowing(sow_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - sow_date).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Resolve the growth stage and crop coefficient for `crop` on `today`.
///
/// Stages are walked in order accumulating their durations; the first stage
/// whose cumulative end reaches `days_elapsed` is active. Crops past their last
/// stage stay on it. Unknown crop keys use the default crop.
pub fn resolve_stage(crop: &str, sow_date: NaiveDate, today: NaiveDate) -> StageResolution {
    let profile = CropProfile::lookup(crop);
    let days_elapsed = days_since_sowing(sow_date, today);
    resolve_for_profile(profile, days_elapsed)
}

pub fn resolve_for_profile(profile: &'static CropProfile, days_elapsed: u32) -> StageResolution {
    let mut cumulative: u64 = 0;
    let stage = profile
        .stages
        .iter()
        .find(|stage| {
            cumulative += u64::from(stage.duration_days);
            cumulative >= u64::from(days_elapsed)
        })
        .unwrap_or_else(|| profile.last_stage());

    tracing::debug!(
        crop = profile.key,
        stage = stage.name,
        kc = stage.kc,
        days_elapsed,
        "Resolved growth stage"
    );

    StageResolution {
        crop_key: profile.key,
        crop_display: profile.display,
        stage: stage.name,
        kc: stage.kc,
        days_elapsed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{crop_profiles, DEFAULT_CROP};
    use chrono::Duration;

    fn sow() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn day(offset: i64) -> NaiveDate {
        sow() + Duration::days(offset)
    }

    #[test]
    fn sowing_day_is_initial_stage() {
        let res = resolve_stage("maize", sow(), sow());
        assert_eq!(res.days_elapsed, 0);
        assert_eq!(res.stage, "Initial");
        assert_eq!(res.kc, 0.30);
    }

    #[test]
    fn future_sow_date_behaves_like_day_zero() {
        let today = sow();
        let future = resolve_stage("maize", today + Duration::days(30), today);
        let day_zero = resolve_stage("maize", today, today);
        assert_eq!(future, day_zero);
    }

    #[test]
    fn stage_boundaries_are_inclusive() {
        // maize: 25 / 40 / 45 / 30
        assert_eq!(resolve_stage("maize", sow(), day(25)).stage, "Initial");
        assert_eq!(resolve_stage("maize", sow(), day(26)).stage, "Development");
        assert_eq!(resolve_stage("maize", sow(), day(65)).stage, "Development");
        assert_eq!(resolve_stage("maize", sow(), day(66)).stage, "Mid-season");
        assert_eq!(resolve_stage("maize", sow(), day(110)).stage, "Mid-season");
        assert_eq!(resolve_stage("maize", sow(), day(111)).stage, "Late-season");
    }

    #[test]
    fn past_last_stage_plateaus() {
        for profile in crop_profiles() {
            let total = i64::from(profile.total_duration_days());
            let last = profile.last_stage();
            for extra in [1, 10, 365, 5000] {
                let res = resolve_stage(profile.key, sow(), day(total + extra));
                assert_eq!(res.stage, last.name, "{}", profile.key);
                assert_eq!(res.kc, last.kc, "{}", profile.key);
            }
        }
    }

    #[test]
    fn unknown_crop_uses_default_profile() {
        let res = resolve_stage("unknown_xyz", sow(), day(200));
        let expected = resolve_stage(DEFAULT_CROP, sow(), day(200));
        assert_eq!(res, expected);
        assert_eq!(res.crop_key, "banana");
        // banana: 120 / 90 / 120 / 60
        assert_eq!(res.stage, "Development");
        assert_eq!(res.kc, 0.80);
    }

    #[test]
    fn days_since_sowing_counts_whole_days() {
        assert_eq!(days_since_sowing(sow(), day(0)), 0);
        assert_eq!(days_since_sowing(sow(), day(45)), 45);
        assert_eq!(days_since_sowing(day(3), sow()), 0);
    }
}
