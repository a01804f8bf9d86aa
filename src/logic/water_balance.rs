use crate::models::{HIGH_HUMIDITY, LOW_HUMIDITY};

/// Deficit multiplier for dry air
pub const DRY_AIR_FACTOR: f64 = 1.2;
/// Deficit multiplier for humid air
pub const HUMID_AIR_FACTOR: f64 = 0.9;

/// Crop water demand (ETc) in mm/day
pub fn crop_demand_mm(et0: f64, kc: f64) -> f64 {
    et0 * kc
}

/// Water held in the root zone, expressed as a depth in mm
pub fn stored_moisture_mm(soil_moisture_pct: f64, soil_depth_m: f64) -> f64 {
    let soil_depth_mm = soil_depth_m * 1000.0;
    (soil_moisture_pct / 100.0) * soil_depth_mm
}

pub fn humidity_factor(humidity_pct: f64) -> f64 {
    if humidity_pct < LOW_HUMIDITY {
        DRY_AIR_FACTOR
    } else if humidity_pct > HIGH_HUMIDITY {
        HUMID_AIR_FACTOR
    } else {
        1.0
    }
}

/// Water deficit in mm after rain offset and humidity correction, never negative.
///
/// The stored moisture term is divided by the field area. This mixes a depth
/// with an area and is kept as-is to match recorded decisions.
pub fn water_deficit_mm(
    soil_moisture_pct: f64,
    area_m2: f64,
    soil_depth_m: f64,
    predicted_rain_mm: f64,
    et0: f64,
    kc: f64,
    humidity_pct: f64,
) -> f64 {
    let etc_mm = crop_demand_mm(et0, kc);
    let current_moisture_mm = stored_moisture_mm(soil_moisture_pct, soil_depth_m);
    let deficit_mm = (etc_mm - current_moisture_mm / area_m2 - predicted_rain_mm).max(0.0);
    deficit_mm * humidity_factor(humidity_pct)
}

/// Liters of irrigation needed to cover today's crop demand.
pub fn compute_water_liters(
    soil_moisture_pct: f64,
    area_m2: f64,
    soil_depth_m: f64,
    predicted_rain_mm: f64,
    et0: f64,
    kc: f64,
    humidity_pct: f64,
) -> u32 {
    let deficit_mm = water_deficit_mm(
        soil_moisture_pct,
        area_m2,
        soil_depth_m,
        predicted_rain_mm,
        et0,
        kc,
        humidity_pct,
    );
    let liters = (deficit_mm * area_m2).round();

    tracing::debug!(
        etc_mm = crop_demand_mm(et0, kc),
        deficit_mm,
        liters,
        "Computed water balance"
    );

    // NaN and negatives land on 0, huge values saturate
    if liters.is_nan() || liters <= 0.0 {
        0
    } else {
        liters.min(f64::from(u32::MAX)) as u32
    }
}
