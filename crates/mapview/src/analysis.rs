//! Mock imagery analysis shown next to the map.
//!
//! The figures are random placeholders for a marketing page; nothing here
//! reads imagery.

use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    #[default]
    Ndvi,
    Ndbi,
    Ndwi,
    Thermal,
    Composite,
}

impl AnalysisKind {
    pub fn code(self) -> &'static str {
        match self {
            AnalysisKind::Ndvi => "ndvi",
            AnalysisKind::Ndbi => "ndbi",
            AnalysisKind::Ndwi => "ndwi",
            AnalysisKind::Thermal => "thermal",
            AnalysisKind::Composite => "composite",
        }
    }

    pub fn started_message(self) -> String {
        format!("Analyzing {} data...", self.code().to_uppercase())
    }

    pub fn completed_message(self) -> String {
        format!("{} analysis complete", self.code().to_uppercase())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ndvi" => Ok(AnalysisKind::Ndvi),
            "ndbi" => Ok(AnalysisKind::Ndbi),
            "ndwi" => Ok(AnalysisKind::Ndwi),
            "thermal" => Ok(AnalysisKind::Thermal),
            "composite" => Ok(AnalysisKind::Composite),
            other => Err(format!("unknown analysis type: {other}")),
        }
    }
}

/// Placeholder statistics rendered into the stats panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockStats {
    /// Percent, 5..=40.
    pub cloud_coverage_pct: u32,
    /// 0.200..=0.600, three decimals.
    pub mean_ndvi: f64,
    /// 10..=59.
    pub scene_count: u32,
}

impl MockStats {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let cloud_coverage_pct = rng.gen_range(0..=35) + 5;
        let raw_ndvi: f64 = rng.gen_range(0.2..=0.6);
        let mean_ndvi = (raw_ndvi * 1_000.0).round() / 1_000.0;
        let scene_count = rng.gen_range(10..60);
        Self {
            cloud_coverage_pct,
            mean_ndvi,
            scene_count,
        }
    }

    pub fn cloud_coverage_label(&self) -> String {
        format!("{}%", self.cloud_coverage_pct)
    }

    pub fn mean_ndvi_label(&self) -> String {
        format!("{:.3}", self.mean_ndvi)
    }
}

pub const ANALYSIS_INFO: &str = "Geospatial Analysis Indices:

NDVI: Normalized Difference Vegetation Index
• Measures vegetation health and density
• Range: -1.0 to 1.0 (Green areas higher)
• Source: Landsat 8 & Sentinel-2

NDBI: Normalized Difference Built-up Index
• Detects urban/built-up areas
• Useful for urban planning analysis

NDWI: Normalized Difference Water Index
• Identifies water bodies and moisture
• Range: -1.0 to 1.0

Thermal: Land Surface Temperature
• Measures heat/temperature patterns
• Useful for climate and urban heat analysis

Composite: True Color Satellite Image
• Natural color representation
• Useful for visual interpretation

Data Sources: Landsat 8, Sentinel-2, MODIS";

#[cfg(test)]
mod tests {
    use super::{ANALYSIS_INFO, AnalysisKind, MockStats};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn stats_stay_in_published_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let s = MockStats::generate(&mut rng);
            assert!((5..=40).contains(&s.cloud_coverage_pct));
            assert!((0.2..=0.6).contains(&s.mean_ndvi));
            assert!((10..=59).contains(&s.scene_count));
            assert_eq!(s.mean_ndvi_label().len(), 5);
        }
    }

    #[test]
    fn same_seed_same_stats() {
        let a = MockStats::generate(&mut StdRng::seed_from_u64(42));
        let b = MockStats::generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn status_messages_use_upper_case_code() {
        let kind: AnalysisKind = "ndbi".parse().unwrap();
        assert_eq!(kind.started_message(), "Analyzing NDBI data...");
        assert_eq!(kind.completed_message(), "NDBI analysis complete");
        assert!("evi".parse::<AnalysisKind>().is_err());
    }

    #[test]
    fn info_covers_every_index() {
        for code in ["NDVI", "NDBI", "NDWI", "Thermal", "Composite"] {
            assert!(ANALYSIS_INFO.contains(code));
        }
    }
}
