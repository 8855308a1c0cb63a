//! Static catalog of vertical levels.
//!
//! Maps each logical level to the surface-type code and surface value the
//! external converter filters on. The catalog is an immutable value passed
//! into each component; adding a level is a data change, not a logic
//! change.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// GRIB surface-type code for "specified height above ground".
const SURFACE_TYPE_HEIGHT_ABOVE_GROUND: u16 = 103;
/// GRIB surface-type code for isobaric surfaces.
const SURFACE_TYPE_ISOBARIC: u16 = 100;

/// One vertical level the pipeline produces artifacts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Logical identifier: `"surface"` or a pressure in hPa (e.g. `"850"`)
    pub id: String,
    /// Surface-type code the converter selects the coordinate family with
    pub surface_type: u16,
    /// Numeric surface value within that family (Pa for isobaric levels,
    /// metres above ground for the surface wind)
    pub surface_value: f64,
}

impl Level {
    /// The synthetic 10 m above ground "surface" wind level.
    pub fn surface() -> Self {
        Self {
            id: "surface".to_string(),
            surface_type: SURFACE_TYPE_HEIGHT_ABOVE_GROUND,
            surface_value: 10.0,
        }
    }

    /// An isobaric level at the given pressure in hPa.
    pub fn isobaric(hpa: u32) -> Self {
        Self {
            id: hpa.to_string(),
            surface_type: SURFACE_TYPE_ISOBARIC,
            surface_value: f64::from(hpa) * 100.0,
        }
    }

    pub fn is_surface(&self) -> bool {
        self.id == "surface"
    }

    /// Level discriminator as it appears in artifact filenames.
    pub fn kind(&self) -> String {
        if self.is_surface() {
            "surface-level".to_string()
        } else {
            format!("isobaric-{}hPa", self.id)
        }
    }

    /// Level selector as it appears in the downloader's search expression.
    fn search_term(&self) -> String {
        if self.is_surface() {
            "10 m above ground".to_string()
        } else {
            format!("{} mb", self.id)
        }
    }
}

/// The full set of levels one pipeline pass emits artifacts for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<Level>,
}

impl LevelCatalog {
    /// The standard GFS wind levels: 10 m surface wind plus the isobaric
    /// levels served to the visualization client.
    pub fn default_gfs() -> Self {
        let mut levels = vec![Level::surface()];
        for hpa in [1000, 850, 700, 500, 250, 70, 10] {
            levels.push(Level::isobaric(hpa));
        }
        Self { levels }
    }

    /// Load a catalog override from a YAML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog: LevelCatalog = serde_yaml::from_str(&content)?;
        if catalog.levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(catalog)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Field/level selection expression for the external downloader,
    /// covering both wind components over every catalog level.
    pub fn search_expression(&self) -> String {
        let terms: Vec<String> = self.levels.iter().map(Level::search_term).collect();
        let alternatives = terms.join("|");
        format!(":UGRD:({alternatives})|:VGRD:({alternatives})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_surface_values() {
        let catalog = LevelCatalog::default_gfs();
        assert_eq!(catalog.len(), 8);

        let surface = &catalog.levels[0];
        assert_eq!(surface.id, "surface");
        assert_eq!(surface.surface_type, 103);
        assert_eq!(surface.surface_value, 10.0);

        let l850 = catalog.iter().find(|l| l.id == "850").unwrap();
        assert_eq!(l850.surface_type, 100);
        assert_eq!(l850.surface_value, 85000.0);

        let l10 = catalog.iter().find(|l| l.id == "10").unwrap();
        assert_eq!(l10.surface_value, 1000.0);
    }

    #[test]
    fn test_level_kind() {
        assert_eq!(Level::surface().kind(), "surface-level");
        assert_eq!(Level::isobaric(850).kind(), "isobaric-850hPa");
    }

    #[test]
    fn test_search_expression() {
        let catalog = LevelCatalog::default_gfs();
        assert_eq!(
            catalog.search_expression(),
            ":UGRD:(10 m above ground|1000 mb|850 mb|700 mb|500 mb|250 mb|70 mb|10 mb)\
             |:VGRD:(10 m above ground|1000 mb|850 mb|700 mb|500 mb|250 mb|70 mb|10 mb)"
        );
    }

    #[test]
    fn test_parse_catalog_yaml() {
        let yaml = r#"
levels:
  - id: surface
    surface_type: 103
    surface_value: 10.0
  - id: "500"
    surface_type: 100
    surface_value: 50000.0
"#;
        let catalog: LevelCatalog = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.levels[0].is_surface());
        assert_eq!(catalog.levels[1].kind(), "isobaric-500hPa");
    }
}
