//! Seam to the external grid-to-JSON converter.
//!
//! The pipeline never decodes grid data itself; it hands a raw file, a
//! level filter, and a destination to the converter and treats the output
//! as an opaque payload.

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::ConvertError;

/// Converts one raw grid file into one JSON artifact for one level.
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(
        &self,
        input: &Path,
        surface_type: u16,
        surface_value: f64,
        output: &Path,
    ) -> Result<(), ConvertError>;
}

/// Production converter shelling out to the `grib2json` CLI.
#[derive(Debug, Clone)]
pub struct Grib2JsonConverter {
    program: String,
}

impl Grib2JsonConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Grib2JsonConverter {
    fn default() -> Self {
        Self::new("grib2json")
    }
}

#[async_trait]
impl Converter for Grib2JsonConverter {
    async fn convert(
        &self,
        input: &Path,
        surface_type: u16,
        surface_value: f64,
        output: &Path,
    ) -> Result<(), ConvertError> {
        let result = Command::new(&self.program)
            .arg("-d")
            .arg("-n")
            .arg("--filter.surface")
            .arg(surface_type.to_string())
            .arg("--filter.value")
            .arg(surface_value.to_string())
            .arg("-o")
            .arg(output)
            .arg(input)
            .output()
            .await
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConvertError::NonZeroExit {
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        debug!(
            input = %input.display(),
            output = %output.display(),
            surface_type = surface_type,
            surface_value = surface_value,
            "Converted grid file"
        );
        Ok(())
    }
}
