//! # File I/O Module
//!
//! Reading and writing pattern documents and calculation results:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Version validation**: Refuse documents from an incompatible schema
//!
//! Pattern documents are plain JSON [`PatternDefinition`]s.
//!
//! ## Example
//!
//! ```rust,no_run
//! use knit_core::file_io::{load_pattern, save_json};
//! use knit_core::calculations::calculate_pattern;
//! use knit_core::settings::CalculationSettings;
//! use std::path::Path;
//!
//! let definition = load_pattern(Path::new("sweater.json"))?;
//! let details = calculate_pattern(&definition, &CalculationSettings::default())?;
//! save_json(&details, Path::new("sweater.calculated.json"))?;
//! # Ok::<(), knit_core::errors::PatternError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{PatternError, PatternResult};
use crate::model::pattern::{PatternDefinition, SCHEMA_VERSION};
use crate::validation::parse_pattern;

/// Read a whole file as UTF-8 text.
pub fn read_document(path: &Path) -> PatternResult<String> {
    let mut file =
        File::open(path).map_err(|e| PatternError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PatternError::file_error("read", path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Load any JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> PatternResult<T> {
    let contents = read_document(path)?;
    serde_json::from_str(&contents).map_err(|e| PatternError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Load a pattern definition from a file.
///
/// # Returns
///
/// * `Ok(PatternDefinition)` - Successfully loaded pattern
/// * `Err(PatternError::ValidationFailed)` - Invalid JSON, unknown enum values or missing fields, one issue per field
/// * `Err(PatternError::VersionMismatch)` - Document schema is incompatible
/// * `Err(PatternError::FileError)` - I/O error
pub fn load_pattern(path: &Path) -> PatternResult<PatternDefinition> {
    let definition = parse_pattern(&read_document(path)?)?;

    // Documents without a version are taken to be current
    if let Some(version) = &definition.metadata.schema_version {
        validate_version(version)?;
    }

    tracing::debug!(
        path = %path.display(),
        pattern = definition.display_name(),
        components = definition.components.len(),
        "loaded pattern"
    );
    Ok(definition)
}

/// Save any serializable value as pretty JSON using atomic write.
///
/// Writes to `<path>.tmp`, syncs, then renames over `path`.
pub fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> PatternResult<()> {
    let json = serde_json::to_string_pretty(value)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    let mut tmp_file = File::create(tmp_path).map_err(|e| {
        PatternError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        PatternError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        PatternError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(tmp_path);
        PatternError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "saved JSON");
    Ok(())
}

/// Check that a document version is compatible with [`SCHEMA_VERSION`].
///
/// Major versions must match. While the schema is 0.x, a newer minor
/// version is rejected as well.
pub fn validate_version(file_version: &str) -> PatternResult<()> {
    let mismatch = || PatternError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file = semver::Version::parse(file_version).map_err(|_| mismatch())?;
    let current = semver::Version::parse(SCHEMA_VERSION).map_err(|e| PatternError::Internal {
        message: format!("bad SCHEMA_VERSION constant: {}", e),
    })?;

    if file.major != current.major {
        return Err(mismatch());
    }
    if current.major == 0 && file.minor > current.minor {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::garment::{ComponentAttributes, ComponentDefinition, Dimension, SilhouetteAttributes};
    use crate::model::gauge::GaugeData;
    use std::env::temp_dir;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("knit_core_test_{}.json", name))
    }

    fn sample() -> PatternDefinition {
        PatternDefinition::new("Test Scarf", GaugeData::new(20.0, 28.0)).with_component(ComponentDefinition::new(
            "body",
            "Body",
            ComponentAttributes::Silhouette(SilhouetteAttributes {
                bottom_width: Dimension::fixed(25.0),
                top_width: None,
                length: Dimension::fixed(160.0),
                edge_stitches: None,
                use_stitch_pattern: false,
            }),
        ))
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let definition = sample();
        save_json(&definition, &path).unwrap();

        let loaded = load_pattern(&path).unwrap();
        assert_eq!(loaded, definition);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_creates_no_tmp_file() {
        let path = temp_path("atomic");
        save_json(&sample(), &path).unwrap();

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        assert!(!Path::new(&tmp_name).exists());
        assert!(path.exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_newer_document_rejected() {
        let path = temp_path("newer");
        let mut definition = sample();
        definition.metadata.schema_version = Some("0.9.0".to_string());
        save_json(&definition, &path).unwrap();

        let err = load_pattern(&path).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unknown_enum_value_names_the_field() {
        let path = temp_path("unknown_enum");
        let json = serde_json::to_string(&sample())
            .unwrap()
            .replace("\"type\":\"silhouette\"", "\"type\":\"poncho\"");
        fs::write(&path, json).unwrap();

        match load_pattern(&path).unwrap_err() {
            PatternError::ValidationFailed { errors } => {
                assert_eq!(errors[0].field, "components.body.attributes.type");
            }
            other => panic!("expected validation failure, got {:?}", other),
        }

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let err = load_pattern(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.5").is_ok());
        assert!(validate_version("0.0.3").is_ok());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("banana").is_err());
    }
}
