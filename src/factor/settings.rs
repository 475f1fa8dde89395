use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "serde")]
use std::{fs::File, io, io::Read, io::Write};

#[derive(Error, Debug)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Settings for the direct factorization used by the operator adapters.

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FactorSettings {
    /// factorization back end: `"auto"`, `"ldl"`, `"lu"` or `"dense"`
    #[builder(default = r#"String::from("auto")"#, setter(into))]
    pub direct_solve_method: String,

    /// relative threshold for accepting the diagonal as pivot in the dense
    /// LU back end.  1.0 gives strict partial pivoting.
    #[builder(default = "0.1")]
    pub pivot_threshold: f64,

    /// scaling of the AMD dense row threshold used by the LDL back end
    #[builder(default = "1.0")]
    pub amd_dense_scale: f64,

    /// run a structural check on matrices passed to the adapters
    #[builder(default = "true")]
    pub check: bool,

    /// report factorization statistics at `info` level
    #[builder(default = "false")]
    pub verbose: bool,
}

impl Default for FactorSettings {
    fn default() -> FactorSettings {
        FactorSettingsBuilder::default().build().unwrap()
    }
}

impl FactorSettings {
    /// Checks that the settings are valid.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_direct_solve_method(&self.direct_solve_method)?;
        validate_pivot_threshold(self.pivot_threshold)?;
        validate_amd_dense_scale(self.amd_dense_scale)?;
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl FactorSettings {
    /// Write the settings to a file as JSON.
    pub fn write_to_file(&self, file: &mut File) -> Result<(), io::Error> {
        let json = serde_json::to_string(self)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Read settings from a JSON file.  Missing fields take their default
    /// values.
    pub fn read_from_file(file: &mut File) -> Result<Self, io::Error> {
        let mut buffer = String::new();
        file.read_to_string(&mut buffer)?;
        let settings: FactorSettings = serde_json::from_str(&buffer)?;
        settings
            .validate()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(settings)
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for FactorSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        FactorSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl FactorSettingsBuilder {
    /// check that the specified fields are valid
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref direct_solve_method) = self.direct_solve_method {
            validate_direct_solve_method(direct_solve_method)?;
        }
        if let Some(pivot_threshold) = self.pivot_threshold {
            validate_pivot_threshold(pivot_threshold)?;
        }
        if let Some(amd_dense_scale) = self.amd_dense_scale {
            validate_amd_dense_scale(amd_dense_scale)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_direct_solve_method(direct_solve_method: &str) -> Result<(), SettingsError> {
    match direct_solve_method {
        "auto" => Ok(()),
        "ldl" => Ok(()),
        "lu" => Ok(()),
        "dense" => Ok(()),
        _ => Err(SettingsError::BadFieldValue("direct_solve_method")),
    }
}

fn validate_pivot_threshold(pivot_threshold: f64) -> Result<(), SettingsError> {
    if pivot_threshold > 0.0 && pivot_threshold <= 1.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("pivot_threshold"))
    }
}

fn validate_amd_dense_scale(amd_dense_scale: f64) -> Result<(), SettingsError> {
    if amd_dense_scale > 0.0 && amd_dense_scale.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("amd_dense_scale"))
    }
}

#[test]
fn test_settings_builder() {
    let opts = FactorSettings::default();
    assert_eq!(opts.direct_solve_method, "auto");
    assert_eq!(opts.pivot_threshold, 0.1);

    let opts = FactorSettingsBuilder::default()
        .direct_solve_method("lu")
        .pivot_threshold(1.0)
        .build()
        .unwrap();
    assert_eq!(opts.direct_solve_method, "lu");
    assert!(opts.check);

    let opts = FactorSettingsBuilder::default()
        .direct_solve_method("dense")
        .build()
        .unwrap();
    assert_eq!(opts.direct_solve_method, "dense");

    assert!(FactorSettingsBuilder::default()
        .direct_solve_method("cholmod")
        .build()
        .is_err());
    assert!(FactorSettingsBuilder::default()
        .pivot_threshold(0.0)
        .build()
        .is_err());
}

#[cfg(feature = "serde")]
#[test]
fn test_settings_json_io() {
    use std::io::{Seek, SeekFrom};

    let settings = FactorSettingsBuilder::default()
        .direct_solve_method("ldl")
        .amd_dense_scale(1.5)
        .verbose(true)
        .build()
        .unwrap();

    let mut file = tempfile::tempfile().unwrap();
    settings.write_to_file(&mut file).unwrap();

    file.seek(SeekFrom::Start(0)).unwrap();
    let settings2 = FactorSettings::read_from_file(&mut file).unwrap();
    assert_eq!(settings, settings2);
}
