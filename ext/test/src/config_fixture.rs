//! Config conformance fixture runner.
//!
//! Loads YAML fixtures whose `config` field is a raw [`EngineConfig`] document.
//! This tests the config loading path end to end:
//! YAML → `EngineConfig` → `Engine::from_config()` → style/render.
//!
//! Unlike the [`fixture`](crate::fixture) module, a config fixture may expect
//! loading to fail, and names the error class it expects.

use atoma::{Engine, EngineConfig, EngineError};
use serde::Deserialize;

use crate::fixture::{CaseResult, TestCase};

/// Error classes a config fixture can expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedError {
    /// Shape or type error while deserializing.
    InvalidConfig,
    /// A dynamic rule pattern does not compile.
    InvalidPattern,
    /// A default selector lacks `{a}`.
    MissingPlaceholder,
    /// A static alias or shortcut chain loops.
    CycleDetected,
}

impl ExpectedError {
    /// Whether `error` belongs to this class.
    #[must_use]
    pub fn matches(self, error: &EngineError) -> bool {
        matches!(
            (self, error),
            (Self::InvalidConfig, EngineError::InvalidConfig { .. })
                | (Self::InvalidPattern, EngineError::InvalidPattern { .. })
                | (Self::MissingPlaceholder, EngineError::MissingPlaceholder { .. })
                | (Self::CycleDetected, EngineError::CycleDetected { .. })
        )
    }
}

/// A config conformance test fixture.
#[derive(Debug, Deserialize)]
pub struct ConfigFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: serde_yaml::Value,
    #[serde(default)]
    pub cases: Vec<TestCase>,
    #[serde(default)]
    pub expect_error: Option<ExpectedError>,
}

impl ConfigFixture {
    /// Parse a single config fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple config fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Deserialize and build the engine.
    pub fn load(&self) -> Result<Engine, EngineError> {
        let config: EngineConfig = serde_yaml::from_value(self.config.clone())
            .map_err(|e| EngineError::InvalidConfig { message: e.to_string() })?;
        Engine::from_config(config)
    }

    /// Run the fixture and panic on the first failure.
    pub fn run_and_assert(&self) {
        match (self.load(), self.expect_error) {
            (Err(error), Some(expected)) => assert!(
                expected.matches(&error),
                "Fixture '{}': expected {expected:?}, got {error}",
                self.name
            ),
            (Err(error), None) => panic!("Fixture '{}' failed to load: {error}", self.name),
            (Ok(_), Some(expected)) => panic!("Fixture '{}': expected {expected:?}, loaded fine", self.name),
            (Ok(_), None) => {
                for case in &self.cases {
                    let mut engine = self
                        .load()
                        .unwrap_or_else(|e| panic!("Fixture '{}' failed to reload: {e}", self.name));
                    let CaseResult {
                        case_name,
                        passed,
                        mismatches,
                    } = case.run(&mut engine);
                    assert!(
                        passed,
                        "Fixture '{}' case '{case_name}' failed:\n  {}",
                        self.name,
                        mismatches.join("\n  ")
                    );
                }
            }
        }
    }
}
