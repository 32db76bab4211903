//! Conformance test fixture runner
//!
//! Loads YAML fixtures and runs them against the atoma engine.
//!
//! ```yaml
//! name: two properties
//! description: default selector, no nesting
//! reference_preset: false
//! config: { prefix: "" }
//! cases:
//!   - name: names and css
//!     calls:
//!       - style: [{ color: red, backgroundColor: red }]
//!         expect: [a, b]
//!     atomic_css: ".a{color:red}.b{background-color:red}"
//! ```

use atoma::prelude::*;
use atoma::EngineConfig;
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Install the reference presets before `config`.
    #[serde(default)]
    pub reference_preset: bool,
    #[serde(default)]
    pub config: EngineConfig,
    pub cases: Vec<TestCase>,
}

/// Test case: a sequence of `style()` calls on one fresh engine
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    #[serde(default)]
    pub global_styles: Vec<String>,
    pub calls: Vec<StyleCall>,
    /// Expected `render_atomic_styles()` after all calls.
    #[serde(default)]
    pub atomic_css: Option<String>,
    /// Expected `render_styles()` after all calls.
    #[serde(default)]
    pub css: Option<String>,
    /// Expected registry size after all calls.
    #[serde(default)]
    pub registered: Option<usize>,
}

/// One `style()` call and the names it must return
#[derive(Debug, Deserialize)]
pub struct StyleCall {
    pub style: Vec<StyleItem>,
    pub expect: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    /// Human-readable description of every mismatch.
    pub mismatches: Vec<String>,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Build a fresh engine for one case
    pub fn build_engine(&self) -> Result<Engine, EngineError> {
        let mut builder = self.config.clone().into_builder()?;
        if self.reference_preset {
            builder = builder.preset(crate::reference_preset()?);
        }
        builder.build()
    }

    /// Run all test cases and return results
    pub fn run(&self) -> Result<Vec<CaseResult>, EngineError> {
        let mut results = Vec::with_capacity(self.cases.len());
        for case in &self.cases {
            let mut engine = self.build_engine()?;
            results.push(case.run(&mut engine));
        }
        Ok(results)
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' failed to build: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed:\n  {}",
                self.name,
                result.case_name,
                result.mismatches.join("\n  ")
            );
        }
    }
}

impl TestCase {
    /// Run this case's calls against `engine` and compare every expectation
    pub fn run(&self, engine: &mut Engine) -> CaseResult {
        let mut mismatches = Vec::new();

        for css in &self.global_styles {
            engine.add_global_style(css);
        }
        for (index, call) in self.calls.iter().enumerate() {
            let actual = engine.style(call.style.iter().cloned());
            if actual != call.expect {
                mismatches.push(format!("call {index}: expected {:?}, got {actual:?}", call.expect));
            }
        }
        if let Some(expected) = &self.atomic_css {
            let actual = engine.render_atomic_styles();
            if actual != *expected {
                mismatches.push(format!("atomic css: expected {expected:?}, got {actual:?}"));
            }
        }
        if let Some(expected) = &self.css {
            let actual = engine.render_styles();
            if actual != *expected {
                mismatches.push(format!("css: expected {expected:?}, got {actual:?}"));
            }
        }
        if let Some(expected) = self.registered {
            let actual = engine.atomic_styles().len();
            if actual != expected {
                mismatches.push(format!("registered: expected {expected}, got {actual}"));
            }
        }

        CaseResult {
            case_name: self.name.clone(),
            passed: mismatches.is_empty(),
            mismatches,
        }
    }
}
