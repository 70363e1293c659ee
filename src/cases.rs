//! Case tables: certified-vs-computed value pairs checked by LRE.
//!
//! Cases live in YAML files so values keep their exact decimal text.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::lre::{Agreement, Digits};

/// Threshold used when neither the case nor its file sets one.
pub const DEFAULT_LRE: i32 = 6;

/// How the values of a case are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    /// Binary `f64`, measured with logarithms.
    #[default]
    Float,
    /// Arbitrary-precision decimal, compared digit by digit.
    Decimal,
}

/// A value as written in the case file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberText {
    /// Quoted text, kept verbatim.
    Text(String),
    /// Bare YAML number, already rounded to `f64` by the YAML parser.
    Number(f64),
}

impl NumberText {
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(value) => format!("{value:?}"),
        }
    }

    /// Text for the given numeric kind. Decimal cases need quoted values,
    /// since a bare number has lost its digits before it gets here.
    pub fn text_for(&self, numeric: NumericKind) -> anyhow::Result<String> {
        match (self, numeric) {
            (Self::Number(value), NumericKind::Decimal) => Err(anyhow!(
                "Unquoted number `{value:?}` in a decimal case; quote it to keep its digits"
            )),
            _ => Ok(self.as_text()),
        }
    }
}

/// One agreement case.
#[derive(Debug, Clone, Deserialize)]
pub struct AgreementCase {
    /// Case name (populated from `HashMap` key).
    #[serde(default)]
    pub name: String,
    /// Certified value.
    pub expected: NumberText,
    /// Computed value; the case is skipped without one.
    pub actual: Option<NumberText>,
    /// Required digits of agreement.
    pub lre: Option<i32>,
    /// Numeric interpretation.
    pub numeric: Option<NumericKind>,
}

/// Case file structure.
#[derive(Debug, Deserialize)]
pub struct CaseFile {
    /// Default threshold for this file.
    #[serde(rename = "_lre", default = "default_lre")]
    pub lre: i32,

    /// Default numeric kind for this file.
    #[serde(rename = "_numeric", default)]
    pub numeric: NumericKind,

    /// Cases in this file.
    #[serde(default)]
    pub cases: HashMap<String, AgreementCase>,
}

const fn default_lre() -> i32 {
    DEFAULT_LRE
}

/// Result of evaluating a case.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CaseResult {
    /// Values agree to the required digits.
    Pass { name: String, details: String },
    /// Values disagree.
    Fail { name: String, reason: String },
    /// The case could not be evaluated.
    Error { name: String, error: String },
    /// The case has nothing to compare.
    Skip { name: String, reason: String },
}

impl CaseResult {
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }

    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Pass { name, .. }
            | Self::Fail { name, .. }
            | Self::Error { name, .. }
            | Self::Skip { name, .. } => name,
        }
    }
}

/// Loads cases from one YAML document, filling per-file defaults.
pub fn load_case_file(content: &str) -> anyhow::Result<Vec<AgreementCase>> {
    let file: CaseFile = serde_yaml_ng::from_str(content)?;
    let mut cases = Vec::with_capacity(file.cases.len());

    for (name, mut case) in file.cases {
        case.name = name;
        case.lre.get_or_insert(file.lre);
        case.numeric.get_or_insert(file.numeric);
        cases.push(case);
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

/// Cases loaded from a file or directory, plus files that failed to parse.
#[derive(Debug, Default)]
pub struct LoadedCases {
    /// Parsed cases, in file then name order.
    pub cases: Vec<AgreementCase>,
    /// One `CaseResult::Error` per unparseable file.
    pub broken: Vec<CaseResult>,
}

impl LoadedCases {
    /// Broken files first, then every case evaluated.
    pub fn evaluate(&self) -> Vec<CaseResult> {
        self.broken
            .iter()
            .cloned()
            .chain(self.cases.iter().map(evaluate))
            .collect()
    }
}

/// Loads a case file, or every `.yaml`/`.yml` file in a directory.
///
/// Files in a directory that fail to parse are reported on stderr and
/// recorded in [`LoadedCases::broken`] so they count as failures.
pub fn load_cases(path: &Path) -> anyhow::Result<LoadedCases> {
    if path.is_file() {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let cases =
            load_case_file(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        return Ok(LoadedCases {
            cases,
            broken: Vec::new(),
        });
    }
    if !path.is_dir() {
        bail!("Cases path not found: {}", path.display());
    }

    let mut entries = fs::read_dir(path)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    let mut loaded = LoadedCases::default();
    for file in entries {
        if !file
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            continue;
        }
        let content =
            fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
        match load_case_file(&content) {
            Ok(cases) => loaded.cases.extend(cases),
            Err(e) => {
                eprintln!("Warning: Failed to parse {}: {e}", file.display());
                loaded.broken.push(CaseResult::Error {
                    name: file.display().to_string(),
                    error: format!("Failed to parse case file: {e}"),
                });
            }
        }
    }

    Ok(loaded)
}

/// Measures the agreement of two textual values.
pub fn measure(expected: &str, actual: &str, numeric: NumericKind) -> anyhow::Result<Digits> {
    match numeric {
        NumericKind::Float => {
            let expected = parse_float(expected)?;
            let actual = parse_float(actual)?;
            Ok(expected.digits_of_agreement(&actual))
        }
        NumericKind::Decimal => {
            let expected = parse_decimal(expected)?;
            let actual = parse_decimal(actual)?;
            Ok(expected.digits_of_agreement(&actual))
        }
    }
}

fn parse_float(text: &str) -> anyhow::Result<f64> {
    f64::from_str(text).map_err(|e| anyhow!("Cannot parse `{text}` as float: {e}"))
}

fn parse_decimal(text: &str) -> anyhow::Result<BigDecimal> {
    BigDecimal::from_str(text).map_err(|e| anyhow!("Cannot parse `{text}` as decimal: {e}"))
}

/// Evaluates one case against its threshold.
pub fn evaluate(case: &AgreementCase) -> CaseResult {
    let Some(ref actual) = case.actual else {
        return CaseResult::Skip {
            name: case.name.clone(),
            reason: "No actual value recorded".to_string(),
        };
    };

    let lre = case.lre.unwrap_or(DEFAULT_LRE);
    let numeric = case.numeric.unwrap_or_default();
    let texts = case
        .expected
        .text_for(numeric)
        .and_then(|expected| Ok((expected, actual.text_for(numeric)?)));
    let (expected, actual) = match texts {
        Ok(texts) => texts,
        Err(e) => {
            return CaseResult::Error {
                name: case.name.clone(),
                error: e.to_string(),
            };
        }
    };

    let digits = match measure(&expected, &actual, numeric) {
        Ok(digits) => digits,
        Err(e) => {
            return CaseResult::Error {
                name: case.name.clone(),
                error: e.to_string(),
            };
        }
    };

    if digits.meets(lre) {
        CaseResult::Pass {
            name: case.name.clone(),
            details: format!("{digits} (required {lre})"),
        }
    } else {
        CaseResult::Fail {
            name: case.name.clone(),
            reason: format!("expected={expected}, actual={actual} {digits} (required {lre})"),
        }
    }
}
