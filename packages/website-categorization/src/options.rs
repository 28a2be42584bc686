//! Query parameters for Website Categorization API requests.
//!
//! [`QueryOptions`] collects the optional parameters a caller may set.
//! Applying it to a [`QueryParams`] accumulator yields the canonical query
//! string: keys sorted, last write wins, `application/x-www-form-urlencoded`.
//!
//! Values are never validated here; whatever the caller passes reaches the
//! remote service.

use std::collections::BTreeMap;
use std::fmt;

pub(crate) const OUTPUT_FORMAT: &str = "outputFormat";
pub(crate) const MIN_CONFIDENCE: &str = "minConfidence";
pub(crate) const ORDER: &str = "order";

/// Response output format. Default on the service side: JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Xml,
    Csv,
}

impl AsRef<str> for OutputFormat {
    fn as_ref(&self) -> &str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Csv => "CSV",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Ordering of the taxonomy listing. Default on the service side: IAB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryOrder {
    /// Alphabetically by name.
    Abc,
    /// By id.
    Iab,
}

impl AsRef<str> for CategoryOrder {
    fn as_ref(&self) -> &str {
        match self {
            Self::Abc => "ABC",
            Self::Iab => "IAB",
        }
    }
}

impl fmt::Display for CategoryOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Sorted key/value accumulator for query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    values: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Form-encode in key order.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.values.iter())
            .finish()
    }
}

/// Optional request parameters.
///
/// ```rust,ignore
/// let options = QueryOptions::new()
///     .output_format(OutputFormat::Json)
///     .min_confidence(0.55)
///     .order(CategoryOrder::Abc);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub output_format: Option<String>,
    pub min_confidence: Option<f64>,
    pub order: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output format `JSON | XML | CSV`. Upper-cased, not validated.
    pub fn output_format(mut self, format: impl AsRef<str>) -> Self {
        self.output_format = Some(format.as_ref().to_uppercase());
        self
    }

    /// Minimum confidence for predictions, `0.00..=1.00`. Higher values
    /// return fewer false positives. Service default: 0.55.
    pub fn min_confidence(mut self, value: f64) -> Self {
        self.min_confidence = Some(value);
        self
    }

    /// Taxonomy ordering `ABC | IAB`. Only meaningful for the category listing.
    pub fn order(mut self, order: impl AsRef<str>) -> Self {
        self.order = Some(order.as_ref().to_uppercase());
        self
    }

    /// Write the options that are set into `params`.
    pub fn apply(&self, params: &mut QueryParams) {
        if let Some(format) = &self.output_format {
            params.set(OUTPUT_FORMAT, format.clone());
        }
        if let Some(value) = self.min_confidence {
            params.set(MIN_CONFIDENCE, format!("{:.6}", value));
        }
        if let Some(order) = &self.order {
            params.set(ORDER, order.clone());
        }
    }

    /// Encode just these options as a query string.
    pub fn encode(&self) -> String {
        let mut params = QueryParams::new();
        self.apply(&mut params);
        params.encode()
    }
}
