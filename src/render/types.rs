//! Rendered-document value types and render bridge messages

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::common::{Error, Result};

use super::color::{parse_color_list, Rgba};

/// Opaque reference to one element of the rendered document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Renderer-assigned identifier
    pub id: String,
    /// Selector the element was found with (for diagnostics)
    #[serde(default)]
    pub selector: String,
}

/// Border-box geometry in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Resolved style values of one element, keyed by CSS property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComputedStyle {
    pub properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            properties: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, property: &str) -> Result<&str> {
        self.properties
            .get(property)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingProperty(property.to_string()))
    }

    pub fn color(&self, property: &str) -> Result<Rgba> {
        self.get(property)?.parse()
    }

    /// Every colour in a multi-value property such as `border-color`
    pub fn colors(&self, property: &str) -> Result<Vec<Rgba>> {
        parse_color_list(self.get(property)?)
    }

    /// Leading numeric value of a length, `None` for keywords like `auto`
    pub fn length(&self, property: &str) -> Result<Option<f64>> {
        Ok(leading_number(self.get(property)?))
    }
}

/// Numeric prefix of a CSS value: `"15px"` is 15, `"auto"` is `None`
pub fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim_start();
    let end = value
        .char_indices()
        .take_while(|&(i, c)| {
            c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)
        })
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    value[..end].parse().ok()
}

// === Render Bridge Protocol ===

/// Request sent to the render bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMessage {
    pub seq: i64,
    #[serde(rename = "type")]
    pub message_type: String,
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

/// Response from the render bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub request_seq: i64,
    #[serde(rename = "type")]
    pub message_type: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadArguments {
    pub document: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryArguments<'a> {
    pub selector: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponseBody {
    #[serde(default)]
    pub elements: Vec<ElementRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementRef {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementArguments<'a> {
    pub id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComputedStyleArguments<'a> {
    pub id: &'a str,
    pub properties: &'a [&'a str],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComputedStyleResponseBody {
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttributeArguments<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeResponseBody {
    pub value: Option<String>,
}
