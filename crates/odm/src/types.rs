//! Closed vocabularies used by field annotations and mapping output.
//!
//! Every enum serializes to the name Elasticsearch expects on the wire, so
//! descriptors authored as JSON use the same spelling as the generated mapping.

// Attribute and variant names mirror the Elasticsearch parameters they stand for
#![allow(missing_docs)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Elasticsearch field data types.
///
/// See: https://www.elastic.co/guide/en/elasticsearch/reference/current/mapping-types.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// No explicit type; Elasticsearch infers one from the first document.
    #[default]
    Auto,
    Text,
    Keyword,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    HalfFloat,
    ScaledFloat,
    UnsignedLong,
    Date,
    DateNanos,
    Boolean,
    Binary,
    IntegerRange,
    FloatRange,
    LongRange,
    DoubleRange,
    DateRange,
    IpRange,
    Object,
    Nested,
    Ip,
    TokenCount,
    Percolator,
    Flattened,
    SearchAsYouType,
    RankFeature,
    RankFeatures,
    Wildcard,
    DenseVector,
    SparseVector,
    ConstantKeyword,
    Version,
    Murmur3,
    MatchOnlyText,
    AnnotatedText,
}

impl FieldType {
    /// Returns the type name used in a mapping.
    pub fn mapped_name(&self) -> &'static str {
        match self {
            FieldType::Auto => "auto",
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Long => "long",
            FieldType::Integer => "integer",
            FieldType::Short => "short",
            FieldType::Byte => "byte",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::HalfFloat => "half_float",
            FieldType::ScaledFloat => "scaled_float",
            FieldType::UnsignedLong => "unsigned_long",
            FieldType::Date => "date",
            FieldType::DateNanos => "date_nanos",
            FieldType::Boolean => "boolean",
            FieldType::Binary => "binary",
            FieldType::IntegerRange => "integer_range",
            FieldType::FloatRange => "float_range",
            FieldType::LongRange => "long_range",
            FieldType::DoubleRange => "double_range",
            FieldType::DateRange => "date_range",
            FieldType::IpRange => "ip_range",
            FieldType::Object => "object",
            FieldType::Nested => "nested",
            FieldType::Ip => "ip",
            FieldType::TokenCount => "token_count",
            FieldType::Percolator => "percolator",
            FieldType::Flattened => "flattened",
            FieldType::SearchAsYouType => "search_as_you_type",
            FieldType::RankFeature => "rank_feature",
            FieldType::RankFeatures => "rank_features",
            FieldType::Wildcard => "wildcard",
            FieldType::DenseVector => "dense_vector",
            FieldType::SparseVector => "sparse_vector",
            FieldType::ConstantKeyword => "constant_keyword",
            FieldType::Version => "version",
            FieldType::Murmur3 => "murmur3",
            FieldType::MatchOnlyText => "match_only_text",
            FieldType::AnnotatedText => "annotated_text",
        }
    }

    /// Returns true for the date-like types that carry a `format` parameter.
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            FieldType::Date | FieldType::DateNanos | FieldType::DateRange
        )
    }

    /// Returns true for `nested` and `object`, the types that map a sub-entity.
    pub fn is_nested_or_object(&self) -> bool {
        matches!(self, FieldType::Nested | FieldType::Object)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mapped_name())
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_lowercase()))
            .map_err(|_| format!("unknown field type: {}", s))
    }
}

/// Built-in Elasticsearch date formats.
///
/// `Custom` marks a field whose formats come from the annotation's `pattern` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    Custom,
    BasicDate,
    BasicDateTime,
    BasicDateTimeNoMillis,
    BasicOrdinalDate,
    BasicOrdinalDateTime,
    BasicOrdinalDateTimeNoMillis,
    BasicTime,
    BasicTimeNoMillis,
    BasicTTime,
    BasicTTimeNoMillis,
    BasicWeekDate,
    BasicWeekDateTime,
    BasicWeekDateTimeNoMillis,
    Date,
    DateHour,
    DateHourMinute,
    DateHourMinuteSecond,
    DateHourMinuteSecondFraction,
    DateHourMinuteSecondMillis,
    DateOptionalTime,
    DateTime,
    DateTimeNoMillis,
    EpochMillis,
    EpochSecond,
    Hour,
    HourMinute,
    HourMinuteSecond,
    HourMinuteSecondFraction,
    HourMinuteSecondMillis,
    OrdinalDate,
    OrdinalDateTime,
    OrdinalDateTimeNoMillis,
    Time,
    TimeNoMillis,
    TTime,
    TTimeNoMillis,
    WeekDate,
    WeekDateTime,
    WeekDateTimeNoMillis,
    Weekyear,
    WeekyearWeek,
    WeekyearWeekDay,
    Year,
    YearMonth,
    YearMonthDay,
    StrictDate,
    StrictDateOptionalTime,
    StrictDateOptionalTimeNanos,
    StrictDateTime,
    StrictDateTimeNoMillis,
    StrictYear,
    StrictYearMonth,
    StrictYearMonthDay,
}

impl DateFormat {
    /// Returns the format name, or `None` for [`DateFormat::Custom`].
    pub fn name(&self) -> Option<String> {
        match self {
            DateFormat::Custom => None,
            other => serde_json::to_value(other)
                .ok()
                .and_then(|v| v.as_str().map(String::from)),
        }
    }
}

/// Which information is added to the inverted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOptions {
    /// Use the type's default.
    #[default]
    None,
    Docs,
    Freqs,
    Positions,
    Offsets,
}

impl fmt::Display for IndexOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexOptions::None => write!(f, "none"),
            IndexOptions::Docs => write!(f, "docs"),
            IndexOptions::Freqs => write!(f, "freqs"),
            IndexOptions::Positions => write!(f, "positions"),
            IndexOptions::Offsets => write!(f, "offsets"),
        }
    }
}

/// Scoring algorithm of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Similarity {
    /// Use the index default.
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "BM25")]
    Bm25,
    #[serde(rename = "classic")]
    Classic,
    #[serde(rename = "boolean")]
    Boolean,
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Similarity::Default => write!(f, "default"),
            Similarity::Bm25 => write!(f, "BM25"),
            Similarity::Classic => write!(f, "classic"),
            Similarity::Boolean => write!(f, "boolean"),
        }
    }
}

/// Term vector storage of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermVector {
    /// Not set; nothing is written.
    #[default]
    None,
    No,
    Yes,
    WithPositions,
    WithOffsets,
    WithPositionsOffsets,
    WithPositionsPayloads,
    WithPositionsOffsetsPayloads,
}

impl fmt::Display for TermVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TermVector::None => "none",
            TermVector::No => "no",
            TermVector::Yes => "yes",
            TermVector::WithPositions => "with_positions",
            TermVector::WithOffsets => "with_offsets",
            TermVector::WithPositionsOffsets => "with_positions_offsets",
            TermVector::WithPositionsPayloads => "with_positions_payloads",
            TermVector::WithPositionsOffsetsPayloads => "with_positions_offsets_payloads",
        };
        f.write_str(name)
    }
}

/// JSON type a `null_value` is written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullValueType {
    #[default]
    String,
    Integer,
    Long,
    Double,
}

/// Dynamic mapping policy of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dynamic {
    True,
    False,
    Strict,
    Runtime,
    /// Use the parent's policy; nothing is written.
    #[default]
    Inherit,
}

impl Dynamic {
    /// Returns the value written to the mapping, or `None` for [`Dynamic::Inherit`].
    pub fn mapped_name(&self) -> Option<&'static str> {
        match self {
            Dynamic::True => Some("true"),
            Dynamic::False => Some("false"),
            Dynamic::Strict => Some("strict"),
            Dynamic::Runtime => Some("runtime"),
            Dynamic::Inherit => None,
        }
    }
}

/// Tri-state switch for date and numeric detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Detection {
    #[default]
    Default,
    True,
    False,
}

impl Detection {
    /// Returns the explicit setting, or `None` when left to the default.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Detection::Default => None,
            Detection::True => Some(true),
            Detection::False => Some(false),
        }
    }
}

/// Vertex order of geo-shape polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Right,
    #[default]
    Ccw,
    Counterclockwise,
    Left,
    Cw,
    Clockwise,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Orientation::Right => "right",
            Orientation::Ccw => "ccw",
            Orientation::Counterclockwise => "counterclockwise",
            Orientation::Left => "left",
            Orientation::Cw => "cw",
            Orientation::Clockwise => "clockwise",
        };
        f.write_str(name)
    }
}

/// Kind of a completion suggester context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionContextType {
    Category,
    Geo,
}

impl CompletionContextType {
    /// Returns the context type name used in a mapping.
    pub fn mapped_name(&self) -> &'static str {
        match self {
            CompletionContextType::Category => "category",
            CompletionContextType::Geo => "geo",
        }
    }
}

/// Whether an entity's mapping carries the type-hint property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteTypeHint {
    /// Follow the global configuration.
    #[default]
    Default,
    True,
    False,
}

impl WriteTypeHint {
    /// Resolves this setting against the global default.
    pub fn resolve(&self, global_default: bool) -> bool {
        match self {
            WriteTypeHint::Default => global_default,
            WriteTypeHint::True => true,
            WriteTypeHint::False => false,
        }
    }
}
