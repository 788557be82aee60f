//! Geo-shape field parameters.

use serde_json::{Map, Value};

use crate::entity::GeoShapeField;
use crate::types::Orientation;

use super::parameters::FIELD_PARAM_TYPE;

const TYPE_VALUE_GEO_SHAPE: &str = "geo_shape";
const FIELD_PARAM_COERCE: &str = "coerce";
const FIELD_PARAM_IGNORE_MALFORMED: &str = "ignore_malformed";
const FIELD_PARAM_IGNORE_Z_VALUE: &str = "ignore_z_value";
const FIELD_PARAM_ORIENTATION: &str = "orientation";

/// Mapping parameters of a geo-shape field.
///
/// `ignore_z_value` defaults to true, so it is the one flag written when false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoShapeMappingParameters {
    coerce: bool,
    ignore_malformed: bool,
    ignore_z_value: bool,
    orientation: Orientation,
}

impl GeoShapeMappingParameters {
    /// Extracts the parameters of a geo-shape annotation.
    pub fn from_field(field: &GeoShapeField) -> Self {
        Self {
            coerce: field.coerce,
            ignore_malformed: field.ignore_malformed,
            ignore_z_value: field.ignore_z_value,
            orientation: field.orientation,
        }
    }

    /// Writes `type` and every non-default parameter into `node`.
    pub fn write_type_and_parameters(&self, node: &mut Map<String, Value>) {
        node.insert(FIELD_PARAM_TYPE.into(), TYPE_VALUE_GEO_SHAPE.into());

        if self.coerce {
            node.insert(FIELD_PARAM_COERCE.into(), true.into());
        }

        if self.ignore_malformed {
            node.insert(FIELD_PARAM_IGNORE_MALFORMED.into(), true.into());
        }

        if !self.ignore_z_value {
            node.insert(FIELD_PARAM_IGNORE_Z_VALUE.into(), false.into());
        }

        if self.orientation != Orientation::Ccw {
            node.insert(
                FIELD_PARAM_ORIENTATION.into(),
                self.orientation.to_string().into(),
            );
        }
    }
}

impl From<&GeoShapeField> for GeoShapeMappingParameters {
    fn from(field: &GeoShapeField) -> Self {
        Self::from_field(field)
    }
}
