//! Storage field type -> engine scalar type.

use serde::{Deserialize, Serialize};

use crate::error::{ConnectorError, ConnectorResult};
use crate::store::{Field, FieldType};

/// Scalar types of the query engine that Tell columns are exposed as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Bigint,
    Double,
    Varchar,
    Varbinary,
}

impl EngineType {
    pub fn sql_name(self) -> &'static str {
        match self {
            EngineType::Bigint => "bigint",
            EngineType::Double => "double",
            EngineType::Varchar => "varchar",
            EngineType::Varbinary => "varbinary",
        }
    }
}

impl std::fmt::Display for EngineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.sql_name()) }
}

/// Map a storage field type to the engine type. Untyped and null markers have no engine type.
pub fn field_type_to_engine(ft: FieldType) -> ConnectorResult<EngineType> {
    match ft {
        FieldType::SmallInt | FieldType::Int | FieldType::BigInt => Ok(EngineType::Bigint),
        FieldType::Float | FieldType::Double => Ok(EngineType::Double),
        FieldType::Text => Ok(EngineType::Varchar),
        FieldType::Blob => Ok(EngineType::Varbinary),
        FieldType::NoType | FieldType::NullType => Err(ConnectorError::invalid_type(
            "unmappable_field_type",
            format!("field type {} has no engine type", ft),
        )),
    }
}

/// Same as [`field_type_to_engine`] for a raw storage tag.
pub fn field_tag_to_engine(tag: u16) -> ConnectorResult<EngineType> {
    field_type_to_engine(FieldType::from_tag(tag)?)
}

impl Field {
    pub fn engine_type(&self) -> ConnectorResult<EngineType> {
        field_type_to_engine(self.field_type).map_err(|e| {
            ConnectorError::invalid_type(e.code_str(), format!("column '{}': {}", self.name, e.message()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_table() {
        let expected = [
            (FieldType::SmallInt, EngineType::Bigint),
            (FieldType::Int, EngineType::Bigint),
            (FieldType::BigInt, EngineType::Bigint),
            (FieldType::Float, EngineType::Double),
            (FieldType::Double, EngineType::Double),
            (FieldType::Text, EngineType::Varchar),
            (FieldType::Blob, EngineType::Varbinary),
        ];
        for (ft, et) in expected {
            assert_eq!(field_type_to_engine(ft).unwrap(), et, "{}", ft);
        }
    }

    #[test]
    fn untyped_markers_fail() {
        for ft in [FieldType::NoType, FieldType::NullType] {
            let err = field_type_to_engine(ft).unwrap_err();
            assert!(matches!(err, ConnectorError::InvalidType { .. }));
        }
        assert!(matches!(field_tag_to_engine(42), Err(ConnectorError::InvalidType { .. })));
    }

    #[test]
    fn mapping_is_repeatable() {
        for ft in FieldType::ALL {
            let first = field_type_to_engine(ft);
            for _ in 0..3 {
                assert_eq!(field_type_to_engine(ft), first);
            }
        }
    }

    #[test]
    fn field_error_names_the_column() {
        let err = Field::new("ghost", FieldType::NullType).engine_type().unwrap_err();
        assert!(err.message().contains("ghost"));
        assert_eq!(Field::new("n", FieldType::Float).engine_type().unwrap().sql_name(), "double");
    }
}
