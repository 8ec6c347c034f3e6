//! Named table schemas: ordered (name, type) pairs handed in by external catalogs

use crate::error::{PlanError, PlanResult};
use rp_types::{Type, TypeCreator};
use serde::{Deserialize, Serialize};

/// A column entry as written in a YAML schema document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: Type,
}

/// YAML schema document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaDef {
    columns: Vec<ColumnDef>,
}

/// Column names paired with a required struct of their types
///
/// Names are kept beside the struct because the IR's struct type is
/// positional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NamedStruct {
    names: Vec<String>,
    struct_type: Type,
}

impl NamedStruct {
    /// Pair column names with types
    pub fn new(names: Vec<String>, types: Vec<Type>) -> PlanResult<Self> {
        if names.len() != types.len() {
            return Err(PlanError::InvalidSchema {
                message: format!("{} name(s) for {} type(s)", names.len(), types.len()),
            });
        }
        if let Some(pos) = names.iter().position(|n| n.trim().is_empty()) {
            return Err(PlanError::InvalidSchema {
                message: format!("column {pos} has an empty name"),
            });
        }
        Ok(Self {
            names,
            struct_type: TypeCreator::REQUIRED.structure(types),
        })
    }

    /// Parse a `columns: [{name, type}]` YAML document
    pub fn from_yaml(source: &str) -> PlanResult<Self> {
        let def: SchemaDef = serde_yaml::from_str(source)?;
        let (names, types) = def
            .columns
            .into_iter()
            .map(|c| (c.name, c.data_type))
            .unzip();
        Self::new(names, types)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names in order
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// The required struct of column types
    pub fn struct_type(&self) -> &Type {
        &self.struct_type
    }

    /// Column types in order
    pub fn field_types(&self) -> &[Type] {
        self.struct_type.struct_fields().unwrap_or(&[])
    }

    /// Position of a column by name (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let lower = name.to_lowercase();
        self.names.iter().position(|n| n.to_lowercase() == lower)
    }

    /// Type of a column by name (case-insensitive)
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.index_of(name).and_then(|i| self.field_types().get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pairs_names_and_types() {
        let r = TypeCreator::REQUIRED;
        let schema = NamedStruct::new(
            vec!["id".to_string(), "name".to_string()],
            vec![r.i64(), TypeCreator::NULLABLE.string()],
        )
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.field_types()[1], TypeCreator::NULLABLE.string());
        assert!(!schema.struct_type().is_nullable());
        assert_eq!(schema.index_of("NAME"), Some(1)); // case-insensitive
        assert_eq!(schema.field("id"), Some(&r.i64()));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = NamedStruct::new(vec!["a".to_string()], vec![]).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSchema { .. }));
    }

    #[test]
    fn test_new_rejects_empty_name() {
        let err = NamedStruct::new(
            vec!["a".to_string(), " ".to_string()],
            vec![TypeCreator::REQUIRED.i32(), TypeCreator::REQUIRED.i32()],
        )
        .unwrap_err();
        assert!(err.to_string().contains("column 1"));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
columns:
  - name: id
    type: i64
  - name: country
    type: varchar<255>?
  - name: amount
    type: decimal<12,2>
"#;
        let schema = NamedStruct::from_yaml(yaml).unwrap();
        assert_eq!(schema.column_names(), &["id", "country", "amount"]);
        assert_eq!(
            schema.field("country"),
            Some(&TypeCreator::NULLABLE.var_char(255).unwrap())
        );
    }

    #[test]
    fn test_from_yaml_rejects_bad_type() {
        let yaml = "columns:\n  - name: id\n    type: varchar<0>\n";
        assert!(matches!(
            NamedStruct::from_yaml(yaml),
            Err(PlanError::SchemaParse(_))
        ));
    }
}
