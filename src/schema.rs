//! Input contract: the table/column/ref shape produced by the DBML parser.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A parsed schema snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub refs: Vec<Ref>,
}

impl Schema {
    pub fn new(tables: Vec<Table>, refs: Vec<Ref>) -> Self {
        Self { tables, refs }
    }

    pub fn from_json(source: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(source)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default, alias = "columns")]
    pub fields: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.fields.push(column);
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|c| c.name == name)
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            name: self.name.clone(),
            primary_keys: self.fields.iter().filter(|c| c.pk).count(),
            foreign_keys: self.fields.iter().filter(|c| c.is_foreign_key()).count(),
            columns: self.fields.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type", default)]
    pub typ: ColumnType,
    #[serde(default)]
    pub pk: bool,
    #[serde(default)]
    pub not_null: bool,
    /// Inline `ref: > table.column` marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: ColumnType {
                type_name: type_name.into(),
            },
            pk: false,
            not_null: false,
            fk: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.pk = true;
        self.not_null = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.fk = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    pub fn is_foreign_key(&self) -> bool {
        self.fk.is_some()
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.fk.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    #[serde(default)]
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// Standalone `Ref:` declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ref {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

impl Ref {
    pub fn new(first: Endpoint, second: Endpoint) -> Self {
        Self {
            endpoints: vec![first, second],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub field_names: Vec<String>,
    #[serde(default)]
    pub relation: Relation,
}

impl Endpoint {
    pub fn new(table: impl Into<String>, field: impl Into<String>, relation: Relation) -> Self {
        Self {
            table_name: Some(table.into()),
            field_names: vec![field.into()],
            relation,
        }
    }

    /// Table name, treating an empty string as missing.
    pub fn table(&self) -> Option<&str> {
        self.table_name.as_deref().filter(|name| !name.is_empty())
    }

    /// First field name; composite keys are not modeled.
    pub fn field(&self) -> &str {
        self.field_names.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relation {
    /// `*`
    Many,
    /// `1`
    One,
    Other(String),
}

impl Default for Relation {
    fn default() -> Self {
        Relation::Other(String::new())
    }
}

impl From<String> for Relation {
    fn from(s: String) -> Self {
        match s.as_str() {
            "*" => Relation::Many,
            "1" => Relation::One,
            _ => Relation::Other(s),
        }
    }
}

impl From<Relation> for String {
    fn from(r: Relation) -> Self {
        match r {
            Relation::Many => "*".to_string(),
            Relation::One => "1".to_string(),
            Relation::Other(s) => s,
        }
    }
}

/// Sidebar counts for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub name: String,
    pub primary_keys: usize,
    pub foreign_keys: usize,
    pub columns: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parser_output() {
        let input = r#"{
            "tables": [
                {
                    "name": "users",
                    "fields": [
                        { "name": "id", "type": { "type_name": "int" }, "pk": true, "not_null": true },
                        { "name": "email", "type": { "type_name": "varchar" } }
                    ]
                },
                {
                    "name": "orders",
                    "fields": [
                        { "name": "id", "type": { "type_name": "int" }, "pk": true },
                        { "name": "user_id", "type": { "type_name": "int" },
                          "fk": { "table": "users", "column": "id" } }
                    ]
                }
            ],
            "refs": [
                { "endpoints": [
                    { "tableName": "orders", "fieldNames": ["user_id"], "relation": "*" },
                    { "tableName": "users", "fieldNames": ["id"], "relation": "1" }
                ] }
            ]
        }"#;
        let schema = Schema::from_json(input).unwrap();

        assert_eq!(schema.tables.len(), 2);
        assert!(schema.tables[0].fields[0].pk);
        assert_eq!(schema.tables[0].fields[1].typ.type_name, "varchar");
        assert_eq!(
            schema.tables[1].fields[1].foreign_key(),
            Some(&ForeignKey {
                table: "users".to_string(),
                column: "id".to_string()
            })
        );
        assert_eq!(schema.refs[0].endpoints[0].relation, Relation::Many);
        assert_eq!(schema.refs[0].endpoints[1].relation, Relation::One);
    }

    #[test]
    fn test_columns_alias_and_missing_fields() {
        let input = r#"{ "tables": [ { "name": "t", "columns": [ { "name": "a" } ] } ] }"#;
        let schema = Schema::from_json(input).unwrap();

        assert_eq!(schema.tables[0].fields.len(), 1);
        assert_eq!(schema.tables[0].fields[0].typ.type_name, "");
        assert!(schema.refs.is_empty());
    }

    #[test]
    fn test_endpoint_without_table() {
        let input = r#"{ "refs": [ { "endpoints": [ { "fieldNames": ["x"], "relation": "<>" } ] } ] }"#;
        let schema = Schema::from_json(input).unwrap();
        let endpoint = &schema.refs[0].endpoints[0];

        assert_eq!(endpoint.table(), None);
        assert_eq!(endpoint.relation, Relation::Other("<>".to_string()));
    }

    #[test]
    fn test_empty_table_name_is_missing() {
        let endpoint = Endpoint {
            table_name: Some(String::new()),
            field_names: vec![],
            relation: Relation::One,
        };
        assert_eq!(endpoint.table(), None);
        assert_eq!(endpoint.field(), "");
    }

    #[test]
    fn test_invalid_json() {
        let err = Schema::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid schema JSON"));
    }

    #[test]
    fn test_summary_counts() {
        let table = Table::new("orders")
            .column(Column::new("id", "int").primary_key())
            .column(Column::new("user_id", "int").references("users", "id"))
            .column(Column::new("note", "text"));

        let summary = table.summary();
        assert_eq!(summary.primary_keys, 1);
        assert_eq!(summary.foreign_keys, 1);
        assert_eq!(summary.columns, 3);
    }

    #[test]
    fn test_relation_round_trips_as_string() {
        let json = serde_json::to_string(&Relation::Many).unwrap();
        assert_eq!(json, r#""*""#);
    }
}
