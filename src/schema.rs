use crate::declaration::{Field, FieldTag, TypeBody, TypeRef};
use crate::openapi::ExternalDocumentation;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of every reference to a component schema
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// OpenAPI Schema definition
///
/// Each node has exactly one shape. On the wire it uses the usual OpenAPI keywords
/// (`$ref`, `type`, `format`, `properties`, `items`, `additionalProperties`); every other
/// keyword of a hand-written schema is kept in [`SchemaKeywords`] through
/// [`Schema::Annotated`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSchema", into = "RawSchema")]
pub enum Schema {
    /// Reference to another schema
    Ref(String),
    Primitive {
        schema_type: PrimitiveType,
        format: Option<String>,
    },
    Object {
        properties: BTreeMap<String, Schema>,
        additional_properties: Option<AdditionalProperties>,
    },
    /// `items` may be left out of a hand-written array schema
    Array { items: Option<Box<Schema>> },
    /// The empty schema, matching any value
    Any,
    /// A shape together with the keywords written next to it.
    ///
    /// Decoding only produces it for a non-empty keyword set and never nests it.
    Annotated {
        schema: Box<Schema>,
        keywords: Box<SchemaKeywords>,
    },
}

/// The non-container values of the `type` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Boolean,
    Integer,
    Number,
    String,
}

impl PrimitiveType {
    fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Number => "number",
            PrimitiveType::String => "string",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "boolean" => Some(PrimitiveType::Boolean),
            "integer" => Some(PrimitiveType::Integer),
            "number" => Some(PrimitiveType::Number),
            "string" => Some(PrimitiveType::String),
            _ => None,
        }
    }
}

/// `additionalProperties` is either a schema or a boolean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<Schema>),
}

/// Schema keywords that do not decide the shape of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaKeywords {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    #[serde(rename = "readOnly", default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    #[serde(rename = "writeOnly", default, skip_serializing_if = "std::ops::Not::not")]
    pub write_only: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<Schema>,
    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<Schema>,
    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xml: Option<Xml>,
    #[serde(rename = "externalDocs", default, skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    /// Everything else (`title`, `minimum`, `pattern`, `x-` extensions, ...), verbatim
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl SchemaKeywords {
    pub fn is_empty(&self) -> bool {
        *self == SchemaKeywords::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName", default)]
    pub property_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Xml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub attribute: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wrapped: bool,
}

/// Wire form of a schema node
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawSchema {
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    properties: Option<BTreeMap<String, Schema>>,
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    additional_properties: Option<AdditionalProperties>,
    #[serde(flatten)]
    keywords: SchemaKeywords,
}

/// Keeps a shape keyword the chosen shape has no slot for
fn stash<T: Serialize>(
    keywords: &mut SchemaKeywords,
    key: &str,
    value: Option<T>,
) -> Result<(), String> {
    if let Some(value) = value {
        let value = serde_json::to_value(value).map_err(|e| e.to_string())?;
        keywords.other.insert(key.to_string(), value);
    }
    Ok(())
}

impl TryFrom<RawSchema> for Schema {
    type Error = String;

    fn try_from(raw: RawSchema) -> Result<Self, Self::Error> {
        let RawSchema {
            reference,
            schema_type,
            format,
            items,
            properties,
            additional_properties,
            mut keywords,
        } = raw;

        let schema = if let Some(reference) = reference {
            stash(&mut keywords, "type", schema_type)?;
            stash(&mut keywords, "format", format)?;
            stash(&mut keywords, "items", items)?;
            stash(&mut keywords, "properties", properties)?;
            stash(&mut keywords, "additionalProperties", additional_properties)?;
            Schema::Ref(reference)
        } else {
            match schema_type.as_deref() {
                Some("array") => {
                    stash(&mut keywords, "format", format)?;
                    stash(&mut keywords, "properties", properties)?;
                    stash(&mut keywords, "additionalProperties", additional_properties)?;
                    Schema::Array { items }
                }
                Some("object") => {
                    stash(&mut keywords, "format", format)?;
                    stash(&mut keywords, "items", items)?;
                    Schema::Object {
                        properties: properties.unwrap_or_default(),
                        additional_properties,
                    }
                }
                Some(other) => {
                    let schema_type = PrimitiveType::parse(other)
                        .ok_or_else(|| format!("unknown schema type `{}`", other))?;
                    stash(&mut keywords, "items", items)?;
                    stash(&mut keywords, "properties", properties)?;
                    stash(&mut keywords, "additionalProperties", additional_properties)?;
                    Schema::Primitive {
                        schema_type,
                        format,
                    }
                }
                None if properties.is_some() || additional_properties.is_some() => {
                    stash(&mut keywords, "format", format)?;
                    stash(&mut keywords, "items", items)?;
                    Schema::Object {
                        properties: properties.unwrap_or_default(),
                        additional_properties,
                    }
                }
                None if items.is_some() => {
                    stash(&mut keywords, "format", format)?;
                    Schema::Array { items }
                }
                None => {
                    stash(&mut keywords, "format", format)?;
                    Schema::Any
                }
            }
        };

        Ok(schema.annotate(keywords))
    }
}

impl From<Schema> for RawSchema {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::Ref(reference) => RawSchema {
                reference: Some(reference),
                ..Default::default()
            },
            Schema::Primitive {
                schema_type,
                format,
            } => RawSchema {
                schema_type: Some(schema_type.as_str().to_string()),
                format,
                ..Default::default()
            },
            Schema::Object {
                properties,
                additional_properties,
            } => RawSchema {
                schema_type: Some("object".to_string()),
                properties: (!properties.is_empty()).then_some(properties),
                additional_properties,
                ..Default::default()
            },
            Schema::Array { items } => RawSchema {
                schema_type: Some("array".to_string()),
                items,
                ..Default::default()
            },
            Schema::Any => RawSchema::default(),
            Schema::Annotated { schema, keywords } => RawSchema {
                keywords: *keywords,
                ..RawSchema::from(*schema)
            },
        }
    }
}

impl Schema {
    /// A reference to the component schema named `name`
    pub fn reference(name: &str) -> Self {
        Schema::Ref(format!("{}{}", SCHEMA_REF_PREFIX, name))
    }

    pub fn array_of(items: Schema) -> Self {
        Schema::Array {
            items: Some(Box::new(items)),
        }
    }

    fn primitive(schema_type: PrimitiveType, format: Option<&str>) -> Self {
        Schema::Primitive {
            schema_type,
            format: format.map(str::to_string),
        }
    }

    /// Attaches keywords, leaving the schema bare when there are none.
    pub fn annotate(self, keywords: SchemaKeywords) -> Self {
        if keywords.is_empty() {
            self
        } else {
            Schema::Annotated {
                schema: Box::new(self),
                keywords: Box::new(keywords),
            }
        }
    }
}

/// Looks a type name up in the fixed primitive table.
///
/// Names are matched verbatim, qualified names in their `package.name` spelling.
pub fn primitive_schema(type_name: &str) -> Option<Schema> {
    let (schema_type, format) = match type_name {
        "bool" => (PrimitiveType::Boolean, None),
        "int" | "int64" | "i64" | "isize" | "u64" | "usize" | "i128" | "u128" => {
            (PrimitiveType::Integer, Some("int64"))
        }
        "int32" | "time.Month" | "i32" | "u32" | "i16" | "u16" | "i8" | "u8" => {
            (PrimitiveType::Integer, Some("int32"))
        }
        "float" | "float64" | "f64" => (PrimitiveType::Number, Some("double")),
        "float32" | "f32" => (PrimitiveType::Number, Some("float")),
        "string" | "String" | "str" | "char" => (PrimitiveType::String, None),
        "time.Time"
        | "time.OffsetDateTime"
        | "time.PrimitiveDateTime"
        | "chrono.DateTime"
        | "chrono.NaiveDateTime" => (PrimitiveType::String, Some("date-time")),
        _ => return None,
    };
    Some(Schema::primitive(schema_type, format))
}

/// Lower-cases the first character and leaves the rest untouched.
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Maps a type reference to its schema.
///
/// Names missing from the primitive table become references to the component schema
/// of the same name with its first character lower-cased.
pub fn schema_for_type(ty: &TypeRef) -> Schema {
    match ty {
        TypeRef::Named(name) => {
            primitive_schema(name).unwrap_or_else(|| Schema::reference(&lower_first(name)))
        }
        TypeRef::Qualified { package, name } => {
            primitive_schema(&format!("{}.{}", package, name))
                .or_else(|| primitive_schema(name))
                .unwrap_or_else(|| Schema::reference(&lower_first(name)))
        }
        TypeRef::Sequence(elem) => Schema::array_of(schema_for_type(elem.pointee())),
        TypeRef::Map { value, .. } => Schema::Object {
            properties: BTreeMap::new(),
            additional_properties: Some(AdditionalProperties::Schema(Box::new(
                schema_for_type(value.pointee()),
            ))),
        },
        TypeRef::Pointer(inner) => schema_for_type(inner),
        TypeRef::Unsupported(kind) => {
            debug!("No schema for {} type, leaving it open", kind);
            Schema::Any
        }
    }
}

/// Property key of a field in the serialized object, `None` when it is omitted.
pub fn serialization_name(field: &Field) -> Option<String> {
    let name = match &field.tag {
        Some(FieldTag::Rename(name)) => name.clone(),
        Some(FieldTag::Omit) => String::new(),
        None => lower_first(&field.name),
    };
    (!name.is_empty()).then_some(name)
}

/// Derives the schema of a type declaration from its shape.
pub fn schema_for_body(body: &TypeBody) -> Schema {
    match body {
        TypeBody::Fields(fields) => {
            let mut properties = BTreeMap::new();
            for field in fields {
                let Some(key) = serialization_name(field) else {
                    debug!("Field {} is omitted from serialization", field.name);
                    continue;
                };
                properties.insert(key, schema_for_type(&field.ty));
            }
            Schema::Object {
                properties,
                additional_properties: None,
            }
        }
        TypeBody::Elements(elem) => Schema::array_of(schema_for_type(elem.pointee())),
        TypeBody::Alias(target) => schema_for_type(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn named(name: &str) -> TypeRef {
        TypeRef::Named(name.to_string())
    }

    fn pointer(ty: TypeRef) -> TypeRef {
        TypeRef::Pointer(Box::new(ty))
    }

    fn field(name: &str, ty: TypeRef, tag: Option<FieldTag>) -> Field {
        Field {
            name: name.to_string(),
            ty,
            tag,
        }
    }

    fn primitive(schema_type: PrimitiveType, format: Option<&str>) -> Schema {
        Schema::primitive(schema_type, format)
    }

    #[test]
    fn test_primitive_table() {
        let table = vec![
            ("bool", primitive(PrimitiveType::Boolean, None)),
            ("int", primitive(PrimitiveType::Integer, Some("int64"))),
            ("int64", primitive(PrimitiveType::Integer, Some("int64"))),
            ("i64", primitive(PrimitiveType::Integer, Some("int64"))),
            ("usize", primitive(PrimitiveType::Integer, Some("int64"))),
            ("int32", primitive(PrimitiveType::Integer, Some("int32"))),
            ("time.Month", primitive(PrimitiveType::Integer, Some("int32"))),
            ("u8", primitive(PrimitiveType::Integer, Some("int32"))),
            ("float", primitive(PrimitiveType::Number, Some("double"))),
            ("float64", primitive(PrimitiveType::Number, Some("double"))),
            ("f64", primitive(PrimitiveType::Number, Some("double"))),
            ("float32", primitive(PrimitiveType::Number, Some("float"))),
            ("f32", primitive(PrimitiveType::Number, Some("float"))),
            ("string", primitive(PrimitiveType::String, None)),
            ("String", primitive(PrimitiveType::String, None)),
            ("time.Time", primitive(PrimitiveType::String, Some("date-time"))),
            ("chrono.DateTime", primitive(PrimitiveType::String, Some("date-time"))),
        ];

        for (type_name, expected) in table {
            assert_eq!(primitive_schema(type_name), Some(expected), "{}", type_name);
        }
    }

    #[test]
    fn test_unlisted_names_become_references() {
        for name in ["SubModel", "subModel", "Uuid", "Decimal", "Ümlaut"] {
            assert_eq!(
                schema_for_type(&named(name)),
                Schema::Ref(format!("#/components/schemas/{}", lower_first(name)))
            );
        }
        assert_eq!(lower_first("SubModel"), "subModel");
        assert_eq!(lower_first("URLPath"), "uRLPath");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_qualified_names() {
        let qualified = |package: &str, name: &str| TypeRef::Qualified {
            package: package.to_string(),
            name: name.to_string(),
        };

        assert_eq!(
            schema_for_type(&qualified("time", "Time")),
            primitive(PrimitiveType::String, Some("date-time"))
        );
        assert_eq!(
            schema_for_type(&qualified("time", "Month")),
            primitive(PrimitiveType::Integer, Some("int32"))
        );
        assert_eq!(
            schema_for_type(&qualified("string", "String")),
            primitive(PrimitiveType::String, None)
        );
        assert_eq!(
            schema_for_type(&qualified("models", "User")),
            Schema::reference("user")
        );
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            schema_for_type(&TypeRef::Sequence(Box::new(pointer(named("SubModel"))))),
            Schema::array_of(Schema::reference("subModel"))
        );
        assert_eq!(
            schema_for_type(&TypeRef::Map {
                key: Box::new(named("String")),
                value: Box::new(pointer(named("SubSubModel"))),
            }),
            Schema::Object {
                properties: BTreeMap::new(),
                additional_properties: Some(AdditionalProperties::Schema(Box::new(
                    Schema::reference("subSubModel")
                ))),
            }
        );
        assert_eq!(
            schema_for_type(&pointer(named("f32"))),
            primitive(PrimitiveType::Number, Some("float"))
        );
        assert_eq!(
            schema_for_type(&TypeRef::Unsupported("tuple".to_string())),
            Schema::Any
        );
    }

    #[test]
    fn test_field_name_derivation() {
        assert_eq!(
            serialization_name(&field(
                "IntField",
                named("int64"),
                Some(FieldTag::Rename("renamed".to_string()))
            )),
            Some("renamed".to_string())
        );
        assert_eq!(
            serialization_name(&field("IgnoredField", named("string"), Some(FieldTag::Omit))),
            None
        );
        assert_eq!(
            serialization_name(&field("TimeField", named("string"), None)),
            Some("timeField".to_string())
        );
        assert_eq!(
            serialization_name(&field("snake_case", named("string"), None)),
            Some("snake_case".to_string())
        );
        assert_eq!(
            serialization_name(&field(
                "Empty",
                named("string"),
                Some(FieldTag::Rename(String::new()))
            )),
            None
        );
    }

    #[test]
    fn test_root_model_scenario() {
        let body = TypeBody::Fields(vec![
            field(
                "IntField",
                named("int64"),
                Some(FieldTag::Rename("intField".to_string())),
            ),
            field(
                "SubModels",
                TypeRef::Sequence(Box::new(pointer(named("SubModel")))),
                Some(FieldTag::Rename("subModels".to_string())),
            ),
            field("Hidden", named("string"), Some(FieldTag::Omit)),
        ]);

        let schema = schema_for_body(&body);

        let Schema::Object { properties, .. } = &schema else {
            panic!("Expected object schema, got {:?}", schema);
        };
        assert_eq!(properties.len(), 2);
        assert_eq!(
            properties["intField"],
            primitive(PrimitiveType::Integer, Some("int64"))
        );
        assert_eq!(
            properties["subModels"],
            Schema::array_of(Schema::reference("subModel"))
        );
    }

    #[test]
    fn test_element_and_alias_bodies() {
        assert_eq!(
            schema_for_body(&TypeBody::Elements(pointer(named("AliasedSub")))),
            Schema::array_of(Schema::reference("aliasedSub"))
        );
        assert_eq!(
            schema_for_body(&TypeBody::Alias(named("i64"))),
            primitive(PrimitiveType::Integer, Some("int64"))
        );
    }

    #[test]
    fn test_schema_wire_format() {
        let schema = Schema::Object {
            properties: BTreeMap::from([
                (
                    "subModels".to_string(),
                    Schema::array_of(Schema::reference("subModel")),
                ),
                (
                    "lookup".to_string(),
                    Schema::Object {
                        properties: BTreeMap::new(),
                        additional_properties: Some(AdditionalProperties::Schema(Box::new(
                            Schema::reference("child")
                        ))),
                    },
                ),
            ]),
            additional_properties: None,
        };

        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "object",
                "properties": {
                    "lookup": {
                        "type": "object",
                        "additionalProperties": { "$ref": "#/components/schemas/child" }
                    },
                    "subModels": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/subModel" }
                    }
                }
            })
        );
    }

    #[test]
    fn test_decode_user_written_schemas() {
        let decode = |yaml: &str| serde_yaml::from_str::<Schema>(yaml);

        assert_eq!(
            decode("type: string\nformat: uuid").unwrap(),
            primitive(PrimitiveType::String, Some("uuid"))
        );
        assert_eq!(
            decode("additionalProperties: true").unwrap(),
            Schema::Object {
                properties: BTreeMap::new(),
                additional_properties: Some(AdditionalProperties::Allowed(true)),
            }
        );
        assert_eq!(
            decode("type: object\nadditionalProperties: false").unwrap(),
            Schema::Object {
                properties: BTreeMap::new(),
                additional_properties: Some(AdditionalProperties::Allowed(false)),
            }
        );
        assert_eq!(decode("type: array").unwrap(), Schema::Array { items: None });
        assert_eq!(decode("{}").unwrap(), Schema::Any);
        assert!(decode("type: tuple").is_err());
    }

    #[test]
    fn test_user_written_keywords_survive_serialization() {
        let yaml = r#"
type: object
description: A thing
required: [id]
properties:
  id:
    type: integer
    minimum: 1
  kind:
    type: string
    enum: [a, b]
    nullable: true
  any:
    oneOf:
    - type: string
    - $ref: '#/components/schemas/user'
x-internal: true
"#;

        let schema: Schema = serde_yaml::from_str(yaml).unwrap();

        let Schema::Annotated { schema: shape, keywords } = &schema else {
            panic!("Expected annotated schema, got {:?}", schema);
        };
        assert!(matches!(**shape, Schema::Object { .. }));
        assert_eq!(keywords.description.as_deref(), Some("A thing"));
        assert_eq!(keywords.required, vec!["id".to_string()]);
        assert_eq!(keywords.other["x-internal"], serde_json::json!(true));

        let expected = serde_json::json!({
            "type": "object",
            "description": "A thing",
            "required": ["id"],
            "properties": {
                "id": { "type": "integer", "minimum": 1 },
                "kind": { "type": "string", "enum": ["a", "b"], "nullable": true },
                "any": {
                    "oneOf": [
                        { "type": "string" },
                        { "$ref": "#/components/schemas/user" }
                    ]
                }
            },
            "x-internal": true
        });
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json, expected);
        assert_eq!(serde_json::from_value::<Schema>(json).unwrap(), schema);
    }

    #[test]
    fn test_keywords_beside_ref_are_kept() {
        let yaml = "$ref: '#/components/schemas/user'\ndescription: The owner\ntype: object";

        let schema: Schema = serde_yaml::from_str(yaml).unwrap();

        let mut keywords = SchemaKeywords {
            description: Some("The owner".to_string()),
            ..SchemaKeywords::default()
        };
        keywords
            .other
            .insert("type".to_string(), serde_json::json!("object"));
        assert_eq!(
            schema,
            Schema::reference("user").annotate(keywords)
        );
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            serde_json::json!({
                "$ref": "#/components/schemas/user",
                "description": "The owner",
                "type": "object"
            })
        );
    }
}
