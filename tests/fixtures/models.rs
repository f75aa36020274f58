use std::collections::HashMap;

/// gopenapi:objectSchema
#[derive(Serialize, Deserialize)]
pub struct RootModel {
    #[serde(rename = "intField")]
    pub int_field: i64,
    #[serde(rename = "stringField")]
    pub string_field: String,
    #[serde(rename = "subModels")]
    pub sub_models: Vec<Box<SubModel>>,
}

/// A nested model.
///
/// gopenapi:objectSchema
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubModel {
    pub float_field: f64,
    pub sub_sub_model: HashMap<String, Box<SubSubModel>>,
}

/// gopenapi:objectSchema
#[derive(Serialize, Deserialize)]
pub struct SubSubModel {
    #[serde(rename = "boolField")]
    pub bool_field: bool,
    pub aliased: AliasedSubs,
}

#[derive(Serialize, Deserialize)]
pub struct IgnoredModel {}

/// gopenapi:objectSchema
pub type AliasedSubs = Vec<Box<AliasedSub>>;

/// gopenapi:objectSchema
#[derive(Serialize, Deserialize)]
pub struct AliasedSub {
    #[serde(skip)]
    pub ignored_field: String,
    #[serde(rename = "timeField")]
    pub time_field: chrono::DateTime<chrono::Utc>,
}
