use crate::utils::text::{UNDEFINED, or_undefined};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Custom deserializer: pulls the record id out of the store's `{"@ref": {"id": ..}}` wrapper
fn deserialize_ref_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = value
        .get("@ref")
        .and_then(|inner| inner.get("id"))
        .or_else(|| value.get("id"));

    Ok(match id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => format_number(n),
        _ => UNDEFINED.to_string(),
    })
}

fn undefined_id() -> String {
    UNDEFINED.to_string()
}

/// Any non-object `data` (including `null`) reads as an empty field set.
fn deserialize_fields<'de, D>(deserializer: D) -> Result<PersonaFields, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => PersonaFields::deserialize(value).map_err(D::Error::custom),
        _ => Ok(PersonaFields::default()),
    }
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => Address::deserialize(value)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

/// Text fields accept any JSON value; non-strings are stringified.
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(value) => Some(stringify(&value)),
    })
}

/// Whole floats print without a fraction (`2.0` is `2`).
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Markup stringification: lists join with `,`, `null` is empty, objects
/// become `[object Object]`.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Object(_) => OBJECT_TEXT.to_string(),
    }
}

const OBJECT_TEXT: &str = "[object Object]";

/// One persona as served by the gateway.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    #[serde(
        rename = "ref",
        deserialize_with = "deserialize_ref_id",
        default = "undefined_id"
    )]
    pub id: String,
    #[serde(rename = "data", default, deserialize_with = "deserialize_fields")]
    pub fields: PersonaFields,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PersonaFields {
    #[serde(rename = "nombre", default, deserialize_with = "deserialize_text")]
    pub name: Option<String>,
    #[serde(rename = "apellido", default, deserialize_with = "deserialize_text")]
    pub surname: Option<String>,
    #[serde(rename = "direccion", default, deserialize_with = "deserialize_address")]
    pub address: Option<Address>,
    #[serde(rename = "aniosParticipacionMundial", default)]
    pub years_of_participation: Option<FieldValue>,
    #[serde(rename = "numeroParticipacionesOlimpicas", default)]
    pub olympic_appearances: Option<FieldValue>,
    #[serde(rename = "tipo", default, deserialize_with = "deserialize_text")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Address {
    #[serde(rename = "calle", default, deserialize_with = "deserialize_text")]
    pub street: Option<String>,
    #[serde(rename = "localidad", default, deserialize_with = "deserialize_text")]
    pub city: Option<String>,
    #[serde(rename = "provincia", default, deserialize_with = "deserialize_text")]
    pub region: Option<String>,
    #[serde(rename = "pais", default, deserialize_with = "deserialize_text")]
    pub country: Option<String>,
}

/// A loosely typed scalar or list, as the numeric persona fields arrive
/// either as a number, a numeric string or a list of years.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Number(Number),
    Text(String),
    Bool(bool),
    List(Vec<FieldValue>),
    Object(serde_json::Map<String, Value>),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Number(n) => f.write_str(&format_number(n)),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            FieldValue::Object(_) => f.write_str(OBJECT_TEXT),
        }
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(n.into())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl FieldValue {
    /// Each element of a list, or the value itself for scalars.
    pub fn elements(&self) -> Vec<String> {
        match self {
            FieldValue::List(items) => items.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

/// Addressable persona fields, resolvable from one- or two-level paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    Surname,
    Address,
    Street,
    City,
    Region,
    Country,
    Years,
    Appearances,
    Category,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::Id,
        Field::Name,
        Field::Surname,
        Field::Address,
        Field::Street,
        Field::City,
        Field::Region,
        Field::Country,
        Field::Years,
        Field::Appearances,
        Field::Category,
    ];

    /// Canonical dotted path
    pub fn path(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Surname => "surname",
            Field::Address => "address",
            Field::Street => "address.street",
            Field::City => "address.city",
            Field::Region => "address.region",
            Field::Country => "address.country",
            Field::Years => "yearsOfParticipation",
            Field::Appearances => "olympicAppearances",
            Field::Category => "category",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown field path '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts the canonical paths and the gateway's own field names.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let mut parts = path.trim().split('.');
        let head = parts.next().unwrap_or_default();
        let tail = parts.next();
        if parts.next().is_some() {
            return Err(UnknownField(path.to_string()));
        }

        let field = match (head, tail) {
            ("id", None) => Field::Id,
            ("name" | "nombre", None) => Field::Name,
            ("surname" | "apellido", None) => Field::Surname,
            ("address" | "direccion", None) => Field::Address,
            ("address" | "direccion", Some("street" | "calle")) => Field::Street,
            ("address" | "direccion", Some("city" | "localidad")) => Field::City,
            ("address" | "direccion", Some("region" | "provincia")) => Field::Region,
            ("address" | "direccion", Some("country" | "pais")) => Field::Country,
            ("yearsOfParticipation" | "years" | "aniosParticipacionMundial", None) => Field::Years,
            (
                "olympicAppearances" | "appearances" | "numeroParticipacionesOlimpicas",
                None,
            ) => Field::Appearances,
            ("category" | "tipo", None) => Field::Category,
            _ => return Err(UnknownField(path.to_string())),
        };

        Ok(field)
    }
}

impl Record {
    pub fn new(id: impl Into<String>, fields: PersonaFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Stringified field value, `None` when the field is absent.
    pub fn value(&self, field: Field) -> Option<String> {
        let f = &self.fields;
        let address = f.address.as_ref();
        match field {
            Field::Id => Some(self.id.clone()),
            Field::Name => f.name.clone(),
            Field::Surname => f.surname.clone(),
            Field::Address => address.map(|a| {
                format!(
                    "{},{},{},{}",
                    or_undefined(a.street.as_deref()),
                    or_undefined(a.city.as_deref()),
                    or_undefined(a.region.as_deref()),
                    or_undefined(a.country.as_deref())
                )
            }),
            Field::Street => address.and_then(|a| a.street.clone()),
            Field::City => address.and_then(|a| a.city.clone()),
            Field::Region => address.and_then(|a| a.region.clone()),
            Field::Country => address.and_then(|a| a.country.clone()),
            Field::Years => f.years_of_participation.as_ref().map(ToString::to_string),
            Field::Appearances => f.olympic_appearances.as_ref().map(ToString::to_string),
            Field::Category => f.category.clone(),
        }
    }

    /// Field value as rendered in markup: absent fields become `"undefined"`.
    pub fn display(&self, field: Field) -> String {
        or_undefined(self.value(field))
    }

    /// Individual elements of a field; list-valued fields expand to one entry per item.
    pub fn elements(&self, field: Field) -> Vec<String> {
        let list = match field {
            Field::Years => self.fields.years_of_participation.as_ref(),
            Field::Appearances => self.fields.olympic_appearances.as_ref(),
            _ => None,
        };
        match list {
            Some(value) => value.elements(),
            None => self.value(field).into_iter().collect(),
        }
    }
}

/// Envelope of the all-records endpoint
#[derive(Debug, Deserialize)]
pub struct CollectionEnvelope {
    pub data: Vec<Record>,
}

/// Home/About payload of the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "autor")]
    pub author: String,
    pub email: String,
    #[serde(rename = "fecha")]
    pub date: String,
}

impl SiteInfo {
    pub const FALLBACK_MESSAGE: &'static str = "Downloaded data is not valid";

    /// The constant shown whenever a payload is absent or malformed.
    pub fn fallback() -> Self {
        Self {
            message: Self::FALLBACK_MESSAGE.to_string(),
            author: String::new(),
            email: String::new(),
            date: String::new(),
        }
    }

    /// Home only needs `mensaje`; anything else falls back.
    pub fn from_home_payload(payload: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = payload else {
            return Self::fallback();
        };
        match map.get("mensaje") {
            Some(message) => Self {
                message: stringify(message),
                ..Self::fallback()
            },
            None => Self::fallback(),
        }
    }

    /// About needs all of `mensaje`, `autor`, `email` and `fecha`.
    pub fn from_about_payload(payload: Option<&Value>) -> Self {
        let Some(Value::Object(map)) = payload else {
            return Self::fallback();
        };
        match (
            map.get("mensaje"),
            map.get("autor"),
            map.get("email"),
            map.get("fecha"),
        ) {
            (Some(message), Some(author), Some(email), Some(date)) => Self {
                message: stringify(message),
                author: stringify(author),
                email: stringify(email),
                date: stringify(date),
            },
            _ => Self::fallback(),
        }
    }
}
