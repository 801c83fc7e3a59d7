use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::hook::ParameterLocation;

/// A single RPC endpoint as declared by the source framework.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteDescriptor {
    /// Dot-separated method path, e.g. `Widget.prototype.__get__parts`.
    pub method: String,
    pub verb: String,
    /// Path template, may embed `:name` placeholders.
    pub path: String,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub accepts: Vec<ArgumentSpec>,
}

impl RouteDescriptor {
    pub fn new(
        method: impl Into<String>,
        verb: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            verb: verb.into(),
            path: path.into(),
            description: None,
            accepts: Vec::new(),
        }
    }

    pub fn with_accepts(mut self, accepts: Vec<ArgumentSpec>) -> Self {
        self.accepts = accepts;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Description::Text(description.into()));
        self
    }
}

/// Free-form description text, either one string or a list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Text(String),
    Lines(Vec<String>),
}

/// Opaque type descriptor, only interpreted by a schema builder.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct TypeDescriptor(pub serde_json::Value);

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self(serde_json::Value::String(name.into()))
    }

    pub fn array_of(name: impl Into<String>) -> Self {
        Self(serde_json::Value::Array(vec![serde_json::Value::String(
            name.into(),
        )]))
    }
}

/// One argument a route accepts.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ArgumentSpec {
    #[serde(default)]
    pub name: Option<String>,
    /// Positional identifier, used when `name` is absent.
    #[serde(default)]
    pub arg: Option<String>,
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub required: bool,
    #[serde(default)]
    pub http: HttpBinding,
    #[serde(rename = "type", default)]
    pub type_descriptor: TypeDescriptor,
}

impl ArgumentSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, type_descriptor: TypeDescriptor) -> Self {
        self.type_descriptor = type_descriptor;
        self
    }

    pub fn with_http(mut self, http: HttpBinding) -> Self {
        self.http = http;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Description::Text(description.into()));
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The documented parameter name: `name`, falling back to `arg`.
    pub fn param_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.arg.as_deref().filter(|a| !a.is_empty()))
    }
}

/// A loose boolean flag: `null` reads as `false`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// How an argument is bound to the incoming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "Option<RawHttpBinding>")]
pub enum HttpBinding {
    /// No binding declared; the location is inferred.
    #[default]
    Unbound,
    /// Computed by the framework from the request, never supplied by callers.
    Derived,
    BoundTo(ArgumentSource),
}

impl HttpBinding {
    /// Whether the argument must be left out of the documented parameters.
    pub fn is_hidden(&self) -> bool {
        match self {
            Self::Unbound => false,
            Self::Derived => true,
            Self::BoundTo(source) => source.is_framework_internal(),
        }
    }

    /// The explicit wire location, if the binding names one.
    pub fn location(&self) -> Option<ParameterLocation> {
        match self {
            Self::BoundTo(source) => source.location(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHttpBinding {
    Marker(String),
    Mapping {
        #[serde(default)]
        source: Option<String>,
    },
}

const DERIVED_MARKER: &str = "derived";

impl TryFrom<Option<RawHttpBinding>> for HttpBinding {
    type Error = String;

    fn try_from(raw: Option<RawHttpBinding>) -> Result<Self, Self::Error> {
        match raw {
            None | Some(RawHttpBinding::Mapping { source: None }) => Ok(Self::Unbound),
            Some(RawHttpBinding::Marker(marker)) if marker == DERIVED_MARKER => {
                Ok(Self::Derived)
            }
            Some(RawHttpBinding::Marker(other)) => Err(format!(
                "invalid http binding `{other}`, expected `{DERIVED_MARKER}` or a mapping with `source`"
            )),
            Some(RawHttpBinding::Mapping {
                source: Some(source),
            }) => source.parse().map(Self::BoundTo),
        }
    }
}

/// The static `http.source` an argument can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentSource {
    Req,
    Res,
    Context,
    Path,
    Query,
    Header,
    FormData,
    Body,
}

impl ArgumentSource {
    /// Bound to the framework's request, response or context objects.
    pub fn is_framework_internal(&self) -> bool {
        matches!(self, Self::Req | Self::Res | Self::Context)
    }

    pub fn location(&self) -> Option<ParameterLocation> {
        match self {
            Self::Req | Self::Res | Self::Context => None,
            Self::Path => Some(ParameterLocation::Path),
            Self::Query => Some(ParameterLocation::Query),
            Self::Header => Some(ParameterLocation::Header),
            Self::FormData => Some(ParameterLocation::FormData),
            Self::Body => Some(ParameterLocation::Body),
        }
    }
}

impl FromStr for ArgumentSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "req" => Ok(Self::Req),
            "res" => Ok(Self::Res),
            "context" => Ok(Self::Context),
            "path" => Ok(Self::Path),
            "query" => Ok(Self::Query),
            "header" => Ok(Self::Header),
            "formData" => Ok(Self::FormData),
            "body" => Ok(Self::Body),
            other => Err(format!("unknown http source `{other}`")),
        }
    }
}
