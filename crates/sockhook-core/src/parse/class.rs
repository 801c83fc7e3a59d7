use serde::Deserialize;

use super::route::ArgumentSpec;

/// The model/class that owns a set of routes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    /// Constructor-level arguments shared by the class's instance methods.
    #[serde(rename = "sharedCtor", default)]
    pub shared_ctor: Option<SharedCtor>,
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared_ctor: None,
        }
    }

    pub fn with_shared_ctor(mut self, accepts: Vec<ArgumentSpec>) -> Self {
        self.shared_ctor = Some(SharedCtor { accepts });
        self
    }

    pub fn shared_accepts(&self) -> Option<&[ArgumentSpec]> {
        self.shared_ctor.as_ref().map(|ctor| ctor.accepts.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SharedCtor {
    #[serde(default)]
    pub accepts: Vec<ArgumentSpec>,
}
