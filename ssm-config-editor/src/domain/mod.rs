use chrono::{DateTime, Utc};
use std::{fmt, str::FromStr};

/// Values above this many bytes need the advanced storage tier.
pub const STANDARD_TIER_MAX_BYTES: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ParameterName(String);

impl ParameterName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl fmt::Display for ParameterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParameterName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterType {
    #[default]
    String,
    StringList,
    SecureString,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::StringList => "StringList",
            Self::SecureString => "SecureString",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "StringList" => Ok(Self::StringList),
            "SecureString" => Ok(Self::SecureString),
            other => Err(format!("Unsupported parameter type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterTier {
    #[default]
    Standard,
    Advanced,
}

impl ParameterTier {
    pub fn for_content_len(len: usize) -> Self {
        if len > STANDARD_TIER_MAX_BYTES {
            Self::Advanced
        } else {
            Self::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for ParameterTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter as returned by the store, value already decrypted when asked.
#[derive(Clone, PartialEq)]
pub struct Parameter {
    name: ParameterName,
    value: String,
    param_type: ParameterType,
    version: i64,
    last_modified: Option<DateTime<Utc>>,
}

impl Parameter {
    pub fn new(
        name: ParameterName,
        value: impl Into<String>,
        param_type: ParameterType,
        version: i64,
    ) -> Self {
        Self {
            name,
            value: value.into(),
            param_type,
            version,
            last_modified: None,
        }
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    pub fn name(&self) -> &ParameterName {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn param_type(&self) -> ParameterType {
        self.param_type
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    pub fn metadata(&self) -> ParameterMetadata {
        ParameterMetadata {
            name: self.name.clone(),
            version: self.version,
            last_modified: self.last_modified,
        }
    }
}

// Values can be secrets, keep them out of debug output and logs.
impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("type", &self.param_type)
            .field("version", &self.version)
            .field("value_len", &self.value.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMetadata {
    pub name: ParameterName,
    pub version: i64,
    pub last_modified: Option<DateTime<Utc>>,
}
