//! Content formats a parameter value can be checked against.
//!
//! Detection and validation share the same predicates, so content is always
//! valid for the format detected from it.

use std::{fmt, str::FromStr};

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Env,
    Text,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Env => "env",
            Self::Text => "text",
        }
    }

    pub fn validate(&self, content: &[u8]) -> Result<(), FormatError> {
        match self {
            Self::Json => check_json(content).map_err(FormatError::InvalidJson),
            Self::Yaml => check_yaml_mapping(content).map_err(FormatError::InvalidYaml),
            Self::Env => check_env(content).map_err(FormatError::InvalidEnv),
            Self::Text => Ok(()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" => Ok(Self::Yaml),
            "env" => Ok(Self::Env),
            "text" => Ok(Self::Text),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    InvalidJson(String),
    InvalidYaml(String),
    InvalidEnv(String),
    UnknownFormat(String),
    /// Parameter values are strings, so staged bytes must decode as UTF-8.
    InvalidUtf8(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson(msg) => write!(f, "invalid json: {}", msg),
            Self::InvalidYaml(msg) => write!(f, "invalid yaml: {}", msg),
            Self::InvalidEnv(msg) => write!(f, "invalid env: {}", msg),
            Self::UnknownFormat(tag) => write!(
                f,
                "invalid format '{}' (expected one of: json, yaml, env, text)",
                tag
            ),
            Self::InvalidUtf8(msg) => write!(f, "content is not valid UTF-8: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

/// Guesses the format of `content`. Never fails; anything unrecognised is text.
pub fn detect_format(content: &[u8]) -> Format {
    if check_json(content).is_ok() {
        Format::Json
    } else if check_yaml_mapping(content).is_ok() {
        Format::Yaml
    } else if check_env(content).is_ok() {
        Format::Env
    } else {
        Format::Text
    }
}

/// Validates `content` against a format tag, matched case-insensitively.
pub fn validate_format(content: &[u8], format: &str) -> Result<(), FormatError> {
    format.parse::<Format>()?.validate(content)
}

fn check_json(content: &[u8]) -> Result<(), String> {
    serde_json::from_slice::<IgnoredAny>(content)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

// The first document must be a mapping with scalar keys. Later documents and
// repeated keys are not checked. Empty, scalar and sequence documents are rejected.
fn check_yaml_mapping(content: &[u8]) -> Result<(), String> {
    let document = serde_yaml::Deserializer::from_slice(content)
        .next()
        .ok_or_else(|| "empty document".to_string())?;
    YamlMapping::deserialize(document)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

struct YamlMapping;

impl<'de> Deserialize<'de> for YamlMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(YamlMappingVisitor)
    }
}

struct YamlMappingVisitor;

impl<'de> Visitor<'de> for YamlMappingVisitor {
    type Value = YamlMapping;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<ScalarKey, IgnoredAny>()?.is_some() {}
        Ok(YamlMapping)
    }
}

/// Any scalar mapping key: string, number, boolean or null.
struct ScalarKey;

impl<'de> Deserialize<'de> for ScalarKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarKeyVisitor)
    }
}

struct ScalarKeyVisitor;

impl<'de> Visitor<'de> for ScalarKeyVisitor {
    type Value = ScalarKey;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }

    fn visit_i128<E: de::Error>(self, _: i128) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }

    fn visit_u128<E: de::Error>(self, _: u128) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(ScalarKey)
    }
}

fn check_env(content: &[u8]) -> Result<(), String> {
    let text = String::from_utf8_lossy(content);
    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if !line.contains('=') {
            return Err(format!("line {} has no '=': {}", index + 1, trimmed));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_json_object() {
        assert_eq!(detect_format(b"{}"), Format::Json);
    }

    #[test]
    fn test_detect_json_scalar_and_array() {
        assert_eq!(detect_format(b"42"), Format::Json);
        assert_eq!(detect_format(b"[1, 2, 3]"), Format::Json);
        assert_eq!(detect_format(br#""quoted""#), Format::Json);
    }

    #[test]
    fn test_detect_yaml_mapping() {
        assert_eq!(detect_format(b"a: 1\nb: 2"), Format::Yaml);
    }

    #[test]
    fn test_detect_nested_yaml_mapping() {
        let content = b"server:\n  port: 8080\n  hosts:\n    - a\n    - b\n";
        assert_eq!(detect_format(content), Format::Yaml);
    }

    #[test]
    fn test_detect_yaml_with_non_string_scalar_keys() {
        assert_eq!(detect_format(b"1: a\n2: b"), Format::Yaml);
        assert_eq!(detect_format(b"8080: web\n200: ok"), Format::Yaml);
        assert_eq!(detect_format(b"~: x"), Format::Yaml);
        assert_eq!(detect_format(b"true: yes\n1.5: half"), Format::Yaml);
    }

    #[test]
    fn test_yaml_reads_only_the_first_document() {
        assert_eq!(detect_format(b"a: 1\n---\nb: 2"), Format::Yaml);
        assert!(validate_format(b"a: 1\n---\nb: 2\n", "yaml").is_ok());
        assert_eq!(detect_format(b"- a\n---\nb: 2"), Format::Text);
    }

    #[test]
    fn test_yaml_tolerates_duplicate_keys() {
        assert_eq!(detect_format(b"a: 1\na: 2"), Format::Yaml);
        assert!(validate_format(b"a: 1\na: 2", "yaml").is_ok());
    }

    #[test]
    fn test_yaml_rejects_collection_keys() {
        assert!(matches!(
            validate_format(b"? [a, b]\n: x\n", "yaml"),
            Err(FormatError::InvalidYaml(_))
        ));
    }

    #[test]
    fn test_yaml_sequence_is_not_yaml() {
        assert_eq!(detect_format(b"- a\n- b\n"), Format::Text);
        assert!(matches!(
            validate_format(b"- a\n- b\n", "yaml"),
            Err(FormatError::InvalidYaml(_))
        ));
    }

    #[test]
    fn test_detect_env() {
        assert_eq!(detect_format(b"A=1\nB=2"), Format::Env);
    }

    #[test]
    fn test_detect_env_with_comments_and_blank_lines() {
        let content = b"# database\nDB_HOST=localhost\n\n   # indented comment\nDB_PORT=5432\n";
        assert_eq!(detect_format(content), Format::Env);
    }

    #[test]
    fn test_detect_text() {
        assert_eq!(detect_format(b"hello world"), Format::Text);
    }

    #[test]
    fn test_detect_empty_is_env() {
        assert_eq!(detect_format(b""), Format::Env);
        assert_eq!(detect_format(b"\n\n# only a comment\n"), Format::Env);
    }

    #[test]
    fn test_detect_invalid_utf8_is_text() {
        assert_eq!(detect_format(&[0xff, 0xfe, 0x00]), Format::Text);
    }

    #[test]
    fn test_detected_format_always_validates() {
        let samples: Vec<&[u8]> = vec![
            &b""[..],
            &b"{}"[..],
            &b"{\"a\": [1, 2]}"[..],
            &b"null"[..],
            &b"a: 1\nb: 2"[..],
            &b"A=1\nB=2"[..],
            &b"# comment\nA=1"[..],
            &b"hello world"[..],
            &b"- a\n- b"[..],
            &b"just a scalar"[..],
            &b"key: value\nbroken line without colon or equals"[..],
            &b"A=1\nnot env"[..],
            &[0xff, 0xfe][..],
            &b"\t\n  \n"[..],
            &b"1: a\n2: b"[..],
            &b"a: 1\n---\nb: 2"[..],
            &b"a: 1\na: 2"[..],
            &b"? [a, b]\n: x\n"[..],
        ];

        for sample in samples {
            let format = detect_format(sample);
            assert!(
                validate_format(sample, format.as_str()).is_ok(),
                "detected {} but validation failed for {:?}",
                format,
                String::from_utf8_lossy(sample)
            );
        }
    }

    #[test]
    fn test_validate_invalid_json() {
        assert!(matches!(
            validate_format(b"not json", "json"),
            Err(FormatError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        assert!(validate_format(b"A=1", "ENV").is_ok());
        assert!(validate_format(b"{}", "Json").is_ok());
        assert!(validate_format(b"a: 1", "YAML").is_ok());
    }

    #[test]
    fn test_validate_unknown_format() {
        assert_eq!(
            validate_format(b"anything", "bogus"),
            Err(FormatError::UnknownFormat("bogus".to_string()))
        );
        assert!(matches!(
            validate_format(b"anything", ""),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_validate_env_reports_offending_line() {
        let err = validate_format(b"A=1\nB\nC=3", "env").unwrap_err();
        assert!(matches!(err, FormatError::InvalidEnv(_)));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_validate_text_accepts_anything() {
        assert!(validate_format(b"", "text").is_ok());
        assert!(validate_format(&[0xff], "TEXT").is_ok());
    }

    #[test]
    fn test_format_round_trips_through_display() {
        for format in [Format::Json, Format::Yaml, Format::Env, Format::Text] {
            assert_eq!(format.to_string().parse::<Format>().unwrap(), format);
        }
    }
}
