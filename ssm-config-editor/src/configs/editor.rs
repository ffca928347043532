use std::path::Path;

use super::{Configs, loaders::environment::env_or};

pub const DEFAULT_EDITOR: &str = "vi";

/// Editor command line taken from `EDITOR`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl EditorConfig {
    /// A value naming an existing file is taken whole, so program paths may
    /// contain spaces. Anything else is split on whitespace into program and
    /// arguments.
    pub fn parse(command: &str) -> Self {
        let trimmed = command.trim();
        if trimmed.contains(char::is_whitespace) && Path::new(trimmed).is_file() {
            return Self {
                program: trimmed.to_string(),
                args: Vec::new(),
            };
        }

        let mut parts = command.split_whitespace().map(str::to_string);
        match parts.next() {
            Some(program) => Self {
                program,
                args: parts.collect(),
            },
            None => Self::default(),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_EDITOR.to_string(),
            args: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl Configs for EditorConfig {
    async fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(EditorConfig::parse(&env_or("EDITOR", DEFAULT_EDITOR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_with_arguments() {
        let config = EditorConfig::parse("code --wait");
        assert_eq!(config.program, "code");
        assert_eq!(config.args, vec!["--wait".to_string()]);
    }

    #[test]
    fn test_parse_keeps_program_path_with_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let program = dir.path().join("My Editor");
        std::fs::write(&program, "").unwrap();
        let command = program.to_string_lossy().into_owned();

        let config = EditorConfig::parse(&command);
        assert_eq!(config.program, command);
        assert!(config.args.is_empty());

        let with_args = EditorConfig::parse(&format!("{} --wait", command));
        assert_ne!(with_args.program, command);
    }

    #[test]
    fn test_parse_blank_falls_back_to_default() {
        assert_eq!(EditorConfig::parse("  "), EditorConfig::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_defaults_to_vi() {
        unsafe {
            std::env::remove_var("EDITOR");
        }
        let config = EditorConfig::load().await.unwrap();
        assert_eq!(config.program, DEFAULT_EDITOR);
        assert!(config.args.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_reads_editor_variable() {
        unsafe {
            std::env::set_var("EDITOR", "nano");
        }
        let config = EditorConfig::load().await.unwrap();
        assert_eq!(config.program, "nano");

        unsafe {
            std::env::remove_var("EDITOR");
        }
    }
}
