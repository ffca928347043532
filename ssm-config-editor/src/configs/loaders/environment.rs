use std::env;

pub fn optional_env(env_name: &str) -> Option<String> {
    env::var(env_name).ok().filter(|value| !value.trim().is_empty())
}

/// First variable in `env_names` that is set and non-blank.
pub fn first_env(env_names: &[&str]) -> Option<String> {
    env_names.iter().find_map(|name| optional_env(name))
}

pub fn env_or(env_name: &str, default: &str) -> String {
    optional_env(env_name).unwrap_or_else(|| default.to_string())
}
