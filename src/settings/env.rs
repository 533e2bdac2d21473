//! Environment-variable overrides.

use std::collections::HashMap;

/// Where override values come from.
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Parse a setting from its raw environment string.
pub trait EnvValue: Sized {
    fn parse_env(raw: &str) -> Option<Self>;
}

impl EnvValue for String {
    fn parse_env(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl EnvValue for Option<String> {
    fn parse_env(raw: &str) -> Option<Self> {
        Some(Some(raw.to_string()))
    }
}

impl EnvValue for bool {
    fn parse_env(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

/// Lists are given as a JSON array: `["a", "b"]`.
impl EnvValue for Vec<String> {
    fn parse_env(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

macro_rules! env_value_from_str {
    ($($ty:ty),*) => {
        $(
            impl EnvValue for $ty {
                fn parse_env(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

env_value_from_str!(u16, u32, u64);
