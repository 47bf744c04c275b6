use std::env::var;

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    non_empty_env_var(var_name).unwrap_or_else(or_else)
}

/// Get the value of an ENV var as a flag, or a default
///
/// `false`, `0`, `no` and `off` (any case) turn the flag off, anything else
/// turns it on. Unset or empty uses the default.
pub fn env_flag_or(var_name: &'static str, default: bool) -> bool {
    non_empty_env_var(var_name).map_or(default, |value| parse_flag(&value))
}

fn non_empty_env_var(var_name: &'static str) -> Option<String> {
    var(var_name).ok().filter(|value| !value.is_empty())
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
