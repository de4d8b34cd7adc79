//! Shared Serde default value functions

/// Default value: false
pub fn bool_false() -> bool {
    false
}
