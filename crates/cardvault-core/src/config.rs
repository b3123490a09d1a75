/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (fields map to upper-cased env var
/// names, use `#[serde(default = ...)]` for optional ones) and then call
/// `Config::from_env()` at startup.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    fn from_env() -> Self {
        envy::from_env().expect("failed to load config from environment")
    }

    /// Load from explicit `(NAME, value)` pairs instead of the process environment.
    fn from_pairs<I>(pairs: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(pairs)
    }
}
