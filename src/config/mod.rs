mod loader;

pub use loader::{Config, EndpointConfig, MusixmatchConfig, ResolverSettings, SourcesConfig};
