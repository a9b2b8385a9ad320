//! Adapters for the hosted GraphHopper routing and geocoding APIs.
//!
//! Both adapters share one [`HttpConfig`](crate::HttpConfig); the API key is
//! sent as the `key` query parameter and never appears in logs or errors.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use stammtisch_data::HttpConfig;
//! use stammtisch_data::graphhopper::{DEFAULT_BASE_URL, HttpGeocoder, HttpRouteProvider};
//!
//! let config = HttpConfig::new(DEFAULT_BASE_URL)
//!     .with_timeout(Duration::from_secs(10))
//!     .with_api_key("your-key");
//! let routes = HttpRouteProvider::with_config(config.clone())?;
//! let geocoder = HttpGeocoder::with_config(config)?;
//! # Ok::<(), stammtisch_data::ProviderBuildError>(())
//! ```

mod geocoding;
mod routing;
mod wire;

pub use geocoding::HttpGeocoder;
pub use routing::HttpRouteProvider;
pub use wire::profile;

/// Base URL of the hosted GraphHopper API.
pub const DEFAULT_BASE_URL: &str = "https://graphhopper.com/api/1";
