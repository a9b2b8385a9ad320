//! Temporary workspaces and stub services for CLI tests.

use std::cell::RefCell;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use stammtisch_core::test_support::{MemoryVenueSource, StubGeocoder, StubRouteProvider};
use stammtisch_core::{Geocoder, RouteProvider, Venue, VenueSource};
use tempfile::TempDir;

use crate::CliError;
use crate::services::{ProviderSettings, ServiceBuilder};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path, contents).expect("write test file");
}

/// A temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}

type Factory<T> = Box<dyn Fn() -> T>;

/// [`ServiceBuilder`] handing out in-memory providers and recording which
/// ones were requested.
pub(super) struct StubServices {
    routes: Factory<StubRouteProvider>,
    geocoder: Factory<StubGeocoder>,
    venues: Vec<Venue>,
    built: RefCell<Vec<&'static str>>,
}

impl StubServices {
    /// Routing unreachable, geocoder empty, discovery empty.
    pub(super) fn offline() -> Self {
        Self {
            routes: Box::new(StubRouteProvider::unreachable),
            geocoder: Box::new(StubGeocoder::default),
            venues: Vec::new(),
            built: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn with_routes(mut self, factory: impl Fn() -> StubRouteProvider + 'static) -> Self {
        self.routes = Box::new(factory);
        self
    }

    pub(super) fn with_geocoder(mut self, factory: impl Fn() -> StubGeocoder + 'static) -> Self {
        self.geocoder = Box::new(factory);
        self
    }

    pub(super) fn with_discovered(mut self, venues: Vec<Venue>) -> Self {
        self.venues = venues;
        self
    }

    pub(super) fn built(&self) -> Vec<&'static str> {
        self.built.borrow().clone()
    }
}

impl ServiceBuilder for StubServices {
    fn route_provider(
        &self,
        _settings: &ProviderSettings,
    ) -> Result<Box<dyn RouteProvider>, CliError> {
        self.built.borrow_mut().push("routing");
        Ok(Box::new((self.routes)()))
    }

    fn geocoder(&self, _settings: &ProviderSettings) -> Result<Box<dyn Geocoder>, CliError> {
        self.built.borrow_mut().push("geocoding");
        Ok(Box::new((self.geocoder)()))
    }

    fn discovery(&self, _settings: &ProviderSettings) -> Result<Box<dyn VenueSource>, CliError> {
        self.built.borrow_mut().push("discovery");
        Ok(Box::new(MemoryVenueSource::new(self.venues.clone())))
    }
}
