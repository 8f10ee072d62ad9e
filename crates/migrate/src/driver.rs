//! Per-run loading of the migration engine from driver libraries.
//!
//! A driver library exports two required C symbols and one optional one:
//!
//! ```c
//! char *keystone_driver_migrate(const char *config_json);
//! void keystone_driver_free(char *response_json);
//! int keystone_driver_accepts(const char *jdbc_prefix); /* optional */
//! ```
//!
//! `config_json` is a serialized [`MigrationRunConfig`]; the response is either
//! `{"ok": {"migrationsExecuted": 3, "warnings": []}}` or `{"error": "message"}`.
//! Libraries are opened fresh for every run and closed when the returned engine is dropped,
//! so two projects can use conflicting driver versions side by side.
//!
//! A library serves a JDBC prefix when its `keystone_driver_accepts` returns non-zero for it,
//! or, without that symbol, when one of the words of its file stem equals the prefix
//! (`libpostgresql_driver.so` serves `postgresql`). A single library that declares nothing
//! serves any prefix.

use std::{
    collections::BTreeMap,
    ffi::{CStr, CString, c_char, c_int},
    path::{Path, PathBuf},
};

use keystone_core::{EngineError, MigrateOutcome, MigrationEngine, MigrationRunConfig};
use keystone_utils::find_files;
use libloading::Library;
use serde::Deserialize;
use thiserror::Error;

pub const DRIVER_MIGRATE_SYMBOL: &[u8] = b"keystone_driver_migrate\0";
pub const DRIVER_FREE_SYMBOL: &[u8] = b"keystone_driver_free\0";
pub const DRIVER_ACCEPTS_SYMBOL: &[u8] = b"keystone_driver_accepts\0";

type MigrateFn = unsafe extern "C" fn(*const c_char) -> *mut c_char;
type FreeFn = unsafe extern "C" fn(*mut c_char);
type AcceptsFn = unsafe extern "C" fn(*const c_char) -> c_int;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(
        "No migration driver found for '{prefix}' (searched {searched} classpath entries). Add a driver library to driverClasspath."
    )]
    NotFound { prefix: String, searched: usize },

    #[error("Failed to read driver classpath entry {path}: {reason}")]
    Classpath { path: PathBuf, reason: String },
}

pub type EngineFactory = Box<dyn Fn() -> Box<dyn MigrationEngine> + Send + Sync>;

/// Engines compiled into the host, the parent scope of every [`DriverLoader`].
///
/// Keyed by JDBC prefix; an engine registered under `*` serves any prefix.
#[derive(Default)]
pub struct EngineRegistry {
    factories: BTreeMap<String, EngineFactory>,
}

pub const ANY_PREFIX: &str = "*";

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        prefix: impl Into<String>,
        factory: impl Fn() -> Box<dyn MigrationEngine> + Send + Sync + 'static,
    ) -> &mut Self {
        self.factories.insert(prefix.into(), Box::new(factory));
        self
    }

    pub fn create(&self, prefix: &str) -> Option<Box<dyn MigrationEngine>> {
        self.factories
            .get(prefix)
            .or_else(|| self.factories.get(ANY_PREFIX))
            .map(|factory| factory())
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("prefixes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolves the engine for one run: driver libraries on the classpath first, then the parent
/// registry.
#[derive(Debug)]
pub struct DriverLoader<'a> {
    classpath: Vec<PathBuf>,
    parent: &'a EngineRegistry,
}

impl<'a> DriverLoader<'a> {
    pub fn new(classpath: Vec<PathBuf>, parent: &'a EngineRegistry) -> Self {
        Self { classpath, parent }
    }

    /// # Errors
    /// Returns error if a classpath directory cannot be read or no engine is available.
    pub fn load(&self, prefix: &str) -> Result<Box<dyn MigrationEngine>, DriverError> {
        let libraries = self.libraries()?;
        let mut drivers = vec![];
        for library in &libraries {
            match LibraryDriver::open(library) {
                Ok(driver) => drivers.push(driver),
                Err(e) => log::debug!("Skipping {}: {e}", library.display()),
            }
        }

        let traits = drivers
            .iter()
            .map(|driver| DriverTraits {
                stem: driver.name.clone(),
                accepts: driver.accepts(prefix),
            })
            .collect::<Vec<_>>();
        if let Some(index) = choose_driver(prefix, &traits) {
            let driver = drivers.swap_remove(index);
            log::debug!(
                "Loaded migration driver for '{prefix}' from {}",
                driver.path.display()
            );
            return Ok(Box::new(driver));
        }

        self.parent
            .create(prefix)
            .ok_or_else(|| DriverError::NotFound {
                prefix: prefix.to_string(),
                searched: libraries.len(),
            })
    }

    /// Classpath entries expanded to library files; directories contribute the shared
    /// libraries directly inside them.
    ///
    /// # Errors
    /// Returns error if a classpath directory cannot be read.
    pub fn libraries(&self) -> Result<Vec<PathBuf>, DriverError> {
        let mut libraries = vec![];
        for entry in &self.classpath {
            if entry.is_dir() {
                let found = find_files(entry, Some(1), |extension| {
                    extension == std::env::consts::DLL_EXTENSION
                })
                .map_err(|e| DriverError::Classpath {
                    path: entry.clone(),
                    reason: format!("{e:#}"),
                })?;
                libraries.extend(found);
            } else if entry.is_file() {
                libraries.push(entry.clone());
            } else {
                log::warn!("Driver classpath entry does not exist: {}", entry.display());
            }
        }
        Ok(libraries)
    }
}

/// What a loaded library says about itself, the input of [`choose_driver`]
#[derive(Debug, Clone, PartialEq, Eq)]
struct DriverTraits {
    stem: String,
    /// `None` when the library does not export `keystone_driver_accepts`
    accepts: Option<bool>,
}

/// Index of the library serving `prefix`, in classpath order
fn choose_driver(prefix: &str, drivers: &[DriverTraits]) -> Option<usize> {
    let declared = drivers.iter().position(|driver| match driver.accepts {
        Some(accepts) => accepts,
        None => stem_matches(&driver.stem, prefix),
    });
    if declared.is_some() {
        return declared;
    }

    let undeclared = drivers
        .iter()
        .enumerate()
        .filter(|(_, driver)| driver.accepts.is_none())
        .map(|(index, _)| index)
        .collect::<Vec<_>>();
    match (drivers.len(), undeclared.as_slice()) {
        (1, [index]) => Some(*index),
        _ => None,
    }
}

fn stem_matches(stem: &str, prefix: &str) -> bool {
    let stem = stem.to_lowercase();
    let stem = stem.strip_prefix("lib").unwrap_or(&stem);
    stem.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case(prefix))
}

/// Engine backed by a dynamically loaded driver library
#[derive(Debug)]
struct LibraryDriver {
    path: PathBuf,
    name: String,
    migrate: MigrateFn,
    free: FreeFn,
    accepts: Option<AcceptsFn>,
    // Keeps `migrate` and `free` valid; dropped last.
    _library: Library,
}

impl LibraryDriver {
    fn open(path: &Path) -> Result<Self, libloading::Error> {
        // SAFETY: loading runs the library's initializers; driver libraries on the
        // classpath are trusted build inputs.
        let library = unsafe { Library::new(path) }?;
        // SAFETY: the symbol types match the driver ABI documented above.
        let migrate = unsafe { *library.get::<MigrateFn>(DRIVER_MIGRATE_SYMBOL)? };
        let free = unsafe { *library.get::<FreeFn>(DRIVER_FREE_SYMBOL)? };
        let accepts = unsafe { library.get::<AcceptsFn>(DRIVER_ACCEPTS_SYMBOL) }
            .ok()
            .map(|symbol| *symbol);
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "driver".to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            migrate,
            free,
            accepts,
            _library: library,
        })
    }

    fn accepts(&self, prefix: &str) -> Option<bool> {
        let accepts = self.accepts?;
        let prefix = CString::new(prefix).ok()?;
        // SAFETY: `prefix` outlives the call and the symbol type matches the driver ABI.
        Some(unsafe { accepts(prefix.as_ptr()) } != 0)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
enum DriverResponse {
    Ok(MigrateOutcome),
    Error(String),
}

impl MigrationEngine for LibraryDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn migrate(&self, config: &MigrationRunConfig) -> Result<MigrateOutcome, EngineError> {
        let request = serde_json::to_string(config)
            .map_err(|e| EngineError::new(format!("Failed to encode run config: {e}")))?;
        let request = CString::new(request)
            .map_err(|e| EngineError::new(format!("Run config contains a NUL byte: {e}")))?;

        // SAFETY: `request` outlives the call; the response is released with the
        // library's own `free` after copying it.
        let response = unsafe {
            let raw = (self.migrate)(request.as_ptr());
            if raw.is_null() {
                return Err(EngineError::new(format!(
                    "Driver {} returned no response",
                    self.path.display()
                )));
            }
            let response = CStr::from_ptr(raw).to_string_lossy().into_owned();
            (self.free)(raw);
            response
        };

        match serde_json::from_str::<DriverResponse>(&response) {
            Ok(DriverResponse::Ok(outcome)) => Ok(outcome),
            Ok(DriverResponse::Error(message)) => Err(EngineError::new(message)),
            Err(e) => Err(EngineError::new(format!(
                "Driver {} returned an invalid response: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct StubEngine(&'static str);

    impl MigrationEngine for StubEngine {
        fn name(&self) -> &str {
            self.0
        }

        fn migrate(&self, _config: &MigrationRunConfig) -> Result<MigrateOutcome, EngineError> {
            Ok(MigrateOutcome::default())
        }
    }

    fn registry() -> EngineRegistry {
        let mut registry = EngineRegistry::new();
        registry
            .register("h2", || Box::new(StubEngine("h2")))
            .register(ANY_PREFIX, || Box::new(StubEngine("fallback")));
        registry
    }

    #[test]
    fn test_registry_prefers_exact_prefix() {
        let registry = registry();
        assert_eq!(registry.create("h2").unwrap().name(), "h2");
        assert_eq!(registry.create("mysql").unwrap().name(), "fallback");
    }

    #[test]
    fn test_registry_without_fallback() {
        let mut registry = EngineRegistry::new();
        assert!(registry.is_empty());
        registry.register("h2", || Box::new(StubEngine("h2")));
        assert!(registry.create("mysql").is_none());
    }

    #[test]
    fn test_loader_falls_back_to_parent() {
        let registry = registry();
        let loader = DriverLoader::new(vec![], &registry);
        assert_eq!(loader.load("h2").unwrap().name(), "h2");
    }

    #[test]
    fn test_loader_skips_files_that_are_not_drivers() {
        let temp_dir = TempDir::new().unwrap();
        let fake = temp_dir
            .path()
            .join(format!("libfake.{}", std::env::consts::DLL_EXTENSION));
        fs::write(&fake, "not a shared library").unwrap();
        let jar = temp_dir.path().join("mysql-connector-j-9.1.0.jar");
        fs::write(&jar, "PK").unwrap();

        let registry = registry();
        let loader = DriverLoader::new(
            vec![temp_dir.path().to_path_buf(), jar.clone()],
            &registry,
        );
        // The directory contributes only the library; explicit files are always tried.
        assert_eq!(loader.libraries().unwrap(), vec![fake, jar]);
        assert_eq!(loader.load("h2").unwrap().name(), "h2");
        temp_dir.close().unwrap();
    }

    #[test]
    fn test_loader_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let registry = EngineRegistry::new();
        let loader = DriverLoader::new(vec![temp_dir.path().join("missing.so")], &registry);

        let error = loader.load("postgresql").unwrap_err();
        assert!(matches!(
            error,
            DriverError::NotFound { ref prefix, searched: 0 } if prefix.as_str() == "postgresql"
        ));
        assert!(error.to_string().contains("driverClasspath"));
        temp_dir.close().unwrap();
    }

    fn traits(stem: &str, accepts: Option<bool>) -> DriverTraits {
        DriverTraits {
            stem: stem.to_string(),
            accepts,
        }
    }

    #[rstest]
    #[case("postgresql", vec![traits("libmysql_driver", None), traits("libpostgresql_driver", None)], Some(1))]
    #[case("mysql", vec![traits("libmysql_driver", None), traits("libpostgresql_driver", None)], Some(0))]
    #[case("h2", vec![traits("libmysql_driver", None), traits("libpostgresql_driver", None)], None)]
    #[case("h2", vec![traits("libflyway_bridge", None)], Some(0))]
    #[case("h2", vec![traits("libh2_driver", Some(false))], None)]
    #[case("mysql", vec![traits("libany", Some(false)), traits("libany2", Some(true))], Some(1))]
    #[case("mysql", vec![traits("libpostgresql", Some(true)), traits("libmysql", None)], Some(0))]
    #[case("h2", vec![], None)]
    fn test_choose_driver(
        #[case] prefix: &str,
        #[case] drivers: Vec<DriverTraits>,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(choose_driver(prefix, &drivers), expected);
    }

    #[rstest]
    #[case("libpostgresql_driver", "postgresql", true)]
    #[case("postgresql-42.7.4", "postgresql", true)]
    #[case("keystone-MySQL", "mysql", true)]
    #[case("libmysql_driver", "postgresql", false)]
    #[case("libmariadb", "mysql", false)]
    fn test_stem_matches(#[case] stem: &str, #[case] prefix: &str, #[case] expected: bool) {
        assert_eq!(stem_matches(stem, prefix), expected);
    }

    #[test]
    fn test_driver_response_parsing() {
        let ok: DriverResponse =
            serde_json::from_str(r#"{"ok": {"migrationsExecuted": 2, "warnings": ["w"]}}"#)
                .unwrap();
        assert!(matches!(ok, DriverResponse::Ok(ref o) if o.migrations_executed == 2));

        let error: DriverResponse =
            serde_json::from_str(r#"{"error": "Connection refused"}"#).unwrap();
        assert!(matches!(error, DriverResponse::Error(ref m) if m == "Connection refused"));
    }
}
