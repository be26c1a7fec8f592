//! This is the `ConfigFile` struct.
//!
//! This is for finding the right default locations for the configuration file of `tagwatch`.
//! This is a configuration file/struct neutral loading engine, `load()` reads the proper file
//! or the default one and `.into_inner()` gives back the parsed struct.
//!

use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use eyre::{eyre, Result};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::makepath;

/// Config filename
const CONFIG: &str = "tagwatch.hcl";

/// Main name for the directory base
const TAG: &str = "tagwatch";

/// Every configuration file carries a version number.
///
pub trait Versioned {
    fn version(&self) -> usize;
}

/// Configuration file wrapper.
///
#[derive(Debug)]
pub struct ConfigFile<T: Debug + DeserializeOwned + Versioned> {
    inner: T,
}

/// Returns the path of the default config directory
///
#[tracing::instrument]
pub fn config_path() -> PathBuf {
    match BaseDirs::new() {
        Some(base) => {
            #[cfg(unix)]
            let base = base.home_dir().join(".config");

            #[cfg(windows)]
            let base = base.data_local_dir().to_path_buf();

            debug!("base = {base:?}");
            makepath!(base, TAG)
        }
        // No home directory, look into the current one
        None => makepath!(".", TAG),
    }
}

/// Returns the path of the default config file
///
#[tracing::instrument]
pub fn default_file() -> PathBuf {
    let cfg = config_path().join(CONFIG);
    debug!("default = {cfg:?}");
    cfg
}

impl<T> ConfigFile<T>
where
    T: Debug + DeserializeOwned + Versioned,
{
    /// Load the file and return a struct T in the right format.
    ///
    /// Use the following search path:
    /// - file specified on CLI
    /// - default basedir (base on $HOME or $LOCALAPPDATA)
    ///
    /// `want` is the version the caller understands.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&str>, want: usize) -> Result<ConfigFile<T>> {
        let fname = match fname {
            Some(fname) => PathBuf::from(fname),
            None => default_file(),
        };

        // Use a full path
        //
        let fname = if fname.exists() {
            fname.canonicalize()?
        } else {
            return Err(eyre!(
                "Unknown config file {:?} and no default in {:?}",
                fname,
                default_file()
            ));
        };

        trace!("Loading config file {fname:?}");

        let data = fs::read_to_string(&fname)?;
        let inner: T = hcl::from_str(&data)?;
        debug!("struct data = {inner:?}");

        if inner.version() != want {
            return Err(eyre!(
                "Bad config file version {} in {:?}, want {}",
                inner.version(),
                fname,
                want
            ));
        }

        Ok(ConfigFile { inner })
    }

    /// Consume the wrapper
    ///
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> ConfigFile<T>
where
    T: Debug + Default + DeserializeOwned + Versioned,
{
    /// Same as `load()` except that a missing default file is not an error: we get
    /// `T::default()` and every value has to come from somewhere else.
    ///
    /// A file given explicitly must exist.
    ///
    #[tracing::instrument]
    pub fn load_or_default(fname: Option<&str>, want: usize) -> Result<T> {
        if fname.is_none() && !default_file().exists() {
            debug!("no configuration file, using defaults");
            return Ok(T::default());
        }
        Ok(Self::load(fname, want)?.into_inner())
    }
}
