//! JSON cache for precomputed visibility maps.
//!
//! Computing a map from smoke data is expensive, so a run normally loads the
//! result of a previous computation.  [`VisibilityMap::load_or_compute`]
//! encodes that policy: load if the cache file exists, otherwise compute
//! once and write the cache for next time.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::{VisibilityMap, VisibilityResult};

impl VisibilityMap {
    /// Write the map to `path` as JSON, replacing any existing file.
    pub fn save_json(&self, path: &Path) -> VisibilityResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Read and validate a map previously written by [`save_json`](Self::save_json).
    pub fn load_json(path: &Path) -> VisibilityResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let map: VisibilityMap = serde_json::from_reader(reader)?;
        map.validate()?;
        Ok(map)
    }

    /// Load the cached map at `path`, or build it with `compute` and cache it.
    ///
    /// A cache file that exists but cannot be read is an error; the caller
    /// decides whether to delete it.  A failure to *write* the cache after a
    /// successful computation is only logged, since the map is still usable.
    pub fn load_or_compute<F>(path: &Path, compute: F) -> VisibilityResult<Self>
    where
        F: FnOnce() -> VisibilityResult<VisibilityMap>,
    {
        if path.is_file() {
            let map = Self::load_json(path)?;
            info!(path = %path.display(), time_points = map.times().len(), "visibility map loaded from cache");
            return Ok(map);
        }

        info!(path = %path.display(), "no cached visibility map, computing");
        let map = compute()?;
        map.validate()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), %err, "could not create cache directory");
                return Ok(map);
            }
        }
        match map.save_json(path) {
            Ok(()) => info!(path = %path.display(), "visibility map cached"),
            Err(err) => warn!(path = %path.display(), %err, "could not write visibility cache"),
        }
        Ok(map)
    }
}
