//! Naming conventions of BLMM surface results.
//!
//! An analysis run on one hemisphere writes its results to
//! `demo/results_<lh|rh>_<analysis>/blmm_vox_<image>.dat`, relative to the working directory.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, SurfPlotError};

pub const RESULTS_DIR: &str = "demo";
pub const RESULT_DIR_PREFIX: &str = "results_";
pub const RESULT_FILE_PREFIX: &str = "blmm_vox_";
pub const RESULT_FILE_EXT: &str = "dat";

/// Result files that hold 32 bit integers instead of floats: vertex counts, the analysis mask and degrees of freedom.
pub const INTEGER_RESULT_IMAGES: [&str; 3] = ["blmm_vox_n", "blmm_vox_mask", "blmm_vox_edf"];

/// A brain hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    /// The FreeSurfer short code, `lh` or `rh`.
    pub fn short_code(&self) -> &'static str {
        match self {
            Hemisphere::Left => "lh",
            Hemisphere::Right => "rh",
        }
    }
}

impl FromStr for Hemisphere {
    type Err = SurfPlotError;

    /// Parse 'left' or 'right', ignoring case.
    fn from_str(s: &str) -> Result<Hemisphere> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Hemisphere::Left),
            "right" => Ok(Hemisphere::Right),
            _ => Err(SurfPlotError::InvalidHemisphere(s.to_string())),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.short_code())
    }
}

/// Whether the result file with the given stem (file name without extension) stores integers.
pub fn is_integer_result(stem: &str) -> bool {
    INTEGER_RESULT_IMAGES.contains(&stem)
}

/// Build the path of a result file below `root`. No file system access happens.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// let p = blmm_surfplot::result_file_in("/data", "foo", "Left", "n").unwrap();
/// assert_eq!(Path::new("/data/demo/results_lh_foo/blmm_vox_n.dat"), p);
/// ```
pub fn result_file_in<P: AsRef<Path>>(
    root: P,
    analysis: &str,
    hemisphere: &str,
    image: &str,
) -> Result<PathBuf> {
    let hemi: Hemisphere = hemisphere.parse()?;
    Ok(result_path(root.as_ref(), analysis, hemi, image))
}

/// Build the path of a result file below the current working directory.
///
/// # Examples
///
/// ```no_run
/// let beta = blmm_surfplot::result_file("foo", "right", "beta").unwrap();
/// println!("{}", beta.display());
/// ```
pub fn result_file(analysis: &str, hemisphere: &str, image: &str) -> Result<PathBuf> {
    let hemi: Hemisphere = hemisphere.parse()?;
    Ok(result_path(&env::current_dir()?, analysis, hemi, image))
}

fn result_path(root: &Path, analysis: &str, hemi: Hemisphere, image: &str) -> PathBuf {
    let directory = format!("{}{}_{}", RESULT_DIR_PREFIX, hemi.short_code(), analysis);
    let fname = format!("{}{}.{}", RESULT_FILE_PREFIX, image, RESULT_FILE_EXT);
    root.join(RESULTS_DIR).join(directory).join(fname)
}
