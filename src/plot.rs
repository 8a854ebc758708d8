//! Brain surface plots of per-vertex data, with one color scale shared by all surfaces.

use log::{debug, info};
use ndarray::Array1;
use ndarray_stats::QuantileExt;

use std::path::{Path, PathBuf};

use crate::display;
use crate::error::{Result, SurfPlotError};
use crate::figure::{Figure, Layout, Mesh3d, Title};
use crate::fs_surface::{read_surf, FsSurface};
use crate::paths::is_integer_result;
use crate::util::file_stem;
use crate::vertex_data::{read_vertex_data, DataType};

/// Options for [`surface_figure`] and [`plot_brain_surface`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotOptions {
    /// Index of the data column to show.
    pub volume: usize,
    /// Element type of the data files. Ignored for integer result kinds, see
    /// [`crate::paths::INTEGER_RESULT_IMAGES`].
    pub dtype: DataType,
}

/// Minimum and maximum of a set of values, NaN values are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityRange {
    pub min: f64,
    pub max: f64,
}

impl Default for IntensityRange {
    fn default() -> IntensityRange {
        IntensityRange::new()
    }
}

impl IntensityRange {
    /// An empty range, which any value extends.
    pub fn new() -> IntensityRange {
        IntensityRange {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn from_values(values: &Array1<f64>) -> IntensityRange {
        let mut range = IntensityRange::new();
        range.include(values);
        range
    }

    /// Extend the range to cover `values`.
    pub fn include(&mut self, values: &Array1<f64>) {
        let lo = *values.min_skipnan();
        let hi = *values.max_skipnan();
        // Both are NaN for empty or all-NaN input.
        if !lo.is_nan() {
            self.min = self.min.min(lo);
        }
        if !hi.is_nan() {
            self.max = self.max.max(hi);
        }
    }

    pub fn merge(&mut self, other: &IntensityRange) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// The element type used for loading: integer result kinds override the requested type.
pub fn effective_dtype(first_data_file: &Path, requested: DataType) -> DataType {
    if is_integer_result(&file_stem(first_data_file)) {
        DataType::Int32
    } else {
        requested
    }
}

/// Load one surface and the selected volume of its data.
fn load_pair(
    data_file: &Path,
    geom_file: &Path,
    volume: usize,
    dtype: DataType,
) -> Result<(FsSurface, Array1<f64>)> {
    debug!("Loading surface '{}'.", geom_file.display());
    let surf = read_surf(geom_file)?;
    let num_vertices = surf.mesh.num_vertices();

    debug!(
        "Loading {} data for {} vertices from '{}'.",
        dtype,
        num_vertices,
        data_file.display()
    );
    let data = read_vertex_data(data_file, num_vertices, dtype)?;
    let values = data.volume(volume)?;
    Ok((surf, values))
}

fn check_file_lists<D, G>(data_files: &[D], geom_files: &[G]) -> Result<()>
where
    D: AsRef<Path>,
    G: AsRef<Path>,
{
    if data_files.len() != geom_files.len() {
        return Err(SurfPlotError::FileCountMismatch {
            data: data_files.len(),
            geom: geom_files.len(),
        });
    }
    if data_files.is_empty() {
        return Err(SurfPlotError::NoInputFiles);
    }
    Ok(())
}

/// The shared intensity range of the selected volume over all data files.
pub fn global_intensity_range<D, G>(
    data_files: &[D],
    geom_files: &[G],
    options: &PlotOptions,
) -> Result<IntensityRange>
where
    D: AsRef<Path>,
    G: AsRef<Path>,
{
    check_file_lists(data_files, geom_files)?;
    let dtype = effective_dtype(data_files[0].as_ref(), options.dtype);

    let mut range = IntensityRange::new();
    for (data_file, geom_file) in data_files.iter().zip(geom_files.iter()) {
        let (_, values) =
            load_pair(data_file.as_ref(), geom_file.as_ref(), options.volume, dtype)?;
        let file_range = IntensityRange::from_values(&values);
        debug!(
            "Range of '{}' is [{}, {}].",
            data_file.as_ref().display(),
            file_range.min,
            file_range.max
        );
        range.merge(&file_range);
    }
    Ok(range)
}

/// Round to 2 decimals, ties go to the even neighbour.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Build the mesh trace for one surface.
pub fn surface_trace(
    name: &str,
    surf: &FsSurface,
    values: &Array1<f64>,
    range: &IntensityRange,
) -> Mesh3d {
    let mesh = &surf.mesh;
    let (cmin, cmax) = if range.is_empty() {
        (None, None)
    } else {
        (Some(range.min), Some(range.max))
    };

    Mesh3d {
        name: name.to_string(),
        x: mesh.axis_coords(0),
        y: mesh.axis_coords(1),
        z: mesh.axis_coords(2),
        i: mesh.face_column(0),
        j: mesh.face_column(1),
        k: mesh.face_column(2),
        intensity: values.to_vec(),
        cmin,
        cmax,
        showscale: false,
        customdata: values.iter().map(|v| round2(*v)).collect(),
        hovertemplate: format!(
            concat!(
                "{}<br>X: %{{x}}<br>Y: %{{y}}<br>Z: %{{z}}",
                "<br>Intensity: %{{customdata}}<extra></extra>"
            ),
            name
        ),
        ..Mesh3d::default()
    }
}

/// The figure layout: title, hidden axes, fixed camera and the legend title.
pub fn surface_layout(title_name: &str, volume: usize) -> Layout {
    Layout {
        title: Title::new(&format!(
            "Brain Surface Visualization: {}, Volume {}",
            title_name, volume
        )),
        ..Layout::default()
    }
}

/// Build the figure for pairs of data and geometry files.
///
/// Pass single files as one-element slices. The data files are read twice: once to find the
/// shared intensity range, and once to build the traces, so that only one surface is held in
/// memory at a time.
///
/// # Examples
///
/// ```no_run
/// use blmm_surfplot::{surface_figure, PlotOptions};
/// let fig = surface_figure(
///     &["demo/results_lh_foo/blmm_vox_beta.dat", "demo/results_rh_foo/blmm_vox_beta.dat"],
///     &["fsaverage/surf/lh.pial", "fsaverage/surf/rh.pial"],
///     &PlotOptions::default(),
/// ).unwrap();
/// println!("{}", fig.layout.title.text);
/// ```
pub fn surface_figure<D, G>(
    data_files: &[D],
    geom_files: &[G],
    options: &PlotOptions,
) -> Result<Figure>
where
    D: AsRef<Path>,
    G: AsRef<Path>,
{
    check_file_lists(data_files, geom_files)?;

    let title_name = file_stem(data_files[0].as_ref());
    let dtype = effective_dtype(data_files[0].as_ref(), options.dtype);
    if dtype != options.dtype {
        debug!("Reading '{}' as {} instead of {}.", title_name, dtype, options.dtype);
    }
    let options = PlotOptions { dtype, ..*options };

    let range = global_intensity_range(data_files, geom_files, &options)?;
    debug!("Shared intensity range is [{}, {}].", range.min, range.max);

    let mut fig = Figure::new(surface_layout(&title_name, options.volume));
    for (data_file, geom_file) in data_files.iter().zip(geom_files.iter()) {
        let (surf, values) =
            load_pair(data_file.as_ref(), geom_file.as_ref(), options.volume, dtype)?;
        fig.add_trace(surface_trace(&file_stem(data_file.as_ref()), &surf, &values, &range));
    }

    if let Some(last) = fig.data.last_mut() {
        last.showscale = true;
    }
    Ok(fig)
}

/// Build the figure for pairs of data and geometry files and show it in the browser.
///
/// Returns the path of the written HTML page.
pub fn plot_brain_surface<D, G>(
    data_files: &[D],
    geom_files: &[G],
    options: &PlotOptions,
) -> Result<PathBuf>
where
    D: AsRef<Path>,
    G: AsRef<Path>,
{
    let fig = surface_figure(data_files, geom_files, options)?;
    info!("Showing {} surface(s): {}", fig.data.len(), fig.layout.title.text);
    display::show(&fig)
}
