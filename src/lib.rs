//! Interactive brain surface plots of BLMM results.
//!
//! Reads FreeSurfer surface meshes and raw per-vertex result files, and turns them into a
//! plotly.js figure in which all surfaces share one color scale.

pub mod display;
pub mod error;
pub mod figure;
pub mod fs_surface;
pub mod paths;
pub mod plot;
pub mod util;
pub mod vertex_data;

pub use error::{Result, SurfPlotError};
pub use figure::{Figure, Layout, Mesh3d};
pub use fs_surface::{read_surf, write_surf, BrainMesh, FsSurface, FsSurfaceHeader};
pub use paths::{result_file, result_file_in, Hemisphere};
pub use plot::{plot_brain_surface, surface_figure, IntensityRange, PlotOptions};
pub use vertex_data::{read_vertex_data, DataType, VertexData};
