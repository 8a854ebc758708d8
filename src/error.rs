use quick_error::quick_error;
use std::io::Error as IOError;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum SurfPlotError {
        /// Hemisphere name other than 'left' or 'right'.
        InvalidHemisphere(name: String) {
            display("Please specify left or right for hemisphere, got '{}'", name)
        }

        /// The data and geometry file lists differ in length.
        FileCountMismatch { data: usize, geom: usize } {
            display("The number of data files ({}) must be equal to the number of geometry files ({})", data, geom)
        }

        NoInputFiles {
            display("At least one data file and one geometry file are required")
        }

        InvalidDataType(name: String) {
            display("Unsupported data type '{}', expected 'f32' or 'i32'", name)
        }

        VolumeOutOfRange { volume: usize, num_volumes: usize } {
            display("Volume {} requested, but the data has only {} volume(s)", volume, num_volumes)
        }

        /// The element count of a data file is not a multiple of the vertex count of its surface.
        DataShape { num_elements: usize, num_vertices: usize } {
            display("Cannot reshape {} data values onto a surface with {} vertices", num_elements, num_vertices)
        }

        /// The byte length of a data file is not a multiple of the element size.
        TrailingBytes { len: u64 } {
            display("Data file length of {} bytes is not a multiple of the element size", len)
        }

        InvalidFsSurfaceFormat {
            display("Invalid FreeSurfer surf file")
        }

        InvalidFaceIndex { index: i32, num_vertices: usize } {
            display("Face references vertex {}, but the mesh has {} vertices", index, num_vertices)
        }

        Shape(err: ndarray::ShapeError) {
            from()
            source(err)
            display("Invalid array shape: {}", err)
        }

        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }

        Json(err: serde_json::Error) {
            from()
            source(err)
            display("Figure serialization failed: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, SurfPlotError>;
