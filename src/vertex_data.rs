//! Functions for reading raw per-vertex BLMM result files.
//!
//! A result file is a headerless array of 4 byte little endian values, stored vertex-major:
//! all volumes of vertex 0 first, then all volumes of vertex 1, and so on. The number of
//! volumes is not stored, it follows from the vertex count of the matching surface.

use byteordered::ByteOrdered;
use memmap2::Mmap;
use ndarray::{Array1, Array2};

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, SurfPlotError};

/// Element type of a result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Float32,
    Int32,
}

impl Default for DataType {
    fn default() -> DataType {
        DataType::Float32
    }
}

impl DataType {
    pub fn size_of(&self) -> usize {
        4
    }
}

impl FromStr for DataType {
    type Err = SurfPlotError;

    fn from_str(s: &str) -> Result<DataType> {
        match s.to_lowercase().as_str() {
            "f32" | "float32" => Ok(DataType::Float32),
            "i32" | "int32" => Ok(DataType::Int32),
            _ => Err(SurfPlotError::InvalidDataType(s.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataType::Float32 => write!(f, "float32"),
            DataType::Int32 => write!(f, "int32"),
        }
    }
}

/// The values of a result file, shaped (vertices, volumes).
#[derive(Debug, Clone, PartialEq)]
pub enum DataValues {
    Float32(Array2<f32>),
    Int32(Array2<i32>),
}

/// Per-vertex data for one brain surface.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexData {
    pub values: DataValues,
}

impl VertexData {
    /// Read a result file for a surface with `num_vertices` vertices.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        num_vertices: usize,
        dtype: DataType,
    ) -> Result<VertexData> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        if len == 0 {
            return VertexData::from_bytes(&[], num_vertices, dtype);
        }
        if len % dtype.size_of() as u64 != 0 {
            return Err(SurfPlotError::TrailingBytes { len });
        }

        // Safety: the map is read-only and dropped before this function returns.
        let mmap = unsafe { Mmap::map(&file)? };
        VertexData::from_bytes(&mmap[..], num_vertices, dtype)
    }

    /// Decode the raw bytes of a result file.
    pub fn from_bytes(bytes: &[u8], num_vertices: usize, dtype: DataType) -> Result<VertexData> {
        if bytes.len() % dtype.size_of() != 0 {
            return Err(SurfPlotError::TrailingBytes {
                len: bytes.len() as u64,
            });
        }
        let num_elements = bytes.len() / dtype.size_of();
        if num_vertices == 0 || num_elements % num_vertices != 0 {
            return Err(SurfPlotError::DataShape {
                num_elements,
                num_vertices,
            });
        }
        let shape = (num_vertices, num_elements / num_vertices);

        let mut input = ByteOrdered::le(bytes);
        let values = match dtype {
            DataType::Float32 => {
                let mut data: Vec<f32> = Vec::with_capacity(num_elements);
                for _ in 0..num_elements {
                    data.push(input.read_f32()?);
                }
                DataValues::Float32(Array2::from_shape_vec(shape, data)?)
            }
            DataType::Int32 => {
                let mut data: Vec<i32> = Vec::with_capacity(num_elements);
                for _ in 0..num_elements {
                    data.push(input.read_i32()?);
                }
                DataValues::Int32(Array2::from_shape_vec(shape, data)?)
            }
        };
        Ok(VertexData { values })
    }

    pub fn dtype(&self) -> DataType {
        match self.values {
            DataValues::Float32(_) => DataType::Float32,
            DataValues::Int32(_) => DataType::Int32,
        }
    }

    pub fn num_vertices(&self) -> usize {
        match &self.values {
            DataValues::Float32(a) => a.nrows(),
            DataValues::Int32(a) => a.nrows(),
        }
    }

    pub fn num_volumes(&self) -> usize {
        match &self.values {
            DataValues::Float32(a) => a.ncols(),
            DataValues::Int32(a) => a.ncols(),
        }
    }

    /// The values of one volume for all vertices, converted to f64.
    pub fn volume(&self, volume: usize) -> Result<Array1<f64>> {
        let num_volumes = self.num_volumes();
        if volume >= num_volumes {
            return Err(SurfPlotError::VolumeOutOfRange {
                volume,
                num_volumes,
            });
        }
        Ok(match &self.values {
            DataValues::Float32(a) => a.column(volume).mapv(f64::from),
            DataValues::Int32(a) => a.column(volume).mapv(f64::from),
        })
    }
}

impl fmt::Display for VertexData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Per-vertex {} data for {} vertices and {} volume(s).",
            self.dtype(),
            self.num_vertices(),
            self.num_volumes()
        )
    }
}

/// Read per-vertex data from a raw BLMM result file, using the vertex count of the matching surface.
///
/// # Examples
///
/// ```no_run
/// let surf = blmm_surfplot::read_surf("/path/to/fsaverage/surf/lh.pial").unwrap();
/// let data = blmm_surfplot::read_vertex_data(
///     "demo/results_lh_foo/blmm_vox_beta.dat",
///     surf.mesh.num_vertices(),
///     blmm_surfplot::DataType::Float32,
/// ).unwrap();
/// println!("{}", data);
/// ```
pub fn read_vertex_data<P: AsRef<Path>>(
    path: P,
    num_vertices: usize,
    dtype: DataType,
) -> Result<VertexData> {
    VertexData::from_file(path, num_vertices, dtype)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes().to_vec()).collect()
    }

    #[test]
    fn data_is_reshaped_vertex_major() {
        let bytes = f32_bytes(&[1.0, 10.0, 2.0, 20.0, 3.0, 30.0]);
        let data = VertexData::from_bytes(&bytes, 3, DataType::Float32).unwrap();

        assert_eq!(3, data.num_vertices());
        assert_eq!(2, data.num_volumes());
        assert_eq!(vec![1.0, 2.0, 3.0], data.volume(0).unwrap().to_vec());
        assert_eq!(vec![10.0, 20.0, 30.0], data.volume(1).unwrap().to_vec());
    }

    #[test]
    fn int_data_is_read_as_int() {
        let bytes: Vec<u8> = [7i32, -1, 42]
            .iter()
            .flat_map(|v| v.to_le_bytes().to_vec())
            .collect();
        let data = VertexData::from_bytes(&bytes, 3, DataType::Int32).unwrap();

        assert_eq!(DataType::Int32, data.dtype());
        assert_eq!(vec![7.0, -1.0, 42.0], data.volume(0).unwrap().to_vec());
    }

    #[test]
    fn data_not_divisible_by_vertex_count_is_rejected() {
        let bytes = f32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        match VertexData::from_bytes(&bytes, 2, DataType::Float32) {
            Err(SurfPlotError::DataShape {
                num_elements,
                num_vertices,
            }) => {
                assert_eq!(5, num_elements);
                assert_eq!(2, num_vertices);
            }
            other => panic!("expected DataShape, got {:?}", other),
        }
        assert!(matches!(
            VertexData::from_bytes(&bytes, 0, DataType::Float32),
            Err(SurfPlotError::DataShape { .. })
        ));
    }

    #[test]
    fn partial_elements_are_rejected() {
        assert!(matches!(
            VertexData::from_bytes(&[0, 0, 0, 0, 1], 1, DataType::Float32),
            Err(SurfPlotError::TrailingBytes { len: 5 })
        ));
    }

    #[test]
    fn volumes_past_the_end_are_rejected() {
        let data = VertexData::from_bytes(&f32_bytes(&[1.0, 2.0]), 2, DataType::Float32).unwrap();
        assert!(matches!(
            data.volume(1),
            Err(SurfPlotError::VolumeOutOfRange {
                volume: 1,
                num_volumes: 1
            })
        ));
    }

    #[test]
    fn result_files_are_memory_mapped_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blmm_vox_beta.dat");
        fs::write(&path, f32_bytes(&[0.5, -1.5, 2.5, 4.0])).unwrap();

        let data = read_vertex_data(&path, 2, DataType::Float32).unwrap();
        assert_eq!(2, data.num_volumes());
        assert_eq!(vec![0.5, 2.5], data.volume(0).unwrap().to_vec());
        assert_eq!(
            "Per-vertex float32 data for 2 vertices and 2 volume(s).",
            format!("{}", data)
        );
    }

    #[test]
    fn empty_result_files_have_no_volumes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blmm_vox_empty.dat");
        fs::write(&path, b"").unwrap();

        let data = read_vertex_data(&path, 3, DataType::Float32).unwrap();
        assert_eq!(0, data.num_volumes());
        assert!(data.volume(0).is_err());
    }

    #[test]
    fn missing_result_files_give_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_vertex_data(dir.path().join("nope.dat"), 3, DataType::Float32),
            Err(SurfPlotError::Io(_))
        ));
    }

    #[test]
    fn data_types_are_parsed_from_names() {
        assert_eq!(DataType::Float32, "f32".parse::<DataType>().unwrap());
        assert_eq!(DataType::Int32, "Int32".parse::<DataType>().unwrap());
        assert_eq!(DataType::Float32, DataType::default());
        assert!("f64".parse::<DataType>().is_err());
    }
}
