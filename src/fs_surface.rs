// Functions for managing FreeSurfer brain surface meshes in binary 'surf' files.
// These files store a triangular mesh, where each vertex if defined by its x,y,z coord and
// each face is defined by 3 vertices, stored as 3 indices into the vertices.
// Older quad files are supported for reading, their quads get split into triangles.

use byteordered::ByteOrdered;
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Result, SurfPlotError};
use crate::util::{fs_int24_bytes, interpret_fs_int24, is_gz_file, read_fs_int24, read_line};

pub const TRIS_MAGIC_FILE_TYPE_NUMBER: i32 = 16777214;
pub const QUAD_MAGIC_FILE_TYPE_NUMBER: i32 = 16777215;
pub const NEW_QUAD_MAGIC_FILE_TYPE_NUMBER: i32 = 16777213;

// Upper bound for buffers sized from header counts, larger meshes grow while reading.
const MAX_PREALLOC: usize = 1 << 20;

/// Info line written by [`FsSurface::from_mesh`].
pub const DEFAULT_INFO_LINE: &str = "created by blmm-surfplot";

/// The header of a FreeSurfer surf file. For quad files, `num_faces` is the number of
/// triangles after splitting, and the `info_line` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct FsSurfaceHeader {
    pub surf_magic: [u8; 3],
    pub info_line: String,
    pub num_vertices: i32,
    pub num_faces: i32,
}

impl Default for FsSurfaceHeader {
    fn default() -> FsSurfaceHeader {
        FsSurfaceHeader {
            surf_magic: fs_int24_bytes(TRIS_MAGIC_FILE_TYPE_NUMBER),
            info_line: String::from(DEFAULT_INFO_LINE),
            num_vertices: 0,
            num_faces: 0,
        }
    }
}

impl FsSurfaceHeader {
    /// Read an FsSurface header from a file.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding. This is not typically the case
    /// for FreeSurfer Surf files, but very handy for shipping test data.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsSurfaceHeader> {
        let gz = is_gz_file(&path);
        let mut file = BufReader::new(File::open(path)?);
        if gz {
            FsSurfaceHeader::from_reader(&mut GzDecoder::new(file))
        } else {
            FsSurfaceHeader::from_reader(&mut file)
        }
    }

    /// Read an FsSurface header from the given byte stream.
    /// It is assumed that the input is currently at the start of the
    /// FsSurface header. On success, the input is positioned at the start of the vertex coordinates.
    pub fn from_reader<S>(input: &mut S) -> Result<FsSurfaceHeader>
    where
        S: Read,
    {
        let mut hdr = FsSurfaceHeader::default();
        input.read_exact(&mut hdr.surf_magic)?;

        match hdr.magic() {
            TRIS_MAGIC_FILE_TYPE_NUMBER => {
                hdr.info_line = read_line(input)?;
                let _blank = read_line(input)?;
                let mut input = ByteOrdered::be(input);
                hdr.num_vertices = input.read_i32()?;
                hdr.num_faces = input.read_i32()?;
            }
            QUAD_MAGIC_FILE_TYPE_NUMBER | NEW_QUAD_MAGIC_FILE_TYPE_NUMBER => {
                hdr.info_line = String::new();
                hdr.num_vertices = read_fs_int24(input)?;
                hdr.num_faces = read_fs_int24(input)? * 2;
            }
            _ => return Err(SurfPlotError::InvalidFsSurfaceFormat),
        }

        if hdr.num_vertices < 0 || hdr.num_faces < 0 {
            return Err(SurfPlotError::InvalidFsSurfaceFormat);
        }
        Ok(hdr)
    }

    /// The magic number from the first three bytes of the file.
    pub fn magic(&self) -> i32 {
        interpret_fs_int24(self.surf_magic[0], self.surf_magic[1], self.surf_magic[2])
    }

    pub fn is_quad(&self) -> bool {
        self.magic() != TRIS_MAGIC_FILE_TYPE_NUMBER
    }
}

// An FsSurface object
#[derive(Debug, PartialEq, Clone)]
pub struct FsSurface {
    pub header: FsSurfaceHeader,
    pub mesh: BrainMesh,
}

/// A triangular brain mesh. Both fields are flat: `vertices` holds x,y,z per vertex and
/// `faces` holds 3 zero-based vertex indices per triangle.
#[derive(Debug, PartialEq, Clone)]
pub struct BrainMesh {
    pub vertices: Vec<f32>,
    pub faces: Vec<i32>,
}

impl BrainMesh {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len() / 3
    }

    /// The coordinates of the vertex at `idx`.
    ///
    /// # Panics
    ///
    /// If `idx` is not smaller than [`BrainMesh::num_vertices`].
    pub fn vertex(&self, idx: usize) -> [f32; 3] {
        let v = &self.vertices[idx * 3..idx * 3 + 3];
        [v[0], v[1], v[2]]
    }

    /// The vertex indices of the face at `idx`.
    ///
    /// # Panics
    ///
    /// If `idx` is not smaller than [`BrainMesh::num_faces`].
    pub fn face(&self, idx: usize) -> [i32; 3] {
        let f = &self.faces[idx * 3..idx * 3 + 3];
        [f[0], f[1], f[2]]
    }

    /// One coordinate column of all vertices: 0 for x, 1 for y, 2 for z.
    pub fn axis_coords(&self, axis: usize) -> Vec<f32> {
        self.vertices.iter().skip(axis).step_by(3).copied().collect()
    }

    /// One corner column of all faces, 0, 1 or 2.
    pub fn face_column(&self, corner: usize) -> Vec<i32> {
        self.faces.iter().skip(corner).step_by(3).copied().collect()
    }

    /// Check that every face references an existing vertex.
    pub fn validate(&self) -> Result<()> {
        let num_vertices = self.num_vertices();
        match self
            .faces
            .iter()
            .find(|&&idx| idx < 0 || idx as usize >= num_vertices)
        {
            Some(&index) => Err(SurfPlotError::InvalidFaceIndex {
                index,
                num_vertices,
            }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for BrainMesh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Brain trimesh with {} vertices and {} faces.",
            self.num_vertices(),
            self.num_faces()
        )
    }
}

/// Read a brain surface mesh from a FreeSurfer surf file.
///
/// # Examples
///
/// ```no_run
/// let surf = blmm_surfplot::read_surf("/path/to/subjects_dir/fsaverage/surf/lh.white").unwrap();
/// println!("{}", surf.mesh);
/// ```
pub fn read_surf<P: AsRef<Path>>(path: P) -> Result<FsSurface> {
    FsSurface::from_file(path)
}

/// Write a brain surface mesh to a FreeSurfer surf file in triangle format.
/// If the file's name ends with ".gz", the output is GZip compressed.
pub fn write_surf<P: AsRef<Path>>(path: P, surf: &FsSurface) -> Result<()> {
    let gz = is_gz_file(&path);
    let file = File::create(path)?;
    if gz {
        let mut output = GzEncoder::new(file, Compression::default());
        surf.to_writer(&mut output)?;
        output.finish()?;
    } else {
        let mut output = BufWriter::new(file);
        surf.to_writer(&mut output)?;
        output.flush()?;
    }
    Ok(())
}

impl FsSurface {
    /// Read an FsSurface instance from a file.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<FsSurface> {
        let gz = is_gz_file(&path);
        let file = BufReader::new(File::open(path)?);

        let surf = if gz {
            FsSurface::from_reader(GzDecoder::new(file))?
        } else {
            FsSurface::from_reader(file)?
        };
        surf.mesh.validate()?;
        Ok(surf)
    }

    /// Read header and mesh from the given byte stream, which must be at the start of the file.
    pub fn from_reader<S>(mut input: S) -> Result<FsSurface>
    where
        S: Read,
    {
        let hdr = FsSurfaceHeader::from_reader(&mut input)?;
        let mesh = FsSurface::mesh_from_reader(&mut input, &hdr)?;
        Ok(FsSurface { header: hdr, mesh })
    }

    /// Wrap a mesh into a surface with a default triangle-format header.
    pub fn from_mesh(mesh: BrainMesh) -> FsSurface {
        let header = FsSurfaceHeader {
            num_vertices: mesh.num_vertices() as i32,
            num_faces: mesh.num_faces() as i32,
            ..FsSurfaceHeader::default()
        };
        FsSurface { header, mesh }
    }

    /// Read the mesh part. The input must be positioned right after the header.
    pub fn mesh_from_reader<S>(input: &mut S, hdr: &FsSurfaceHeader) -> Result<BrainMesh>
    where
        S: Read,
    {
        match hdr.magic() {
            TRIS_MAGIC_FILE_TYPE_NUMBER => FsSurface::tris_from_reader(input, hdr),
            QUAD_MAGIC_FILE_TYPE_NUMBER | NEW_QUAD_MAGIC_FILE_TYPE_NUMBER => {
                FsSurface::quads_from_reader(input, hdr)
            }
            _ => Err(SurfPlotError::InvalidFsSurfaceFormat),
        }
    }

    fn tris_from_reader<S>(input: &mut S, hdr: &FsSurfaceHeader) -> Result<BrainMesh>
    where
        S: Read,
    {
        let num_coords = element_count(hdr.num_vertices, 3)?;
        let num_indices = element_count(hdr.num_faces, 3)?;
        let mut input = ByteOrdered::be(input);

        let mut vertex_data: Vec<f32> = Vec::with_capacity(num_coords.min(MAX_PREALLOC));
        for _ in 0..num_coords {
            vertex_data.push(input.read_f32()?);
        }

        let mut face_data: Vec<i32> = Vec::with_capacity(num_indices.min(MAX_PREALLOC));
        for _ in 0..num_indices {
            face_data.push(input.read_i32()?);
        }

        Ok(BrainMesh {
            vertices: vertex_data,
            faces: face_data,
        })
    }

    fn quads_from_reader<S>(input: &mut S, hdr: &FsSurfaceHeader) -> Result<BrainMesh>
    where
        S: Read,
    {
        let num_coords = element_count(hdr.num_vertices, 3)?;
        let mut vertex_data: Vec<f32> = Vec::with_capacity(num_coords.min(MAX_PREALLOC));
        {
            let mut input = ByteOrdered::be(&mut *input);
            if hdr.magic() == QUAD_MAGIC_FILE_TYPE_NUMBER {
                // Old quad files store coordinates as i16 in units of 1/100 mm.
                for _ in 0..num_coords {
                    vertex_data.push(input.read_i16()? as f32 / 100.0);
                }
            } else {
                for _ in 0..num_coords {
                    vertex_data.push(input.read_f32()?);
                }
            }
        }

        let num_quads = element_count(hdr.num_faces, 1)? / 2;
        let num_indices = element_count(hdr.num_faces, 3)?;
        let mut face_data: Vec<i32> = Vec::with_capacity(num_indices.min(MAX_PREALLOC));
        for _ in 0..num_quads {
            let q = [
                read_fs_int24(input)?,
                read_fs_int24(input)?,
                read_fs_int24(input)?,
                read_fs_int24(input)?,
            ];
            face_data.extend_from_slice(&split_quad(q));
        }

        Ok(BrainMesh {
            vertices: vertex_data,
            faces: face_data,
        })
    }

    /// Write this surface in FreeSurfer triangle format. The header is rebuilt from the mesh,
    /// only its info line is kept.
    pub fn to_writer<W>(&self, output: &mut W) -> Result<()>
    where
        W: Write,
    {
        let info_line = self.header.info_line.replace('\n', " ");
        output.write_all(&fs_int24_bytes(TRIS_MAGIC_FILE_TYPE_NUMBER))?;
        output.write_all(info_line.as_bytes())?;
        output.write_all(b"\n\n")?;

        let mut output = ByteOrdered::be(output);
        output.write_i32(self.mesh.num_vertices() as i32)?;
        output.write_i32(self.mesh.num_faces() as i32)?;
        for coord in self.mesh.vertices.iter() {
            output.write_f32(*coord)?;
        }
        for idx in self.mesh.faces.iter() {
            output.write_i32(*idx)?;
        }
        Ok(())
    }
}

/// Number of values stored for `count` items of `per_item` values each, as given in a header.
fn element_count(count: i32, per_item: usize) -> Result<usize> {
    if count < 0 {
        return Err(SurfPlotError::InvalidFsSurfaceFormat);
    }
    (count as usize)
        .checked_mul(per_item)
        .ok_or(SurfPlotError::InvalidFsSurfaceFormat)
}

/// Split a quad into two triangles. The diagonal depends on the parity of the first vertex index.
fn split_quad(q: [i32; 4]) -> [i32; 6] {
    if q[0] % 2 == 0 {
        [q[0], q[1], q[3], q[2], q[3], q[1]]
    } else {
        [q[0], q[1], q[2], q[0], q[2], q[3]]
    }
}
