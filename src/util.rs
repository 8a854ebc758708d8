//! Utility functions used in all other blmm_surfplot modules.

use std::io::Read;
use std::path::Path;

use crate::error::Result;

use byteordered::byteorder::ReadBytesExt;

/// Check whether the file extension ends with ".gz".
pub fn is_gz_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// The file name without its last extension, e.g. `blmm_vox_n` for `/some/dir/blmm_vox_n.dat`.
///
/// Returns an empty string for paths without a file name.
pub fn file_stem<P>(path: P) -> String
where
    P: AsRef<Path>,
{
    path.as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a '\n'-terminated line from the input. The newline is consumed, but not added to the
/// returned String. Invalid UTF-8 is replaced with U+FFFD.
pub fn read_line<S>(input: &mut S) -> Result<String>
where
    S: Read,
{
    let mut bytes: Vec<u8> = Vec::new();
    loop {
        let cur_byte = input.read_u8()?;
        if cur_byte == b'\n' {
            break;
        }
        bytes.push(cur_byte);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Interpret three bytes as a single 24 bit integer, FreeSurfer style.
pub fn interpret_fs_int24(b1: u8, b2: u8, b3: u8) -> i32 {
    ((b1 as i32) << 16) + ((b2 as i32) << 8) + b3 as i32
}

/// Read a big endian 24 bit integer from the input.
pub fn read_fs_int24<S>(input: &mut S) -> Result<i32>
where
    S: Read,
{
    let mut b = [0u8; 3];
    input.read_exact(&mut b)?;
    Ok(interpret_fs_int24(b[0], b[1], b[2]))
}

/// The three bytes encoding the given 24 bit integer, FreeSurfer style.
pub fn fs_int24_bytes(value: i32) -> [u8; 3] {
    [
        ((value >> 16) & 0xff) as u8,
        ((value >> 8) & 0xff) as u8,
        (value & 0xff) as u8,
    ]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn gz_files_are_detected_by_name() {
        assert!(is_gz_file("lh.white.gz"));
        assert!(!is_gz_file("/tmp/lh.white"));
        assert!(!is_gz_file("/"));
    }

    #[test]
    fn the_file_stem_drops_directory_and_last_extension() {
        assert_eq!("blmm_vox_n", file_stem("demo/results_lh_foo/blmm_vox_n.dat"));
        assert_eq!("lh.white", file_stem("lh.white.gz"));
        assert_eq!("", file_stem(""));
    }

    #[test]
    fn int24_values_are_interpreted_big_endian() {
        assert_eq!(16777214, interpret_fs_int24(255, 255, 254));
        assert_eq!(16777215, interpret_fs_int24(255, 255, 255));
        assert_eq!(258, interpret_fs_int24(0, 1, 2));
        assert_eq!([255, 255, 253], fs_int24_bytes(16777213));
    }

    #[test]
    fn lines_are_read_up_to_the_newline() {
        let mut input: &[u8] = b"created by nobody\n\nrest";
        assert_eq!("created by nobody", read_line(&mut input).unwrap());
        assert_eq!("", read_line(&mut input).unwrap());
        assert_eq!(&b"rest"[..], input);
    }

    #[test]
    fn lines_are_decoded_as_utf8() {
        let mut input: &[u8] = "created by J\u{fc}rgen on M\u{e4}r 3\n".as_bytes();
        assert_eq!("created by J\u{fc}rgen on M\u{e4}r 3", read_line(&mut input).unwrap());

        let mut input: &[u8] = b"bad \xff byte\n";
        assert_eq!("bad \u{fffd} byte", read_line(&mut input).unwrap());
    }
}
