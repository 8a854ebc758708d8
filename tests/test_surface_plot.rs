use blmm_surfplot::{
    read_surf, read_vertex_data, result_file_in, surface_figure, write_surf, BrainMesh, DataType,
    FsSurface, PlotOptions, SurfPlotError,
};

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// A square made of two triangles, shifted along x.
fn write_square(path: &Path, shift: f32) {
    let mesh = BrainMesh {
        vertices: vec![
            shift, 0.0, 0.0, shift + 1.0, 0.0, 0.0, shift + 1.0, 1.0, 0.0, shift, 1.0, 0.0,
        ],
        faces: vec![0, 1, 2, 0, 2, 3],
    };
    write_surf(path, &FsSurface::from_mesh(mesh)).unwrap();
}

fn write_le<T: Copy>(path: &Path, values: &[T], to_bytes: fn(T) -> [u8; 4]) {
    let bytes: Vec<u8> = values.iter().flat_map(|v| to_bytes(*v).to_vec()).collect();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn two_hemispheres_share_one_color_range() {
    let dir = tempdir().unwrap();
    let lh_geom = dir.path().join("lh.pial");
    let rh_geom = dir.path().join("rh.pial.gz");
    write_square(&lh_geom, 0.0);
    write_square(&rh_geom, 2.0);

    let lh_data = result_file_in(dir.path(), "foo", "left", "beta").unwrap();
    let rh_data = result_file_in(dir.path(), "foo", "right", "beta").unwrap();
    write_le(&lh_data, &[0.0f32, 1.0, 2.0, 3.0], f32::to_le_bytes);
    write_le(&rh_data, &[-5.0f32, 0.5, 9.0, 1.0], f32::to_le_bytes);

    let fig = surface_figure(
        &[&lh_data, &rh_data],
        &[&lh_geom, &rh_geom],
        &PlotOptions::default(),
    )
    .unwrap();

    assert_eq!(2, fig.data.len());
    for trace in fig.data.iter() {
        assert_eq!(Some(-5.0), trace.cmin);
        assert_eq!(Some(9.0), trace.cmax);
        assert_eq!("blmm_vox_beta", trace.name);
    }
    assert!(!fig.data[0].showscale);
    assert!(fig.data[1].showscale);
    assert_eq!(vec![2.0, 3.0, 3.0, 2.0], fig.data[1].x);
    assert_eq!(vec![-5.0, 0.5, 9.0, 1.0], fig.data[1].intensity);
    assert_eq!(
        "Brain Surface Visualization: blmm_vox_beta, Volume 0",
        fig.layout.title.text
    );
}

#[test]
fn integer_result_kinds_are_read_as_integers() {
    let dir = tempdir().unwrap();
    let geom = dir.path().join("lh.white");
    write_square(&geom, 0.0);

    for image in &["n", "mask", "edf"] {
        let data: PathBuf = result_file_in(dir.path(), "foo", "LEFT", image).unwrap();
        write_le(&data, &[3i32, 0, 12, 7], i32::to_le_bytes);

        // The requested float type is ignored for these files.
        let fig = surface_figure(&[&data], &[&geom], &PlotOptions::default()).unwrap();
        assert_eq!(vec![3.0, 0.0, 12.0, 7.0], fig.data[0].intensity);
        assert_eq!(Some(0.0), fig.data[0].cmin);
        assert_eq!(Some(12.0), fig.data[0].cmax);
    }
}

#[test]
fn customdata_holds_rounded_intensities() {
    let dir = tempdir().unwrap();
    let geom = dir.path().join("lh.white");
    write_square(&geom, 0.0);
    let data = dir.path().join("blmm_vox_conT.dat");
    write_le(&data, &[0.123f32, 1.987, -2.555, f32::NAN], f32::to_le_bytes);

    let fig = surface_figure(&[&data], &[&geom], &PlotOptions::default()).unwrap();
    let trace = &fig.data[0];
    assert_eq!(vec![0.12, 1.99], trace.customdata[..2].to_vec());
    assert!(trace.customdata[3].is_nan());
    assert_eq!(Some(-2.555f32 as f64), trace.cmin);

    let json: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
    assert!(json["data"][0]["intensity"][3].is_null());
}

#[test]
fn errors_propagate_to_the_caller() {
    let dir = tempdir().unwrap();
    let geom = dir.path().join("lh.white");
    write_square(&geom, 0.0);
    let data = dir.path().join("blmm_vox_beta.dat");
    write_le(&data, &[1.0f32, 2.0, 3.0], f32::to_le_bytes);

    assert!(matches!(
        surface_figure(&[&data], &[&geom, &geom], &PlotOptions::default()),
        Err(SurfPlotError::FileCountMismatch { data: 1, geom: 2 })
    ));
    assert!(matches!(
        surface_figure(&[&data], &[&geom], &PlotOptions::default()),
        Err(SurfPlotError::DataShape { .. })
    ));
    assert!(matches!(
        surface_figure(&[&data], &[dir.path().join("rh.white")], &PlotOptions::default()),
        Err(SurfPlotError::Io(_))
    ));
}

#[test]
fn surfaces_and_data_can_be_read_directly() {
    let dir = tempdir().unwrap();
    let geom = dir.path().join("lh.white");
    write_square(&geom, 0.0);
    let data = dir.path().join("blmm_vox_beta.dat");
    write_le(&data, &[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], f32::to_le_bytes);

    let surf = read_surf(&geom).unwrap();
    assert_eq!(4, surf.mesh.num_vertices());
    assert_eq!(2, surf.mesh.num_faces());

    let values = read_vertex_data(&data, surf.mesh.num_vertices(), DataType::Float32).unwrap();
    assert_eq!(2, values.num_volumes());
    assert_eq!(vec![2.0, 4.0, 6.0, 8.0], values.volume(1).unwrap().to_vec());
}
