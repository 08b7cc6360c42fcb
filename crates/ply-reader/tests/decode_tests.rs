//! Tests for reading PLY files from disk in both encodings.

use ply_reader::{FieldKind, HeaderOptions, PlyError, PlyFile};
use test_utils::{temp_test_dir, write_ply, PlyEncoding, SyntheticPly};

fn read_all(ply: &mut PlyFile) -> Vec<Vec<f64>> {
    let mut records = ply.records();
    let mut out = Vec::new();
    while let Some(values) = records.next_record() {
        out.push(values.to_vec());
    }
    out
}

// ============================================================================
// Header tests
// ============================================================================

#[test]
fn test_header_fields_and_zone() {
    let dir = temp_test_dir();
    let path = write_ply(dir.path(), "a.ply", &SyntheticPly::xyz_rgb().zone("31N").binary()).unwrap();

    let ply = PlyFile::open(&path).unwrap();
    let header = ply.header();
    assert!(header.is_binary());
    assert_eq!(header.zone_tag.as_deref(), Some("31N"));
    assert_eq!(header.field_count(), 6);
    assert_eq!(header.fields[0].name, "x");
    assert_eq!(header.fields[3].kind, FieldKind::UInt8);
    assert_eq!(header.record_width(), 27);
    assert_eq!(header.field_index("green"), Some(4));
}

#[test]
fn test_missing_end_header_is_an_error() {
    let dir = temp_test_dir();
    let path = dir.path().join("broken.ply");
    std::fs::write(&path, "ply\nformat ascii 1.0\nproperty float x\nproperty float y\n").unwrap();

    let result = PlyFile::open(&path);
    assert!(matches!(result, Err(PlyError::MissingHeader { .. })));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = temp_test_dir();
    let result = PlyFile::open(dir.path().join("nope.ply"));
    assert!(matches!(result, Err(PlyError::Io(_))));
}

#[test]
fn test_unknown_property_type_is_unsupported() {
    let dir = temp_test_dir();
    let ply = SyntheticPly::new(&[("double", "x"), ("double", "y"), ("quad", "w")]);
    let path = dir.path().join("odd.ply");
    std::fs::write(&path, ply.header_text()).unwrap();

    let result = PlyFile::open(&path);
    assert!(matches!(result, Err(PlyError::UnsupportedLayout { .. })));
}

#[test]
fn test_field_capacity_limit() {
    let dir = temp_test_dir();
    let path = write_ply(dir.path(), "wide.ply", &SyntheticPly::xyz_rgb()).unwrap();

    let options = HeaderOptions { max_fields: Some(3) };
    let result = PlyFile::open_with(&path, &options);
    assert!(matches!(result, Err(PlyError::UnsupportedLayout { .. })));

    let options = HeaderOptions { max_fields: Some(6) };
    assert!(PlyFile::open_with(&path, &options).is_ok());
}

// ============================================================================
// Record tests
// ============================================================================

#[test]
fn test_same_points_in_both_encodings() {
    let dir = temp_test_dir();
    let points = [
        [352_000.25, 4_600_000.5, 101.5, 10.0, 20.0, 30.0],
        [352_001.75, 4_600_002.0, 99.25, 255.0, 0.0, 128.0],
    ];

    for encoding in [PlyEncoding::Ascii, PlyEncoding::Binary] {
        let mut ply = SyntheticPly::xyz_rgb().encoding(encoding);
        for p in &points {
            ply = ply.point(p);
        }
        let path = write_ply(dir.path(), &format!("{:?}.ply", encoding), &ply).unwrap();

        let mut file = PlyFile::open(&path).unwrap();
        let records = read_all(&mut file);
        assert_eq!(records.len(), 2, "{:?}", encoding);
        for (got, want) in records.iter().zip(&points) {
            assert_eq!(got.as_slice(), want.as_slice(), "{:?}", encoding);
        }
    }
}

#[test]
fn test_float32_fields_widen_exactly() {
    let dir = temp_test_dir();
    let ply = SyntheticPly::new(&[("float", "x"), ("float", "y"), ("float", "z")])
        .binary()
        .point(&[0.5, -1.25, 3.0e6]);
    let path = write_ply(dir.path(), "f32.ply", &ply).unwrap();

    let mut file = PlyFile::open(&path).unwrap();
    assert_eq!(read_all(&mut file), vec![vec![0.5, -1.25, 3.0e6]]);
}

#[test]
fn test_truncated_binary_file_stops_cleanly() {
    let dir = temp_test_dir();
    let ply = SyntheticPly::xyz()
        .binary()
        .without_vertex_element()
        .point(&[1.0, 2.0, 3.0])
        .point(&[4.0, 5.0, 6.0]);
    let mut bytes = ply.to_bytes().unwrap();
    bytes.truncate(bytes.len() - 5);
    let path = dir.path().join("cut.ply");
    std::fs::write(&path, bytes).unwrap();

    let mut file = PlyFile::open(&path).unwrap();
    assert_eq!(read_all(&mut file), vec![vec![1.0, 2.0, 3.0]]);
}

#[test]
fn test_ascii_without_vertex_element_reads_to_eof() {
    let dir = temp_test_dir();
    let ply = SyntheticPly::xyz()
        .without_vertex_element()
        .points_xyz((0..100).map(|i| (i as f64, 2.0 * i as f64, 0.5)));
    let path = write_ply(dir.path(), "many.ply", &ply).unwrap();

    let mut file = PlyFile::open(&path).unwrap();
    let records = read_all(&mut file);
    assert_eq!(records.len(), 100);
    assert_eq!(records[99], vec![99.0, 198.0, 0.5]);
}

#[test]
fn test_empty_cloud_has_no_records() {
    let dir = temp_test_dir();
    let path = write_ply(dir.path(), "empty.ply", &SyntheticPly::xyz().binary()).unwrap();

    let mut file = PlyFile::open(&path).unwrap();
    assert!(read_all(&mut file).is_empty());
}

#[test]
fn test_face_element_before_vertices_is_unsupported() {
    let dir = temp_test_dir();
    let path = dir.path().join("faces_first.ply");
    std::fs::write(
        &path,
        "ply\nformat ascii 1.0\nelement face 1\nproperty list uchar int vertex_indices\n\
         element vertex 1\nproperty double x\nproperty double y\nproperty double z\n\
         end_header\n3 0 1 2\n10 20 30\n",
    )
    .unwrap();

    match PlyFile::open(&path) {
        Err(PlyError::UnsupportedLayout { reason, .. }) => assert!(reason.contains("face")),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("file with faces before vertices was accepted"),
    }
}

#[test]
fn test_face_element_after_vertices_is_ignored() {
    let dir = temp_test_dir();
    let path = dir.path().join("faces_last.ply");
    std::fs::write(
        &path,
        "ply\nformat ascii 1.0\nelement vertex 1\nproperty double x\nproperty double y\n\
         property double z\nelement face 1\nproperty list uchar int vertex_indices\n\
         end_header\n10 20 30\n3 0 1 2\n",
    )
    .unwrap();

    let mut file = PlyFile::open(&path).unwrap();
    assert_eq!(read_all(&mut file), vec![vec![10.0, 20.0, 30.0]]);
}
