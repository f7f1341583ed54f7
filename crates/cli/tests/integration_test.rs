use binq_cli::commands::{inspect, pack, unpack, verify};
use binq_cli::config::CodecConfig;
use binq_cli::tensor_file;
use binq_kernel::types::DType;
use binq_kernel::WordLayout;
use binq_persistence::{container, fixtures, PackedTensor};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_integration_workflow() {
    let dir = tempdir().unwrap();
    let paths = fixtures::generate_test_scenario(dir.path()).unwrap();

    // Inspect reports every file, including a missing one, without failing.
    let result = inspect::run(&[
        paths.float.clone(),
        paths.int8.clone(),
        paths.corrupt.clone(),
        dir.path().join("absent.binq"),
    ]);
    assert!(result.is_ok());

    assert!(verify::run(&paths.float).is_ok(), "Verification should succeed on valid fixtures");
    assert!(verify::run(&paths.bool).is_ok());
    assert!(verify::run(&paths.corrupt).is_err(), "Flipped payload bit must be detected");
}

#[test]
fn test_pack_unpack_float() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("dense.json");
    fs::write(
        &input,
        r#"{ "dtype": "float32", "shape": [2, 3], "data": [0.5, -1.0, 0.0, -0.0, -2.5, 3.0] }"#,
    )
    .unwrap();

    let packed_path = dir.path().join("dense.binq");
    let packed = pack::run(&input, &packed_path, CodecConfig::default()).unwrap();
    assert_eq!(packed.words, vec![0b010, 0b010]);
    assert_eq!(packed.header.source_dtype, DType::Float32);

    let out = dir.path().join("restored.json");
    let restored = unpack::run(
        &packed_path,
        &out,
        unpack::UnpackOptions {
            dtype: None,
            scale: None,
            zero_point: None,
        },
    )
    .unwrap();
    assert_eq!(restored.values::<f32>().unwrap(), &[1.0, -1.0, 1.0, 1.0, -1.0, 1.0]);

    let reread = tensor_file::read(&out).unwrap();
    assert_eq!(reread, restored);
}

#[test]
fn test_threshold_and_word_bits() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("dense.json");
    fs::write(
        &input,
        r#"{ "dtype": "float32", "shape": [5], "data": [0.1, 0.9, 0.4, 0.6, 0.5] }"#,
    )
    .unwrap();

    let config = CodecConfig {
        word_bits: 4,
        float_threshold: 0.5,
    };
    let packed = pack::run(&input, &dir.path().join("p.binq"), config).unwrap();
    assert_eq!(packed.header.word_bits, 4);
    assert_eq!(packed.words, vec![0b0101, 0b0]);

    let bad = CodecConfig {
        word_bits: 3,
        float_threshold: 0.0,
    };
    assert!(pack::run(&input, &dir.path().join("q.binq"), bad).is_err());
}

#[test]
fn test_unpack_int8_with_quantization() {
    let dir = tempdir().unwrap();
    let paths = fixtures::generate_test_scenario(dir.path()).unwrap();
    let out = dir.path().join("int8.json");

    let restored = unpack::run(
        &paths.int8,
        &out,
        unpack::UnpackOptions {
            dtype: Some(DType::Int8),
            scale: Some(0.25),
            zero_point: Some(-126),
        },
    )
    .unwrap();

    // offset 4: bit 0 -> -122, bit 1 -> clamped to -128.
    assert_eq!(
        restored.values::<i8>().unwrap(),
        &[-128, -122, -122, -122, -128, -122, -128, -128, -122]
    );

    let bad_scale = unpack::UnpackOptions {
        dtype: Some(DType::Int8),
        scale: Some(0.0),
        zero_point: None,
    };
    assert!(unpack::run(&paths.int8, &out, bad_scale).is_err());
}

#[test]
fn test_unpack_rejects_corrupt_container() {
    let dir = tempdir().unwrap();
    let paths = fixtures::generate_test_scenario(dir.path()).unwrap();
    let options = unpack::UnpackOptions {
        dtype: Some(DType::Bool),
        scale: None,
        zero_point: None,
    };
    assert!(unpack::run(&paths.corrupt, &dir.path().join("x.json"), options).is_err());

    let flags = unpack::run(&paths.bool, &dir.path().join("b.json"), options).unwrap();
    assert_eq!(
        flags.values::<bool>().unwrap(),
        &[true, false, false, true, true, false]
    );
    assert!(container::read_header(&paths.bool).is_ok());
}

#[test]
fn test_bad_tensor_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.json");
    fs::write(&input, r#"{ "dtype": "int8", "shape": [2], "data": [1, 300] }"#).unwrap();
    assert!(pack::run(&input, &dir.path().join("o.binq"), CodecConfig::default()).is_err());

    fs::write(&input, r#"{ "dtype": "bool", "shape": [3], "data": [true, false] }"#).unwrap();
    assert!(pack::run(&input, &dir.path().join("o.binq"), CodecConfig::default()).is_err());
}

#[test]
fn test_empty_tensor_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.json");
    fs::write(&input, r#"{ "dtype": "float32", "shape": [2, 0], "data": [] }"#).unwrap();

    let packed_path = dir.path().join("empty.binq");
    let packed = pack::run(&input, &packed_path, CodecConfig::default()).unwrap();
    assert!(packed.words.is_empty());
    assert_eq!(packed.header.packed_shape().unwrap(), vec![2, 0]);

    let out = dir.path().join("empty_out.json");
    let restored = unpack::run(
        &packed_path,
        &out,
        unpack::UnpackOptions {
            dtype: None,
            scale: None,
            zero_point: None,
        },
    )
    .unwrap();
    assert_eq!(restored.shape(), &[2, 0]);

    // A file the CLI wrote itself must read back.
    let reread = tensor_file::read(&out).unwrap();
    assert_eq!(reread.dtype(), DType::Float32);
    assert_eq!(reread.shape(), &[2, 0]);

    fs::write(&input, r#"{ "dtype": "int8", "shape": [0], "data": [] }"#).unwrap();
    assert_eq!(tensor_file::read(&input).unwrap().dtype(), DType::Int8);
    fs::write(&input, r#"{ "dtype": "bool", "shape": [0], "data": [] }"#).unwrap();
    assert_eq!(tensor_file::read(&input).unwrap().dtype(), DType::Bool);
}

#[test]
fn test_verify_rejects_bits_above_word_width() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide.binq");
    let narrow = WordLayout::new(4).unwrap();

    // Checksum matches the payload, but bit 4 lies outside a 4-bit word.
    let packed = PackedTensor::new(narrow, DType::Float32, &[1, 6], vec![0b1_0000, 0]).unwrap();
    container::write_file(&path, &packed).unwrap();

    assert!(verify::run(&path).is_err());
    assert!(container::read_file(&path).is_err());

    let clean = PackedTensor::new(narrow, DType::Float32, &[1, 6], vec![0b1010, 0b01]).unwrap();
    container::write_file(&path, &clean).unwrap();
    assert!(verify::run(&path).is_ok());
}

#[test]
fn test_inspect_row_reports_status_and_version() {
    let dir = tempdir().unwrap();
    let paths = fixtures::generate_test_scenario(dir.path()).unwrap();
    let header = container::read_header(&paths.int8).unwrap();

    let row = inspect::header_row("int8.binq".to_string(), &header);
    assert_eq!(row[1], "OK");
    assert_eq!(row[2], "1");
    assert_eq!(row[3], "int8");
    assert_eq!(row[4], "[3, 3]");
    assert_eq!(row[5], "[3, 1]");
    assert_eq!(row[6], "8");
}
