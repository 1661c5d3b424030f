// Shared fixtures for the integration tests

use std::io::Write;

use tempfile::NamedTempFile;

/// Canned `wg show <if> dump` output: one interface line followed by two
/// peer rows, the second of which has never completed a handshake.
pub const WG_DUMP: &str = "cHJpdmF0ZQ==\tcHVibGlj\t51820\toff\n\
cGVlcm9uZQ==\t(none)\t203.0.113.10:51820\t10.0.10.2/32\t1724380000\t1048576\t2097152\t25\n\
cGVlcnR3bw==\t(none)\t198.51.100.7:51820\t10.0.10.7/32\t0\t0\t0\toff\n";

/// Writes `content` to a temp file and returns the handle; the file is
/// removed when the handle drops, so keep it alive for the test.
pub fn dump_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp dump file");
    file.write_all(content.as_bytes())
        .expect("failed to write temp dump file");
    file
}

/// A dump invocation that cats the given fixture file.
pub fn dump_command(file: &NamedTempFile) -> Vec<String> {
    vec![
        "cat".to_string(),
        file.path().to_string_lossy().into_owned(),
    ]
}
