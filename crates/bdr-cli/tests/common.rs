#![allow(dead_code)]

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use assert_cmd::assert::Assert;
use serde_json::Value;
use tempfile::TempDir;

pub const FLAG_VARS: [&str; 2] = ["SANIC_NO_UJSON", "SANIC_NO_UVLOOP"];

pub fn prepare_fixture(prefix: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let dst = temp.path().join("sanic_tree");
    copy_dir_all(&fixture_source(), &dst).expect("copy fixture");
    (temp, dst)
}

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

pub fn fixture_source() -> PathBuf {
    workspace_root().join("fixtures").join("sanic_tree")
}

fn copy_dir_all(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

pub fn parse_json(assert: &Assert) -> Value {
    let output = assert.get_output();
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "invalid json ({err}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

pub fn string_array(value: &Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item.as_str().expect("string").to_string())
        .collect()
}
