use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use walkdir::WalkDir;

const CATALOG: &str = r#"{
    "source": "server",
    "resources": [{
        "urn": "E1_DICOM",
        "uri": "/data/experiments/E1/resources/DICOM",
        "label": "DICOM",
        "parent_files": [{"label": "DICOM", "uri": "/archive/p/E1/DICOM/catalog.xml"}],
        "files": [
            {"path": "/archive/p/E1/DICOM/a.dcm"},
            {"path": "/archive/p/E1/DICOM/sub/b.dcm"}
        ]
    }]
}"#;

fn site() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let dicom = tmp.path().join("server/archive/p/E1/DICOM");
    fs::create_dir_all(dicom.join("sub")).unwrap();
    fs::write(dicom.join("a.dcm"), b"scan-a").unwrap();
    fs::write(dicom.join("sub/b.dcm"), b"scan-b").unwrap();
    fs::write(tmp.path().join("catalog.json"), CATALOG).unwrap();
    tmp
}

fn mirrordev(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mirrordev"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(["--rootdir", "mirror", "--archive-root", "/archive"])
        .args(args)
        .output()
        .unwrap()
}

fn lines(out: &Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn files_under(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect()
}

#[test]
fn path_translates() {
    let tmp = site();
    let out = mirrordev(tmp.path(), &["path", "/archive/subj1/scan1.dcm"]);
    assert!(out.status.success());
    assert_eq!(lines(&out), vec!["mirror/subj1/scan1.dcm"]);
}

#[test]
fn path_outside_root_fails() {
    let tmp = site();
    let out = mirrordev(tmp.path(), &["path", "/other/scan1.dcm"]);
    assert!(!out.status.success());
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("does not start with root /archive"), "{err}");
}

#[test]
fn get_resource_fills_mirror_and_copies() {
    let tmp = site();
    let out = mirrordev(
        tmp.path(),
        &["get-resource", "--catalog", "catalog.json", "--resource", "E1_DICOM", "--dest", "copy"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(lines(&out), vec!["copy/a.dcm", "copy/sub/b.dcm"]);
    assert_eq!(
        files_under(&tmp.path().join("copy")),
        vec![PathBuf::from("a.dcm"), PathBuf::from("sub/b.dcm")]
    );
    assert_eq!(
        files_under(&tmp.path().join("mirror")),
        vec![
            PathBuf::from("p/E1/DICOM/a.dcm"),
            PathBuf::from("p/E1/DICOM/sub/b.dcm"),
        ]
    );
}

#[test]
fn get_resource_zip_and_status() {
    let tmp = site();
    let out = mirrordev(
        tmp.path(),
        &["get-resource", "--catalog", "catalog.json", "--resource", "E1_DICOM", "--zip", "--dest", "zips"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(lines(&out), vec!["zips/DICOM.zip"]);
    assert!(tmp.path().join("zips/DICOM.zip").is_file());

    let out = mirrordev(
        tmp.path(),
        &["status", "--catalog", "catalog.json", "--resource", "E1_DICOM"],
    );
    assert!(out.status.success());
    let l = lines(&out);
    assert_eq!(l[0], "E1_DICOM  Directory");
    assert!(l[1..].iter().all(|r| r.starts_with("present")));
}

#[test]
fn get_file_fetches_one() {
    let tmp = site();
    let out = mirrordev(
        tmp.path(),
        &[
            "get-file",
            "--catalog",
            "catalog.json",
            "--resource",
            "E1_DICOM",
            "--file",
            "/archive/p/E1/DICOM/sub/b.dcm",
        ],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(lines(&out), vec!["mirror/p/E1/DICOM/sub/b.dcm"]);
    assert_eq!(
        files_under(&tmp.path().join("mirror")),
        vec![PathBuf::from("p/E1/DICOM/sub/b.dcm")]
    );
}
