use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_b3mh");

// BLAKE3("foobar")
const FOOBAR: &str = "aa51dcd43d5c6c5203ee16906fd6b35db298b9b2e1de3fce81811d4806b76b7d";
// BLAKE3("")
const EMPTY: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

fn run(args: &[&str]) -> (i32, String, String) {
    let out = Command::new(BIN).args(args).output().expect("run");
    let code = out.status.code().unwrap_or(-1);
    (
        code,
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
    )
}

#[test]
fn digest_files_prints_framed_hex() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("empty.bin");
    fs::write(&a, "foobar").unwrap();
    fs::write(&b, "").unwrap();

    let (code, out, err) = run(&["digest", a.to_str().unwrap(), b.to_str().unwrap()]);
    assert_eq!(code, 0, "stderr: {err}");
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("1e20{FOOBAR}  {}", a.display()));
    assert_eq!(lines[1], format!("1e20{EMPTY}  {}", b.display()));
}

#[test]
fn raw_flag_and_config_drop_prefix() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    fs::write(&a, "foobar").unwrap();

    let (code, out, _err) = run(&["digest", "--raw", a.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(out.starts_with(&format!("{FOOBAR}  ")));

    let cfg = dir.path().join("b3mh.toml");
    fs::write(&cfg, "read_chunk_size = 64\nmultihash = false\n").unwrap();
    let (code, out, _err) = run(&["digest", "-c", cfg.to_str().unwrap(), a.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(out.starts_with(&format!("{FOOBAR}  ")));
}

#[test]
fn digest_reads_stdin() {
    let mut child = Command::new(BIN)
        .arg("digest")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"foobar")
        .unwrap();
    let out = child.wait_with_output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert_eq!(stdout.trim_end(), format!("1e20{FOOBAR}  -"));
}

#[test]
fn missing_file_and_bad_config_fail() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let (code, _out, err) = run(&["digest", missing.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(err.contains("opening"), "stderr: {err}");

    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "read_chunk_size = 1\n").unwrap();
    let (code, _out, err) = run(&["digest", "-c", cfg.to_str().unwrap()]);
    assert_ne!(code, 0);
    assert!(err.contains("read_chunk_size"), "stderr: {err}");
}

#[test]
fn info_lists_constants() {
    let (code, out, _err) = run(&["info"]);
    assert_eq!(code, 0);
    assert!(out.contains("name: blake3"));
    assert!(out.contains("code: 0x1e"));
    assert!(out.contains("size: 32"));
}
