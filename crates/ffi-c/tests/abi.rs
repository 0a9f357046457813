use libloading::Library;
use serde_json::Value;
use std::env;
use std::ffi::{c_char, c_void, CStr};
use std::path::{Path, PathBuf};

type InitFn = unsafe extern "C" fn() -> i32;
type StreamNewFn = unsafe extern "C" fn(*mut *mut c_void) -> i32;
type StreamWriteFn = unsafe extern "C" fn(*mut c_void, *const u8, usize) -> i32;
type StreamCountFn = unsafe extern "C" fn(*const c_void, *mut u64) -> i32;
type StreamDigestIntoFn = unsafe extern "C" fn(*mut c_void, *mut u8, usize, usize, bool) -> i32;
type StreamFn = unsafe extern "C" fn(*mut c_void) -> i32;
type StreamFreeFn = unsafe extern "C" fn(*mut c_void);
type DigestIntoFn = unsafe extern "C" fn(*const u8, usize, *mut u8, usize, usize, bool) -> i32;
type InfoFn = unsafe extern "C" fn(*mut *mut c_char) -> i32;
type StringFreeFn = unsafe extern "C" fn(*mut c_char);

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .canonicalize()
        .expect("workspace root must resolve")
}

fn library_names() -> &'static [&'static str] {
    if cfg!(target_os = "windows") {
        &["b3mh.dll"]
    } else if cfg!(target_os = "macos") {
        &["libb3mh.dylib"]
    } else {
        &["libb3mh.so"]
    }
}

fn find_library() -> Option<PathBuf> {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "debug".into());
    let target = env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| workspace_root().join("target"));
    let candidates = [target.join(&profile), target.join(&profile).join("deps")];

    candidates
        .iter()
        .flat_map(|dir| library_names().iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.exists())
}

// The cdylib is only present when cargo built it alongside the rlib; skip
// rather than fail on toolchains that did not.
fn load_library() -> Option<Library> {
    let Some(path) = find_library() else {
        eprintln!("libb3mh cdylib not found; skipping ABI test");
        return None;
    };
    Some(unsafe { Library::new(path) }.expect("failed to load libb3mh"))
}

#[test]
fn exports_expected_symbols() {
    let Some(lib) = load_library() else { return };
    unsafe {
        lib.get::<InitFn>(b"b3mh_init\0").expect("b3mh_init missing");
        lib.get::<StreamNewFn>(b"b3mh_stream_new\0")
            .expect("b3mh_stream_new missing");
        lib.get::<StreamWriteFn>(b"b3mh_stream_write\0")
            .expect("b3mh_stream_write missing");
        lib.get::<StreamCountFn>(b"b3mh_stream_count\0")
            .expect("b3mh_stream_count missing");
        lib.get::<StreamDigestIntoFn>(b"b3mh_stream_digest_into\0")
            .expect("b3mh_stream_digest_into missing");
        lib.get::<StreamFn>(b"b3mh_stream_reset\0")
            .expect("b3mh_stream_reset missing");
        lib.get::<StreamFn>(b"b3mh_stream_dispose\0")
            .expect("b3mh_stream_dispose missing");
        lib.get::<StreamFreeFn>(b"b3mh_stream_free\0")
            .expect("b3mh_stream_free missing");
        lib.get::<DigestIntoFn>(b"b3mh_digest_into\0")
            .expect("b3mh_digest_into missing");
        lib.get::<InfoFn>(b"b3mh_info_json\0")
            .expect("b3mh_info_json missing");
        lib.get::<StringFreeFn>(b"b3mh_string_free\0")
            .expect("b3mh_string_free missing");
    }
}

#[test]
fn streamed_digest_through_dynamic_library() {
    let Some(lib) = load_library() else { return };
    unsafe {
        let new: libloading::Symbol<StreamNewFn> = lib.get(b"b3mh_stream_new\0").unwrap();
        let write: libloading::Symbol<StreamWriteFn> = lib.get(b"b3mh_stream_write\0").unwrap();
        let count: libloading::Symbol<StreamCountFn> = lib.get(b"b3mh_stream_count\0").unwrap();
        let digest_into: libloading::Symbol<StreamDigestIntoFn> =
            lib.get(b"b3mh_stream_digest_into\0").unwrap();
        let dispose: libloading::Symbol<StreamFn> = lib.get(b"b3mh_stream_dispose\0").unwrap();
        let free: libloading::Symbol<StreamFreeFn> = lib.get(b"b3mh_stream_free\0").unwrap();

        let mut stream: *mut c_void = std::ptr::null_mut();
        assert_eq!(new(&mut stream), 0);
        assert_eq!(write(stream, b"foobar".as_ptr(), 6), 0);

        let mut n = 0u64;
        assert_eq!(count(stream, &mut n), 0);
        assert_eq!(n, 6);

        let mut buf = [0u8; 34];
        assert_eq!(digest_into(stream, buf.as_mut_ptr(), buf.len(), 0, true), 0);
        assert_eq!(&buf[..2], &[0x1e, 32]);
        assert_eq!(&buf[2..], blake3_foobar());

        assert_eq!(dispose(stream), 0);
        assert_eq!(write(stream, b"x".as_ptr(), 1), 3, "disposed stream");
        free(stream);
    }
}

#[test]
fn info_json_over_dynamic_library() {
    let Some(lib) = load_library() else { return };
    unsafe {
        let info: libloading::Symbol<InfoFn> = lib.get(b"b3mh_info_json\0").unwrap();
        let free: libloading::Symbol<StringFreeFn> = lib.get(b"b3mh_string_free\0").unwrap();

        let mut out: *mut c_char = std::ptr::null_mut();
        assert_eq!(info(&mut out), 0, "b3mh_info_json must return B3MH_OK");
        assert!(!out.is_null());
        let json = CStr::from_ptr(out).to_str().expect("UTF-8 info JSON").to_owned();
        free(out);

        let value: Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["name"], Value::from("blake3"));
        assert_eq!(
            value["version"],
            Value::from(env!("CARGO_PKG_VERSION")),
            "version field must match crate semver"
        );
    }
}

// BLAKE3("foobar")
fn blake3_foobar() -> Vec<u8> {
    hex::decode("aa51dcd43d5c6c5203ee16906fd6b35db298b9b2e1de3fce81811d4806b76b7d").unwrap()
}
