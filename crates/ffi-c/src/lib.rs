//! C ABI over the BLAKE3 multihash core.
//!
//! Streams are opaque heap handles: `b3mh_stream_new` allocates,
//! `b3mh_stream_dispose` releases the engine state (later calls report
//! `B3MH_ERR_DISPOSED`), and `b3mh_stream_free` releases the handle itself.
//! Every function returns a status code; null pointers are `INVALID_ARG`.

use std::ffi::{c_char, CString};
use std::slice;

use b3mh_corelib::{self as core, HashError, StreamingHasher, SyncHasher};

mod error;
mod ffi_json;

pub use error::{
    ErrorCode, B3MH_ERR_ACTIVATION, B3MH_ERR_BUFFER_TOO_SMALL, B3MH_ERR_DISPOSED,
    B3MH_ERR_INTERNAL, B3MH_ERR_INVALID_ARG, B3MH_OK,
};
pub use ffi_json::{err, ok, with_field, Envelope};

/// Opaque stream handle.
pub struct B3mhStream {
    hasher: StreamingHasher,
}

fn status(result: Result<(), HashError>) -> i32 {
    match result {
        Ok(()) => B3MH_OK,
        Err(e) => ErrorCode::from(&e).code(),
    }
}

fn engine() -> Result<SyncHasher, i32> {
    core::activate_blocking().map_err(|_| B3MH_ERR_ACTIVATION)
}

// A null pointer is only acceptable for an empty input.
unsafe fn input<'a>(data: *const u8, len: usize) -> Option<&'a [u8]> {
    if len == 0 {
        Some(&[])
    } else if data.is_null() {
        None
    } else {
        Some(slice::from_raw_parts(data, len))
    }
}

unsafe fn output<'a>(data: *mut u8, len: usize) -> Option<&'a mut [u8]> {
    if data.is_null() {
        None
    } else {
        Some(slice::from_raw_parts_mut(data, len))
    }
}

/// Activate the engine. Idempotent.
#[no_mangle]
pub extern "C" fn b3mh_init() -> i32 {
    match engine() {
        Ok(_) => B3MH_OK,
        Err(code) => code,
    }
}

/// # Safety
/// `out` must be valid for one pointer write.
#[no_mangle]
pub unsafe extern "C" fn b3mh_stream_new(out: *mut *mut B3mhStream) -> i32 {
    if out.is_null() {
        return B3MH_ERR_INVALID_ARG;
    }
    let sync = match engine() {
        Ok(sync) => sync,
        Err(code) => return code,
    };
    let stream = Box::new(B3mhStream {
        hasher: sync.stream(),
    });
    *out = Box::into_raw(stream);
    B3MH_OK
}

/// # Safety
/// `stream` must come from `b3mh_stream_new` and not be freed; `data` must
/// point to `len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn b3mh_stream_write(
    stream: *mut B3mhStream,
    data: *const u8,
    len: usize,
) -> i32 {
    let (Some(stream), Some(bytes)) = (stream.as_mut(), input(data, len)) else {
        return B3MH_ERR_INVALID_ARG;
    };
    status(stream.hasher.write(bytes).map(|_| ()))
}

/// # Safety
/// `stream` must be live; `out` must be valid for one `u64` write.
#[no_mangle]
pub unsafe extern "C" fn b3mh_stream_count(stream: *const B3mhStream, out: *mut u64) -> i32 {
    let Some(stream) = stream.as_ref() else {
        return B3MH_ERR_INVALID_ARG;
    };
    if out.is_null() {
        return B3MH_ERR_INVALID_ARG;
    }
    match stream.hasher.count() {
        Ok(n) => {
            *out = n;
            B3MH_OK
        }
        Err(e) => ErrorCode::from(&e).code(),
    }
}

/// Write the stream's current digest at `out[offset..]`.
///
/// # Safety
/// `stream` must be live; `out` must point to `out_len` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn b3mh_stream_digest_into(
    stream: *mut B3mhStream,
    out: *mut u8,
    out_len: usize,
    offset: usize,
    as_multihash: bool,
) -> i32 {
    let (Some(stream), Some(buf)) = (stream.as_mut(), output(out, out_len)) else {
        return B3MH_ERR_INVALID_ARG;
    };
    status(
        stream
            .hasher
            .digest_into(buf, offset, as_multihash)
            .map(|_| ()),
    )
}

/// # Safety
/// `stream` must be live.
#[no_mangle]
pub unsafe extern "C" fn b3mh_stream_reset(stream: *mut B3mhStream) -> i32 {
    let Some(stream) = stream.as_mut() else {
        return B3MH_ERR_INVALID_ARG;
    };
    status(stream.hasher.reset().map(|_| ()))
}

/// Release the engine state. The handle stays allocated until
/// `b3mh_stream_free`; every other call on it reports `B3MH_ERR_DISPOSED`.
///
/// # Safety
/// `stream` must be live.
#[no_mangle]
pub unsafe extern "C" fn b3mh_stream_dispose(stream: *mut B3mhStream) -> i32 {
    let Some(stream) = stream.as_mut() else {
        return B3MH_ERR_INVALID_ARG;
    };
    stream.hasher.dispose();
    B3MH_OK
}

/// # Safety
/// `stream` must come from `b3mh_stream_new` and must not be used afterwards.
/// Null is ignored.
#[no_mangle]
pub unsafe extern "C" fn b3mh_stream_free(stream: *mut B3mhStream) {
    if !stream.is_null() {
        drop(Box::from_raw(stream));
    }
}

/// One-shot digest of `input[..input_len]` written at `out[offset..]`.
///
/// # Safety
/// `input` must point to `input_len` readable bytes and `out` to `out_len`
/// writable bytes. The two regions must not overlap.
#[no_mangle]
pub unsafe extern "C" fn b3mh_digest_into(
    input_ptr: *const u8,
    input_len: usize,
    out: *mut u8,
    out_len: usize,
    offset: usize,
    as_multihash: bool,
) -> i32 {
    let (Some(bytes), Some(buf)) = (input(input_ptr, input_len), output(out, out_len)) else {
        return B3MH_ERR_INVALID_ARG;
    };
    match engine() {
        Ok(sync) => status(sync.digest_into(bytes, buf, offset, as_multihash)),
        Err(code) => code,
    }
}

/// JSON envelope with `multicodec`, `size`, `name` and `version`.
/// Release with `b3mh_string_free`.
///
/// # Safety
/// `out` must be valid for one pointer write.
#[no_mangle]
pub unsafe extern "C" fn b3mh_info_json(out: *mut *mut c_char) -> i32 {
    if out.is_null() {
        return B3MH_ERR_INVALID_ARG;
    }
    let envelope = with_field(ok(), "multicodec", core::CODE);
    let envelope = with_field(envelope, "size", core::SIZE);
    let envelope = with_field(envelope, "name", core::NAME);
    let envelope = with_field(envelope, "version", core::version());
    *out = envelope.into_cstring().into_raw();
    B3MH_OK
}

/// # Safety
/// `s` must come from this library (or be null).
#[no_mangle]
pub unsafe extern "C" fn b3mh_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
