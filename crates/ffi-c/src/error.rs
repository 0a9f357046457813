use b3mh_corelib::HashError;

#[repr(i32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    Ok = 0,
    InvalidArg = 1,
    Activation = 2,
    Disposed = 3,
    BufferTooSmall = 4,
    Internal = 5,
}

impl ErrorCode {
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl From<&HashError> for ErrorCode {
    fn from(err: &HashError) -> Self {
        match err {
            HashError::Disposed => ErrorCode::Disposed,
            HashError::BufferTooSmall { .. } => ErrorCode::BufferTooSmall,
            HashError::Activation(_) => ErrorCode::Activation,
        }
    }
}

pub const B3MH_OK: i32 = ErrorCode::Ok.code();
pub const B3MH_ERR_INVALID_ARG: i32 = ErrorCode::InvalidArg.code();
pub const B3MH_ERR_ACTIVATION: i32 = ErrorCode::Activation.code();
pub const B3MH_ERR_DISPOSED: i32 = ErrorCode::Disposed.code();
pub const B3MH_ERR_BUFFER_TOO_SMALL: i32 = ErrorCode::BufferTooSmall.code();
pub const B3MH_ERR_INTERNAL: i32 = ErrorCode::Internal.code();
