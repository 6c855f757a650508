/// Scoped Win32 device handles.
///
/// Every device opened during discovery is wrapped in a guard whose
/// `Drop` closes it, so a query that bails out early still releases the
/// handle before the next device is opened.
use std::ffi::c_void;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
};
use windows::Win32::System::IO::DeviceIoControl;

const GENERIC_READ: u32 = 0x8000_0000;

/// NUL-terminated UTF-16 copy of `s` for `PCWSTR` arguments.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// String up to the first NUL of a UTF-16 buffer.
pub(crate) fn from_wide(buf: &[u16]) -> String {
    String::from_utf16_lossy(&buf[..buf.iter().position(|&c| c == 0).unwrap_or(buf.len())])
}

/// An open device, closed on drop.
pub(crate) struct DeviceHandle {
    raw: HANDLE,
    path: String,
}

impl DeviceHandle {
    /// Open a device for attribute queries only (no read access needed).
    pub(crate) fn open_for_query(path: &str) -> windows::core::Result<Self> {
        Self::open(path, 0)
    }

    /// Open a device with read access.
    pub(crate) fn open_for_read(path: &str) -> windows::core::Result<Self> {
        Self::open(path, GENERIC_READ)
    }

    fn open(path: &str, access: u32) -> windows::core::Result<Self> {
        let path_wide = wide(path);
        let raw = unsafe {
            CreateFileW(
                PCWSTR(path_wide.as_ptr()),
                access,
                FILE_SHARE_READ | FILE_SHARE_WRITE,
                None,
                OPEN_EXISTING,
                Default::default(),
                None,
            )
        }?;
        Ok(Self {
            raw,
            path: path.to_string(),
        })
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    /// Issue an IOCTL and return the bytes the driver reported as written.
    ///
    /// `input` is passed through as the raw input buffer; `out` receives
    /// the output and the returned slice is trimmed to the reported length.
    pub(crate) fn ioctl<'a>(
        &self,
        code: u32,
        input: Option<&[u8]>,
        out: &'a mut [u8],
    ) -> windows::core::Result<&'a [u8]> {
        let mut bytes_returned: u32 = 0;
        let (in_ptr, in_len) = match input {
            Some(bytes) => (Some(bytes.as_ptr() as *const c_void), bytes.len() as u32),
            None => (None, 0),
        };
        unsafe {
            DeviceIoControl(
                self.raw,
                code,
                in_ptr,
                in_len,
                Some(out.as_mut_ptr() as *mut c_void),
                out.len() as u32,
                Some(&mut bytes_returned),
                None,
            )
        }?;
        let len = (bytes_returned as usize).min(out.len());
        Ok(&out[..len])
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.raw);
        }
    }
}
