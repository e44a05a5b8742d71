//! Response codes
//!
//! Codes sent back on the upload endpoint.

pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const UPLOADED: u16 = 200;
pub const STATUS: u16 = 213;
pub const DELETED: u16 = 250;
pub const TOO_MANY_CONNECTIONS: u16 = 421;
pub const DELETE_FAILED: u16 = 450;
pub const RECORD_FAILED: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const UNPROCESSABLE: u16 = 422;
pub const TOO_LARGE: u16 = 552;

/// Formats a response line
pub fn reply(code: u16, text: &str) -> String {
    format!("{} {}\r\n", code, text)
}
