//! Chat response lines
//!
//! Fixed server notices and formatters for client-bound lines. Lines are
//! returned without their terminator; the writer appends `\n`.

pub const DUPLICATE_HANDLE: &str = "Handle Already In Use";
pub const INVALID_HANDLE: &str = "Invalid Handle";
pub const MALFORMED_INPUT: &str = "Please Enter ValidUser: Message";
pub const LINE_TOO_LONG: &str = "Line Too Long";
pub const ONLINE_USERS_PREFIX: &str = "Online Users";

/// `Online Users <h1> <h2> ...`
pub fn online_users<S: AsRef<str>>(handles: &[S]) -> String {
    let mut line = ONLINE_USERS_PREFIX.to_string();
    for handle in handles {
        line.push(' ');
        line.push_str(handle.as_ref());
    }
    line
}

/// `<from> : <body>`
pub fn delivered_message(from: &str, body: &str) -> String {
    format!("{} : {}", from, body)
}

pub fn recipient_not_found(to: &str) -> String {
    format!("User Not Online: {}", to)
}

pub fn delivery_failed(to: &str) -> String {
    format!("Delivery Failed: {}", to)
}
