//! Socket inode extraction from fd listings.
//!
//! A process's open sockets appear under `/proc/<pid>/fd` as symlinks
//! with targets of the form `socket:[12345]`. The same shape shows up in
//! `ls -l` output when the listing is taken through an exec channel, so
//! the extraction works line by line on arbitrary listing text.

/// Extracts the inode number from a single `socket:[N]` occurrence.
///
/// Returns `None` when the text holds no well-formed socket marker —
/// pipes, regular files, and anonymous inodes all fall through here.
#[must_use]
pub fn extract_socket_inode(target: &str) -> Option<&str> {
    let (_, rest) = target.split_once("socket:[")?;
    let (inode, _) = rest.split_once(']')?;
    if inode.is_empty() || !inode.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(inode)
}

/// Collects every socket inode referenced in an fd listing, one candidate
/// per line.
#[must_use]
pub fn parse_fd_listing(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(extract_socket_inode)
        .map(ToString::to_string)
        .collect()
}
