//! TCP state classification.

use std::fmt;

use crate::error::NetscanError;

/// Kernel TCP socket states, as encoded by the 2-hex-digit `st` column of
/// the socket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TcpState {
    /// Connection established (`01`).
    Established,
    /// Active open in progress (`02`).
    SynSent,
    /// Passive open in progress (`03`).
    SynRecv,
    /// Local close initiated (`04`).
    FinWait1,
    /// Waiting for remote FIN (`05`).
    FinWait2,
    /// Waiting out stray segments (`06`).
    TimeWait,
    /// Socket closed (`07`).
    Close,
    /// Remote close received (`08`).
    CloseWait,
    /// Final ACK pending (`09`).
    LastAck,
    /// Passive listener (`0A`).
    Listen,
    /// Simultaneous close (`0B`).
    Closing,
}

impl TcpState {
    /// Classifies a state code by exact lookup against the 11 known
    /// two-character codes, as the kernel emits them.
    ///
    /// # Errors
    ///
    /// Returns [`NetscanError::UnknownState`] for anything else,
    /// including shortened or lowercased forms. Callers skip the entry
    /// and keep going; one bad line must not fail the whole container.
    pub fn from_code(code: &str) -> Result<Self, NetscanError> {
        match code {
            "01" => Ok(Self::Established),
            "02" => Ok(Self::SynSent),
            "03" => Ok(Self::SynRecv),
            "04" => Ok(Self::FinWait1),
            "05" => Ok(Self::FinWait2),
            "06" => Ok(Self::TimeWait),
            "07" => Ok(Self::Close),
            "08" => Ok(Self::CloseWait),
            "09" => Ok(Self::LastAck),
            "0A" => Ok(Self::Listen),
            "0B" => Ok(Self::Closing),
            _ => Err(NetscanError::UnknownState {
                code: code.to_string(),
            }),
        }
    }
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Established => "ESTABLISHED",
            Self::SynSent => "SYN_SENT",
            Self::SynRecv => "SYN_RECV",
            Self::FinWait1 => "FIN_WAIT1",
            Self::FinWait2 => "FIN_WAIT2",
            Self::TimeWait => "TIME_WAIT",
            Self::Close => "CLOSE",
            Self::CloseWait => "CLOSE_WAIT",
            Self::LastAck => "LAST_ACK",
            Self::Listen => "LISTEN",
            Self::Closing => "CLOSING",
        };
        write!(f, "{name}")
    }
}
