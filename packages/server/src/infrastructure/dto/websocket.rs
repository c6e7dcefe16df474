//! WebSocket message DTOs.
//!
//! Every frame is a JSON text frame tagged by `type` (kebab-case):
//!
//! ```text
//! -> {"type":"join","room_id":"r1","username":"alice"}
//! <- {"type":"joined","clients":[{"connection_id":"…","username":"alice"}],"username":"alice","connection_id":"…"}
//! -> {"type":"code-change","room_id":"r1","code":"fn main() {}"}
//! -> {"type":"sync-code","connection_id":"…","code":"fn main() {}"}
//! <- {"type":"code-change","code":"fn main() {}"}
//! <- {"type":"disconnected","connection_id":"…","username":"alice"}
//! <- {"type":"error","message":"Room ID and username are required"}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::{Member, Notification};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Enter a room. Missing fields decode as empty and fail validation.
    Join {
        #[serde(default)]
        room_id: String,
        #[serde(default)]
        username: String,
    },
    /// Full document after a local edit
    CodeChange { room_id: String, code: String },
    /// Current document for one late joiner
    SyncCode { connection_id: String, code: String },
}

/// Member entry in a `joined` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub connection_id: String,
    pub username: String,
}

impl From<Member> for MemberInfo {
    fn from(member: Member) -> Self {
        Self {
            connection_id: member.connection_id.into_string(),
            username: member.username.into_string(),
        }
    }
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    Connected {
        connection_id: String,
    },
    Joined {
        clients: Vec<MemberInfo>,
        username: String,
        connection_id: String,
    },
    CodeChange {
        code: String,
    },
    Disconnected {
        connection_id: String,
        username: Option<String>,
    },
    Error {
        message: String,
    },
}

impl From<Notification> for ServerEvent {
    fn from(notification: Notification) -> Self {
        match notification {
            Notification::Connected { connection_id } => Self::Connected {
                connection_id: connection_id.into_string(),
            },
            Notification::Joined {
                members,
                username,
                connection_id,
            } => Self::Joined {
                clients: members.into_iter().map(MemberInfo::from).collect(),
                username: username.into_string(),
                connection_id: connection_id.into_string(),
            },
            Notification::CodeChanged { code } => Self::CodeChange {
                code: code.into_string(),
            },
            Notification::Disconnected {
                connection_id,
                username,
            } => Self::Disconnected {
                connection_id: connection_id.into_string(),
                username: username.map(|u| u.into_string()),
            },
            Notification::Error { message } => Self::Error { message },
        }
    }
}
