//! Client-side editor state.
//!
//! Holds the local copy of the document and the member list, and decides how
//! to react to each server event. No I/O happens here.

use coderoom_server::infrastructure::dto::websocket::{ClientEvent, MemberInfo, ServerEvent};

/// Something worth showing to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Connected { connection_id: String },
    /// Someone else joined
    PeerJoined { username: String },
    /// Our own join was acknowledged
    SelfJoined { member_count: usize },
    PeerLeft { username: String },
    DocumentReplaced { bytes: usize },
    ServerError { message: String },
}

/// Result of applying one server event
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub notice: Option<Notice>,
    /// Event to send back to the server, if any
    pub reply: Option<ClientEvent>,
}

/// One line typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Append the line to the document and broadcast it
    Append(String),
    Show,
    Members,
    Clear,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "/show" => Self::Show,
            "/members" => Self::Members,
            "/clear" => Self::Clear,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Append(line.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    room_id: String,
    username: String,
    connection_id: Option<String>,
    document: String,
    members: Vec<MemberInfo>,
}

impl EditorState {
    pub fn new(room_id: String, username: String) -> Self {
        Self {
            room_id,
            username,
            connection_id: None,
            document: String::new(),
            members: Vec::new(),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn members(&self) -> &[MemberInfo] {
        &self.members
    }

    /// Join event sent after every (re)connection
    pub fn join_event(&self) -> ClientEvent {
        ClientEvent::Join {
            room_id: self.room_id.clone(),
            username: self.username.clone(),
        }
    }

    /// Forget the previous connection. The document survives reconnects.
    pub fn reset_connection(&mut self) {
        self.connection_id = None;
        self.members.clear();
    }

    pub fn apply(&mut self, event: ServerEvent) -> Applied {
        match event {
            ServerEvent::Connected { connection_id } => {
                self.connection_id = Some(connection_id.clone());
                Applied {
                    notice: Some(Notice::Connected { connection_id }),
                    reply: None,
                }
            }
            ServerEvent::Joined {
                clients,
                username,
                connection_id,
            } => {
                self.members = clients;
                if self.connection_id.as_deref() == Some(connection_id.as_str()) {
                    return Applied {
                        notice: Some(Notice::SelfJoined {
                            member_count: self.members.len(),
                        }),
                        reply: None,
                    };
                }
                // bring the late joiner up to date with our copy
                Applied {
                    notice: Some(Notice::PeerJoined { username }),
                    reply: Some(ClientEvent::SyncCode {
                        connection_id,
                        code: self.document.clone(),
                    }),
                }
            }
            ServerEvent::CodeChange { code } => {
                self.document = code;
                Applied {
                    notice: Some(Notice::DocumentReplaced {
                        bytes: self.document.len(),
                    }),
                    reply: None,
                }
            }
            ServerEvent::Disconnected {
                connection_id,
                username,
            } => {
                self.members.retain(|m| m.connection_id != connection_id);
                Applied {
                    notice: Some(Notice::PeerLeft {
                        username: username.unwrap_or(connection_id),
                    }),
                    reply: None,
                }
            }
            ServerEvent::Error { message } => Applied {
                notice: Some(Notice::ServerError { message }),
                reply: None,
            },
        }
    }

    /// Append a line locally and produce the broadcast of the whole document
    pub fn append_line(&mut self, line: &str) -> ClientEvent {
        if !self.document.is_empty() {
            self.document.push('\n');
        }
        self.document.push_str(line);
        self.code_change()
    }

    pub fn clear(&mut self) -> ClientEvent {
        self.document.clear();
        self.code_change()
    }

    fn code_change(&self) -> ClientEvent {
        ClientEvent::CodeChange {
            room_id: self.room_id.clone(),
            code: self.document.clone(),
        }
    }
}
