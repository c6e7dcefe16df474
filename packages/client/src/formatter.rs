//! Console rendering of notices and state.

use coderoom_server::infrastructure::dto::websocket::MemberInfo;

use crate::domain::Notice;

pub fn format_notice(notice: &Notice) -> String {
    match notice {
        Notice::Connected { connection_id } => format!("* connected as {connection_id}"),
        Notice::PeerJoined { username } => format!("* {username} joined the room."),
        Notice::SelfJoined { member_count } => {
            format!("* joined the room ({member_count} connected)")
        }
        Notice::PeerLeft { username } => format!("* {username} left the room."),
        Notice::DocumentReplaced { bytes } => format!("* document updated ({bytes} bytes)"),
        Notice::ServerError { message } => format!("! {message}"),
    }
}

pub fn format_members(members: &[MemberInfo]) -> String {
    if members.is_empty() {
        return "(nobody)".to_string();
    }
    members
        .iter()
        .map(|m| format!("- {} ({})", m.username, m.connection_id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Document with line numbers
pub fn format_document(document: &str) -> String {
    if document.is_empty() {
        return "(empty document)".to_string();
    }
    document
        .lines()
        .enumerate()
        .map(|(i, line)| format!("{:>4} | {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_document_numbers_lines() {
        // テスト項目: ドキュメントが行番号付きで表示される
        // when (操作):
        let rendered = format_document("a\nb");

        // then (期待する結果):
        assert_eq!(rendered, "   1 | a\n   2 | b");
    }

    #[test]
    fn test_format_empty_members() {
        // テスト項目: メンバーがいない場合の表示
        // then (期待する結果):
        assert_eq!(format_members(&[]), "(nobody)");
    }

    #[test]
    fn test_format_peer_left() {
        // テスト項目: 退出通知の表示
        // when (操作):
        let rendered = format_notice(&Notice::PeerLeft {
            username: "bob".to_string(),
        });

        // then (期待する結果):
        assert_eq!(rendered, "* bob left the room.");
    }
}
