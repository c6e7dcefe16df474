//! Client main loop: terminal input, connection and reconnection.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    config::ClientConfig,
    domain::{Command, EditorState},
    error::ClientError,
    session::{self, SessionEnd},
};

/// Run the client until the user quits.
pub async fn run_client(config: ClientConfig) -> Result<(), ClientError> {
    let editor = DefaultEditor::new()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    // rustyline blocks, so it gets its own thread
    std::thread::spawn(move || read_input(editor, tx));

    let mut state = EditorState::new(config.room_id.clone(), config.username.clone());
    println!(
        "Joining room '{}' as '{}' via {}",
        state.room_id(),
        config.username,
        config.url
    );
    println!("Type a line to append it to the document. Commands: /show /members /clear /quit");

    loop {
        let ws = tokio::select! {
            ws = session::connect_with_retry(&config) => ws,
            _ = wait_for_quit(&mut rx, &mut state) => break,
        };

        state.reset_connection();
        match session::run_session(ws, &mut state, &mut rx).await {
            SessionEnd::Quit => break,
            SessionEnd::ConnectionLost => {
                println!("! Disconnected. Trying to reconnect...");
                tokio::time::sleep(config.retry_delay).await;
            }
        }
    }

    println!("Bye.");
    Ok(())
}

/// While offline, commands only touch the local copy. Resolves on quit.
async fn wait_for_quit(rx: &mut UnboundedReceiver<Command>, state: &mut EditorState) {
    while let Some(command) = rx.recv().await {
        if command == Command::Quit {
            return;
        }
        session::apply_local(state, command);
    }
}

fn read_input(mut editor: DefaultEditor, tx: UnboundedSender<Command>) {
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                let command = Command::parse(&line);
                let quit = command == Command::Quit;
                if tx.send(command).is_err() || quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                let _ = tx.send(Command::Quit);
                break;
            }
            Err(e) => {
                tracing::error!("{}", ClientError::from(e));
                let _ = tx.send(Command::Quit);
                break;
            }
        }
    }
}
