//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod join_room;
pub mod relay_code_change;
pub mod sync_code;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{ConnectError, DisconnectError, JoinError, RelayError};
pub use join_room::JoinRoomUseCase;
pub use relay_code_change::RelayCodeChangeUseCase;
pub use sync_code::SyncCodeUseCase;
