//! Use case implementations.

mod resolve_token_use_case;
mod sync_session;

pub use resolve_token_use_case::{ResolveTokenUseCase, ResolvedToken};
pub use sync_session::SyncSession;
