//! Unified error type for the engine.

use quizcast_catalog::CatalogError;
use quizcast_game::GameError;
use quizcast_protocol::ProtocolError;
use quizcast_session::SessionError;

/// Top-level error wrapping each layer's error type, so callers of the
/// `quizcast` crate deal with one type and `?` does the conversions.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_game_error() {
        let err: EngineError = GameError::NoActiveQuestions.into();
        assert!(matches!(err, EngineError::Game(_)));
        assert!(err.to_string().contains("no active questions"));
    }

    #[test]
    fn test_from_session_error() {
        let err: EngineError = SessionError::NameRequired.into();
        assert!(matches!(err, EngineError::Session(_)));
    }

    #[test]
    fn test_from_catalog_error() {
        let err: EngineError = CatalogError::Validation("bad".into()).into();
        assert!(matches!(err, EngineError::Catalog(_)));
        assert!(err.to_string().contains("bad"));
    }
}
