use thiserror::Error;

/// Contract violations detected while constructing terms and clauses.
///
/// These never reach the resolution engine: a malformed term is rejected
/// at the point where it is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermError {
    /// A compound term was given an empty functor name
    #[error("functor name must not be empty")]
    EmptyFunctor,

    /// A compound term was given a functor that is not an atom
    #[error("functor must be an atom, found `{0}`")]
    NonAtomFunctor(String),

    /// A clause head that cannot be called (number, variable or list)
    #[error("clause head must be an atom or compound term, found `{0}`")]
    InvalidHead(String),
}

/// Errors produced while reading clauses and goals from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input does not match the grammar at `offset`
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the source text
        offset: usize,
        /// What the reader was looking for
        message: String,
    },

    /// A complete term was read but input remains
    #[error("unexpected trailing input at offset {offset}")]
    TrailingInput {
        /// Byte offset of the first unread character
        offset: usize,
    },

    /// The text parsed, but describes an invalid term or clause
    #[error(transparent)]
    Term(#[from] TermError),
}
