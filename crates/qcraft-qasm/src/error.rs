//! Error types for the QASM2 codec.

use thiserror::Error;

use crate::import::Diagnostic;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Invalid version.
    #[error("Invalid OPENQASM version: {0}")]
    InvalidVersion(String),

    /// Undefined identifier.
    #[error("Undefined identifier: {0}")]
    UndefinedIdentifier(String),

    /// Duplicate declaration.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Index out of bounds.
    #[error("Index {index} out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        register: String,
        index: usize,
        size: usize,
    },

    /// Declared registers exceed the supported width.
    #[error("Register '{register}' brings the total to {total} bits, above the limit of {limit}")]
    RegisterTooLarge {
        register: String,
        total: u64,
        limit: u32,
    },

    /// Register operands of one statement have different sizes.
    #[error("Register operands of '{name}' at line {line} have different sizes")]
    BroadcastMismatch { line: usize, name: String },

    /// Function not in the built-in set.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Built-in function called with the wrong number of arguments.
    #[error("Function '{name}' takes one argument, got {got}")]
    FunctionArity { name: String, got: usize },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    Circuit(#[from] qcraft_ir::IrError),

    /// Strict import stopped at the first diagnostic.
    #[error("Import rejected: {0}")]
    Rejected(Diagnostic),
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
