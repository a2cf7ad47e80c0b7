//! Abstract Syntax Tree for `OpenQASM` 2.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// A complete QASM2 program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// QASM version (e.g., "2.0").
    pub version: String,
    /// Statements in the program.
    pub statements: Vec<Statement>,
}

/// A statement together with the line it starts on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// 1-based source line.
    pub line: usize,
    /// The statement itself.
    pub kind: StatementKind,
}

/// The kinds of statement in a QASM2 program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatementKind {
    /// Include statement.
    Include(String),

    /// Quantum register declaration: `qreg name[n];`
    QregDecl { name: String, size: u32 },

    /// Classical register declaration: `creg name[n];`
    CregDecl { name: String, size: u32 },

    /// Gate application.
    Gate(GateCall),

    /// Measurement: `measure q -> c;`
    Measure { qubit: QubitRef, bit: BitRef },

    /// Reset: `reset q;`
    Reset { qubit: QubitRef },

    /// Barrier: `barrier q, r[0];`
    Barrier { qubits: Vec<QubitRef> },

    /// Classically conditioned operation: `if (c == n) op;`
    If {
        register: String,
        value: u64,
        body: Box<StatementKind>,
    },

    /// Gate definition; the body is not retained.
    GateDef {
        name: String,
        params: Vec<String>,
        qubits: Vec<String>,
    },

    /// Opaque gate declaration.
    Opaque {
        name: String,
        params: Vec<String>,
        qubits: Vec<String>,
    },
}

impl StatementKind {
    /// Keyword used when reporting this statement.
    pub fn keyword(&self) -> &'static str {
        match self {
            StatementKind::Include(_) => "include",
            StatementKind::QregDecl { .. } => "qreg",
            StatementKind::CregDecl { .. } => "creg",
            StatementKind::Gate(_) => "gate call",
            StatementKind::Measure { .. } => "measure",
            StatementKind::Reset { .. } => "reset",
            StatementKind::Barrier { .. } => "barrier",
            StatementKind::If { .. } => "if",
            StatementKind::GateDef { .. } => "gate",
            StatementKind::Opaque { .. } => "opaque",
        }
    }
}

/// A gate call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCall {
    /// Gate name as written.
    pub name: String,
    /// Gate parameters (angles, etc.).
    pub params: Vec<Expression>,
    /// Qubits the gate acts on.
    pub qubits: Vec<QubitRef>,
}

/// Reference to a register element or a whole register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRef {
    /// Register name.
    pub register: String,
    /// Element index, `None` for the whole register.
    pub index: Option<u32>,
}

/// Reference to a qubit or quantum register.
pub type QubitRef = RegisterRef;

/// Reference to a classical bit or classical register.
pub type BitRef = RegisterRef;

impl RegisterRef {
    /// Create a reference to a single element.
    pub fn single(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index: Some(index),
        }
    }

    /// Create a reference to an entire register.
    pub fn register(register: impl Into<String>) -> Self {
        Self {
            register: register.into(),
            index: None,
        }
    }
}

/// A parameter expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Integer literal.
    Int(u64),
    /// Float literal.
    Float(f64),
    /// The constant `pi`.
    Pi,
    /// Identifier (only meaningful inside gate definitions).
    Identifier(String),
    /// Unary negation.
    Neg(Box<Expression>),
    /// Binary operation.
    BinOp {
        left: Box<Expression>,
        op: BinOp,
        right: Box<Expression>,
    },
    /// Parenthesized expression.
    Paren(Box<Expression>),
    /// Call of a built-in function.
    FnCall { name: String, args: Vec<Expression> },
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Expression {
    /// Evaluate the expression to a real number.
    #[allow(clippy::cast_precision_loss)]
    pub fn evaluate(&self) -> ParseResult<f64> {
        Ok(match self {
            Expression::Int(v) => *v as f64,
            Expression::Float(v) => *v,
            Expression::Pi => std::f64::consts::PI,
            Expression::Identifier(name) => {
                return Err(ParseError::UndefinedIdentifier(name.clone()));
            }
            Expression::Neg(e) => -e.evaluate()?,
            Expression::Paren(e) => e.evaluate()?,
            Expression::BinOp { left, op, right } => {
                let (l, r) = (left.evaluate()?, right.evaluate()?);
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                }
            }
            Expression::FnCall { name, args } => {
                let [arg] = args.as_slice() else {
                    return Err(ParseError::FunctionArity {
                        name: name.clone(),
                        got: args.len(),
                    });
                };
                let x = arg.evaluate()?;
                match name.as_str() {
                    "sin" => x.sin(),
                    "cos" => x.cos(),
                    "tan" => x.tan(),
                    "exp" => x.exp(),
                    "ln" => x.ln(),
                    "sqrt" => x.sqrt(),
                    _ => return Err(ParseError::UnknownFunction(name.clone())),
                }
            }
        })
    }
}
