//! Statement parsing for QASM2.

use super::Parser;
use crate::ast::{BitRef, GateCall, QubitRef, RegisterRef, Statement, StatementKind};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();
        let kind = self.parse_statement_kind()?;
        Ok(Statement { line, kind })
    }

    fn parse_statement_kind(&mut self) -> ParseResult<StatementKind> {
        match self.peek() {
            Some(Token::Include) => self.parse_include(),
            Some(Token::Qreg) => {
                let (name, size) = self.parse_register_decl(Token::Qreg)?;
                Ok(StatementKind::QregDecl { name, size })
            }
            Some(Token::Creg) => {
                let (name, size) = self.parse_register_decl(Token::Creg)?;
                Ok(StatementKind::CregDecl { name, size })
            }
            Some(Token::If) => self.parse_if(),
            Some(Token::Gate) => self.parse_gate_def(),
            Some(Token::Opaque) => self.parse_opaque(),
            _ => self.parse_quantum_op(),
        }
    }

    /// Parse an operation allowed as the body of an `if`.
    fn parse_quantum_op(&mut self) -> ParseResult<StatementKind> {
        match self.peek() {
            Some(Token::Measure) => self.parse_measure(),
            Some(Token::Reset) => self.parse_reset(),
            Some(Token::Barrier) => self.parse_barrier(),
            Some(Token::Identifier(_)) => self.parse_gate_call(),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// Parse include statement.
    fn parse_include(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Include)?;
        let path = match self.peek() {
            Some(Token::StringLiteral(s)) => s.clone(),
            _ => return Err(self.unexpected("string literal")),
        };
        self.pos += 1;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Include(path))
    }

    /// Parse `qreg name[n];` or `creg name[n];`.
    fn parse_register_decl(&mut self, keyword: Token) -> ParseResult<(String, u32)> {
        self.expect(keyword)?;
        let name = self.parse_identifier()?;
        self.expect(Token::LBracket)?;
        let size = self.parse_index()?;
        self.expect(Token::RBracket)?;
        self.expect(Token::Semicolon)?;
        Ok((name, size))
    }

    /// Parse measure statement.
    fn parse_measure(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Measure)?;
        let qubit = self.parse_register_ref()?;
        self.expect(Token::Arrow)?;
        let bit: BitRef = self.parse_register_ref()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Measure { qubit, bit })
    }

    /// Parse reset statement.
    fn parse_reset(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Reset)?;
        let qubit = self.parse_register_ref()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Reset { qubit })
    }

    /// Parse barrier statement.
    fn parse_barrier(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Barrier)?;
        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Barrier { qubits })
    }

    /// Parse `if (creg == n) op;`.
    fn parse_if(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let register = self.parse_identifier()?;
        self.expect(Token::EqEq)?;
        let value = self.parse_int_literal()?;
        self.expect(Token::RParen)?;
        let body = Box::new(self.parse_quantum_op()?);
        Ok(StatementKind::If {
            register,
            value,
            body,
        })
    }

    /// Parse the signature shared by `gate` and `opaque`.
    fn parse_gate_signature(&mut self) -> ParseResult<(String, Vec<String>, Vec<String>)> {
        let name = self.parse_identifier()?;
        let params = if self.consume(&Token::LParen) {
            let p = if self.check(&Token::RParen) {
                vec![]
            } else {
                self.parse_identifier_list()?
            };
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };
        let qubits = self.parse_identifier_list()?;
        Ok((name, params, qubits))
    }

    /// Parse gate definition, skipping its body.
    fn parse_gate_def(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Gate)?;
        let (name, params, qubits) = self.parse_gate_signature()?;

        self.expect(Token::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance() {
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => depth -= 1,
                Some(_) => {}
                None => return Err(ParseError::UnexpectedEof(format!("end of gate '{name}'"))),
            }
        }

        Ok(StatementKind::GateDef {
            name,
            params,
            qubits,
        })
    }

    /// Parse opaque gate declaration.
    fn parse_opaque(&mut self) -> ParseResult<StatementKind> {
        self.expect(Token::Opaque)?;
        let (name, params, qubits) = self.parse_gate_signature()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Opaque {
            name,
            params,
            qubits,
        })
    }

    /// Parse gate call.
    fn parse_gate_call(&mut self) -> ParseResult<StatementKind> {
        let name = self.parse_identifier()?;

        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_qubit_refs()?;
        self.expect(Token::Semicolon)?;

        Ok(StatementKind::Gate(GateCall {
            name,
            params,
            qubits,
        }))
    }

    /// Parse qubit references.
    fn parse_qubit_refs(&mut self) -> ParseResult<Vec<QubitRef>> {
        let mut refs = vec![self.parse_register_ref()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_register_ref()?);
        }
        Ok(refs)
    }

    /// Parse `name` or `name[i]`.
    fn parse_register_ref(&mut self) -> ParseResult<RegisterRef> {
        let register = self.parse_identifier()?;

        if self.consume(&Token::LBracket) {
            let index = self.parse_index()?;
            self.expect(Token::RBracket)?;
            Ok(RegisterRef::single(register, index))
        } else {
            Ok(RegisterRef::register(register))
        }
    }
}
