//! Evaluación restringida de literales estilo Python.
//!
//! Los valores de `input_parameters` llegan como strings con literales del
//! lenguaje del motor (`"5"`, `'abc'`, `True`, `['a', 1]`, `{'k': 1}`).
//! Este módulo los evalúa a `serde_json::Value` aceptando únicamente datos:
//! números, strings, booleanos, `None`, listas, tuplas y diccionarios con
//! claves string. Identificadores, llamadas u operadores son un error de
//! parseo; el contenido de un archivo descargado jamás se ejecuta.

use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LiteralError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEnd(usize),
    #[error("unexpected character `{ch}` at byte {at}")]
    UnexpectedChar { ch: char, at: usize },
    #[error("invalid number `{text}` at byte {at}")]
    InvalidNumber { text: String, at: usize },
    #[error("invalid escape `\\{ch}` at byte {at}")]
    InvalidEscape { ch: char, at: usize },
    #[error("mapping keys must be string literals (byte {0})")]
    NonStringKey(usize),
    #[error("trailing content after literal at byte {0}")]
    TrailingContent(usize),
}

/// Evalúa un literal completo. El input debe consumirse entero (módulo
/// espacios); contenido residual es un error.
pub fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let mut p = Parser { src: src.as_bytes(), pos: 0 };
    p.skip_ws();
    let value = p.parse_value()?;
    p.skip_ws();
    if p.pos != p.src.len() {
        return Err(LiteralError::TrailingContent(p.pos));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, wanted: u8) -> Result<(), LiteralError> {
        match self.bump() {
            Some(b) if b == wanted => Ok(()),
            Some(b) => Err(LiteralError::UnexpectedChar { ch: b as char, at: self.pos - 1 }),
            None => Err(LiteralError::UnexpectedEnd(self.pos)),
        }
    }

    /// True si a partir de `pos` viene exactamente la palabra `word` seguida
    /// de un límite de token.
    fn eat_keyword(&mut self, word: &str) -> bool {
        let end = self.pos + word.len();
        if self.src.len() < end || &self.src[self.pos..end] != word.as_bytes() {
            return false;
        }
        if matches!(self.src.get(end), Some(b) if b.is_ascii_alphanumeric() || *b == b'_') {
            return false;
        }
        self.pos = end;
        true
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd(self.pos)),
            Some(b'\'') | Some(b'"') => self.parse_string().map(Value::String),
            Some(b'[') => self.parse_sequence(b'[', b']'),
            Some(b'(') => self.parse_sequence(b'(', b')'),
            Some(b'{') => self.parse_dict(),
            Some(b'-') | Some(b'+') | Some(b'0'..=b'9') | Some(b'.') => self.parse_number(),
            Some(_) if self.eat_keyword("True") => Ok(Value::Bool(true)),
            Some(_) if self.eat_keyword("False") => Ok(Value::Bool(false)),
            Some(_) if self.eat_keyword("None") => Ok(Value::Null),
            Some(b) => Err(LiteralError::UnexpectedChar { ch: b as char, at: self.pos }),
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let quote = match self.bump() {
            Some(q @ (b'\'' | b'"')) => q,
            Some(b) => return Err(LiteralError::UnexpectedChar { ch: b as char, at: self.pos - 1 }),
            None => return Err(LiteralError::UnexpectedEnd(self.pos)),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnexpectedEnd(self.pos)),
                Some(b) if b == quote => return Ok(out),
                Some(b'\\') => out.push(self.parse_escape()?),
                // Bytes no ASCII se copian tal cual (el input es UTF-8 válido).
                Some(b) => {
                    let start = self.pos - 1;
                    let mut end = self.pos;
                    if b >= 0x80 {
                        while matches!(self.src.get(end), Some(n) if n & 0xC0 == 0x80) {
                            end += 1;
                        }
                        self.pos = end;
                    }
                    match std::str::from_utf8(&self.src[start..end]) {
                        Ok(s) => out.push_str(s),
                        Err(_) => {
                            return Err(LiteralError::UnexpectedChar { ch: '\u{fffd}', at: start })
                        }
                    }
                }
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, LiteralError> {
        let at = self.pos;
        match self.bump() {
            None => Err(LiteralError::UnexpectedEnd(self.pos)),
            Some(b'n') => Ok('\n'),
            Some(b't') => Ok('\t'),
            Some(b'r') => Ok('\r'),
            Some(b'0') => Ok('\0'),
            Some(b'\\') => Ok('\\'),
            Some(b'\'') => Ok('\''),
            Some(b'"') => Ok('"'),
            Some(b'x') => self.parse_hex_escape(2, at),
            Some(b'u') => self.parse_hex_escape(4, at),
            Some(b) => Err(LiteralError::InvalidEscape { ch: b as char, at }),
        }
    }

    fn parse_hex_escape(&mut self, digits: usize, at: usize) -> Result<char, LiteralError> {
        let end = self.pos + digits;
        let slice = self
            .src
            .get(self.pos..end)
            .ok_or(LiteralError::UnexpectedEnd(self.pos))?;
        let text = std::str::from_utf8(slice)
            .map_err(|_| LiteralError::InvalidEscape { ch: '?', at })?;
        let code = u32::from_str_radix(text, 16)
            .map_err(|_| LiteralError::InvalidEscape { ch: '?', at })?;
        self.pos = end;
        char::from_u32(code).ok_or(LiteralError::InvalidEscape { ch: '?', at })
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'-' | b'+')) {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => self.pos += 1,
                b'.' | b'e' | b'E' => {
                    is_float = true;
                    self.pos += 1;
                }
                b'-' | b'+' if is_float => self.pos += 1, // signo del exponente
                _ => break,
            }
        }
        let text = std::str::from_utf8(&self.src[start..self.pos])
            .map_err(|_| LiteralError::UnexpectedEnd(start))?;
        let invalid = || LiteralError::InvalidNumber { text: text.to_string(), at: start };
        if is_float {
            let f: f64 = text.parse().map_err(|_| invalid())?;
            Number::from_f64(f).map(Value::Number).ok_or_else(invalid)
        } else {
            let i: i64 = text.parse().map_err(|_| invalid())?;
            Ok(Value::Number(Number::from(i)))
        }
    }

    /// Listas `[...]` y tuplas `(...)`; ambas se materializan como arrays.
    fn parse_sequence(&mut self, open: u8, close: u8) -> Result<Value, LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b) if b == close => {}
                Some(b) => return Err(LiteralError::UnexpectedChar { ch: b as char, at: self.pos }),
                None => return Err(LiteralError::UnexpectedEnd(self.pos)),
            }
        }
    }

    fn parse_dict(&mut self) -> Result<Value, LiteralError> {
        self.expect(b'{')?;
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                Some(b'\'' | b'"') => {}
                Some(_) => return Err(LiteralError::NonStringKey(self.pos)),
                None => return Err(LiteralError::UnexpectedEnd(self.pos)),
            }
            let key = self.parse_string()?;
            self.skip_ws();
            self.expect(b':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                }
                Some(b'}') => {}
                Some(b) => return Err(LiteralError::UnexpectedChar { ch: b as char, at: self.pos }),
                None => return Err(LiteralError::UnexpectedEnd(self.pos)),
            }
        }
    }
}
