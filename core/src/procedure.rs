//! The procedure table: which operations exist and how each may be called.
//!
//! Procedures are looked up by their flat name. There is no nesting; a new
//! operation is one more entry in `PROCEDURES`.

use std::fmt;

use crate::http::HttpMethod;

pub const CREATE_TODO: &str = "createTodo";

/// Kind of a procedure. Determines the HTTP method a call must use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    Query,
    Mutation,
}

impl ProcedureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcedureKind::Query => "query",
            ProcedureKind::Mutation => "mutation",
        }
    }

    /// The only HTTP method a call to this kind of procedure may use.
    pub fn http_method(self) -> HttpMethod {
        match self {
            ProcedureKind::Query => HttpMethod::Get,
            ProcedureKind::Mutation => HttpMethod::Post,
        }
    }

    /// The procedure kind an incoming HTTP method is asking for.
    pub fn from_http_method(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => ProcedureKind::Query,
            HttpMethod::Post => ProcedureKind::Mutation,
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcedureDef {
    pub name: &'static str,
    pub kind: ProcedureKind,
}

pub const PROCEDURES: &[ProcedureDef] = &[ProcedureDef {
    name: CREATE_TODO,
    kind: ProcedureKind::Mutation,
}];

pub fn lookup(name: &str) -> Option<&'static ProcedureDef> {
    PROCEDURES.iter().find(|def| def.name == name)
}
