use std::fmt;

/// Named storage regions addressed by push and pop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

/// Stack arithmetic and logic operators. Binary ops pop two values and push
/// one, `Neg` and `Not` replace the top of the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}

impl ArithOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Neg => "neg",
            ArithOp::Eq => "eq",
            ArithOp::Gt => "gt",
            ArithOp::Lt => "lt",
            ArithOp::And => "and",
            ArithOp::Or => "or",
            ArithOp::Not => "not",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
