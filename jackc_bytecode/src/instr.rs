use crate::opc::{ArithOp, Segment};
use std::fmt;

/// A single line of VM code. Every instruction has at most two operands:
///
/// 1. A segment and an index, for push and pop
/// 2. A `Class.subroutine` target and a count, for call and function
/// 3. A label name, for label, goto and if-goto
///
/// Examples:
///
/// push local 2
/// pushes the value stored at index 2 of the local segment.
///
/// call Math.multiply 2
/// calls Math.multiply with the top two stack values as arguments.
///
/// if-goto WHILE_1
/// pops the top of the stack and jumps to WHILE_1 if it is not zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instr {
    Push(Segment, u16),
    Pop(Segment, u16),
    Arith(ArithOp),
    Label(String),
    Goto(String),
    IfGoto(String),
    Call(String, u16),
    Function(String, u16),
    Return,
}

impl Instr {
    pub fn push(seg: Segment, idx: u16) -> Instr {
        Instr::Push(seg, idx)
    }

    pub fn pop(seg: Segment, idx: u16) -> Instr {
        Instr::Pop(seg, idx)
    }

    pub fn call(target: &str, nargs: u16) -> Instr {
        Instr::Call(target.to_string(), nargs)
    }

    pub fn function(name: &str, nlocals: u16) -> Instr {
        Instr::Function(name.to_string(), nlocals)
    }

    /// True for instructions that transfer control to a label.
    pub fn is_jump(&self) -> bool {
        match self {
            Instr::Goto(_) | Instr::IfGoto(_) => true,
            _ => false,
        }
    }

    /// The label this instruction defines or jumps to, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Instr::Label(l) | Instr::Goto(l) | Instr::IfGoto(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instr::Push(seg, idx) => write!(f, "push {} {}", seg, idx),
            Instr::Pop(seg, idx) => write!(f, "pop {} {}", seg, idx),
            Instr::Arith(op) => write!(f, "{}", op),
            Instr::Label(l) => write!(f, "label {}", l),
            Instr::Goto(l) => write!(f, "goto {}", l),
            Instr::IfGoto(l) => write!(f, "if-goto {}", l),
            Instr::Call(target, nargs) => write!(f, "call {} {}", target, nargs),
            Instr::Function(name, nlocals) => write!(f, "function {} {}", name, nlocals),
            Instr::Return => write!(f, "return"),
        }
    }
}
