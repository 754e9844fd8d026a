pub mod instr;
pub mod opc;
pub mod printer;
