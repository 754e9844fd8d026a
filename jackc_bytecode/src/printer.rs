use crate::instr::Instr;

/// Renders a program as VM text, one instruction per line, each line
/// terminated by a newline.
pub fn prog_to_string(prog: &[Instr]) -> String {
    let mut out = String::new();
    for i in prog {
        out.push_str(&i.to_string());
        out.push('\n');
    }
    out
}

/// Counts the subroutines (`function` headers) in a program.
pub fn subroutine_count(prog: &[Instr]) -> usize {
    prog.iter()
        .filter(|i| match i {
            Instr::Function(..) => true,
            _ => false,
        })
        .count()
}
