use jackc_bytecode::{instr::Instr, printer::prog_to_string};
use jackc_parse::{compile_source, lex::Lexer, parser::Parser};
use std::{collections::HashMap, fs};

const INPUT_PATH: &str = "./tests/compiler/inputs";

macro_rules! compile_test {
    ($test_name:ident, $expected:expr) => {
        #[test]
        fn $test_name() {
            // Input file is a single class.
            let path = format!("{}/{}.jack", INPUT_PATH, stringify!($test_name));
            let src = fs::read_to_string(&path).unwrap();

            let lexer = Lexer::new(&src).unwrap();
            let mut parser = Parser::new(lexer);
            let prog = parser.compile_class().unwrap();

            let mut output = String::from("\n");
            output.push_str(&prog_to_string(&prog));
            assert_eq!(output, $expected);
        }
    };
}

compile_test! {
    void_main,
    r"
function Main.main 0
push constant 0
return
"
}

compile_test! {
    point_new,
    r"
function Point.new 0
push constant 2
call Memory.alloc 1
pop pointer 0
push constant 0
pop this 0
push constant 0
pop this 1
push pointer 0
return
function Point.getX 0
push argument 0
pop pointer 0
push this 0
return
"
}

compile_test! {
    array_write,
    r"
function Main.fill 2
push constant 10
call Array.new 1
pop local 0
push constant 3
pop local 1
push local 0
push local 1
add
push constant 5
pop temp 0
pop pointer 1
push temp 0
pop that 0
push constant 0
return
"
}

compile_test! {
    nested_array_write,
    r"
function Main.swap 0
push argument 0
push argument 0
push argument 1
add
pop pointer 1
push that 0
add
push argument 0
push argument 2
add
pop pointer 1
push that 0
push argument 0
push argument 1
add
pop pointer 1
push that 0
add
pop temp 0
pop pointer 1
push temp 0
pop that 0
push constant 0
return
"
}

compile_test! {
    do_method_call,
    r"
function Main.main 1
call Robot.new 0
pop local 0
push local 0
call Robot.run 1
pop temp 0
push constant 0
return
"
}

compile_test! {
    multiply_args,
    r"
function Calc.mul 0
push argument 0
push argument 1
call Math.multiply 2
return
function Calc.avg 0
push argument 0
push argument 1
add
push constant 2
call Math.divide 2
return
"
}

compile_test! {
    if_else_labels,
    r"
function Main.sign 1
push argument 0
push constant 0
lt
not
if-goto IF_0
push constant 1
neg
pop local 0
goto IF_1
label IF_0
push constant 1
pop local 0
label IF_1
push argument 0
push constant 0
eq
not
if-goto IF_2
push constant 0
pop local 0
label IF_2
push local 0
return
"
}

compile_test! {
    while_labels,
    r"
function Main.sum 2
push constant 0
pop local 0
push constant 0
pop local 1
label WHILE_0
push local 0
push argument 0
lt
not
if-goto WHILE_1
push local 0
push constant 3
eq
not
not
if-goto IF_0
push local 1
push local 0
add
pop local 1
label IF_0
push local 0
push constant 1
add
pop local 0
goto WHILE_0
label WHILE_1
label WHILE_2
push constant 0
not
if-goto WHILE_3
goto WHILE_2
label WHILE_3
push local 1
return
"
}

compile_test! {
    do_non_void,
    r"
function Main.answer 0
push constant 42
return
function Main.main 0
call Main.answer 0
pop temp 0
call Main.answer 0
call Output.printInt 1
pop temp 0
push constant 0
return
"
}

compile_test! {
    string_constant,
    r"
function Main.main 0
push constant 3
call String.new 1
push constant 72
call String.appendChar 2
push constant 105
call String.appendChar 2
push constant 33
call String.appendChar 2
call Output.printString 1
pop temp 0
push constant 0
return
"
}

compile_test! {
    method_calls,
    r"
function Counter.bump 0
push argument 0
pop pointer 0
push this 0
push argument 1
add
pop this 0
push pointer 0
call Counter.log 1
pop temp 0
push constant 0
return
function Counter.log 0
push argument 0
pop pointer 0
push static 0
push constant 1
add
pop static 0
push constant 0
return
"
}

/// Every label in a compiled class is defined once and targeted by exactly
/// one jump.
#[test]
fn labels_defined_once_and_jumped_to_once() {
    for name in &["if_else_labels", "while_labels"] {
        let path = format!("{}/{}.jack", INPUT_PATH, name);
        let prog = compile_source(&fs::read_to_string(&path).unwrap()).unwrap();

        let mut defs: HashMap<&str, usize> = HashMap::new();
        let mut jumps: HashMap<&str, usize> = HashMap::new();
        for instr in &prog {
            if let Some(lbl) = instr.label() {
                let counts = if instr.is_jump() { &mut jumps } else { &mut defs };
                *counts.entry(lbl).or_insert(0) += 1;
            }
        }

        assert!(!defs.is_empty());
        for (lbl, n) in &defs {
            assert_eq!(*n, 1, "{} defined {} times in {}", lbl, n, name);
            assert_eq!(jumps.get(lbl), Some(&1), "{} jumps in {}", lbl, name);
        }
    }
}

#[test]
fn while_top_label_precedes_its_jump() {
    let path = format!("{}/while_labels.jack", INPUT_PATH);
    let prog = compile_source(&fs::read_to_string(&path).unwrap()).unwrap();

    let top = Instr::Label("WHILE_0".to_string());
    let back = Instr::Goto("WHILE_0".to_string());
    let def = prog.iter().position(|i| *i == top).unwrap();
    let jump = prog.iter().position(|i| *i == back).unwrap();
    assert!(def < jump);
}
