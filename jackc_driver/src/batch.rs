use crate::tokens;
use jackc_bytecode::printer::{prog_to_string, subroutine_count};
use jackc_err::{
    compile_err::{CompileErr, CompileErrTy},
    err::JackErr,
};
use jackc_parse::compile_source;
use log::{debug, error, info};
use std::{
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Source file extension.
pub const SOURCE_EXT: &str = "jack";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// VM code, written to `<Name>.vm`.
    Vm,
    /// The token listing, written to `<Name>T.xml`.
    Tokens,
}

#[derive(Clone, Copy, Debug)]
pub struct BatchOpts {
    pub mode: OutputMode,
    /// Print to the given writer instead of writing files beside the input.
    pub print: bool,
}

/// Problems with the requested path itself. Nothing is compiled.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageErrTy {
    NotFound,
    NotSource,
    NoSources,
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageErr {
    pub path: PathBuf,
    pub ty: UsageErrTy,
}

impl UsageErr {
    fn new(path: &Path, ty: UsageErrTy) -> UsageErr {
        UsageErr {
            path: path.to_path_buf(),
            ty,
        }
    }
}

impl JackErr for UsageErr {
    fn emit(&self) {
        error!("jackc: {}", self.to_msg());
    }

    fn to_msg(&self) -> String {
        let path = self.path.display();
        match self.ty {
            UsageErrTy::NotFound => format!("{}: no such file or directory", path),
            UsageErrTy::NotSource => format!("{}: not a .{} file", path, SOURCE_EXT),
            UsageErrTy::NoSources => format!("{}: no .{} files found", path, SOURCE_EXT),
            UsageErrTy::Unreadable(ref msg) => format!("{}: {}", path, msg),
        }
    }
}

impl fmt::Display for UsageErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_msg())
    }
}

impl std::error::Error for UsageErr {}

/// What happened to each file of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written, or inputs printed in print mode.
    pub done: Vec<PathBuf>,
    pub failed: Vec<CompileErr>,
}

impl BatchReport {
    pub fn exit_code(&self) -> i32 {
        if self.failed.is_empty() {
            0
        } else {
            1
        }
    }
}

/// The files `path` names: the file itself, or the `.jack` entries of a
/// directory sorted by name. Subdirectories are not searched.
pub fn collect_sources(path: &Path) -> Result<Vec<PathBuf>, UsageErr> {
    if path.is_file() {
        if !is_source(path) {
            return Err(UsageErr::new(path, UsageErrTy::NotSource));
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        return Err(UsageErr::new(path, UsageErrTy::NotFound));
    }

    let unreadable = |e: io::Error| UsageErr::new(path, UsageErrTy::Unreadable(e.to_string()));
    let mut sources = Vec::new();
    for entry in fs::read_dir(path).map_err(unreadable)? {
        let entry_path = entry.map_err(unreadable)?.path();
        if entry_path.is_file() && is_source(&entry_path) {
            sources.push(entry_path);
        }
    }

    if sources.is_empty() {
        return Err(UsageErr::new(path, UsageErrTy::NoSources));
    }

    sources.sort();
    Ok(sources)
}

fn is_source(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == SOURCE_EXT)
}

/// Where the output for `src` goes: `Main.jack` becomes `Main.vm` or
/// `MainT.xml` in the same directory.
pub fn output_path(src: &Path, mode: OutputMode) -> PathBuf {
    match mode {
        OutputMode::Vm => src.with_extension("vm"),
        OutputMode::Tokens => {
            let stem = src
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            src.with_file_name(format!("{}T.xml", stem))
        }
    }
}

/// Reads and compiles one file, returning the text to be written.
pub fn compile_file(src: &Path, mode: OutputMode) -> Result<String, CompileErr> {
    let name = src.display().to_string();
    let text = fs::read_to_string(src).map_err(|e| CompileErr::io(&name, &e))?;

    let out = match mode {
        OutputMode::Vm => compile_source(&text).map(|prog| {
            debug!(
                "{}: {} subroutine(s), {} instructions",
                name,
                subroutine_count(&prog),
                prog.len()
            );
            prog_to_string(&prog)
        }),
        OutputMode::Tokens => tokens::listing(&text).map_err(CompileErrTy::from),
    };

    out.map_err(|ty| CompileErr::new(&name, ty))
}

/// Compiles every source `path` names, one file at a time. A file that fails
/// is reported and skipped, and its output file is left untouched.
pub fn run<W: Write>(
    path: &Path,
    opts: &BatchOpts,
    stdout: &mut W,
) -> Result<BatchReport, UsageErr> {
    let sources = collect_sources(path)?;
    debug!("compiling {} file(s) from {}", sources.len(), path.display());

    let mut report = BatchReport::default();
    for src in sources {
        match compile_and_write(&src, opts, stdout) {
            Ok(done) => report.done.push(done),
            Err(e) => {
                e.emit();
                report.failed.push(e);
            }
        }
    }

    Ok(report)
}

fn compile_and_write<W: Write>(
    src: &Path,
    opts: &BatchOpts,
    stdout: &mut W,
) -> Result<PathBuf, CompileErr> {
    let out = compile_file(src, opts.mode)?;

    if opts.print {
        let name = src.display().to_string();
        stdout
            .write_all(out.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| CompileErr::io(&name, &e))?;
        return Ok(src.to_path_buf());
    }

    let dest = output_path(src, opts.mode);
    fs::write(&dest, out).map_err(|e| CompileErr::io(&dest.display().to_string(), &e))?;
    info!("wrote {}", dest.display());
    Ok(dest)
}
