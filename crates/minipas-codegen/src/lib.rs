//! minipas-codegen — Backend C du langage minipas.
//!
//! Deux étapes :
//! 1. **Émission** ([`generate`]) : un parcours unique de l’AST produit le
//!    texte C brut (en-tête, procédures, point d’entrée `int main()`).
//! 2. **Post-traitement** ([`translate`], [`translate_to_path`]) : fusion des
//!    lignes vides puis écriture de l’artefact.
//!
//! ```
//! use minipas_ast::*;
//! use minipas_codegen::{translate, Config};
//!
//! let prog = Program::new(vec![Stmt::Block(Block::new(vec![
//!     Stmt::call("writeln", vec![Expr::string("salut")]),
//! ]))]);
//! let c = translate(&prog, &Config::default()).unwrap();
//! assert!(c.contains("printf(\"salut\\n\");"));
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

use std::path::Path;

use log::debug;
use minipas_ast::Program;

pub mod config;
pub mod emitter;
pub mod error;
pub mod output;

pub use config::{CliOverrides, Config, EmptyEntry, IndentStyle};
pub use emitter::{EntryState, Emitter};
pub use error::{CodegenError, EmitError, Error, Result};
pub use output::Artifact;

/// Tampon brut de l’émetteur, sans post-traitement.
pub fn generate(program: &Program, cfg: &Config) -> Result<String, CodegenError> {
    debug!(target: "minipas::codegen", "émission de {} nœud(s) de premier niveau", program.nodes.len());
    Emitter::new(cfg).emit_program(program)
}

/// Émission suivie du post-traitement demandé par `cfg`.
pub fn translate(program: &Program, cfg: &Config) -> Result<String, CodegenError> {
    let raw = generate(program, cfg)?;
    if cfg.collapse_blank_lines {
        Ok(output::collapse_blank_lines(&raw))
    } else {
        Ok(raw)
    }
}

/// Traduit puis écrit le fichier. Rien n’est écrit si l’émission échoue.
pub fn translate_to_path(program: &Program, cfg: &Config, path: impl AsRef<Path>) -> Result<Artifact> {
    let text = translate(program, cfg)?;
    Ok(output::write_artifact(path.as_ref(), &text)?)
}
