//! output.rs — Post-traitement du tampon et écriture de l’artefact `.c`.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::EmitError;

/// Saut de ligne, blancs quelconques, saut de ligne.
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("motif constant"));

/// Fusionne toute suite de lignes vides (ou blanches) en un seul saut de ligne.
///
/// Passe unique gauche→droite ; `\s*` étant glouton, une suite de longueur
/// quelconque disparaît d’un coup.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n").into_owned()
}

/// Fichier produit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// Taille en octets.
    pub size: usize,
}

/// Écrit `text` à `path` (création/troncature), parents créés au besoin.
pub fn write_artifact(path: &Path, text: &str) -> Result<Artifact, EmitError> {
    let io_err = |source| EmitError::Io { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)?;

    info!(target: "minipas::output", "écrit {} ({} octets)", path.display(), text.len());
    Ok(Artifact { path: path.to_path_buf(), size: text.len() })
}

/// `prog.json` → `prog.c` (même répertoire).
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("c")
}
