use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Constructions valides côté AST mais hors de la matrice supportée par le backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// `read`/`readln` lit exactement un entier.
    #[error("`{callee}` attend exactement un argument, {found} reçu(s)")]
    ReadArity { callee: String, found: usize },

    /// La cible d’un `read` doit être adressable (variable ou élément de tableau).
    #[error("`{callee}` : la cible doit être une variable ou un élément de tableau")]
    ReadTarget { callee: String },

    /// Seuls les littéraux texte et les expressions entières s’impriment.
    #[error("`{callee}` : argument {position} non imprimable (appel sans valeur entière)")]
    PrintArgument { callee: String, position: usize },
}

/// Erreurs d’écriture de l’artefact.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("écriture de {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Erreurs possibles de bout en bout (génération **ou** écriture).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
