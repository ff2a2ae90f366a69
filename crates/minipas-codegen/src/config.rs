//! config.rs — Configuration du backend C de minipas.
//!
//! - Defaults sûrs (`Config::default()`) : tabulations, point d’entrée toujours émis,
//!   lignes vides fusionnées.
//! - Lecture **ENV** (préfixe `MINIPAS_...`) via `Config::from_env()`
//! - **Overrides CLI** via `CliOverrides` (appliqués avec `apply_cli_overrides`)
//! - `validate()` pour refuser les combinaisons absurdes.
//!
//! ENV supportés (tous facultatifs) :
//!   MINIPAS_INDENT=tab|<n>          (n espaces, 1..=16)
//!   MINIPAS_EMPTY_ENTRY=emit|omit
//!   MINIPAS_COLLAPSE=0|1
//!
//! Le parsing TOML vit côté CLI ; ici seulement les derives `serde` (feature).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largeur maximale acceptée pour une indentation en espaces.
pub const MAX_INDENT_SPACES: u8 = 16;

/* ─────────────────────────── Types publics ─────────────────────────── */

/// Unité d’indentation d’un niveau de scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndentStyle {
    Tab,
    Spaces(u8),
}

impl IndentStyle {
    /// Texte d’un niveau d’indentation.
    pub fn unit(self) -> String {
        match self {
            IndentStyle::Tab => "\t".to_string(),
            IndentStyle::Spaces(n) => " ".repeat(usize::from(n)),
        }
    }
}

/// Que faire d’un programme sans `Var`/`Block` de premier niveau.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EmptyEntry {
    /// Émettre quand même `int main() { return 0; }`.
    Emit,
    /// Ne produire aucun point d’entrée.
    Omit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub indent: IndentStyle,
    pub empty_entry: EmptyEntry,
    /// Post-traitement : fusion des suites de lignes vides.
    pub collapse_blank_lines: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: IndentStyle::Tab,
            empty_entry: EmptyEntry::Emit,
            collapse_blank_lines: true,
        }
    }
}

/* ─────────────────────── Overrides (CLI / couches) ─────────────────────── */

/// Overrides typiques fournis par une CLI en amont.
#[derive(Default, Clone, Debug)]
pub struct CliOverrides {
    pub indent: Option<IndentStyle>,
    pub empty_entry: Option<EmptyEntry>,
    pub collapse_blank_lines: Option<bool>,
}

impl Config {
    /// Construit depuis les valeurs par défaut + ENV.
    pub fn from_env() -> Self {
        let mut c = Self::default();
        c.apply_env();
        c
    }

    /// Applique les variables d’environnement `MINIPAS_*` (valeurs invalides ignorées).
    pub fn apply_env(&mut self) {
        if let Some(v) = read_env("MINIPAS_INDENT")      { if let Some(i) = parse_indent(&v)      { self.indent = i; } }
        if let Some(v) = read_env("MINIPAS_EMPTY_ENTRY") { if let Some(e) = parse_empty_entry(&v) { self.empty_entry = e; } }
        if let Some(v) = read_env("MINIPAS_COLLAPSE")    { if let Some(b) = parse_bool(&v)        { self.collapse_blank_lines = b; } }
    }

    /// Applique des overrides “dernier mot” typiquement issus d’une CLI.
    pub fn apply_cli_overrides(&mut self, o: &CliOverrides) {
        if let Some(x) = o.indent               { self.indent = x; }
        if let Some(x) = o.empty_entry          { self.empty_entry = x; }
        if let Some(x) = o.collapse_blank_lines { self.collapse_blank_lines = x; }
    }

    /// Validation de base (retourne `Err(&'static str)` si incohérence).
    pub fn validate(&self) -> Result<(), &'static str> {
        match self.indent {
            IndentStyle::Spaces(0) => Err("indentation : au moins 1 espace"),
            IndentStyle::Spaces(n) if n > MAX_INDENT_SPACES => Err("indentation : 16 espaces maximum"),
            _ => Ok(()),
        }
    }
}

/* ────────────────────────── Parsing (ENV / CLI) ────────────────────────── */

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// `tab` ou un nombre d’espaces.
pub fn parse_indent(s: &str) -> Option<IndentStyle> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("tab") || s.eq_ignore_ascii_case("tabs") {
        return Some(IndentStyle::Tab);
    }
    s.parse::<u8>().ok().map(IndentStyle::Spaces)
}

pub fn parse_empty_entry(s: &str) -> Option<EmptyEntry> {
    match s.trim().to_ascii_lowercase().as_str() {
        "emit" => Some(EmptyEntry::Emit),
        "omit" => Some(EmptyEntry::Omit),
        _ => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no"  | "n" | "off"=> Some(false),
        _ => None,
    }
}

/* ───────────────────────────── Tests ───────────────────────────── */
