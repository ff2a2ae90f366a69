//! emitter.rs — Émetteur C en une passe (parcours en profondeur de l’AST).
//!
//! Une règle de traduction par genre de nœud ; l’état mutable de la passe
//! (tampon, profondeur d’indentation, état du point d’entrée) appartient à
//! l’`Emitter` et disparaît avec lui. Aucun retour arrière : chaque handler
//! démarre en début de ligne et termine par un saut de ligne.
//!
//! Le point d’entrée `int main()` est ouvert au premier `Var`/`Block` de
//! premier niveau (transition unique `BeforeEntry → InsideEntry`) et fermé
//! après le dernier nœud.

use log::{debug, trace};
use minipas_ast::{
    ArrayDecl, ArrayElem, Args, Assign, BinOp, Block, Decl, Expr, For, FuncProcCall, Id, If,
    LValue, Params, Proc, Program, Stmt, Type, Var, VarItem,
};

use crate::config::{Config, EmptyEntry};
use crate::error::CodegenError;

/// Seule dépendance du code produit.
pub const HEADER: &str = "#include <stdio.h>";
/// Signature du point d’entrée synthétisé.
pub const ENTRY_SIGNATURE: &str = "int main()";
/// Contribution d’un argument entier au format d’un `printf`.
pub const INT_PLACEHOLDER: &str = " %d ";

const LOG_TARGET: &str = "minipas::codegen";

/* ───────────────────────────── États de la passe ───────────────────────────── */

/// Avancement du parcours de premier niveau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    BeforeEntry,
    InsideEntry,
}

/// Fonction C englobante (décide de la forme de `return`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    TopLevel,
    Entry,
    Procedure,
}

/// Procédures prédéfinies traduites vers `stdio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Write,
    Writeln,
    Read,
    Readln,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "write" => Some(Builtin::Write),
            "writeln" => Some(Builtin::Writeln),
            "read" => Some(Builtin::Read),
            "readln" => Some(Builtin::Readln),
            _ => None,
        }
    }
}

/* ───────────────────────────── Tables de traduction ───────────────────────────── */

/// Symbole source → opérateur C ; tout symbole inconnu passe tel quel.
pub fn c_operator(symbol: &str) -> &str {
    match symbol {
        "=" => "==",
        "mod" => "%",
        "div" => "/",
        "and" => "&&",
        "or" => "||",
        other => other,
    }
}

/// Nom de type source → nom de type C.
pub fn c_type_name(name: &str) -> &str {
    if name == "integer" { "int" } else { name }
}

/// Nombre de cases allouées : `end − start + 2` (une case de plus que l’intervalle).
pub fn array_slots(decl: &ArrayDecl) -> i128 {
    i128::from(decl.end.value) - i128::from(decl.start.value) + 2
}

/* ───────────────────────────── Échappement ───────────────────────────── */

/// Littéral C de destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    /// `"…"`
    Double,
    /// `'…'`
    Single,
    /// `"…"` passé comme format à `printf` (`%` doublé).
    Format,
}

fn push_escaped(out: &mut String, c: char, quote: Quote) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '"' if quote != Quote::Single => out.push_str("\\\""),
        '\'' if quote == Quote::Single => out.push_str("\\'"),
        '%' if quote == Quote::Format => out.push_str("%%"),
        c if c.is_ascii_control() => out.push_str(&format!("\\{:03o}", u32::from(c))),
        c => out.push(c),
    }
}

/// Contenu d’un littéral chaîne C (sans les guillemets).
pub fn escape_c_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    text.chars().for_each(|c| push_escaped(&mut out, c, Quote::Double));
    out
}

/// Contenu d’un littéral caractère C (sans les apostrophes).
pub fn escape_c_char(c: char) -> String {
    let mut out = String::new();
    push_escaped(&mut out, c, Quote::Single);
    out
}

/// Texte recopié dans un format `printf` : échappé comme une chaîne, `%` doublé.
pub fn escape_format(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    text.chars().for_each(|c| push_escaped(&mut out, c, Quote::Format));
    out
}

/* ───────────────────────────── Émetteur ───────────────────────────── */

#[derive(Debug)]
pub struct Emitter {
    out: String,
    level: usize,
    indent_unit: String,
    empty_entry: EmptyEntry,
    entry: EntryState,
    frame: Frame,
}

impl Emitter {
    pub fn new(cfg: &Config) -> Self {
        Self {
            out: String::new(),
            level: 0,
            indent_unit: cfg.indent.unit(),
            empty_entry: cfg.empty_entry,
            entry: EntryState::BeforeEntry,
            frame: Frame::TopLevel,
        }
    }

    /// Traduit le programme entier et rend le tampon brut (avant post-traitement).
    pub fn emit_program(mut self, program: &Program) -> Result<String, CodegenError> {
        self.push(HEADER);
        self.newline();

        for node in &program.nodes {
            if self.entry == EntryState::BeforeEntry && node.opens_entry() {
                self.open_entry();
            }
            trace!(target: LOG_TARGET, "nœud de premier niveau {:?}", node_kind(node));
            self.emit_stmt(node)?;
        }

        if self.entry == EntryState::BeforeEntry {
            match self.empty_entry {
                EmptyEntry::Emit => {
                    debug!(target: LOG_TARGET, "aucun Var/Block de premier niveau : point d’entrée vide");
                    self.open_entry();
                }
                EmptyEntry::Omit => {
                    debug!(target: LOG_TARGET, "aucun Var/Block de premier niveau : point d’entrée omis");
                    return Ok(self.out);
                }
            }
        }

        self.line("return 0;");
        self.close_scope();
        Ok(self.out)
    }

    fn open_entry(&mut self) {
        debug!(target: LOG_TARGET, "ouverture du point d’entrée `{ENTRY_SIGNATURE}`");
        self.line(ENTRY_SIGNATURE);
        self.open_scope();
        self.entry = EntryState::InsideEntry;
        self.frame = Frame::Entry;
    }

    /* ─────────────── Instructions ─────────────── */

    fn emit_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match stmt {
            Stmt::Block(b) => self.emit_block(b),
            Stmt::Var(v) => {
                self.emit_var(v);
                Ok(())
            }
            Stmt::Assign(a) => {
                self.indent();
                self.emit_assign(a)?;
                self.newline();
                Ok(())
            }
            Stmt::For(f) => self.emit_for(f),
            Stmt::If(i) => self.emit_if(i),
            Stmt::Proc(p) => self.emit_proc(p),
            Stmt::FuncProcCall(c) => {
                self.indent();
                self.emit_call(c)?;
                self.push(";");
                self.newline();
                Ok(())
            }
            Stmt::Exit => {
                self.emit_exit();
                Ok(())
            }
        }
    }

    fn emit_block(&mut self, block: &Block) -> Result<(), CodegenError> {
        for stmt in &block.nodes {
            self.emit_stmt(stmt)?;
        }
        Ok(())
    }

    fn emit_var(&mut self, var: &Var) {
        // séparateur de section, retiré par le post-traitement
        self.newline();
        for item in &var.nodes {
            self.indent();
            match item {
                VarItem::Decl(d) => self.emit_decl(d),
                VarItem::ArrayDecl(a) => self.emit_array_decl(a),
            }
            self.newline();
        }
    }

    fn emit_decl(&mut self, decl: &Decl) {
        self.emit_type(&decl.ty);
        self.push(" ");
        self.emit_id(&decl.id);
        self.push(";");
    }

    fn emit_array_decl(&mut self, decl: &ArrayDecl) {
        self.emit_type(&decl.ty);
        self.push(" ");
        self.emit_id(&decl.id);
        self.push(&format!("[{}];", array_slots(decl)));
    }

    /// `cible = expr;` sans indentation ni saut de ligne (réutilisé par `for`).
    fn emit_assign(&mut self, assign: &Assign) -> Result<(), CodegenError> {
        self.emit_lvalue(&assign.target)?;
        self.push(" = ");
        self.emit_expr(&assign.expr)?;
        self.push(";");
        Ok(())
    }

    fn emit_for(&mut self, f: &For) -> Result<(), CodegenError> {
        let var = &f.start.target;
        self.indent();
        self.push("for (");
        self.emit_assign(&f.start)?;
        self.push(" ");
        self.emit_lvalue(var)?;
        self.push(" <= ");
        self.emit_expr(&f.end)?;
        self.push("; ");
        self.emit_lvalue(var)?;
        self.push("++)");
        self.newline();
        self.open_scope();
        self.emit_block(&f.block)?;
        self.close_scope();
        Ok(())
    }

    fn emit_if(&mut self, i: &If) -> Result<(), CodegenError> {
        self.indent();
        self.push("if (");
        self.emit_expr(&i.cond)?;
        self.push(")");
        self.newline();
        self.open_scope();
        self.emit_block(&i.then_block)?;
        self.close_scope();
        if let Some(else_block) = &i.else_block {
            self.line("else");
            self.open_scope();
            self.emit_block(else_block)?;
            self.close_scope();
        }
        Ok(())
    }

    fn emit_proc(&mut self, p: &Proc) -> Result<(), CodegenError> {
        debug!(target: LOG_TARGET, "procédure `{}`", p.id.name);
        self.indent();
        self.push("void ");
        self.emit_id(&p.id);
        self.push("(");
        if let Some(params) = &p.params {
            self.emit_params(params);
        }
        self.push(")");
        self.newline();

        let outer = std::mem::replace(&mut self.frame, Frame::Procedure);
        self.open_scope();
        if let Some(vars) = &p.variables {
            self.emit_var(vars);
        }
        self.emit_block(&p.block)?;
        self.close_scope();
        self.frame = outer;
        Ok(())
    }

    fn emit_params(&mut self, params: &Params) {
        for (i, p) in params.params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.emit_type(&p.ty);
            self.push(" ");
            self.emit_id(&p.id);
        }
    }

    fn emit_exit(&mut self) {
        match self.frame {
            Frame::Entry => self.line("return 0;"),
            Frame::Procedure | Frame::TopLevel => self.line("return;"),
        }
    }

    /* ─────────────── Appels ─────────────── */

    /// Texte de l’appel, sans `;` (ajouté en position instruction).
    fn emit_call(&mut self, call: &FuncProcCall) -> Result<(), CodegenError> {
        match Builtin::from_name(&call.id.name) {
            Some(b @ (Builtin::Write | Builtin::Writeln)) => self.emit_print(call, b == Builtin::Writeln),
            Some(Builtin::Read | Builtin::Readln) => self.emit_read(call),
            None => {
                self.emit_id(&call.id);
                self.push("(");
                self.emit_args(&call.args)?;
                self.push(")");
                Ok(())
            }
        }
    }

    fn emit_print(&mut self, call: &FuncProcCall, line_break: bool) -> Result<(), CodegenError> {
        let mut format = String::new();
        let mut values = Vec::new();
        for (i, arg) in call.args.args.iter().enumerate() {
            match arg {
                Expr::String(s) => format.push_str(&escape_format(&s.value)),
                Expr::Char(c) => push_escaped(&mut format, c.value, Quote::Format),
                Expr::FuncProcCall(_) => {
                    return Err(CodegenError::PrintArgument { callee: call.id.name.clone(), position: i + 1 });
                }
                value => {
                    format.push_str(INT_PLACEHOLDER);
                    values.push(value);
                }
            }
        }
        if line_break {
            format.push_str("\\n");
        }

        self.push("printf(\"");
        self.push(&format);
        self.push("\"");
        for value in values {
            self.push(", ");
            self.emit_expr(value)?;
        }
        self.push(")");
        Ok(())
    }

    fn emit_read(&mut self, call: &FuncProcCall) -> Result<(), CodegenError> {
        let [target] = call.args.args.as_slice() else {
            return Err(CodegenError::ReadArity { callee: call.id.name.clone(), found: call.args.args.len() });
        };
        if !matches!(target, Expr::Id(_) | Expr::ArrayElem(_)) {
            return Err(CodegenError::ReadTarget { callee: call.id.name.clone() });
        }
        self.push("scanf(\"%d\", &");
        self.emit_expr(target)?;
        self.push(")");
        Ok(())
    }

    fn emit_args(&mut self, args: &Args) -> Result<(), CodegenError> {
        for (i, a) in args.args.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.emit_expr(a)?;
        }
        Ok(())
    }

    /* ─────────────── Expressions ─────────────── */

    fn emit_expr(&mut self, expr: &Expr) -> Result<(), CodegenError> {
        match expr {
            Expr::BinOp(b) => return self.emit_binop(b),
            Expr::Id(id) => self.emit_id(id),
            Expr::Int(i) => self.push(&i.value.to_string()),
            Expr::String(s) => {
                self.push("\"");
                self.push(&escape_c_string(&s.value));
                self.push("\"");
            }
            Expr::Char(c) => {
                self.push("'");
                self.push(&escape_c_char(c.value));
                self.push("'");
            }
            Expr::FuncProcCall(c) => return self.emit_call(c),
            Expr::ArrayElem(e) => return self.emit_array_elem(e),
        }
        Ok(())
    }

    fn emit_binop(&mut self, b: &BinOp) -> Result<(), CodegenError> {
        self.emit_operand(&b.left)?;
        self.push(" ");
        self.push(c_operator(&b.symbol));
        self.push(" ");
        self.emit_operand(&b.right)
    }

    /// Une sous-expression binaire garde le groupement de l’arbre.
    fn emit_operand(&mut self, expr: &Expr) -> Result<(), CodegenError> {
        if let Expr::BinOp(b) = expr {
            self.push("(");
            self.emit_binop(b)?;
            self.push(")");
            Ok(())
        } else {
            self.emit_expr(expr)
        }
    }

    fn emit_array_elem(&mut self, e: &ArrayElem) -> Result<(), CodegenError> {
        self.emit_id(&e.id);
        self.push("[");
        self.emit_expr(&e.index)?;
        self.push("]");
        Ok(())
    }

    fn emit_lvalue(&mut self, target: &LValue) -> Result<(), CodegenError> {
        match target {
            LValue::Id(id) => {
                self.emit_id(id);
                Ok(())
            }
            LValue::ArrayElem(e) => self.emit_array_elem(e),
        }
    }

    fn emit_id(&mut self, id: &Id) {
        self.push(&id.name);
    }

    fn emit_type(&mut self, ty: &Type) {
        self.push(c_type_name(&ty.name));
    }

    /* ─────────────── Tampon & indentation ─────────────── */

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
    }

    fn indent(&mut self) {
        for _ in 0..self.level {
            self.out.push_str(&self.indent_unit);
        }
    }

    fn line(&mut self, text: &str) {
        self.indent();
        self.push(text);
        self.newline();
    }

    fn open_scope(&mut self) {
        self.line("{");
        self.level += 1;
    }

    fn close_scope(&mut self) {
        debug_assert!(self.level > 0, "close_scope sans open_scope");
        self.level = self.level.saturating_sub(1);
        self.line("}");
    }
}

fn node_kind(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Block(_) => "Block",
        Stmt::Var(_) => "Var",
        Stmt::Assign(_) => "Assign",
        Stmt::For(_) => "For",
        Stmt::If(_) => "If",
        Stmt::Proc(_) => "Proc",
        Stmt::FuncProcCall(_) => "FuncProcCall",
        Stmt::Exit => "Exit",
    }
}

/* ───────────────────────────── Tests ───────────────────────────── */
