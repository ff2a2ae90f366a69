//! minipas-ast — Arbre syntaxique du langage minipas.
//!
//! L’AST est construit **une fois** en amont (lexer/parser, hors de ce repo),
//! supposé typé et structurellement valide, puis lu en lecture seule par le
//! backend (`minipas-codegen`).
//!
//! Deux enums fermés couvrent les positions possibles d’un nœud :
//! - [`Stmt`] : position instruction (`Block`, `Var`, `Assign`, `For`, `If`,
//!   `Proc`, `FuncProcCall`, `Exit`)
//! - [`Expr`] : position expression (`BinOp`, `Id`, `Int`, `String`, `Char`,
//!   `FuncProcCall`, `ArrayElem`)
//!
//! Feature `serde` : (dé)sérialisation JSON, enums taggés par `"kind"`.
//!
//! ```
//! use minipas_ast::*;
//!
//! let prog = Program::new(vec![
//!     Stmt::Var(Var::new(vec![VarItem::decl(Type::integer(), "x")])),
//!     Stmt::Block(Block::new(vec![Stmt::assign("x", Expr::int(3))])),
//! ]);
//! assert_eq!(prog.nodes.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms, unused_must_use)]

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ───────────────────────────── Racine & blocs ───────────────────────────── */

/// Unité source complète : instructions de premier niveau, dans l’ordre.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Program {
    pub nodes: Vec<Stmt>,
}

impl Program {
    pub fn new(nodes: Vec<Stmt>) -> Self { Self { nodes } }
}

/// Instruction composée (`begin … end`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    pub nodes: Vec<Stmt>,
}

impl Block {
    pub fn new(nodes: Vec<Stmt>) -> Self { Self { nodes } }
}

/// Section de déclarations (`var …`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Var {
    pub nodes: Vec<VarItem>,
}

impl Var {
    pub fn new(nodes: Vec<VarItem>) -> Self { Self { nodes } }
}

/* ───────────────────────────── Déclarations ───────────────────────────── */

/// Élément d’une section `var`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum VarItem {
    Decl(Decl),
    ArrayDecl(ArrayDecl),
}

impl VarItem {
    pub fn decl(ty: Type, id: impl Into<String>) -> Self {
        VarItem::Decl(Decl::new(ty, id))
    }

    pub fn array(ty: Type, id: impl Into<String>, start: i64, end: i64) -> Self {
        VarItem::ArrayDecl(ArrayDecl {
            ty,
            id: Id::new(id),
            start: IntLit::new(start),
            end: IntLit::new(end),
        })
    }
}

/// Déclaration scalaire `x : integer`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decl {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: Type,
    pub id: Id,
}

impl Decl {
    pub fn new(ty: Type, id: impl Into<String>) -> Self {
        Self { ty, id: Id::new(id) }
    }
}

/// Déclaration de tableau `a : array[start..end] of integer` (bornes inclusives).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayDecl {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub ty: Type,
    pub id: Id,
    pub start: IntLit,
    pub end: IntLit,
}

/// Nom de type. `"integer"` est le seul nom traduit, le reste passe tel quel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Type {
    pub name: String,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }
    pub fn integer() -> Self { Self::new("integer") }
}

/// Liste des paramètres formels d’une procédure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Params {
    pub params: Vec<Decl>,
}

impl Params {
    pub fn new(params: Vec<Decl>) -> Self { Self { params } }
}

/* ───────────────────────────── Instructions ───────────────────────────── */

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Stmt {
    Block(Block),
    Var(Var),
    Assign(Assign),
    For(For),
    If(If),
    Proc(Proc),
    FuncProcCall(FuncProcCall),
    Exit,
}

impl Stmt {
    pub fn assign(target: impl Into<LValue>, expr: Expr) -> Self {
        Stmt::Assign(Assign::new(target, expr))
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Stmt::FuncProcCall(FuncProcCall::new(name, args))
    }

    /// Un nœud `Var` ou `Block` de premier niveau ouvre le point d’entrée.
    pub fn opens_entry(&self) -> bool {
        matches!(self, Stmt::Var(_) | Stmt::Block(_))
    }
}

/// Cible d’affectation : variable ou élément de tableau.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum LValue {
    Id(Id),
    ArrayElem(ArrayElem),
}

impl From<&str> for LValue {
    fn from(name: &str) -> Self { LValue::Id(Id::new(name)) }
}
impl From<Id> for LValue {
    fn from(id: Id) -> Self { LValue::Id(id) }
}
impl From<ArrayElem> for LValue {
    fn from(elem: ArrayElem) -> Self { LValue::ArrayElem(elem) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assign {
    pub target: LValue,
    pub expr: Expr,
}

impl Assign {
    pub fn new(target: impl Into<LValue>, expr: Expr) -> Self {
        Self { target: target.into(), expr }
    }
}

/// Boucle comptée ascendante : `for <start> to <end> do <block>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct For {
    pub start: Assign,
    pub end: Expr,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct If {
    pub cond: Expr,
    pub then_block: Block,
    #[cfg_attr(feature = "serde", serde(default))]
    pub else_block: Option<Block>,
}

/// Définition de procédure (toujours sans valeur de retour).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Proc {
    pub id: Id,
    #[cfg_attr(feature = "serde", serde(default))]
    pub params: Option<Params>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variables: Option<Var>,
    pub block: Block,
}

/* ───────────────────────────── Expressions ───────────────────────────── */

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum Expr {
    BinOp(BinOp),
    Id(Id),
    Int(IntLit),
    String(StrLit),
    Char(CharLit),
    FuncProcCall(FuncProcCall),
    ArrayElem(ArrayElem),
}

impl Expr {
    pub fn id(name: impl Into<String>) -> Self { Expr::Id(Id::new(name)) }
    pub fn int(value: i64) -> Self { Expr::Int(IntLit::new(value)) }
    pub fn string(value: impl Into<String>) -> Self { Expr::String(StrLit { value: value.into() }) }
    pub fn char(value: char) -> Self { Expr::Char(CharLit { value }) }

    pub fn bin(left: Expr, symbol: impl Into<String>, right: Expr) -> Self {
        Expr::BinOp(BinOp { left: Box::new(left), symbol: symbol.into(), right: Box::new(right) })
    }

    pub fn elem(name: impl Into<String>, index: Expr) -> Self {
        Expr::ArrayElem(ArrayElem::new(name, index))
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FuncProcCall(FuncProcCall::new(name, args))
    }
}

/// Expression binaire ; `symbol` est le symbole source (`+`, `=`, `mod`, `and`…).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    pub left: Box<Expr>,
    pub symbol: String,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Id {
    pub name: String,
}

impl Id {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntLit {
    pub value: i64,
}

impl IntLit {
    pub fn new(value: i64) -> Self { Self { value } }
}

/// Littéral chaîne ; `value` est le texte brut, sans guillemets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrLit {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharLit {
    pub value: char,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArrayElem {
    pub id: Id,
    pub index: Box<Expr>,
}

impl ArrayElem {
    pub fn new(name: impl Into<String>, index: Expr) -> Self {
        Self { id: Id::new(name), index: Box::new(index) }
    }
}

/// Appel de procédure, built-ins compris (`read`, `readln`, `write`, `writeln`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuncProcCall {
    pub id: Id,
    #[cfg_attr(feature = "serde", serde(default))]
    pub args: Args,
}

impl FuncProcCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self { id: Id::new(name), args: Args { args } }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Args {
    pub args: Vec<Expr>,
}

/* ───────────────────────────── Tests ───────────────────────────── */
