use indoc::indoc;
use minipas_ast::*;
use minipas_codegen::{generate, translate, translate_to_path, CodegenError, Config, EmptyEntry, Error, IndentStyle};
use pretty_assertions::assert_eq;

fn spaces() -> Config {
    Config { indent: IndentStyle::Spaces(4), ..Config::default() }
}

fn main_only(stmts: Vec<Stmt>) -> Program {
    Program::new(vec![Stmt::Block(Block::new(stmts))])
}

fn sample() -> Program {
    Program::new(vec![
        Stmt::Proc(Proc {
            id: Id::new("show"),
            params: Some(Params::new(vec![Decl::new(Type::integer(), "n")])),
            variables: Some(Var::new(vec![VarItem::decl(Type::integer(), "k")])),
            block: Block::new(vec![
                Stmt::assign("k", Expr::bin(Expr::id("n"), "*", Expr::int(2))),
                Stmt::call("writeln", vec![Expr::string("k="), Expr::id("k")]),
            ]),
        }),
        Stmt::Var(Var::new(vec![
            VarItem::decl(Type::integer(), "i"),
            VarItem::array(Type::integer(), "a", 1, 5),
            VarItem::decl(Type::integer(), "total"),
        ])),
        Stmt::Block(Block::new(vec![
            Stmt::assign("total", Expr::int(0)),
            Stmt::For(For {
                start: Assign::new("i", Expr::int(1)),
                end: Expr::int(5),
                block: Block::new(vec![
                    Stmt::assign(
                        ArrayElem::new("a", Expr::id("i")),
                        Expr::bin(Expr::id("i"), "mod", Expr::int(3)),
                    ),
                    Stmt::assign("total", Expr::bin(Expr::id("total"), "+", Expr::elem("a", Expr::id("i")))),
                ]),
            }),
            Stmt::If(If {
                cond: Expr::bin(Expr::id("total"), "=", Expr::int(0)),
                then_block: Block::new(vec![Stmt::call("writeln", vec![Expr::string("zero")])]),
                else_block: Some(Block::new(vec![Stmt::call("show", vec![Expr::id("total")])])),
            }),
            Stmt::call("write", vec![Expr::string("total="), Expr::id("total"), Expr::string("!")]),
        ])),
    ])
}

/* ─────────────── Sorties de référence ─────────────── */

#[test]
fn full_program_golden() {
    let out = translate(&sample(), &spaces()).unwrap();
    let expected = indoc! {r#"
        #include <stdio.h>
        void show(int n)
        {
            int k;
            k = n * 2;
            printf("k= %d \n", k);
        }
        int main()
        {
            int i;
            int a[6];
            int total;
            total = 0;
            for (i = 1; i <= 5; i++)
            {
                a[i] = i % 3;
                total = total + a[i];
            }
            if (total == 0)
            {
                printf("zero\n");
            }
            else
            {
                show(total);
            }
            printf("total= %d !", total);
            return 0;
        }
    "#};
    assert_eq!(out, expected);
}

#[test]
fn default_config_indents_with_tabs() {
    let prog = Program::new(vec![
        Stmt::Var(Var::new(vec![VarItem::decl(Type::integer(), "x")])),
        Stmt::Block(Block::new(vec![
            Stmt::assign("x", Expr::int(3)),
            Stmt::call("readln", vec![Expr::id("x")]),
        ])),
    ]);
    let out = translate(&prog, &Config::default()).unwrap();
    assert_eq!(
        out,
        "#include <stdio.h>\nint main()\n{\n\tint x;\n\tx = 3;\n\tscanf(\"%d\", &x);\n\treturn 0;\n}\n"
    );
}

#[test]
fn empty_program_emits_trivial_entry() {
    let out = translate(&Program::default(), &spaces()).unwrap();
    assert_eq!(out, "#include <stdio.h>\nint main()\n{\n    return 0;\n}\n");
}

#[test]
fn empty_program_can_omit_entry() {
    let cfg = Config { empty_entry: EmptyEntry::Omit, ..spaces() };
    assert_eq!(translate(&Program::default(), &cfg).unwrap(), "#include <stdio.h>\n");

    // procédures seules : pas de main non plus
    let procs = Program::new(vec![Stmt::Proc(Proc {
        id: Id::new("p"),
        params: None,
        variables: None,
        block: Block::default(),
    })]);
    assert_eq!(translate(&procs, &cfg).unwrap(), "#include <stdio.h>\nvoid p()\n{\n}\n");
}

#[test]
fn later_nodes_land_inside_entry() {
    let prog = Program::new(vec![
        Stmt::Block(Block::new(vec![Stmt::call("p", vec![])])),
        Stmt::Proc(Proc {
            id: Id::new("q"),
            params: None,
            variables: None,
            block: Block::new(vec![Stmt::Exit]),
        }),
        Stmt::Block(Block::new(vec![Stmt::Exit])),
    ]);
    let out = translate(&prog, &spaces()).unwrap();
    let expected = indoc! {"
        #include <stdio.h>
        int main()
        {
            p();
            void q()
            {
                return;
            }
            return 0;
            return 0;
        }
    "};
    assert_eq!(out, expected);
}

/* ─────────────── Propriétés ─────────────── */

#[test]
fn braces_balance_and_single_entry() {
    let mut prog = sample();
    prog.nodes.push(Stmt::Var(Var::new(vec![VarItem::decl(Type::integer(), "late")])));
    prog.nodes.push(Stmt::Block(Block::new(vec![Stmt::Exit])));
    let out = translate(&prog, &Config::default()).unwrap();
    assert_eq!(out.matches('{').count(), out.matches('}').count());
    assert_eq!(out.matches("int main()").count(), 1);
    assert!(out.starts_with("#include <stdio.h>\n"));
    assert!(out.ends_with("}\n"));
}

#[test]
fn output_is_deterministic() {
    let cfg = Config::default();
    assert_eq!(generate(&sample(), &cfg).unwrap(), generate(&sample(), &cfg).unwrap());
}

#[test]
fn yields_no_blank_lines_after_collapse() {
    let out = translate(&sample(), &Config::default()).unwrap();
    assert!(out.lines().all(|l| !l.trim().is_empty()), "{out}");
}

#[test]
fn raw_buffer_keeps_blank_separators() {
    let cfg = Config { collapse_blank_lines: false, ..spaces() };
    let raw = translate(&sample(), &cfg).unwrap();
    assert_eq!(raw, generate(&sample(), &cfg).unwrap());
    assert!(raw.contains("{\n\n    int k;"));
    assert!(raw.contains("int main()\n{\n\n    int i;"));
}

#[test]
fn nested_binops_keep_tree_grouping() {
    let out = translate(
        &main_only(vec![
            Stmt::assign("x", Expr::bin(Expr::bin(Expr::id("a"), "+", Expr::id("b")), "*", Expr::id("c"))),
            Stmt::assign("y", Expr::bin(Expr::id("a"), "-", Expr::bin(Expr::id("b"), "-", Expr::id("c")))),
            Stmt::assign(
                "z",
                Expr::bin(
                    Expr::bin(Expr::id("p"), "and", Expr::id("q")),
                    "or",
                    Expr::bin(Expr::id("n"), "div", Expr::int(2)),
                ),
            ),
        ]),
        &spaces(),
    )
    .unwrap();
    assert!(out.contains("    x = (a + b) * c;\n"), "{out}");
    assert!(out.contains("    y = a - (b - c);\n"), "{out}");
    assert!(out.contains("    z = (p && q) || (n / 2);\n"), "{out}");
}

#[test]
fn literals_render_with_c_quotes() {
    let out = translate(
        &main_only(vec![
            Stmt::assign("c", Expr::char('x')),
            Stmt::call("log", vec![Expr::string("msg"), Expr::int(-4)]),
        ]),
        &spaces(),
    )
    .unwrap();
    assert!(out.contains("    c = 'x';\n"));
    assert!(out.contains("    log(\"msg\", -4);\n"));
}

#[test]
fn literal_text_is_escaped_for_c() {
    let out = translate(
        &main_only(vec![
            Stmt::call("writeln", vec![Expr::string("50%"), Expr::id("x")]),
            Stmt::call("write", vec![Expr::string(r#"say "hi""#)]),
            Stmt::call("write", vec![Expr::char('"')]),
            Stmt::call("write", vec![Expr::string(r"C:\tmp")]),
            Stmt::assign("c", Expr::char('\'')),
            Stmt::call("log", vec![Expr::string(r#"a"b%"#)]),
        ]),
        &spaces(),
    )
    .unwrap();
    assert!(out.contains(r#"    printf("50%% %d \n", x);"#), "{out}");
    assert!(out.contains(r#"    printf("say \"hi\"");"#), "{out}");
    assert!(out.contains(r#"    printf("\"");"#), "{out}");
    assert!(out.contains(r#"    printf("C:\\tmp");"#), "{out}");
    assert!(out.contains(r"    c = '\'';"), "{out}");
    // hors format, `%` reste tel quel
    assert!(out.contains(r#"    log("a\"b%");"#), "{out}");
}

#[test]
fn read_accepts_array_element() {
    let out = translate(&main_only(vec![Stmt::call("read", vec![Expr::elem("a", Expr::int(2))])]), &spaces()).unwrap();
    assert!(out.contains("    scanf(\"%d\", &a[2]);\n"));
}

#[test]
fn write_binop_and_element_arguments() {
    let out = translate(
        &main_only(vec![Stmt::call(
            "writeln",
            vec![Expr::bin(Expr::id("x"), "+", Expr::int(1)), Expr::elem("a", Expr::id("i"))],
        )]),
        &spaces(),
    )
    .unwrap();
    assert!(out.contains(r#"    printf(" %d  %d \n", x + 1, a[i]);"#), "{out}");
}

#[test]
fn procedure_with_several_params() {
    let prog = Program::new(vec![Stmt::Proc(Proc {
        id: Id::new("add"),
        params: Some(Params::new(vec![Decl::new(Type::integer(), "a"), Decl::new(Type::new("char"), "b")])),
        variables: None,
        block: Block::default(),
    })]);
    let out = translate(&prog, &spaces()).unwrap();
    assert!(out.contains("void add(int a, char b)\n{\n}\n"), "{out}");
}

/* ─────────────── Erreurs ─────────────── */

#[test]
fn read_arity_is_rejected() {
    let none = generate(&main_only(vec![Stmt::call("read", vec![])]), &Config::default());
    assert_eq!(none.unwrap_err(), CodegenError::ReadArity { callee: "read".into(), found: 0 });

    let two = generate(&main_only(vec![Stmt::call("readln", vec![Expr::id("x"), Expr::id("y")])]), &Config::default());
    assert_eq!(two.unwrap_err(), CodegenError::ReadArity { callee: "readln".into(), found: 2 });
}

#[test]
fn read_target_must_be_addressable() {
    let err = generate(&main_only(vec![Stmt::call("read", vec![Expr::int(1)])]), &Config::default()).unwrap_err();
    assert_eq!(err, CodegenError::ReadTarget { callee: "read".into() });
}

#[test]
fn print_rejects_call_argument() {
    let prog = main_only(vec![Stmt::call("write", vec![Expr::string("v="), Expr::call("f", vec![])])]);
    let err = generate(&prog, &Config::default()).unwrap_err();
    assert_eq!(err, CodegenError::PrintArgument { callee: "write".into(), position: 2 });
}

#[test]
fn failed_translation_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("bad.c");
    let err = translate_to_path(&main_only(vec![Stmt::call("read", vec![])]), &Config::default(), &target).unwrap_err();
    assert!(matches!(err, Error::Codegen(CodegenError::ReadArity { .. })));
    assert!(!target.exists());
}

#[test]
fn translate_to_path_writes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("build/sample.c");
    let art = translate_to_path(&sample(), &Config::default(), &target).unwrap();
    let written = std::fs::read_to_string(&target).unwrap();
    assert_eq!(art.path, target);
    assert_eq!(art.size, written.len());
    assert_eq!(written, translate(&sample(), &Config::default()).unwrap());
}
